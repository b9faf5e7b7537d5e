//! # outbox-core
//!
//! Core crate for Outbox. Contains the store trait, configuration schemas,
//! pagination types, logging setup, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Outbox crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
