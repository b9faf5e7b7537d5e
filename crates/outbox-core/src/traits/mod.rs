//! Trait definitions forming the seams between Outbox crates.

pub mod store;

pub use store::Store;
