//! # outbox-service
//!
//! Business logic layer for Outbox. Orchestrates the notification store
//! and envelope configuration to implement the notification lifecycle.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod envelope;
pub mod notification;

pub use envelope::{Envelope, EnvelopeResolver};
pub use notification::NotificationService;
