//! Notification lifecycle orchestration.

pub mod service;

pub use service::{DynNotificationStore, NotificationService};
