//! Concrete store implementations.

pub mod notification;

pub use notification::NotificationRepository;
