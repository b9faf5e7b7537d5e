//! # outbox-database
//!
//! PostgreSQL connection management and concrete store implementations
//! for Outbox, plus an in-memory store for embedding and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryNotificationStore;
pub use repositories::NotificationRepository;
