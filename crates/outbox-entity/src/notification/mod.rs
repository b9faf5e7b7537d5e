//! Notification domain entities.

pub mod model;
pub mod priority;
pub mod status;

pub use model::{CreateNotification, Notification};
pub use priority::Priority;
pub use status::{NotificationStatus, TransitionError, try_transition};
