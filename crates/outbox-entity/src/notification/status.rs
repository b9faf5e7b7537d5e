//! Notification status enumeration and transition guard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of an outbound notification.
///
/// `Pending` is the only state with outgoing transitions. The three other
/// states are terminal from the core's perspective: no transition back to
/// `Pending` is exposed, and re-driving a failed notification is the
/// responsibility of an external dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Waiting for a delivery attempt.
    Pending,
    /// Successfully delivered.
    Sent,
    /// A delivery attempt failed.
    Failed,
    /// Queued for delivery at a later time.
    Scheduled,
}

impl NotificationStatus {
    /// Check if the status is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Sent | Self::Failed | Self::Scheduled)
    }

    /// Check whether the transition guard admits a change to `target`.
    ///
    /// Only `Pending` records may change status, and only to one of the
    /// terminal states.
    pub fn can_transition_to(&self, target: NotificationStatus) -> bool {
        matches!(self, Self::Pending) && target != Self::Pending
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationStatus {
    type Err = outbox_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "scheduled" => Ok(Self::Scheduled),
            _ => Err(outbox_core::AppError::validation(format!(
                "Invalid notification status: '{s}'. Expected one of: pending, sent, failed, scheduled"
            ))),
        }
    }
}

/// Error returned when the transition guard refuses a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal notification transition: {from} -> {to}")]
pub struct TransitionError {
    /// The status the record was in.
    pub from: NotificationStatus,
    /// The status that was requested.
    pub to: NotificationStatus,
}

/// Apply the transition guard as a pure function.
///
/// The lifecycle operations absorb a refused transition as a silent no-op;
/// this function exists so callers that want to detect the no-op can do so
/// without changing that behavior.
pub fn try_transition(
    current: NotificationStatus,
    target: NotificationStatus,
) -> Result<NotificationStatus, TransitionError> {
    if current.can_transition_to(target) {
        Ok(target)
    } else {
        Err(TransitionError {
            from: current,
            to: target,
        })
    }
}
