//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::priority::Priority;
use super::status::NotificationStatus;

/// A single outbound message: its intent, recipients, lifecycle status,
/// and retry bookkeeping.
///
/// Records are created `Pending` and mutated only through the three
/// transition methods. Deletion is a store-level administrative operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Type of the originating domain object, if any.
    pub owner_type: Option<String>,
    /// Id of the originating domain object, if any.
    pub owner_id: Option<Uuid>,
    /// Current lifecycle status.
    pub status: NotificationStatus,
    /// When true, delivery is redirected to the configured test recipients.
    pub is_debug: bool,
    /// Sender address.
    pub sender: String,
    /// Ordered recipient addresses. Non-empty for a dispatchable record.
    pub recipients: Vec<String>,
    /// Optional reply-to address.
    pub reply_to: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Error message from the last failed attempt.
    pub error_message: Option<String>,
    /// Free-form tag used for filtering and reporting.
    pub category: String,
    /// Template identifier for body rendering.
    pub template_name: Option<String>,
    /// Data passed to the template (JSON).
    pub template_data: Option<serde_json::Value>,
    /// Pre-rendered body, used when template rendering is bypassed.
    pub message: Option<String>,
    /// Caller-supplied context, opaque to the core (JSON).
    pub metadata: Option<serde_json::Value>,
    /// Dispatch priority rank.
    pub priority: Priority,
    /// Number of failed delivery attempts. Never decreases.
    pub attempts: i32,
    /// Ceiling on attempts before retry eligibility ends.
    pub max_attempts: i32,
    /// When the notification was delivered.
    pub sent_at: Option<DateTime<Utc>>,
    /// When the notification was queued for later delivery.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// When the last delivery attempt failed. Overwritten on each failure.
    pub failed_at: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification is waiting for delivery.
    pub fn is_pending(&self) -> bool {
        self.status == NotificationStatus::Pending
    }

    /// Check if the notification was delivered.
    pub fn is_sent(&self) -> bool {
        self.status == NotificationStatus::Sent
    }

    /// Check if the last delivery attempt failed.
    pub fn is_failed(&self) -> bool {
        self.status == NotificationStatus::Failed
    }

    /// Check if the notification is queued for later delivery.
    pub fn is_scheduled(&self) -> bool {
        self.status == NotificationStatus::Scheduled
    }

    /// Attempt slots left before the ceiling. Never negative.
    pub fn attempts_remaining(&self) -> i32 {
        (self.max_attempts - self.attempts).max(0)
    }

    /// Whether an external dispatcher may re-drive this notification.
    ///
    /// The boundary is inclusive: a record whose attempts equal
    /// `max_attempts` is still eligible, so one more attempt than the
    /// ceiling suggests is permitted. Kept as-is for compatibility.
    pub fn can_retry(&self) -> bool {
        self.is_failed() && self.attempts <= self.max_attempts
    }

    /// Mark the notification as delivered.
    ///
    /// No-op unless the record is `Pending`. Attempts are untouched.
    pub fn mark_sent(&mut self, now: DateTime<Utc>) {
        if self.status.can_transition_to(NotificationStatus::Sent) {
            self.status = NotificationStatus::Sent;
            self.sent_at = Some(now);
        }
    }

    /// Record a failed delivery attempt.
    ///
    /// The `Pending` guard protects only the status field: `attempts`,
    /// `failed_at`, and `error_message` update on every call, including
    /// calls on a record that already left `Pending`. Repeated calls on a
    /// `Failed` record keep incrementing the counter without bound.
    // TODO: confirm the counter should really bypass the guard before
    // anything starts re-driving failed records.
    pub fn mark_failed(&mut self, error: Option<&str>, now: DateTime<Utc>) {
        self.attempts += 1;
        self.failed_at = Some(now);
        if let Some(msg) = error.map(str::trim).filter(|m| !m.is_empty()) {
            self.error_message = Some(msg.to_string());
        }
        if self.status.can_transition_to(NotificationStatus::Failed) {
            self.status = NotificationStatus::Failed;
        }
    }

    /// Queue the notification for later delivery.
    ///
    /// No-op unless the record is `Pending`. The priority falls back to
    /// `Normal` when none is given.
    pub fn mark_scheduled(&mut self, priority: Option<Priority>, now: DateTime<Utc>) {
        if self.status.can_transition_to(NotificationStatus::Scheduled) {
            self.status = NotificationStatus::Scheduled;
            self.scheduled_at = Some(now);
            self.priority = priority.unwrap_or_default();
        }
    }
}

/// Data required to create a new notification.
///
/// Fields left unset are resolved by the service layer: the sender falls
/// back to the configured default address, the priority to `Normal`, and
/// the attempt ceiling to the configured default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNotification {
    /// Type of the originating domain object.
    pub owner_type: Option<String>,
    /// Id of the originating domain object.
    pub owner_id: Option<Uuid>,
    /// Redirect delivery to the configured test recipients.
    pub is_debug: bool,
    /// Sender address. `None` means use the configured default.
    pub sender: Option<String>,
    /// Recipient addresses.
    pub recipients: Vec<String>,
    /// Optional reply-to address.
    pub reply_to: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Free-form tag used for filtering and reporting.
    pub category: String,
    /// Template identifier for body rendering.
    pub template_name: Option<String>,
    /// Data passed to the template.
    pub template_data: Option<serde_json::Value>,
    /// Pre-rendered body.
    pub message: Option<String>,
    /// Caller-supplied context, opaque to the core.
    pub metadata: Option<serde_json::Value>,
    /// Dispatch priority. `None` means `Normal`.
    pub priority: Option<Priority>,
    /// Ceiling on attempts. `None` means the configured default.
    pub max_attempts: Option<i32>,
}
