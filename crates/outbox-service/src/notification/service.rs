//! Notification creation and lifecycle transitions.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use outbox_core::config::mail::MailConfig;
use outbox_core::error::AppError;
use outbox_core::result::AppResult;
use outbox_core::traits::Store;
use outbox_entity::notification::model::{CreateNotification, Notification};
use outbox_entity::notification::priority::Priority;
use outbox_entity::notification::status::NotificationStatus;
use outbox_entity::notification::try_transition;

use crate::envelope::{Envelope, EnvelopeResolver, normalize_addresses};

/// Object-safe handle to any notification store implementation.
pub type DynNotificationStore = Arc<dyn Store<Notification, CreateNotification, Uuid>>;

/// Manages the notification lifecycle: creation with validation and the
/// three guarded status transitions.
///
/// Each transition loads the record, mutates it in memory, and persists
/// it with a single write. A transition refused by the status guard is a
/// silent no-op (logged at debug level), never an error.
#[derive(Clone)]
pub struct NotificationService {
    /// Notification store.
    store: DynNotificationStore,
    /// Envelope resolver carrying the mail configuration.
    resolver: EnvelopeResolver,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: DynNotificationStore, mail: MailConfig) -> Self {
        Self {
            store,
            resolver: EnvelopeResolver::new(mail),
        }
    }

    /// Creates a pending notification.
    ///
    /// Recipients are normalized before validation; the sender, priority,
    /// and attempt ceiling fall back to configured defaults.
    pub async fn create_notification(
        &self,
        mut draft: CreateNotification,
    ) -> AppResult<Notification> {
        if draft.subject.trim().is_empty() {
            return Err(AppError::validation("Notification subject must not be empty"));
        }

        draft.recipients = normalize_addresses(&draft.recipients);
        if draft.recipients.is_empty() {
            return Err(AppError::validation(
                "Notification must have at least one recipient",
            ));
        }

        if draft.sender.as_deref().is_none_or(|s| s.trim().is_empty()) {
            draft.sender = Some(self.resolver.config().from_address.clone());
        }
        draft.priority = Some(draft.priority.unwrap_or_default());

        let max_attempts = draft
            .max_attempts
            .unwrap_or(self.resolver.config().default_max_attempts);
        if max_attempts < 1 {
            return Err(AppError::validation(format!(
                "max_attempts must be positive, got {max_attempts}"
            )));
        }
        draft.max_attempts = Some(max_attempts);

        let record = self.store.create(&draft).await?;
        info!(
            notification_id = %record.id,
            category = %record.category,
            priority = %record.priority,
            recipients = record.recipients.len(),
            "Notification created"
        );
        Ok(record)
    }

    /// Marks a notification as delivered.
    ///
    /// No-op on a record that already left `Pending`; `sent_at` and the
    /// attempt counter are untouched in that case.
    pub async fn mark_as_sent(&self, id: Uuid) -> AppResult<Notification> {
        let mut record = self.load(id).await?;

        match try_transition(record.status, NotificationStatus::Sent) {
            Ok(_) => {
                record.mark_sent(Utc::now());
                info!(notification_id = %record.id, "Notification marked as sent");
            }
            Err(refused) => {
                debug!(notification_id = %record.id, %refused, "Ignoring sent transition");
            }
        }

        self.store.save(&record).await
    }

    /// Records a failed delivery attempt.
    ///
    /// The attempt counter, failure timestamp, and error message update
    /// even when the status guard refuses the transition; only the status
    /// field itself is protected.
    pub async fn mark_as_failed(&self, id: Uuid, error: Option<&str>) -> AppResult<Notification> {
        let mut record = self.load(id).await?;

        if let Err(refused) = try_transition(record.status, NotificationStatus::Failed) {
            debug!(
                notification_id = %record.id,
                %refused,
                "Status unchanged; failure still recorded"
            );
        }
        record.mark_failed(error, Utc::now());
        warn!(
            notification_id = %record.id,
            attempts = record.attempts,
            max_attempts = record.max_attempts,
            error = record.error_message.as_deref().unwrap_or(""),
            "Notification delivery failed"
        );

        self.store.save(&record).await
    }

    /// Queues a notification for later delivery.
    ///
    /// No-op on a record that already left `Pending`. The priority falls
    /// back to `Normal` when none is given.
    pub async fn mark_as_scheduled(
        &self,
        id: Uuid,
        priority: Option<Priority>,
    ) -> AppResult<Notification> {
        let mut record = self.load(id).await?;

        match try_transition(record.status, NotificationStatus::Scheduled) {
            Ok(_) => {
                record.mark_scheduled(priority, Utc::now());
                info!(
                    notification_id = %record.id,
                    priority = %record.priority,
                    "Notification scheduled"
                );
            }
            Err(refused) => {
                debug!(notification_id = %record.id, %refused, "Ignoring scheduled transition");
            }
        }

        self.store.save(&record).await
    }

    /// Resolves the delivery envelope for a record.
    pub fn envelope(&self, record: &Notification) -> Envelope {
        self.resolver.resolve(record)
    }

    async fn load(&self, id: Uuid) -> AppResult<Notification> {
        self.store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use outbox_core::error::ErrorKind;
    use outbox_database::MemoryNotificationStore;

    fn service() -> (NotificationService, Arc<MemoryNotificationStore>) {
        let store = Arc::new(MemoryNotificationStore::new());
        let mail = MailConfig {
            from_address: "system@example.com".to_string(),
            ..Default::default()
        };
        (NotificationService::new(store.clone(), mail), store)
    }

    fn draft() -> CreateNotification {
        CreateNotification {
            recipients: vec!["user@example.com".to_string()],
            subject: "Welcome".to_string(),
            category: "onboarding".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let (service, _) = service();
        let record = service.create_notification(draft()).await.unwrap();

        assert!(record.is_pending());
        assert_eq!(record.priority, Priority::Normal);
        assert_eq!(record.sender, "system@example.com");
        assert_eq!(record.attempts, 0);
        assert_eq!(record.max_attempts, 3);
    }

    #[tokio::test]
    async fn test_create_normalizes_recipients() {
        let (service, _) = service();
        let mut input = draft();
        input.recipients = vec![" a@example.com, b@example.com ".to_string(), "  ".to_string()];

        let record = service.create_notification(input).await.unwrap();
        assert_eq!(record.recipients, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_subject() {
        let (service, store) = service();
        let mut input = draft();
        input.subject = "   ".to_string();

        let err = service.create_notification(input).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_recipients() {
        let (service, _) = service();
        let mut input = draft();
        input.recipients = vec![" , ".to_string()];

        let err = service.create_notification(input).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_max_attempts() {
        let (service, _) = service();
        let mut input = draft();
        input.max_attempts = Some(0);

        let err = service.create_notification(input).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_mark_as_sent_then_noop() {
        let (service, _) = service();
        let record = service.create_notification(draft()).await.unwrap();

        let sent = service.mark_as_sent(record.id).await.unwrap();
        assert!(sent.is_sent());
        assert!(sent.sent_at.is_some());
        assert_eq!(sent.attempts, 0);

        let again = service.mark_as_sent(record.id).await.unwrap();
        assert!(again.is_sent());
        assert_eq!(again.sent_at, sent.sent_at);
    }

    #[tokio::test]
    async fn test_mark_as_failed_records_attempt() {
        let (service, _) = service();
        let record = service.create_notification(draft()).await.unwrap();

        let failed = service.mark_as_failed(record.id, Some("boom")).await.unwrap();
        assert!(failed.is_failed());
        assert_eq!(failed.attempts, 1);
        assert!(failed.failed_at.is_some());
        assert_eq!(failed.error_message.as_deref(), Some("boom"));
        assert!(failed.can_retry());
    }

    #[tokio::test]
    async fn test_repeated_failures_keep_counting() {
        let (service, _) = service();
        let record = service.create_notification(draft()).await.unwrap();

        service.mark_as_failed(record.id, Some("boom")).await.unwrap();
        for _ in 0..3 {
            service.mark_as_failed(record.id, None).await.unwrap();
        }

        // The guard froze the status after the first failure, but each
        // call still persisted a counter increment.
        let persisted = service.mark_as_failed(record.id, None).await.unwrap();
        assert!(persisted.is_failed());
        assert_eq!(persisted.attempts, 5);
        assert!(!persisted.can_retry());
    }

    #[tokio::test]
    async fn test_mark_as_scheduled_urgent() {
        let (service, _) = service();
        let record = service.create_notification(draft()).await.unwrap();

        let scheduled = service
            .mark_as_scheduled(record.id, Some(Priority::Urgent))
            .await
            .unwrap();
        assert!(scheduled.is_scheduled());
        assert!(scheduled.scheduled_at.is_some());
        assert_eq!(scheduled.priority, Priority::Urgent);
    }

    #[tokio::test]
    async fn test_scheduling_a_sent_record_is_a_noop() {
        let (service, _) = service();
        let record = service.create_notification(draft()).await.unwrap();
        service.mark_as_sent(record.id).await.unwrap();

        let after = service
            .mark_as_scheduled(record.id, Some(Priority::Bulk))
            .await
            .unwrap();
        assert!(after.is_sent());
        assert_eq!(after.scheduled_at, None);
        assert_eq!(after.priority, Priority::Normal);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (service, _) = service();
        let err = service.mark_as_sent(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_envelope_uses_debug_redirect() {
        let store = Arc::new(MemoryNotificationStore::new());
        let mail = MailConfig {
            from_address: "system@example.com".to_string(),
            debug: outbox_core::config::mail::MailDebugConfig {
                enabled: true,
                recipients: vec!["qa@example.com".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let service = NotificationService::new(store, mail);
        let record = service.create_notification(draft()).await.unwrap();

        let envelope = service.envelope(&record);
        assert_eq!(envelope.recipients, vec!["qa@example.com"]);
        assert_eq!(envelope.subject, "[DEBUG] Welcome");
    }
}
