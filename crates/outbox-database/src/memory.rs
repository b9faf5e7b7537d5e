//! In-memory notification store.
//!
//! Implements the same contract as the PostgreSQL repository over a
//! hash map, so the service layer can be exercised without a database.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use outbox_core::error::AppError;
use outbox_core::result::AppResult;
use outbox_core::traits::Store;
use outbox_entity::notification::model::{CreateNotification, Notification};
use outbox_entity::notification::status::NotificationStatus;

/// Notification store keeping all records in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotificationStore {
    records: Arc<RwLock<HashMap<Uuid, Notification>>>,
}

impl MemoryNotificationStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl Store<Notification, CreateNotification, Uuid> for MemoryNotificationStore {
    async fn create(&self, draft: &CreateNotification) -> AppResult<Notification> {
        let now = Utc::now();
        let record = Notification {
            id: Uuid::new_v4(),
            owner_type: draft.owner_type.clone(),
            owner_id: draft.owner_id,
            status: NotificationStatus::Pending,
            is_debug: draft.is_debug,
            sender: draft.sender.clone().unwrap_or_default(),
            recipients: draft.recipients.clone(),
            reply_to: draft.reply_to.clone(),
            subject: draft.subject.clone(),
            error_message: None,
            category: draft.category.clone(),
            template_name: draft.template_name.clone(),
            template_data: draft.template_data.clone(),
            message: draft.message.clone(),
            metadata: draft.metadata.clone(),
            priority: draft.priority.unwrap_or_default(),
            attempts: 0,
            max_attempts: draft.max_attempts.unwrap_or(3),
            sent_at: None,
            scheduled_at: None,
            failed_at: None,
            created_at: now,
            updated_at: now,
        };

        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn save(&self, entity: &Notification) -> AppResult<Notification> {
        let mut records = self.records.write().await;
        if !records.contains_key(&entity.id) {
            return Err(AppError::not_found(format!(
                "Notification {} does not exist",
                entity.id
            )));
        }

        let mut updated = entity.clone();
        updated.updated_at = Utc::now();
        records.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Notification>> {
        Ok(self.records.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CreateNotification {
        CreateNotification {
            sender: Some("system@example.com".to_string()),
            recipients: vec!["user@example.com".to_string()],
            subject: "Password reset".to_string(),
            category: "account".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_defaults() {
        let store = MemoryNotificationStore::new();
        let record = store.create(&draft()).await.unwrap();

        assert!(record.is_pending());
        assert_eq!(record.attempts, 0);
        assert_eq!(record.max_attempts, 3);
        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.find_by_id(&record.id).await.unwrap().unwrap().id,
            record.id
        );
    }

    #[tokio::test]
    async fn test_save_round_trips_mutations() {
        let store = MemoryNotificationStore::new();
        let mut record = store.create(&draft()).await.unwrap();

        record.mark_failed(Some("smtp timeout"), Utc::now());
        let saved = store.save(&record).await.unwrap();

        assert!(saved.is_failed());
        assert_eq!(saved.attempts, 1);
        assert!(saved.updated_at >= record.created_at);
    }

    #[tokio::test]
    async fn test_save_unknown_id_is_not_found() {
        let store = MemoryNotificationStore::new();
        let record = store.create(&draft()).await.unwrap();
        let mut ghost = record.clone();
        ghost.id = Uuid::new_v4();

        let err = store.save(&ghost).await.unwrap_err();
        assert_eq!(err.kind, outbox_core::error::ErrorKind::NotFound);
    }
}
