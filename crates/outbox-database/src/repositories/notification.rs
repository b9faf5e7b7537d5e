//! Notification store implementation backed by PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use outbox_core::error::{AppError, ErrorKind};
use outbox_core::result::AppResult;
use outbox_core::traits::Store;
use outbox_core::types::pagination::{PageRequest, PageResponse};
use outbox_entity::notification::model::{CreateNotification, Notification};
use outbox_entity::notification::priority::Priority;
use outbox_entity::notification::status::NotificationStatus;

/// Store for notification records and their query projections.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find notification", e)
            })
    }

    /// List notifications with pagination, most urgent first.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Notification>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
            })?;

        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications ORDER BY priority ASC, created_at ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })?;

        Ok(PageResponse::new(
            notifs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List notifications in a given status.
    pub async fn find_by_status(
        &self,
        status: NotificationStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count by status", e)
                })?;

        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE status = $1 \
             ORDER BY priority ASC, created_at ASC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list by status", e)
        })?;

        Ok(PageResponse::new(
            notifs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List notifications in a given category.
    pub async fn find_by_category(
        &self,
        category: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE category = $1")
                .bind(category)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count by category", e)
                })?;

        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE category = $1 \
             ORDER BY priority ASC, created_at ASC LIMIT $2 OFFSET $3",
        )
        .bind(category)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list by category", e)
        })?;

        Ok(PageResponse::new(
            notifs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List notifications at a given priority rank.
    pub async fn find_by_priority(
        &self,
        priority: Priority,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE priority = $1")
                .bind(priority)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count by priority", e)
                })?;

        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE priority = $1 \
             ORDER BY created_at ASC LIMIT $2 OFFSET $3",
        )
        .bind(priority)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list by priority", e)
        })?;

        Ok(PageResponse::new(
            notifs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List debug-flagged notifications.
    pub async fn find_debug(&self, page: &PageRequest) -> AppResult<PageResponse<Notification>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE is_debug = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count debug records", e)
                })?;

        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE is_debug = TRUE \
             ORDER BY priority ASC, created_at ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list debug records", e)
        })?;

        Ok(PageResponse::new(
            notifs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count notifications in a given status.
    pub async fn count_by_status(&self, status: NotificationStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count by status", e)
            })
    }

    /// Create a notification. The row starts pending with zero attempts.
    pub async fn create(&self, draft: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (owner_type, owner_id, is_debug, sender, recipients, \
             reply_to, subject, category, template_name, template_data, message, metadata, \
             priority, max_attempts) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING *",
        )
        .bind(&draft.owner_type)
        .bind(draft.owner_id)
        .bind(draft.is_debug)
        .bind(draft.sender.as_deref().unwrap_or_default())
        .bind(&draft.recipients)
        .bind(&draft.reply_to)
        .bind(&draft.subject)
        .bind(&draft.category)
        .bind(&draft.template_name)
        .bind(&draft.template_data)
        .bind(&draft.message)
        .bind(&draft.metadata)
        .bind(draft.priority.unwrap_or_default())
        .bind(draft.max_attempts.unwrap_or(3))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })
    }

    /// Write back a mutated notification. Full-row update, single write.
    pub async fn save(&self, notification: &Notification) -> AppResult<Notification> {
        let updated = sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET status = $2, is_debug = $3, sender = $4, recipients = $5, \
             reply_to = $6, subject = $7, error_message = $8, category = $9, template_name = $10, \
             template_data = $11, message = $12, metadata = $13, priority = $14, attempts = $15, \
             max_attempts = $16, sent_at = $17, scheduled_at = $18, failed_at = $19, \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(notification.id)
        .bind(notification.status)
        .bind(notification.is_debug)
        .bind(&notification.sender)
        .bind(&notification.recipients)
        .bind(&notification.reply_to)
        .bind(&notification.subject)
        .bind(&notification.error_message)
        .bind(&notification.category)
        .bind(&notification.template_name)
        .bind(&notification.template_data)
        .bind(&notification.message)
        .bind(&notification.metadata)
        .bind(notification.priority)
        .bind(notification.attempts)
        .bind(notification.max_attempts)
        .bind(notification.sent_at)
        .bind(notification.scheduled_at)
        .bind(notification.failed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to save notification", e)
        })?;

        updated.ok_or_else(|| {
            AppError::not_found(format!("Notification {} does not exist", notification.id))
        })
    }

    /// Delete delivered or failed records older than the cutoff.
    ///
    /// Administrative cleanup, not reachable from the lifecycle operations.
    pub async fn cleanup_old(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE status IN ('sent', 'failed') AND updated_at < $1",
        )
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to cleanup notifications", e)
        })?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl Store<Notification, CreateNotification, Uuid> for NotificationRepository {
    async fn create(&self, draft: &CreateNotification) -> AppResult<Notification> {
        NotificationRepository::create(self, draft).await
    }

    async fn save(&self, entity: &Notification) -> AppResult<Notification> {
        NotificationRepository::save(self, entity).await
    }

    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<Notification>> {
        NotificationRepository::find_by_id(self, *id).await
    }
}
