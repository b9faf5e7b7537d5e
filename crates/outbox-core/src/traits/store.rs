//! Generic store trait for durable persistence.

use async_trait::async_trait;

use crate::result::AppResult;

/// Durable storage contract for lifecycle-managed records.
///
/// The trait is generic so that each entity can have a strongly typed
/// store: `Entity` is the persisted row type, `Draft` the creation input,
/// and `Id` the primary key. Entity-specific query methods are defined on
/// the concrete store structs.
///
/// Persistence failures surface as errors and are never swallowed; the
/// caller decides how to react. Each `save` is a single full-row write
/// with last-writer-wins semantics: concurrent writers on the same id are
/// a race the store does not arbitrate.
#[async_trait]
pub trait Store<Entity, Draft, Id>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
    Draft: Send + Sync + 'static,
    Id: Send + Sync + 'static,
{
    /// Persist a new record, assigning its id and audit timestamps.
    async fn create(&self, draft: &Draft) -> AppResult<Entity>;

    /// Write back a mutated record and return the persisted version.
    async fn save(&self, entity: &Entity) -> AppResult<Entity>;

    /// Find a record by its primary key.
    async fn find_by_id(&self, id: &Id) -> AppResult<Option<Entity>>;
}
