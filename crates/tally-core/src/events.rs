use crate::error::StoreError;
use crate::types::{ActivityEvent, EntityRank, Event};
use chrono::{DateTime, Utc};

pub trait EventRepository {
    fn exists(&self, event_id: &str) -> Result<bool, StoreError>;
    fn insert(&self, event: &Event) -> Result<(), StoreError>;
    fn count(&self) -> Result<u64, StoreError>;
    /// Events with an actor and `from <= created_at <= to`, ordered by
    /// actor login, then `created_at`, then event id.
    fn activity_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ActivityEvent>, StoreError>;
    /// Entities ranked by event count since `since`, ties by name.
    fn top_entities(
        &self,
        since: DateTime<Utc>,
        limit: u32,
        processed_at: DateTime<Utc>,
    ) -> Result<Vec<EntityRank>, StoreError>;
}
