use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRank {
    pub entity_name: String,
    pub total_events: u64,
    pub unique_users: u64,
    pub push_events: u64,
    pub first_event_at: DateTime<Utc>,
    pub last_event_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
}
