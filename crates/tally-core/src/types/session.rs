use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub actor_login: String,
    /// 1-based, dense per actor, in order of session start.
    pub session_id: u32,
    pub session_start_at: DateTime<Utc>,
    pub session_end_at: DateTime<Utc>,
    pub events_in_session: u32,
}
