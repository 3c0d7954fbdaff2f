use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookkeeping row for a batch file that was committed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedFile {
    /// File name, not the full path.
    pub file_path: String,
    pub file_size: u64,
    pub file_mtime: DateTime<Utc>,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}
