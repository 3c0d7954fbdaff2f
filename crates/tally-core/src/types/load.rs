use serde::{Deserialize, Serialize};

/// Result of one load run. Counts reflect exactly what this run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub scanned_files: u64,
    pub loaded_files: u64,
    pub skipped_files: u64,
    pub failed_files: u64,
    pub inserted_events: u64,
    pub duration_ms: u64,
    pub db_path: String,
    pub views_refreshed: bool,
}

impl LoadSummary {
    pub fn record(&mut self, outcome: &UnitOutcome) {
        match outcome {
            UnitOutcome::Loaded { inserted } => {
                self.loaded_files += 1;
                self.inserted_events += inserted;
            }
            UnitOutcome::Unchanged | UnitOutcome::Modified { .. } => self.skipped_files += 1,
            UnitOutcome::Failed { .. } => self.failed_files += 1,
        }
    }
}

/// What happened to a single batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    Loaded { inserted: u64 },
    Unchanged,
    /// Content no longer matches the recorded fingerprint.
    Modified { recorded: String, actual: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitStats {
    pub inserted: u64,
    pub duplicates: u64,
    pub rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_by_outcome() {
        let mut summary = LoadSummary::default();
        summary.record(&UnitOutcome::Loaded { inserted: 3 });
        summary.record(&UnitOutcome::Loaded { inserted: 0 });
        summary.record(&UnitOutcome::Unchanged);
        summary.record(&UnitOutcome::Modified {
            recorded: "aa".to_string(),
            actual: "bb".to_string(),
        });
        summary.record(&UnitOutcome::Failed {
            reason: "boom".to_string(),
        });

        assert_eq!(summary.loaded_files, 2);
        assert_eq!(summary.inserted_events, 3);
        assert_eq!(summary.skipped_files, 2);
        assert_eq!(summary.failed_files, 1);
    }
}
