use crate::error::{LoadError, StoreError, TallyError};
use crate::events::EventRepository;
use crate::fingerprint::{HashingReader, file_name};
use crate::store::Store;
use crate::types::{Event, UnitStats};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Loads one batch file through `store`, which must already be inside the
/// file's transaction.
///
/// Records are deduplicated by event id against everything the store can see,
/// including rows inserted earlier in the same transaction. A bad record is
/// logged and skipped; failing to read the file itself is an error for the
/// whole unit, as is an insert failure that ended the transaction.
///
/// The bytes read must hash to `expected_fingerprint`, the fingerprint the
/// file was classified under.
pub fn load_unit<S: Store>(
    store: &S,
    path: &Path,
    expected_fingerprint: &str,
) -> Result<UnitStats, TallyError> {
    let source_file = file_name(path);
    let file = File::open(path).map_err(|err| LoadError::io(path, &err))?;
    let mut reader = BufReader::new(HashingReader::new(file));
    let events = store.events();
    let mut stats = UnitStats::default();

    for (index, line) in (&mut reader).lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|err| LoadError::io(path, &err))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match parse_record(line, &source_file, line_no) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(
                    file = %source_file,
                    line = line_no,
                    error = %err,
                    "skipping record"
                );
                stats.rejected += 1;
                continue;
            }
        };

        match insert_if_absent(&events, &event) {
            Ok(true) => stats.inserted += 1,
            Ok(false) => stats.duplicates += 1,
            Err(err) if !store.in_transaction() => {
                return Err(StoreError::Transaction {
                    message: format!("aborted while inserting {}: {err}", event.event_id),
                }
                .into());
            }
            Err(err) => {
                tracing::warn!(
                    file = %source_file,
                    event_id = %event.event_id,
                    error = %err,
                    "failed to insert event"
                );
                stats.rejected += 1;
            }
        }
    }

    let actual = reader.into_inner().fingerprint();
    if actual != expected_fingerprint {
        return Err(LoadError::ChangedDuringLoad {
            path: path.display().to_string(),
            expected: expected_fingerprint.to_string(),
            actual,
        }
        .into());
    }

    Ok(stats)
}

fn parse_record(line: &str, source_file: &str, line_no: usize) -> Result<Event, LoadError> {
    let raw: Value = serde_json::from_str(line).map_err(|err| LoadError::MalformedRecord {
        line: line_no,
        message: err.to_string(),
    })?;
    if !raw.is_object() {
        return Err(LoadError::MalformedRecord {
            line: line_no,
            message: "record is not a JSON object".to_string(),
        });
    }
    Event::from_record(raw, source_file, line_no)
}

fn insert_if_absent<R: EventRepository>(events: &R, event: &Event) -> Result<bool, StoreError> {
    if events.exists(&event.event_id)? {
        return Ok(false);
    }
    events.insert(event)?;
    Ok(true)
}
