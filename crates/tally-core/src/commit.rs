use crate::error::TallyError;
use crate::fingerprint::{self, Change};
use crate::loaded_files::LoadedFileRepository;
use crate::store::Store;
use crate::types::UnitOutcome;
use crate::unit_loader::load_unit;
use chrono::Utc;
use std::path::Path;

/// Classifies one batch file and, if it is new, loads it and records it in a
/// single transaction.
///
/// Transaction failures roll the whole file back and come back as
/// [`UnitOutcome::Failed`] so the caller can move on to the next file. Only a
/// failure to read the bookkeeping table is returned as an error.
pub fn commit_unit<S: Store>(store: &S, path: &Path) -> Result<UnitOutcome, TallyError> {
    let file = fingerprint::file_name(path);
    let facts = match fingerprint::inspect(path) {
        Ok(facts) => facts,
        Err(err) => {
            tracing::error!(file = %file, error = %err, "failed to fingerprint file");
            return Ok(UnitOutcome::Failed {
                reason: err.to_string(),
            });
        }
    };

    let recorded = store.loaded_files().get(&facts.file_name)?;
    match fingerprint::classify(&facts, recorded.as_ref()) {
        Change::New => {}
        Change::Unchanged => {
            tracing::info!(file = %file, "skipped: already loaded, fingerprint unchanged");
            return Ok(UnitOutcome::Unchanged);
        }
        Change::Modified { recorded } => {
            tracing::warn!(
                file = %file,
                recorded = short(&recorded),
                actual = short(&facts.fingerprint),
                "skipped: file modified since last load, batch files are immutable"
            );
            return Ok(UnitOutcome::Modified {
                recorded,
                actual: facts.fingerprint,
            });
        }
    }

    let result = store.with_tx(|tx| {
        let stats = load_unit(tx, path, &facts.fingerprint)?;
        tx.loaded_files().upsert(&facts.into_record(Utc::now()))?;
        Ok(stats)
    });

    match result {
        Ok(stats) => {
            tracing::info!(
                file = %file,
                inserted = stats.inserted,
                duplicates = stats.duplicates,
                rejected = stats.rejected,
                "loaded file"
            );
            Ok(UnitOutcome::Loaded {
                inserted: stats.inserted,
            })
        }
        Err(err) => {
            tracing::error!(file = %file, error = %err, "failed to load file, rolled back");
            Ok(UnitOutcome::Failed {
                reason: err.to_string(),
            })
        }
    }
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
