use crate::commit::commit_unit;
use crate::error::{LoadError, TallyError};
use crate::store::Store;
use crate::types::LoadSummary;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const BATCH_EXTENSION: &str = "jsonl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub raw_dir: PathBuf,
    /// SQL script that (re)creates the views over the event store.
    pub views_script: Option<PathBuf>,
}

/// Batch files directly inside `raw_dir`, sorted by file name.
pub fn pending_files(raw_dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = std::fs::read_dir(raw_dir).map_err(|err| LoadError::io(raw_dir, &err))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| LoadError::io(raw_dir, &err))?.path();
        let is_batch = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == BATCH_EXTENSION);
        if is_batch {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Loads every pending batch file, one transaction per file, then refreshes
/// the views.
pub fn run_load<S: Store>(store: &S, options: &LoadOptions) -> Result<LoadSummary, TallyError> {
    let started = Instant::now();
    std::fs::create_dir_all(&options.raw_dir)
        .map_err(|err| LoadError::io(&options.raw_dir, &err))?;
    let files = pending_files(&options.raw_dir)?;
    tracing::info!(
        files = files.len(),
        dir = %options.raw_dir.display(),
        "starting load"
    );

    let mut summary = LoadSummary {
        scanned_files: files.len() as u64,
        db_path: store.location(),
        ..LoadSummary::default()
    };
    for path in &files {
        let outcome = commit_unit(store, path)?;
        summary.record(&outcome);
    }

    summary.views_refreshed = refresh_views(store, options.views_script.as_deref());
    summary.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(
        scanned = summary.scanned_files,
        loaded = summary.loaded_files,
        skipped = summary.skipped_files,
        failed = summary.failed_files,
        inserted = summary.inserted_events,
        duration_ms = summary.duration_ms,
        "load complete"
    );
    Ok(summary)
}

fn refresh_views<S: Store>(store: &S, script: Option<&Path>) -> bool {
    let Some(script) = script else {
        return false;
    };
    let sql = match std::fs::read_to_string(script) {
        Ok(sql) => sql,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::warn!(
                script = %script.display(),
                "view definition not found, views not refreshed"
            );
            return false;
        }
        Err(err) => {
            tracing::warn!(
                script = %script.display(),
                error = %err,
                "cannot read view definition"
            );
            return false;
        }
    };
    match store.refresh_views(&sql) {
        Ok(()) => {
            tracing::info!(script = %script.display(), "refreshed views");
            true
        }
        Err(err) => {
            tracing::warn!(script = %script.display(), error = %err, "failed to refresh views");
            false
        }
    }
}
