//! Change detection for batch files.
//!
//! A batch file is identified by its name and fingerprinted by the SHA-256 of
//! its bytes. Batch files are immutable once written, so a recorded file whose
//! fingerprint changed is reported as [`Change::Modified`] and never reloaded.

use crate::error::LoadError;
use crate::types::LoadedFile;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFacts {
    pub file_name: String,
    pub size: u64,
    pub mtime: DateTime<Utc>,
    pub fingerprint: String,
}

impl FileFacts {
    pub fn into_record(self, loaded_at: DateTime<Utc>) -> LoadedFile {
        LoadedFile {
            file_path: self.file_name,
            file_size: self.size,
            file_mtime: self.mtime,
            fingerprint: self.fingerprint,
            loaded_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    New,
    Unchanged,
    Modified { recorded: String },
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Hashes every byte read through it.
pub struct HashingReader<R> {
    inner: R,
    hasher: Sha256,
}

impl<R: Read> HashingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Hex SHA-256 of everything read so far.
    pub fn fingerprint(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// Hex SHA-256 of the file.
pub fn sha256_file(path: &Path) -> Result<String, LoadError> {
    let file = File::open(path).map_err(|err| LoadError::io(path, &err))?;
    let mut reader = HashingReader::new(file);
    io::copy(&mut reader, &mut io::sink()).map_err(|err| LoadError::io(path, &err))?;
    Ok(reader.fingerprint())
}

pub fn inspect(path: &Path) -> Result<FileFacts, LoadError> {
    let metadata = std::fs::metadata(path).map_err(|err| LoadError::io(path, &err))?;
    let modified = metadata
        .modified()
        .map_err(|err| LoadError::io(path, &err))?;
    Ok(FileFacts {
        file_name: file_name(path),
        size: metadata.len(),
        mtime: DateTime::<Utc>::from(modified),
        fingerprint: sha256_file(path)?,
    })
}

pub fn classify(facts: &FileFacts, recorded: Option<&LoadedFile>) -> Change {
    match recorded {
        None => Change::New,
        Some(record) if record.fingerprint == facts.fingerprint => Change::Unchanged,
        Some(record) => Change::Modified {
            recorded: record.fingerprint.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn facts(fingerprint: &str) -> FileFacts {
        FileFacts {
            file_name: "events_000.jsonl".to_string(),
            size: 10,
            mtime: Utc::now(),
            fingerprint: fingerprint.to_string(),
        }
    }

    #[test]
    fn sha256_matches_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.jsonl");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(
            sha256_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_streams_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jsonl");
        let mut file = File::create(&path).unwrap();
        let line = b"{\"id\":\"x\"}\n";
        let mut expected = Sha256::new();
        for _ in 0..5_000 {
            file.write_all(line).unwrap();
            expected.update(line);
        }
        drop(file);

        assert_eq!(sha256_file(&path).unwrap(), hex::encode(expected.finalize()));
    }

    #[test]
    fn inspect_reports_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch_001.jsonl");
        std::fs::write(&path, b"{}\n").unwrap();

        let facts = inspect(&path).unwrap();
        assert_eq!(facts.file_name, "batch_001.jsonl");
        assert_eq!(facts.size, 3);
    }

    #[test]
    fn inspect_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspect(&dir.path().join("gone.jsonl")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn classifies_against_recorded_fingerprint() {
        let current = facts("aaaa");
        assert_eq!(classify(&current, None), Change::New);

        let same = facts("aaaa").into_record(Utc::now());
        assert_eq!(classify(&current, Some(&same)), Change::Unchanged);

        let other = facts("bbbb").into_record(Utc::now());
        assert_eq!(
            classify(&current, Some(&other)),
            Change::Modified {
                recorded: "bbbb".to_string()
            }
        );
    }
}
