use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {message}")]
    Query { message: String },
    #[error("transaction failed: {message}")]
    Transaction { message: String },
    #[error("invalid row: {message}")]
    InvalidRow { message: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error on {path}: {message}")]
    Io { path: String, message: String },
    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },
    #[error("record at line {line} has no usable id")]
    MissingId { line: usize },
    #[error("{path} changed while loading: expected {expected}, read {actual}")]
    ChangedDuringLoad {
        path: String,
        expected: String,
        actual: String,
    },
}

impl LoadError {
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Error)]
pub enum TallyError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("internal error: {message}")]
    Internal { message: String },
}
