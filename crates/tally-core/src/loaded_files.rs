use crate::error::StoreError;
use crate::types::LoadedFile;

pub trait LoadedFileRepository {
    fn get(&self, file_path: &str) -> Result<Option<LoadedFile>, StoreError>;
    /// Inserts the record, or replaces size, mtime, fingerprint and
    /// `loaded_at` of an existing one.
    fn upsert(&self, record: &LoadedFile) -> Result<(), StoreError>;
}
