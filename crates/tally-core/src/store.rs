use crate::error::StoreError;
use crate::events::EventRepository;
use crate::loaded_files::LoadedFileRepository;
use crate::TallyError;

pub trait Store {
    type Events<'a>: EventRepository
    where
        Self: 'a;
    type LoadedFiles<'a>: LoadedFileRepository
    where
        Self: 'a;

    fn events(&self) -> Self::Events<'_>;
    fn loaded_files(&self) -> Self::LoadedFiles<'_>;

    /// Where the store lives, for reporting.
    fn location(&self) -> String;

    /// False once the store is back in autocommit mode, including when the
    /// backend aborted an open transaction on its own.
    fn in_transaction(&self) -> bool;

    /// Runs a view-definition script against the store.
    fn refresh_views(&self, script: &str) -> Result<(), StoreError>;

    /// Runs `f` inside one transaction: committed when `f` returns `Ok`,
    /// rolled back otherwise.
    fn with_tx<F, T>(&self, f: F) -> Result<T, TallyError>
    where
        F: FnOnce(&Self) -> Result<T, TallyError>;
}
