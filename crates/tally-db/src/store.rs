use rusqlite::Connection;
use tally_core::error::{StoreError, TallyError};
use tally_core::store::Store;

use crate::event_repo::EventRepo;
use crate::loaded_file_repo::LoadedFileRepo;
use crate::util::query_error;

pub struct DbStore {
    conn: Connection,
}

impl DbStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn tx_error(err: &rusqlite::Error) -> TallyError {
    TallyError::Store(StoreError::Transaction {
        message: err.to_string(),
    })
}

impl Store for DbStore {
    type Events<'a>
        = EventRepo<'a>
    where
        Self: 'a;
    type LoadedFiles<'a>
        = LoadedFileRepo<'a>
    where
        Self: 'a;

    fn events(&self) -> Self::Events<'_> {
        EventRepo::new(&self.conn)
    }

    fn loaded_files(&self) -> Self::LoadedFiles<'_> {
        LoadedFileRepo::new(&self.conn)
    }

    fn location(&self) -> String {
        match self.conn.path() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => ":memory:".to_string(),
        }
    }

    fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn refresh_views(&self, script: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(script).map_err(query_error)
    }

    fn with_tx<F, T>(&self, f: F) -> Result<T, TallyError>
    where
        F: FnOnce(&Self) -> Result<T, TallyError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(|err| tx_error(&err))?;
        let result = f(self).and_then(|value| {
            if self.conn.is_autocommit() {
                return Err(TallyError::Store(StoreError::Transaction {
                    message: "transaction was rolled back by the database".to_string(),
                }));
            }
            self.conn
                .execute_batch("COMMIT")
                .map_err(|err| tx_error(&err))?;
            Ok(value)
        });
        // A failed COMMIT can leave the transaction open.
        if result.is_err() && !self.conn.is_autocommit() {
            self.conn
                .execute_batch("ROLLBACK")
                .map_err(|err| tx_error(&err))?;
        }
        result
    }
}
