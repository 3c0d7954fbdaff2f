use crate::util::{from_rfc3339, from_sql_int, query_error, to_rfc3339, to_sql_int};
use rusqlite::Connection;
use tally_core::error::StoreError;
use tally_core::loaded_files::LoadedFileRepository;
use tally_core::types::LoadedFile;

pub struct LoadedFileRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> LoadedFileRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl LoadedFileRepository for LoadedFileRepo<'_> {
    fn get(&self, file_path: &str) -> Result<Option<LoadedFile>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT file_path, file_size, file_mtime, file_sha256, loaded_at \
                 FROM loaded_files WHERE file_path = ?1",
            )
            .map_err(query_error)?;
        let mut rows = stmt.query([file_path]).map_err(query_error)?;
        let Some(row) = rows.next().map_err(query_error)? else {
            return Ok(None);
        };
        map_loaded_file_row(row).map(Some)
    }

    fn upsert(&self, record: &LoadedFile) -> Result<(), StoreError> {
        let sql = "INSERT INTO loaded_files \
                   (file_path, file_size, file_mtime, file_sha256, loaded_at) \
                   VALUES (?1, ?2, ?3, ?4, ?5) \
                   ON CONFLICT (file_path) DO UPDATE SET \
                   file_size = excluded.file_size, \
                   file_mtime = excluded.file_mtime, \
                   file_sha256 = excluded.file_sha256, \
                   loaded_at = excluded.loaded_at";
        let params = (
            record.file_path.as_str(),
            to_sql_int(record.file_size)?,
            to_rfc3339(&record.file_mtime),
            record.fingerprint.as_str(),
            to_rfc3339(&record.loaded_at),
        );
        self.conn.execute(sql, params).map_err(query_error)?;
        Ok(())
    }
}

fn map_loaded_file_row(row: &rusqlite::Row<'_>) -> Result<LoadedFile, StoreError> {
    let file_path: String = row.get(0).map_err(query_error)?;
    let file_size: i64 = row.get(1).map_err(query_error)?;
    let file_mtime: String = row.get(2).map_err(query_error)?;
    let fingerprint: String = row.get(3).map_err(query_error)?;
    let loaded_at: String = row.get(4).map_err(query_error)?;

    Ok(LoadedFile {
        file_path,
        file_size: from_sql_int(file_size)?,
        file_mtime: from_rfc3339(&file_mtime)?,
        fingerprint,
        loaded_at: from_rfc3339(&loaded_at)?,
    })
}
