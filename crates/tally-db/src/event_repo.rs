use crate::util::{encode_json, from_rfc3339, from_sql_int, query_error, to_rfc3339};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tally_core::error::StoreError;
use tally_core::events::EventRepository;
use tally_core::types::{ActivityEvent, EntityRank, Event};

pub struct EventRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> EventRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for EventRepo<'_> {
    fn exists(&self, event_id: &str) -> Result<bool, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT 1 FROM events WHERE event_id = ?1 LIMIT 1")
            .map_err(query_error)?;
        stmt.exists([event_id]).map_err(query_error)
    }

    fn insert(&self, event: &Event) -> Result<(), StoreError> {
        let payload = event.payload.as_ref().map(encode_json).transpose()?;
        let raw = encode_json(&event.raw)?;
        let sql = "INSERT INTO events (event_id, event_type, created_at, ingested_at, actor_id, \
                   actor_login, entity_id, entity_name, payload, raw, source_file) \
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
        let params = (
            event.event_id.as_str(),
            event.event_type.as_deref(),
            event.created_at.as_ref().map(to_rfc3339),
            event.ingested_at.as_ref().map(to_rfc3339),
            event.actor_id,
            event.actor_login.as_deref(),
            event.entity_id,
            event.entity_name.as_deref(),
            payload,
            raw,
            event.source_file.as_str(),
        );
        let mut stmt = self.conn.prepare_cached(sql).map_err(query_error)?;
        stmt.execute(params).map_err(query_error)?;
        Ok(())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .map_err(query_error)?;
        Ok(from_sql_int(count)?)
    }

    fn activity_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ActivityEvent>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT event_id, actor_login, created_at FROM events \
                 WHERE actor_login IS NOT NULL AND created_at >= ?1 AND created_at <= ?2 \
                 ORDER BY actor_login ASC, created_at ASC, event_id ASC",
            )
            .map_err(query_error)?;
        let mut rows = stmt
            .query([to_rfc3339(&from), to_rfc3339(&to)])
            .map_err(query_error)?;
        let mut events = Vec::new();
        while let Some(row) = rows.next().map_err(query_error)? {
            let created_at: String = row.get(2).map_err(query_error)?;
            events.push(ActivityEvent {
                event_id: row.get(0).map_err(query_error)?,
                actor_login: row.get(1).map_err(query_error)?,
                created_at: from_rfc3339(&created_at)?,
            });
        }
        Ok(events)
    }

    fn top_entities(
        &self,
        since: DateTime<Utc>,
        limit: u32,
        processed_at: DateTime<Utc>,
    ) -> Result<Vec<EntityRank>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT entity_name, COUNT(*) AS total_events, COUNT(DISTINCT actor_id), \
                 SUM(CASE WHEN event_type = 'PushEvent' THEN 1 ELSE 0 END), \
                 MIN(created_at), MAX(created_at) \
                 FROM events WHERE entity_name IS NOT NULL AND created_at >= ?1 \
                 GROUP BY entity_name \
                 ORDER BY total_events DESC, entity_name ASC \
                 LIMIT ?2",
            )
            .map_err(query_error)?;
        let mut rows = stmt
            .query(rusqlite::params![to_rfc3339(&since), i64::from(limit)])
            .map_err(query_error)?;
        let mut ranks = Vec::new();
        while let Some(row) = rows.next().map_err(query_error)? {
            ranks.push(map_rank_row(row, processed_at)?);
        }
        Ok(ranks)
    }
}

fn map_rank_row(
    row: &rusqlite::Row<'_>,
    processed_at: DateTime<Utc>,
) -> Result<EntityRank, StoreError> {
    let entity_name: String = row.get(0).map_err(query_error)?;
    let total_events: i64 = row.get(1).map_err(query_error)?;
    let unique_users: i64 = row.get(2).map_err(query_error)?;
    let push_events: i64 = row.get(3).map_err(query_error)?;
    let first_event_at: String = row.get(4).map_err(query_error)?;
    let last_event_at: String = row.get(5).map_err(query_error)?;

    Ok(EntityRank {
        entity_name,
        total_events: from_sql_int(total_events)?,
        unique_users: from_sql_int(unique_users)?,
        push_events: from_sql_int(push_events)?,
        first_event_at: from_rfc3339(&first_event_at)?,
        last_event_at: from_rfc3339(&last_event_at)?,
        processed_at,
    })
}
