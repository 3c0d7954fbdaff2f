use crate::error::TallyError;
use crate::events::EventRepository;
use crate::store::Store;
use crate::types::{EntityRank, WindowQuery};
use chrono::{DateTime, Utc};

pub fn top_entities<S: Store>(
    store: &S,
    query: WindowQuery,
    now: DateTime<Utc>,
) -> Result<Vec<EntityRank>, TallyError> {
    let window = query.resolve(now)?;
    Ok(store.events().top_entities(window.start, window.limit, now)?)
}
