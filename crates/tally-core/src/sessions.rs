//! Per-actor sessionization.
//!
//! A session is a maximal run of one actor's events in which no two
//! consecutive events are more than the gap threshold apart. Queries fetch
//! one extra gap interval before the window start so that a session crossing
//! the window boundary keeps its earlier events, then drop sessions that end
//! before the window. Chains of short gaps reaching further back than one
//! interval are only reconstructed from the boundary-adjacent part.

use crate::error::TallyError;
use crate::events::EventRepository;
use crate::store::Store;
use crate::types::{ActivityEvent, Session, Window, WindowQuery};
use chrono::{DateTime, TimeDelta, Utc};

pub const GAP_THRESHOLD_MINUTES: i64 = 30;

pub fn gap_threshold() -> TimeDelta {
    TimeDelta::minutes(GAP_THRESHOLD_MINUTES)
}

/// Single-pass session builder over events ordered by actor login, then
/// `created_at`, then event id.
#[derive(Debug)]
pub struct Segmenter {
    gap: TimeDelta,
    open: Option<Session>,
    closed: Vec<Session>,
}

impl Segmenter {
    pub fn new(gap: TimeDelta) -> Self {
        Self {
            gap,
            open: None,
            closed: Vec::new(),
        }
    }

    pub fn push(&mut self, event: &ActivityEvent) {
        let session_id = match &mut self.open {
            Some(current) if current.actor_login == event.actor_login => {
                if event.created_at - current.session_end_at <= self.gap {
                    current.session_end_at = event.created_at;
                    current.events_in_session += 1;
                    return;
                }
                current.session_id + 1
            }
            _ => 1,
        };

        let next = Session {
            actor_login: event.actor_login.clone(),
            session_id,
            session_start_at: event.created_at,
            session_end_at: event.created_at,
            events_in_session: 1,
        };
        if let Some(done) = self.open.replace(next) {
            self.closed.push(done);
        }
    }

    pub fn finish(mut self) -> Vec<Session> {
        if let Some(done) = self.open.take() {
            self.closed.push(done);
        }
        self.closed
    }
}

/// Sessions for `events` in any order. Output is sorted by actor, then
/// session start.
pub fn segment(mut events: Vec<ActivityEvent>, gap: TimeDelta) -> Vec<Session> {
    events.sort_by(|a, b| {
        a.actor_login
            .cmp(&b.actor_login)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.event_id.cmp(&b.event_id))
    });
    let mut segmenter = Segmenter::new(gap);
    for event in &events {
        segmenter.push(event);
    }
    segmenter.finish()
}

/// Start of the range to fetch for `window`: one gap interval earlier.
pub fn fetch_start(window: &Window, gap: TimeDelta) -> DateTime<Utc> {
    window
        .start
        .checked_sub_signed(gap)
        .unwrap_or(window.start)
}

/// Segments events fetched from [`fetch_start`] and keeps the sessions that
/// reach into `window`, at most `window.limit` of them.
pub fn sessions_in_window(
    events: Vec<ActivityEvent>,
    window: &Window,
    gap: TimeDelta,
) -> Vec<Session> {
    segment(events, gap)
        .into_iter()
        .filter(|session| session.session_end_at >= window.start)
        .take(window.limit as usize)
        .collect()
}

pub fn user_sessions<S: Store>(
    store: &S,
    query: WindowQuery,
    now: DateTime<Utc>,
) -> Result<Vec<Session>, TallyError> {
    let window = query.resolve(now)?;
    let gap = gap_threshold();
    let events = store
        .events()
        .activity_between(fetch_start(&window, gap), window.end)?;
    Ok(sessions_in_window(events, &window, gap))
}
