use crate::routes::error::map_error;
use crate::{AppState, build_tally};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tally_core::types::WindowQuery;

pub const DEFAULT_DAYS: i64 = 30;
pub const DEFAULT_TOP_LIMIT: i64 = 10;
pub const DEFAULT_SESSION_LIMIT: i64 = 100;

#[derive(Debug, serde::Deserialize)]
pub struct WindowParams {
    days: Option<i64>,
    limit: Option<i64>,
}

impl WindowParams {
    fn query(&self, default_limit: i64) -> WindowQuery {
        WindowQuery::new(
            self.days.unwrap_or(DEFAULT_DAYS),
            self.limit.unwrap_or(default_limit),
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/top-entities", get(top_entities))
        .route("/top-repos", get(top_entities))
        .route("/user-sessions", get(user_sessions))
        .with_state(state)
}

pub(crate) async fn top_entities(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Response {
    let tally = match build_tally(&state) {
        Ok(tally) => tally,
        Err(err) => return map_error(&err).into_response(),
    };
    match tally.entities().top(params.query(DEFAULT_TOP_LIMIT)) {
        Ok(ranks) => Json(ranks).into_response(),
        Err(err) => map_error(&err).into_response(),
    }
}

pub(crate) async fn user_sessions(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Response {
    let tally = match build_tally(&state) {
        Ok(tally) => tally,
        Err(err) => return map_error(&err).into_response(),
    };
    match tally.sessions().list(params.query(DEFAULT_SESSION_LIMIT)) {
        Ok(sessions) => Json(sessions).into_response(),
        Err(err) => map_error(&err).into_response(),
    }
}
