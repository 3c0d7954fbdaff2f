use crate::routes::error::map_error;
use crate::{AppState, build_tally};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/load", post(run_load))
        .with_state(state)
}

pub(crate) async fn run_load(State(state): State<AppState>) -> Response {
    let _guard = state.load_lock.lock().await;
    let tally = match build_tally(&state) {
        Ok(tally) => tally,
        Err(err) => return map_error(&err).into_response(),
    };
    match tally.loads().run(&state.load_options) {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => map_error(&err).into_response(),
    }
}
