pub mod analytics;
pub mod error;
pub mod health;
pub mod load;

use crate::AppState;
use axum::Router;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(load::router(state.clone()))
        .merge(analytics::router(state))
}
