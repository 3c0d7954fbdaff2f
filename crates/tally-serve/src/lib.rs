pub mod routes;

use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tally_core::{Config, LoadOptions, Tally, TallyError};
use tally_db::schema;
use tally_db::store::DbStore;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub db_path: PathBuf,
    pub load_options: LoadOptions,
    /// Serializes load runs; the store has a single writer.
    pub load_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(db_path: PathBuf, load_options: LoadOptions) -> Self {
        Self {
            db_path,
            load_options,
            load_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.db_path.clone(), config.load_options())
    }
}

pub fn build_tally(state: &AppState) -> Result<Tally<DbStore>, TallyError> {
    let conn = schema::open_and_migrate(&state.db_path).map_err(|err| TallyError::Internal {
        message: err.to_string(),
    })?;
    Ok(Tally::new(DbStore::new(conn)))
}

pub fn app(state: AppState) -> Router {
    routes::router(state).layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app(state)).await
}
