use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use tally_core::error::{QueryError, TallyError};

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub code: &'static str,
    pub message: String,
}

/// Client errors carry their message; everything else is logged and
/// reported without detail.
pub fn map_error(err: &TallyError) -> (StatusCode, Json<ErrorEnvelope>) {
    let (status, code, message) = match err {
        TallyError::Query(QueryError::InvalidInput { .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_input",
            err.to_string(),
        ),
        TallyError::Store(_) | TallyError::Load(_) | TallyError::Internal { .. } => {
            tracing::error!(error = %err, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error".to_string(),
            )
        }
    };

    (status, Json(ErrorEnvelope { code, message }))
}
