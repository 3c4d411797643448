use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;
use crate::database::StoreError;

/// GET / - static greeting, used as a liveness check
pub async fn index() -> &'static str {
    "Welcome!\n"
}

/// GET /health - pings the document store
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let deadline = state.config().database.operation_timeout();

    let ping = match tokio::time::timeout(deadline, state.store().ping()).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(deadline)),
    };

    match ping {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                })),
            )
        }
    }
}
