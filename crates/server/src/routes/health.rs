use axum::{extract::State, http::StatusCode, Json};

use crate::state::AppState;

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match state.db.health_check().await {
        Ok(()) => Ok(Json(serde_json::json!({
            "status": "ok",
            "database": "connected",
        }))),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "error",
                    "database": "disconnected",
                })),
            ))
        }
    }
}
