//! Index alert diagnostics endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::alerts::IndexAlert;
use crate::{ApiError, ApiResult, AppState};

/// GET /alerts
///
/// All recorded index alerts, most recently seen first
pub async fn list_alerts(State(state): State<AppState>) -> Json<Vec<IndexAlert>> {
    Json(state.alerts.list().await)
}

/// DELETE /alerts/:key
pub async fn dismiss_alert(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    if state.alerts.dismiss(&key).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("No alert with key '{}'", key)))
    }
}

/// DELETE /alerts
pub async fn clear_alerts(State(state): State<AppState>) -> StatusCode {
    state.alerts.clear().await;
    StatusCode::NO_CONTENT
}

/// Build alert routes
pub fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(list_alerts).delete(clear_alerts))
        .route("/alerts/:key", axum::routing::delete(dismiss_alert))
}
