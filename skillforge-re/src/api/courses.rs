//! Course catalog endpoints

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::Serialize;

use crate::models::CourseRecord;
use crate::{ApiResult, AppState};

/// GET /courses
///
/// The cached catalog, loading it on first use
pub async fn list_courses(State(state): State<AppState>) -> Json<Vec<CourseRecord>> {
    let catalog = state.catalog.get_or_load(&state.db).await;
    Json((*catalog).clone())
}

/// Response for POST /courses/reload
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub count: usize,
}

/// POST /courses/reload
///
/// Refresh the catalog cache from the store
pub async fn reload_courses(State(state): State<AppState>) -> ApiResult<Json<ReloadResponse>> {
    let count = state.catalog.reload(&state.db).await?;
    Ok(Json(ReloadResponse { count }))
}

/// Build course routes
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/reload", post(reload_courses))
}
