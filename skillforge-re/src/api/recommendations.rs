//! Recommendation API endpoint

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::RecommendationReport;
use crate::recommend::{CombineStrategy, RecommendationOptions, DEFAULT_MAX_RECOMMENDATIONS};
use crate::AppState;

/// Hard cap on the requested recommendation count
const MAX_RECOMMENDATION_LIMIT: usize = 50;

/// Query parameters for GET /users/:user_id/recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Restrict output to a focus area (category or reason substring)
    pub focus_area: Option<String>,
    /// Include courses the learner already completed
    #[serde(default)]
    pub include_completed: bool,
    /// Number of recommendations to return (default 5)
    pub max: Option<usize>,
    /// Score combination strategy: "max" (default) or "weighted"
    pub strategy: Option<String>,
}

/// GET /users/:user_id/recommendations
///
/// Always answers 200 with a report envelope; pipeline failures arrive as
/// `success = false` rather than an HTTP error.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RecommendationQuery>,
) -> Json<RecommendationReport> {
    let strategy = match query.strategy.as_deref() {
        Some("weighted") => CombineStrategy::WeightedAverage,
        _ => CombineStrategy::MaxScore,
    };

    let options = RecommendationOptions {
        focus_area: query.focus_area.filter(|f| !f.trim().is_empty()),
        include_completed: query.include_completed,
        max_recommendations: query
            .max
            .unwrap_or(DEFAULT_MAX_RECOMMENDATIONS)
            .clamp(1, MAX_RECOMMENDATION_LIMIT),
        strategy,
    };

    let report = state.engine.recommendations(user_id, options).await;
    if let Some(message) = report.error.as_ref().filter(|_| !report.success) {
        *state.last_error.write().await = Some(message.clone());
    }

    Json(report)
}

/// Build recommendation routes
pub fn recommendation_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/recommendations", get(get_recommendations))
}
