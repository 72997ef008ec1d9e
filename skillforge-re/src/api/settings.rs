//! Settings API endpoints
//!
//! Advisor API key configuration: the database is authoritative, the TOML
//! file is a best-effort backup so the key survives a database reset.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::{ApiError, ApiResult, AppState};

/// Request payload for setting the advisor API key
#[derive(Debug, Deserialize)]
pub struct SetApiKeyRequest {
    pub api_key: String,
}

/// Response payload for API key configuration
#[derive(Debug, Serialize)]
pub struct SetApiKeyResponse {
    pub success: bool,
    pub message: String,
}

/// Response payload for key status (the key itself is never echoed)
#[derive(Debug, Serialize)]
pub struct ApiKeyStatusResponse {
    pub configured: bool,
}

/// GET /settings/advisor-key
pub async fn get_advisor_key_status(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiKeyStatusResponse>> {
    let key = crate::db::settings::get_advisor_api_key(&state.db).await?;
    Ok(Json(ApiKeyStatusResponse {
        configured: key.as_deref().is_some_and(crate::config::is_valid_key),
    }))
}

/// PUT /settings/advisor-key
///
/// 1. Validate key (non-empty, non-whitespace)
/// 2. Write to database (authoritative)
/// 3. Sync to TOML (best-effort backup)
pub async fn set_advisor_key(
    State(state): State<AppState>,
    Json(payload): Json<SetApiKeyRequest>,
) -> ApiResult<Json<SetApiKeyResponse>> {
    if !crate::config::is_valid_key(&payload.api_key) {
        return Err(ApiError::BadRequest(
            "API key cannot be empty or whitespace-only".to_string(),
        ));
    }

    crate::db::settings::set_advisor_api_key(&state.db, payload.api_key.clone())
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save API key to database: {}", e)))?;

    info!("Advisor API key configured via API");

    let toml_path = skillforge_common::config::config_file_path("skillforge-re")
        .unwrap_or_else(|_| PathBuf::from("skillforge-re.toml"));

    let mut settings = HashMap::new();
    settings.insert("advisor_api_key".to_string(), payload.api_key);

    match crate::config::sync_settings_to_toml(settings, &toml_path).await {
        Ok(()) => {}
        Err(e) => {
            warn!("TOML sync failed (database write succeeded): {}", e);
        }
    }

    Ok(Json(SetApiKeyResponse {
        success: true,
        message: "Advisor API key saved. Restart is not required.".to_string(),
    }))
}

/// Build settings routes
pub fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/settings/advisor-key",
        get(get_advisor_key_status).put(set_advisor_key),
    )
}
