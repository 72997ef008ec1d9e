//! skillforge-re library interface
//!
//! Exposes the service internals for integration testing.

pub mod alerts;
pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod recommend;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::alerts::IndexAlertLog;
use crate::catalog::CourseCatalog;
use crate::recommend::RecommendationEngine;
use crate::services::AdvisorClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// In-memory course catalog cache
    pub catalog: Arc<CourseCatalog>,
    /// Index degradation alert log
    pub alerts: Arc<IndexAlertLog>,
    /// Recommendation facade
    pub engine: Arc<RecommendationEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, alerts: Arc<IndexAlertLog>, advisor: Option<AdvisorClient>) -> Self {
        let catalog = Arc::new(CourseCatalog::new());
        let engine = Arc::new(RecommendationEngine::new(
            db.clone(),
            Arc::clone(&catalog),
            Arc::clone(&alerts),
            advisor,
        ));

        Self {
            db,
            catalog,
            alerts,
            engine,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::recommendation_routes())
        .merge(api::alert_routes())
        .merge(api::course_routes())
        .merge(api::settings_routes())
        .with_state(state)
}
