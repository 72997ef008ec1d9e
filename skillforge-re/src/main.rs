//! skillforge-re - Course Recommendation Microservice
//!
//! **Module Identity:**
//! - Name: skillforge-re (Recommendation Engine)
//! - Port: 5731
//!
//! Scores the course catalog for each learner from their progress and quiz
//! history, with a best-effort generative-advisor integration. Integrates
//! with the platform shell via HTTP REST.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skillforge_re::alerts::IndexAlertLog;
use skillforge_re::services::AdvisorClient;
use skillforge_re::AppState;

const PORT: u16 = 5731;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting skillforge-re (Recommendation Engine) microservice");
    info!("Port: {}", PORT);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Resolve root folder
    let resolver = skillforge_common::config::RootFolderResolver::new("skillforge-re");
    let root_folder = resolver.resolve();

    // Step 2: Create root folder directory if missing
    let initializer = skillforge_common::config::RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;

    // Step 3: Open or create database
    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let db = skillforge_re::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Index degradation diagnostics persist next to the database
    let alerts = Arc::new(IndexAlertLog::open(initializer.alert_log_path()));

    // Advisor endpoint configuration (Database → ENV → TOML); the service
    // runs without it, minus the AI-personalized algorithm
    let toml_config =
        skillforge_common::config::load_toml_config("skillforge-re").unwrap_or_default();
    let advisor = match skillforge_re::config::resolve_advisor_api_key(&db, &toml_config).await {
        Ok(Some(key)) => {
            let base_url =
                skillforge_re::config::resolve_advisor_base_url(&db, &toml_config).await?;
            match AdvisorClient::new(base_url, key) {
                Ok(client) => Some(client),
                Err(err) => {
                    warn!("Advisor client unavailable: {}", err);
                    None
                }
            }
        }
        Ok(None) => {
            info!("No advisor API key configured, AI recommendations disabled");
            None
        }
        Err(err) => {
            warn!("Advisor key resolution failed: {}", err);
            None
        }
    };

    // Create application state
    let state = AppState::new(db, alerts, advisor);

    // Build router
    let app = skillforge_re::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", PORT)).await?;
    info!("Listening on http://127.0.0.1:{}", PORT);
    info!("Health check: http://127.0.0.1:{}/health", PORT);

    axum::serve(listener, app).await?;

    Ok(())
}
