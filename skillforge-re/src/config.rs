//! Configuration resolution for skillforge-re
//!
//! Multi-tier advisor configuration with Database → ENV → TOML priority.
//! The service runs without an advisor key; only the AI-personalized
//! algorithm is disabled then.

use skillforge_common::config::TomlConfig;
use skillforge_common::Result;
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Default advisor endpoint when no tier overrides it
pub const DEFAULT_ADVISOR_BASE_URL: &str = "https://advisor.skillforge.dev/v1";

const ADVISOR_KEY_ENV: &str = "SKILLFORGE_ADVISOR_API_KEY";
const ADVISOR_URL_ENV: &str = "SKILLFORGE_ADVISOR_BASE_URL";

/// Resolve advisor API key from 3-tier configuration
///
/// Priority: Database → ENV → TOML. Returns Ok(None) when no tier has a
/// usable key.
pub async fn resolve_advisor_api_key(
    db: &Pool<Sqlite>,
    toml_config: &TomlConfig,
) -> Result<Option<String>> {
    let mut sources = Vec::new();

    // Tier 1: Database (authoritative)
    let db_key = crate::db::settings::get_advisor_api_key(db).await?;
    if db_key.as_deref().is_some_and(is_valid_key) {
        sources.push("database");
    }

    // Tier 2: Environment variable
    let env_key = std::env::var(ADVISOR_KEY_ENV).ok();
    if env_key.as_deref().is_some_and(is_valid_key) {
        sources.push("environment");
    }

    // Tier 3: TOML config
    let toml_key = toml_config.advisor_api_key.clone();
    if toml_key.as_deref().is_some_and(is_valid_key) {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Advisor API key found in multiple sources: {}. Using database (highest priority).",
            sources.join(", ")
        );
    }

    if let Some(key) = db_key.filter(|k| is_valid_key(k)) {
        info!("Advisor API key loaded from database");
        return Ok(Some(key));
    }

    if let Some(key) = env_key.filter(|k| is_valid_key(k)) {
        info!("Advisor API key loaded from environment variable");
        return Ok(Some(key));
    }

    if let Some(key) = toml_key.filter(|k| is_valid_key(k)) {
        info!("Advisor API key loaded from TOML config");
        return Ok(Some(key));
    }

    Ok(None)
}

/// Resolve advisor endpoint base URL (Database → ENV → TOML → default)
pub async fn resolve_advisor_base_url(
    db: &Pool<Sqlite>,
    toml_config: &TomlConfig,
) -> Result<String> {
    if let Some(url) = crate::db::settings::get_advisor_base_url(db).await? {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }

    if let Ok(url) = std::env::var(ADVISOR_URL_ENV) {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }

    if let Some(url) = &toml_config.advisor_base_url {
        if !url.trim().is_empty() {
            return Ok(url.clone());
        }
    }

    Ok(DEFAULT_ADVISOR_BASE_URL.to_string())
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

// ============================================================================
// Settings Sync and Write-Back
// ============================================================================

/// Sync settings from database to the TOML file
///
/// HashMap keys: "advisor_api_key", "advisor_base_url"
pub async fn sync_settings_to_toml(
    settings: HashMap<String, String>,
    toml_path: &Path,
) -> Result<()> {
    // Read existing TOML (or start from defaults)
    let mut config = if toml_path.exists() {
        skillforge_common::config::load_toml_from_path(toml_path)?
    } else {
        TomlConfig::default()
    };

    if let Some(key) = settings.get("advisor_api_key") {
        config.advisor_api_key = Some(key.clone());
    }
    if let Some(url) = settings.get("advisor_base_url") {
        config.advisor_base_url = Some(url.clone());
    }

    // Write atomically (best-effort)
    match skillforge_common::config::write_toml_config(&config, toml_path) {
        Ok(()) => {
            info!("Settings synced to TOML: {}", toml_path.display());
            Ok(())
        }
        Err(e) => {
            warn!("TOML write failed (database write succeeded): {}", e);
            Ok(()) // Graceful degradation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[tokio::test]
    #[serial]
    async fn test_database_tier_wins() {
        std::env::remove_var(ADVISOR_KEY_ENV);
        let pool = test_pool().await;
        crate::db::settings::set_advisor_api_key(&pool, "db-key".to_string())
            .await
            .unwrap();

        let toml_config = TomlConfig {
            advisor_api_key: Some("toml-key".to_string()),
            ..Default::default()
        };

        let key = resolve_advisor_api_key(&pool, &toml_config).await.unwrap();
        assert_eq!(key.as_deref(), Some("db-key"));
    }

    #[tokio::test]
    #[serial]
    async fn test_env_tier_beats_toml() {
        let pool = test_pool().await;
        std::env::set_var(ADVISOR_KEY_ENV, "env-key");

        let toml_config = TomlConfig {
            advisor_api_key: Some("toml-key".to_string()),
            ..Default::default()
        };

        let key = resolve_advisor_api_key(&pool, &toml_config).await.unwrap();
        std::env::remove_var(ADVISOR_KEY_ENV);
        assert_eq!(key.as_deref(), Some("env-key"));
    }

    #[tokio::test]
    #[serial]
    async fn test_unconfigured_is_none() {
        std::env::remove_var(ADVISOR_KEY_ENV);
        let pool = test_pool().await;

        let key = resolve_advisor_api_key(&pool, &TomlConfig::default())
            .await
            .unwrap();
        assert!(key.is_none());
    }

    #[tokio::test]
    #[serial]
    async fn test_base_url_falls_back_to_default() {
        std::env::remove_var(ADVISOR_URL_ENV);
        let pool = test_pool().await;

        let url = resolve_advisor_base_url(&pool, &TomlConfig::default())
            .await
            .unwrap();
        assert_eq!(url, DEFAULT_ADVISOR_BASE_URL);
    }

    #[tokio::test]
    async fn test_sync_settings_to_toml_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("skillforge-re.toml");

        let mut settings = HashMap::new();
        settings.insert("advisor_api_key".to_string(), "synced".to_string());
        sync_settings_to_toml(settings, &toml_path).await.unwrap();

        let loaded = skillforge_common::config::load_toml_from_path(&toml_path).unwrap();
        assert_eq!(loaded.advisor_api_key.as_deref(), Some("synced"));
    }
}
