//! Settings database operations
//!
//! Get/set accessors for the settings table following a key-value pattern.

use sqlx::{Pool, Sqlite};
use skillforge_common::{Error, Result};

/// Get advisor API key from database
///
/// Returns Some(key) if set, None otherwise
pub async fn get_advisor_api_key(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting::<String>(db, "advisor_api_key").await
}

/// Set advisor API key in database
pub async fn set_advisor_api_key(db: &Pool<Sqlite>, key: String) -> Result<()> {
    set_setting(db, "advisor_api_key", key).await
}

/// Get advisor endpoint base URL override from database
pub async fn get_advisor_base_url(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting::<String>(db, "advisor_base_url").await
}

/// Set advisor endpoint base URL override in database
pub async fn set_advisor_base_url(db: &Pool<Sqlite>, url: String) -> Result<()> {
    set_setting(db, "advisor_base_url", url).await
}

/// Generic setting getter (internal)
async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting failed: {}", e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter (internal)
async fn set_setting<T>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value.to_string())
        .execute(db)
        .await
        .map_err(Error::Database)?;

    Ok(())
}
