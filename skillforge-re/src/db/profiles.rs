//! User profile queries

use crate::db::guard::QueryError;
use crate::models::UserProfile;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn get(db: &SqlitePool, user_id: Uuid) -> Result<Option<UserProfile>, QueryError> {
    let row: Option<(String, String, String)> = sqlx::query_as(
        "SELECT user_id, display_name, preferred_categories \
         FROM user_profiles WHERE user_id = ?",
    )
    .bind(user_id.to_string())
    .fetch_optional(db)
    .await?;

    let Some((user_id, display_name, preferred_categories)) = row else {
        return Ok(None);
    };

    let user_id = Uuid::parse_str(&user_id)
        .map_err(|e| QueryError::other(format!("Invalid user id '{}': {}", user_id, e)))?;
    let preferred_categories: Vec<String> = serde_json::from_str(&preferred_categories)
        .map_err(|e| QueryError::other(format!("Decode preferred categories failed: {}", e)))?;

    Ok(Some(UserProfile {
        user_id,
        display_name,
        preferred_categories,
    }))
}

pub async fn upsert(db: &SqlitePool, profile: &UserProfile) -> Result<(), QueryError> {
    let preferred = serde_json::to_string(&profile.preferred_categories)
        .map_err(|e| QueryError::other(format!("Encode preferred categories failed: {}", e)))?;

    sqlx::query(
        "INSERT OR REPLACE INTO user_profiles (user_id, display_name, preferred_categories) \
         VALUES (?, ?, ?)",
    )
    .bind(profile.user_id.to_string())
    .bind(&profile.display_name)
    .bind(preferred)
    .execute(db)
    .await?;

    Ok(())
}
