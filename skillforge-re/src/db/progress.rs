//! Enrollment progress queries

use crate::db::guard::QueryError;
use crate::models::ProgressRecord;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

type ProgressRow = (String, String, i64, f64, Option<String>);

const PROGRESS_COLUMNS: &str = "user_id, course_id, completed, progress, updated_at";

pub async fn list_for_user(
    db: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<ProgressRecord>, QueryError> {
    let rows: Vec<ProgressRow> = sqlx::query_as(&format!(
        "SELECT {} FROM user_progress WHERE user_id = ?",
        PROGRESS_COLUMNS
    ))
    .bind(user_id.to_string())
    .fetch_all(db)
    .await?;

    rows.into_iter().map(decode_progress).collect()
}

/// Every user's progress, for peer-collaborative scoring
pub async fn list_all(db: &SqlitePool) -> Result<Vec<ProgressRecord>, QueryError> {
    let rows: Vec<ProgressRow> = sqlx::query_as(&format!(
        "SELECT {} FROM user_progress",
        PROGRESS_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    rows.into_iter().map(decode_progress).collect()
}

pub async fn upsert(db: &SqlitePool, record: &ProgressRecord) -> Result<(), QueryError> {
    sqlx::query(
        "INSERT OR REPLACE INTO user_progress \
         (user_id, course_id, completed, progress, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(record.user_id.to_string())
    .bind(record.course_id.to_string())
    .bind(record.completed as i64)
    .bind(record.progress)
    .bind(record.updated_at.map(|t| t.to_rfc3339()))
    .execute(db)
    .await?;

    Ok(())
}

fn decode_progress(row: ProgressRow) -> Result<ProgressRecord, QueryError> {
    let (user_id, course_id, completed, progress, updated_at) = row;

    let user_id = Uuid::parse_str(&user_id)
        .map_err(|e| QueryError::other(format!("Invalid user id '{}': {}", user_id, e)))?;
    let course_id = Uuid::parse_str(&course_id)
        .map_err(|e| QueryError::other(format!("Invalid course id '{}': {}", course_id, e)))?;

    Ok(ProgressRecord {
        user_id,
        course_id,
        completed: completed != 0,
        progress,
        updated_at: updated_at.and_then(parse_timestamp),
    })
}

fn parse_timestamp(raw: String) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
