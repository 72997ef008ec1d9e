//! Quiz attempt queries
//!
//! The ranked variant demands its composite index via `INDEXED BY`, so a
//! schema missing the index surfaces as a failed-precondition error instead
//! of a silent table scan; the guard layer then serves the unsorted variant
//! with an in-memory sort.

use crate::db::guard::QueryError;
use crate::models::QuizAttemptRecord;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Composite index backing the ranked query
pub const USER_COMPLETED_INDEX: &str = "idx_quiz_attempts_user_completed";

type AttemptRow = (String, String, String, f64, Option<String>);

const ATTEMPT_COLUMNS: &str = "attempt_id, user_id, category, percentage, completed_at";

/// Primary query: server-sorted, newest attempt first
pub async fn list_for_user_ranked(
    db: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<QuizAttemptRecord>, QueryError> {
    let sql = format!(
        "SELECT {} FROM quiz_attempts INDEXED BY {} \
         WHERE user_id = ? ORDER BY completed_at DESC",
        ATTEMPT_COLUMNS, USER_COMPLETED_INDEX
    );

    let rows: Vec<AttemptRow> = sqlx::query_as(&sql)
        .bind(user_id.to_string())
        .fetch_all(db)
        .await?;

    rows.into_iter().map(decode_attempt).collect()
}

/// Fallback query: same predicate, no server-side sort
pub async fn list_for_user(
    db: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<QuizAttemptRecord>, QueryError> {
    let rows: Vec<AttemptRow> = sqlx::query_as(&format!(
        "SELECT {} FROM quiz_attempts WHERE user_id = ?",
        ATTEMPT_COLUMNS
    ))
    .bind(user_id.to_string())
    .fetch_all(db)
    .await?;

    rows.into_iter().map(decode_attempt).collect()
}

pub async fn insert(db: &SqlitePool, attempt: &QuizAttemptRecord) -> Result<(), QueryError> {
    sqlx::query(
        "INSERT INTO quiz_attempts (attempt_id, user_id, category, percentage, completed_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(attempt.attempt_id.to_string())
    .bind(attempt.user_id.to_string())
    .bind(&attempt.category)
    .bind(attempt.percentage)
    .bind(attempt.completed_at.map(|t| t.to_rfc3339()))
    .execute(db)
    .await?;

    Ok(())
}

fn decode_attempt(row: AttemptRow) -> Result<QuizAttemptRecord, QueryError> {
    let (attempt_id, user_id, category, percentage, completed_at) = row;

    let attempt_id = Uuid::parse_str(&attempt_id)
        .map_err(|e| QueryError::other(format!("Invalid attempt id '{}': {}", attempt_id, e)))?;
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|e| QueryError::other(format!("Invalid user id '{}': {}", user_id, e)))?;

    Ok(QuizAttemptRecord {
        attempt_id,
        user_id,
        category,
        percentage,
        completed_at: completed_at.and_then(parse_timestamp),
    })
}

fn parse_timestamp(raw: String) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
