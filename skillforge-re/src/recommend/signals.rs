//! User signal aggregation
//!
//! Each loader degrades to an empty value on failure: a data-source outage
//! lowers recommendation quality instead of failing the request.

use crate::alerts::IndexAlertLog;
use crate::db;
use crate::db::guard::{run_guarded, GuardSpec, SortDir, SortValue};
use crate::models::{ProgressRecord, QuizAttemptRecord, UserProfile};
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

/// The learner's enrollment progress records
pub async fn load_progress(db: &SqlitePool, user_id: Uuid) -> Vec<ProgressRecord> {
    match db::progress::list_for_user(db, user_id).await {
        Ok(records) => records,
        Err(err) => {
            warn!(user_id = %user_id, error = %err, "Progress load failed, treating as empty");
            Vec::new()
        }
    }
}

/// The learner's quiz history, newest attempt first
///
/// Served through the resilient query executor: a missing composite index
/// degrades to the unsorted query plus an in-memory sort and records an
/// alert, instead of failing the request.
pub async fn load_quiz_performance(
    db: &SqlitePool,
    user_id: Uuid,
    alerts: &IndexAlertLog,
) -> Vec<QuizAttemptRecord> {
    let spec = GuardSpec {
        source: "quiz_attempts.by_user",
        path: "quiz_attempts",
        sort_field: Some("completed_at"),
        sort_dir: SortDir::Desc,
    };

    let outcome = run_guarded(
        spec,
        db::quiz_attempts::list_for_user_ranked(db, user_id),
        || db::quiz_attempts::list_for_user(db, user_id),
        |attempt: &QuizAttemptRecord| SortValue::from(attempt.completed_at),
        alerts,
    )
    .await;

    match outcome {
        Ok(guarded) => {
            if guarded.index_required {
                debug!(user_id = %user_id, "Quiz history served via fallback sort");
            }
            guarded.rows
        }
        Err(err) => {
            warn!(user_id = %user_id, error = %err, "Quiz history load failed, treating as empty");
            Vec::new()
        }
    }
}

/// The learner's profile, if one exists
pub async fn load_profile(db: &SqlitePool, user_id: Uuid) -> Option<UserProfile> {
    match db::profiles::get(db, user_id).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!(user_id = %user_id, error = %err, "Profile load failed, treating as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::quiz_attempts::USER_COMPLETED_INDEX;
    use chrono::TimeZone;
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    async fn seed_attempt(pool: &SqlitePool, user: Uuid, secs: i64) {
        crate::db::quiz_attempts::insert(
            pool,
            &QuizAttemptRecord {
                attempt_id: Uuid::new_v4(),
                user_id: user,
                category: "forensics".to_string(),
                percentage: 80.0,
                completed_at: Some(Utc.timestamp_opt(secs, 0).unwrap()),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_quiz_load_falls_back_when_index_missing() {
        let pool = test_pool().await;
        let alerts = IndexAlertLog::in_memory();
        let user = Uuid::new_v4();

        seed_attempt(&pool, user, 100).await;
        seed_attempt(&pool, user, 300).await;
        seed_attempt(&pool, user, 200).await;

        sqlx::query(&format!("DROP INDEX {}", USER_COMPLETED_INDEX))
            .execute(&pool)
            .await
            .unwrap();

        let attempts = load_quiz_performance(&pool, user, &alerts).await;
        let times: Vec<i64> = attempts
            .iter()
            .map(|a| a.completed_at.unwrap().timestamp())
            .collect();
        // In-memory sort reproduces the server order: newest first
        assert_eq!(times, vec![300, 200, 100]);

        let recorded = alerts.list().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].source, "quiz_attempts.by_user");
    }

    #[tokio::test]
    async fn test_loaders_degrade_to_empty_on_outage() {
        let pool = test_pool().await;
        let alerts = IndexAlertLog::in_memory();
        let user = Uuid::new_v4();
        pool.close().await;

        assert!(load_progress(&pool, user).await.is_empty());
        assert!(load_quiz_performance(&pool, user, &alerts).await.is_empty());
        assert!(load_profile(&pool, user).await.is_none());
    }
}
