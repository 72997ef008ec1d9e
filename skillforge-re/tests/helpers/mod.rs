//! Shared test fixtures for integration tests

use chrono::{TimeZone, Utc};
use skillforge_re::models::{
    CourseRecord, Difficulty, ProgressRecord, QuizAttemptRecord,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

/// In-memory database with the service schema applied
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    skillforge_re::db::init_tables(&pool)
        .await
        .expect("Failed to initialize database schema");

    pool
}

pub fn course(title: &str, category: &str, difficulty: Difficulty, lessons: usize) -> CourseRecord {
    CourseRecord {
        course_id: Uuid::new_v4(),
        title: title.to_string(),
        description: format!("{} training", category),
        category: category.to_string(),
        difficulty,
        lessons: (1..=lessons).map(|i| format!("Lesson {}", i)).collect(),
        price_cents: 9900,
    }
}

pub async fn seed_course(pool: &SqlitePool, record: &CourseRecord) {
    skillforge_re::db::courses::insert(pool, record)
        .await
        .expect("Failed to seed course");
}

pub async fn seed_progress(
    pool: &SqlitePool,
    user_id: Uuid,
    course_id: Uuid,
    completed: bool,
    progress: f64,
) {
    skillforge_re::db::progress::upsert(
        pool,
        &ProgressRecord {
            user_id,
            course_id,
            completed,
            progress,
            updated_at: Some(skillforge_common::time::now()),
        },
    )
    .await
    .expect("Failed to seed progress");
}

pub async fn seed_attempt(
    pool: &SqlitePool,
    user_id: Uuid,
    category: &str,
    percentage: f64,
    completed_secs: i64,
) {
    skillforge_re::db::quiz_attempts::insert(
        pool,
        &QuizAttemptRecord {
            attempt_id: Uuid::new_v4(),
            user_id,
            category: category.to_string(),
            percentage,
            completed_at: Some(Utc.timestamp_opt(completed_secs, 0).unwrap()),
        },
    )
    .await
    .expect("Failed to seed quiz attempt");
}
