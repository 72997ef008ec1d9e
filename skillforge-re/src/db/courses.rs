//! Course catalog queries

use crate::db::guard::QueryError;
use crate::models::{CourseRecord, Difficulty};
use sqlx::SqlitePool;
use uuid::Uuid;

type CourseRow = (String, String, String, String, String, String, i64);

const COURSE_COLUMNS: &str =
    "course_id, title, description, category, difficulty, lessons, price_cents";

/// Full catalog, ordered by title
pub async fn list_all(db: &SqlitePool) -> Result<Vec<CourseRecord>, QueryError> {
    let rows: Vec<CourseRow> = sqlx::query_as(&format!(
        "SELECT {} FROM courses ORDER BY title",
        COURSE_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    rows.into_iter().map(decode_course).collect()
}

pub async fn get(db: &SqlitePool, course_id: Uuid) -> Result<Option<CourseRecord>, QueryError> {
    let row: Option<CourseRow> = sqlx::query_as(&format!(
        "SELECT {} FROM courses WHERE course_id = ?",
        COURSE_COLUMNS
    ))
    .bind(course_id.to_string())
    .fetch_optional(db)
    .await?;

    row.map(decode_course).transpose()
}

pub async fn insert(db: &SqlitePool, course: &CourseRecord) -> Result<(), QueryError> {
    let lessons = serde_json::to_string(&course.lessons)
        .map_err(|e| QueryError::other(format!("Encode lessons failed: {}", e)))?;

    sqlx::query(
        "INSERT OR REPLACE INTO courses \
         (course_id, title, description, category, difficulty, lessons, price_cents) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(course.course_id.to_string())
    .bind(&course.title)
    .bind(&course.description)
    .bind(&course.category)
    .bind(course.difficulty.as_label())
    .bind(lessons)
    .bind(course.price_cents)
    .execute(db)
    .await?;

    Ok(())
}

fn decode_course(row: CourseRow) -> Result<CourseRecord, QueryError> {
    let (course_id, title, description, category, difficulty, lessons, price_cents) = row;

    let course_id = Uuid::parse_str(&course_id)
        .map_err(|e| QueryError::other(format!("Invalid course id '{}': {}", course_id, e)))?;
    let difficulty = Difficulty::parse_label(&difficulty)
        .ok_or_else(|| QueryError::other(format!("Unknown difficulty '{}'", difficulty)))?;
    let lessons: Vec<String> = serde_json::from_str(&lessons)
        .map_err(|e| QueryError::other(format!("Decode lessons failed: {}", e)))?;

    Ok(CourseRecord {
        course_id,
        title,
        description,
        category,
        difficulty,
        lessons,
        price_cents,
    })
}
