//! Learner activity records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-(user, course) enrollment progress
///
/// Created on enrollment, updated as lessons complete, never deleted by the
/// recommendation core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub completed: bool,
    /// Completion percentage, 0.0 through 100.0
    pub progress: f64,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single quiz attempt (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttemptRecord {
    pub attempt_id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    /// Score percentage, 0.0 through 100.0
    pub percentage: f64,
    /// May be unset on rows imported without a timestamp
    pub completed_at: Option<DateTime<Utc>>,
}

/// Learner profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub display_name: String,
    pub preferred_categories: Vec<String>,
}
