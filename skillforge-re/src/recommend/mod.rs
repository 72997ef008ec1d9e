//! Course recommendation core
//!
//! Six independent scoring algorithms read one immutable snapshot of a
//! learner's signals and emit candidates; the merger folds them into a
//! ranked, enriched list; the engine is the single facade in front of it
//! all. Nothing in here shares mutable state, so the algorithms are free to
//! run in any order.

pub mod algorithms;
pub mod engine;
pub mod merger;
pub mod signals;

pub use engine::{RecommendationEngine, RecommendationOptions};
pub use merger::{CombineStrategy, MergeOptions, DEFAULT_MAX_RECOMMENDATIONS};

use crate::db::guard::QueryError;
use crate::models::{
    Candidate, CourseRecord, ProgressRecord, QuizAttemptRecord, UserLevel, UserProfile,
};
use crate::services::AdvisorError;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Immutable snapshot of a learner's signals, shared by every algorithm
#[derive(Debug, Clone)]
pub struct SignalSnapshot {
    pub user_id: Uuid,
    pub progress: Vec<ProgressRecord>,
    /// Newest attempt first
    pub quiz_attempts: Vec<QuizAttemptRecord>,
    pub profile: Option<UserProfile>,
    pub catalog: Arc<Vec<CourseRecord>>,
}

impl SignalSnapshot {
    pub fn course_by_id(&self, course_id: Uuid) -> Option<&CourseRecord> {
        self.catalog.iter().find(|c| c.course_id == course_id)
    }

    pub fn completed_course_ids(&self) -> HashSet<Uuid> {
        self.progress
            .iter()
            .filter(|p| p.completed)
            .map(|p| p.course_id)
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        self.progress.iter().filter(|p| p.completed).count()
    }

    pub fn user_level(&self) -> UserLevel {
        UserLevel::from_completed_count(self.completed_count())
    }

    /// Mean percentage across every attempt; None when there are none
    pub fn mean_quiz_percentage(&self) -> Option<f64> {
        if self.quiz_attempts.is_empty() {
            return None;
        }
        let sum: f64 = self.quiz_attempts.iter().map(|a| a.percentage).sum();
        Some(sum / self.quiz_attempts.len() as f64)
    }

    /// Per-category mean quiz percentage, ordered by category name
    pub fn category_quiz_means(&self) -> BTreeMap<String, f64> {
        let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for attempt in &self.quiz_attempts {
            let entry = sums.entry(attempt.category.clone()).or_insert((0.0, 0));
            entry.0 += attempt.percentage;
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(category, (sum, count))| (category, sum / count as f64))
            .collect()
    }
}

/// Error from a single algorithm run; the engine degrades rather than fails
#[derive(Debug, Error)]
pub enum AlgorithmError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Advisor error: {0}")]
    Advisor(#[from] AdvisorError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// One recommendation scoring strategy
///
/// Implementations only read the snapshot (plus whatever clients they own)
/// and never mutate shared state, so every algorithm is independent of the
/// others' output.
#[async_trait::async_trait]
pub trait RecommendationAlgorithm: Send + Sync {
    /// Algorithm tag recorded on every candidate
    fn name(&self) -> &'static str;

    /// Merge weight used by the weighted-average combine strategy
    fn weight(&self) -> f64;

    /// Produce candidates from the signal snapshot
    async fn candidates(
        &self,
        signals: &SignalSnapshot,
    ) -> Result<Vec<Candidate>, AlgorithmError>;
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use crate::models::Difficulty;

    #[test]
    fn test_category_quiz_means() {
        let mut snap = snapshot(vec![]);
        let user = snap.user_id;
        snap.quiz_attempts = vec![
            attempt(user, "cryptography", 80.0),
            attempt(user, "cryptography", 60.0),
            attempt(user, "forensics", 90.0),
        ];

        let means = snap.category_quiz_means();
        assert_eq!(means["cryptography"], 70.0);
        assert_eq!(means["forensics"], 90.0);
        assert_eq!(snap.mean_quiz_percentage(), Some(230.0 / 3.0));
    }

    #[test]
    fn test_completed_helpers() {
        let course_a = course("A", "workshop", Difficulty::Beginner, 3);
        let course_b = course("B", "workshop", Difficulty::Beginner, 3);
        let mut snap = snapshot(vec![course_a.clone(), course_b.clone()]);
        let user = snap.user_id;
        snap.progress = vec![
            progress(user, course_a.course_id, true, 100.0),
            progress(user, course_b.course_id, false, 50.0),
        ];

        assert_eq!(snap.completed_count(), 1);
        assert!(snap.completed_course_ids().contains(&course_a.course_id));
        assert_eq!(snap.user_level(), crate::models::UserLevel::Intermediate);
        assert!(snap.course_by_id(course_b.course_id).is_some());
    }
}
