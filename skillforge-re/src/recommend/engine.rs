//! Recommendation facade
//!
//! Single entry point that aggregates signals, runs every algorithm, merges,
//! and enriches. The returned report is the only shape callers ever see:
//! internal failures surface as a failure envelope, never as an error.

use crate::alerts::IndexAlertLog;
use crate::catalog::CourseCatalog;
use crate::models::{RecommendationReport, RecommendationSummary};
use crate::recommend::algorithms::{
    category_affinity, AiPersonalized, CategoryAffinity, DifficultyProgression,
    PeerCollaborative, PerformanceTier, SkillGapAnalysis,
};
use crate::recommend::merger::{self, CombineStrategy, MergeOptions, DEFAULT_MAX_RECOMMENDATIONS};
use crate::recommend::{signals, AlgorithmError, RecommendationAlgorithm, SignalSnapshot};
use crate::services::AdvisorClient;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Completed-course milestones reported in the summary
const MILESTONES: [usize; 5] = [1, 3, 5, 10, 15];

/// Per-request knobs
#[derive(Debug, Clone)]
pub struct RecommendationOptions {
    pub focus_area: Option<String>,
    pub include_completed: bool,
    pub max_recommendations: usize,
    pub strategy: CombineStrategy,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            focus_area: None,
            include_completed: false,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            strategy: CombineStrategy::default(),
        }
    }
}

/// The recommendation facade
pub struct RecommendationEngine {
    db: SqlitePool,
    catalog: Arc<CourseCatalog>,
    alerts: Arc<IndexAlertLog>,
    algorithms: Vec<Arc<dyn RecommendationAlgorithm>>,
}

impl RecommendationEngine {
    /// Standard engine with all six algorithms
    pub fn new(
        db: SqlitePool,
        catalog: Arc<CourseCatalog>,
        alerts: Arc<IndexAlertLog>,
        advisor: Option<AdvisorClient>,
    ) -> Self {
        let algorithms: Vec<Arc<dyn RecommendationAlgorithm>> = vec![
            Arc::new(SkillGapAnalysis),
            Arc::new(PerformanceTier),
            Arc::new(DifficultyProgression),
            Arc::new(CategoryAffinity),
            Arc::new(PeerCollaborative::new(db.clone())),
            Arc::new(AiPersonalized::new(advisor)),
        ];

        Self {
            db,
            catalog,
            alerts,
            algorithms,
        }
    }

    /// Engine with a custom algorithm set (tests, experiments)
    pub fn with_algorithms(
        db: SqlitePool,
        catalog: Arc<CourseCatalog>,
        alerts: Arc<IndexAlertLog>,
        algorithms: Vec<Arc<dyn RecommendationAlgorithm>>,
    ) -> Self {
        Self {
            db,
            catalog,
            alerts,
            algorithms,
        }
    }

    /// Produce recommendations for a learner
    ///
    /// Never fails: anything unexpected inside the pipeline is caught here
    /// and surfaced as a failure report.
    pub async fn recommendations(
        &self,
        user_id: Uuid,
        options: RecommendationOptions,
    ) -> RecommendationReport {
        match self.run(user_id, &options).await {
            Ok(report) => report,
            Err(err) => {
                error!(user_id = %user_id, error = %err, "Recommendation pipeline failed");
                RecommendationReport::failure(err.to_string())
            }
        }
    }

    async fn run(
        &self,
        user_id: Uuid,
        options: &RecommendationOptions,
    ) -> Result<RecommendationReport, AlgorithmError> {
        let started = std::time::Instant::now();
        let catalog = self.catalog.get_or_load(&self.db).await;

        // Fan out the three signal fetches; all settle before scoring starts
        let (progress, quiz_attempts, profile) = tokio::join!(
            signals::load_progress(&self.db, user_id),
            signals::load_quiz_performance(&self.db, user_id, &self.alerts),
            signals::load_profile(&self.db, user_id),
        );

        let snapshot = SignalSnapshot {
            user_id,
            progress,
            quiz_attempts,
            profile,
            catalog,
        };

        let mut candidates = Vec::new();
        for algorithm in &self.algorithms {
            match algorithm.candidates(&snapshot).await {
                Ok(found) => {
                    debug!(
                        algorithm = algorithm.name(),
                        count = found.len(),
                        "Algorithm produced candidates"
                    );
                    candidates.extend(found);
                }
                Err(err) => {
                    warn!(
                        algorithm = algorithm.name(),
                        error = %err,
                        "Algorithm failed, continuing without it"
                    );
                }
            }
        }

        let merge_options = MergeOptions {
            include_completed: options.include_completed,
            focus_area: options.focus_area.clone(),
            max_recommendations: options.max_recommendations,
            strategy: options.strategy,
        };
        let outcome = merger::merge_and_rank(candidates, &snapshot, &merge_options);

        let summary = RecommendationSummary {
            total_analyzed: outcome.total_analyzed,
            user_level: snapshot.user_level(),
            strongest_category: category_affinity::strongest_category(&snapshot),
            next_milestone: next_milestone(snapshot.completed_count()),
        };

        debug!(
            user_id = %user_id,
            returned = outcome.recommendations.len(),
            analyzed = outcome.total_analyzed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recommendation request complete"
        );

        Ok(RecommendationReport::success(
            outcome.recommendations,
            summary,
        ))
    }
}

/// Distance to the next unmet completed-course milestone
fn next_milestone(completed: usize) -> String {
    for milestone in MILESTONES {
        if completed < milestone {
            let remaining = milestone - completed;
            let noun = if remaining == 1 { "course" } else { "courses" };
            return format!(
                "Complete {} more {} to reach {} total",
                remaining, noun, milestone
            );
        }
    }
    "You've passed every milestone. Keep your skills sharp!".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_milestone_thresholds() {
        assert_eq!(next_milestone(0), "Complete 1 more course to reach 1 total");
        assert_eq!(next_milestone(1), "Complete 2 more courses to reach 3 total");
        assert_eq!(next_milestone(4), "Complete 1 more course to reach 5 total");
        assert_eq!(
            next_milestone(12),
            "Complete 3 more courses to reach 15 total"
        );
        assert_eq!(
            next_milestone(15),
            "You've passed every milestone. Keep your skills sharp!"
        );
    }
}
