//! Performance-tier matching
//!
//! Routes learners to a difficulty band from their overall quiz average.
//! New users with no attempts get the beginner on-ramp.

use crate::models::{Candidate, Difficulty, Urgency};
use crate::recommend::{AlgorithmError, RecommendationAlgorithm, SignalSnapshot};

const ADVANCED_MEAN: f64 = 85.0;
const INTERMEDIATE_MEAN: f64 = 70.0;

const NEW_USER_SCORE: f64 = 0.8;
const ADVANCED_SCORE: f64 = 0.9;
const INTERMEDIATE_SCORE: f64 = 0.7;
const FOUNDATION_SCORE: f64 = 0.6;

pub struct PerformanceTier;

impl PerformanceTier {
    fn tier_candidates(
        &self,
        signals: &SignalSnapshot,
        difficulties: &[Difficulty],
        score: f64,
        reason: &str,
    ) -> Vec<Candidate> {
        signals
            .catalog
            .iter()
            .filter(|course| difficulties.contains(&course.difficulty))
            .map(|course| {
                Candidate::new(
                    course.course_id,
                    score,
                    reason,
                    Urgency::Low,
                    self.name(),
                    self.weight(),
                )
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl RecommendationAlgorithm for PerformanceTier {
    fn name(&self) -> &'static str {
        "performance-based"
    }

    fn weight(&self) -> f64 {
        1.0
    }

    async fn candidates(
        &self,
        signals: &SignalSnapshot,
    ) -> Result<Vec<Candidate>, AlgorithmError> {
        let Some(mean) = signals.mean_quiz_percentage() else {
            return Ok(self.tier_candidates(
                signals,
                &[Difficulty::Beginner, Difficulty::BeginnerToIntermediate],
                NEW_USER_SCORE,
                "Great starting point for new learners",
            ));
        };

        if mean >= ADVANCED_MEAN {
            return Ok(self.tier_candidates(
                signals,
                &[Difficulty::Advanced, Difficulty::IntermediateToAdvanced],
                ADVANCED_SCORE,
                &format!("You're excelling (avg {:.0}%), ready for advanced material", mean),
            ));
        }

        if mean >= INTERMEDIATE_MEAN {
            return Ok(self.tier_candidates(
                signals,
                &[Difficulty::Intermediate, Difficulty::BeginnerToIntermediate],
                INTERMEDIATE_SCORE,
                &format!("Solid fundamentals (avg {:.0}%), keep building on them", mean),
            ));
        }

        // Foundation building: beginner-level workshops only
        let reason = format!(
            "Strengthen your foundations with hands-on practice (avg {:.0}%)",
            mean
        );
        Ok(signals
            .catalog
            .iter()
            .filter(|course| {
                course.difficulty == Difficulty::Beginner
                    && course.category.eq_ignore_ascii_case("workshop")
            })
            .map(|course| {
                Candidate::new(
                    course.course_id,
                    FOUNDATION_SCORE,
                    reason.clone(),
                    Urgency::Low,
                    self.name(),
                    self.weight(),
                )
            })
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
