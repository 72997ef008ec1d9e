//! Difficulty progression
//!
//! Keeps learners on a ramp: recommend courses at the highest difficulty
//! they have completed, or one step above it.

use crate::models::{Candidate, Difficulty, Urgency};
use crate::recommend::{AlgorithmError, RecommendationAlgorithm, SignalSnapshot};

const ON_RAMP_SCORE: f64 = 0.8;
const PROGRESSION_SCORE: f64 = 0.75;

pub struct DifficultyProgression;

impl DifficultyProgression {
    fn on_ramp(&self, signals: &SignalSnapshot) -> Vec<Candidate> {
        signals
            .catalog
            .iter()
            .filter(|course| {
                course.category.eq_ignore_ascii_case("workshop")
                    || course.difficulty == Difficulty::Beginner
            })
            .map(|course| {
                Candidate::new(
                    course.course_id,
                    ON_RAMP_SCORE,
                    "Start with the fundamentals",
                    Urgency::Low,
                    self.name(),
                    self.weight(),
                )
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl RecommendationAlgorithm for DifficultyProgression {
    fn name(&self) -> &'static str {
        "difficulty-progression"
    }

    fn weight(&self) -> f64 {
        0.9
    }

    async fn candidates(
        &self,
        signals: &SignalSnapshot,
    ) -> Result<Vec<Candidate>, AlgorithmError> {
        if signals.progress.is_empty() {
            return Ok(self.on_ramp(signals));
        }

        // Highest difficulty weight among completed courses; learners who
        // enrolled but finished nothing stay on the on-ramp
        let max_weight = signals
            .progress
            .iter()
            .filter(|p| p.completed)
            .filter_map(|p| signals.course_by_id(p.course_id))
            .map(|course| course.difficulty.weight())
            .max();

        let Some(max_weight) = max_weight else {
            return Ok(self.on_ramp(signals));
        };

        Ok(signals
            .catalog
            .iter()
            .filter_map(|course| {
                let weight = course.difficulty.weight();
                let reason = if weight == max_weight {
                    "More practice at the level you've already mastered"
                } else if weight == max_weight + 1 {
                    "The natural next step in difficulty"
                } else {
                    return None;
                };
                Some(Candidate::new(
                    course.course_id,
                    PROGRESSION_SCORE,
                    reason,
                    Urgency::Low,
                    self.name(),
                    self.weight(),
                ))
            })
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_support::*;

    fn catalog() -> Vec<crate::models::CourseRecord> {
        vec![
            course("Starter", "workshop", Difficulty::Beginner, 3),
            course("Bridge", "network-security", Difficulty::BeginnerToIntermediate, 4),
            course("Core", "network-security", Difficulty::Intermediate, 5),
            course("Ramp", "cryptography", Difficulty::IntermediateToAdvanced, 6),
            course("Summit", "cryptography", Difficulty::Advanced, 8),
        ]
    }

    #[tokio::test]
    async fn test_no_progress_gets_on_ramp() {
        let snap = snapshot(catalog());
        let found = DifficultyProgression.candidates(&snap).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].score, ON_RAMP_SCORE);
        let matched = snap.course_by_id(found[0].course_id).unwrap();
        assert_eq!(matched.title, "Starter");
    }

    #[tokio::test]
    async fn test_recommends_current_and_next_weight() {
        let mut snap = snapshot(catalog());
        let user = snap.user_id;
        // Completed the Intermediate course (weight 3)
        let completed = snap
            .catalog
            .iter()
            .find(|c| c.title == "Core")
            .unwrap()
            .course_id;
        snap.progress = vec![progress(user, completed, true, 100.0)];

        let found = DifficultyProgression.candidates(&snap).await.unwrap();
        let titles: Vec<&str> = found
            .iter()
            .map(|c| snap.course_by_id(c.course_id).unwrap().title.as_str())
            .collect();

        // Weight 3 (Core) and weight 4 (Ramp) qualify
        assert_eq!(found.len(), 2);
        assert!(titles.contains(&"Core"));
        assert!(titles.contains(&"Ramp"));
        assert!(found.iter().all(|c| c.score == PROGRESSION_SCORE));
    }

    #[tokio::test]
    async fn test_enrolled_but_nothing_completed_stays_on_ramp() {
        let mut snap = snapshot(catalog());
        let user = snap.user_id;
        let enrolled = snap.catalog[2].course_id;
        snap.progress = vec![progress(user, enrolled, false, 60.0)];

        let found = DifficultyProgression.candidates(&snap).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].score, ON_RAMP_SCORE);
    }

    #[tokio::test]
    async fn test_top_of_ladder_has_no_next_step() {
        let mut snap = snapshot(catalog());
        let user = snap.user_id;
        let summit = snap
            .catalog
            .iter()
            .find(|c| c.title == "Summit")
            .unwrap()
            .course_id;
        snap.progress = vec![progress(user, summit, true, 100.0)];

        let found = DifficultyProgression.candidates(&snap).await.unwrap();
        // Only the weight-5 course itself qualifies
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].course_id, summit);
    }
}
