//! Skill-gap analysis
//!
//! Finds quiz categories where the learner underperforms and recommends
//! courses that close the gap. A category mean below 75% is a gap; below
//! 60% it is urgent.

use crate::models::{Candidate, Urgency};
use crate::recommend::{AlgorithmError, RecommendationAlgorithm, SignalSnapshot};

/// Category means below this are treated as gaps
const GAP_THRESHOLD: f64 = 75.0;
/// Means below this mark the gap as urgent
const URGENT_THRESHOLD: f64 = 60.0;
const URGENT_SCORE: f64 = 0.9;
const MODERATE_SCORE: f64 = 0.7;

pub struct SkillGapAnalysis;

#[async_trait::async_trait]
impl RecommendationAlgorithm for SkillGapAnalysis {
    fn name(&self) -> &'static str {
        "skill-based"
    }

    fn weight(&self) -> f64 {
        1.0
    }

    async fn candidates(
        &self,
        signals: &SignalSnapshot,
    ) -> Result<Vec<Candidate>, AlgorithmError> {
        let mut candidates = Vec::new();

        for (category, mean) in signals.category_quiz_means() {
            if mean >= GAP_THRESHOLD {
                continue;
            }

            let (score, urgency) = if mean < URGENT_THRESHOLD {
                (URGENT_SCORE, Urgency::High)
            } else {
                (MODERATE_SCORE, Urgency::Medium)
            };

            let reason = format!(
                "Improve {} skills (current score: {:.0}%)",
                category, mean
            );
            let needle = category.to_lowercase();

            // Match by category, or by the skill name appearing in the
            // course description
            for course in signals.catalog.iter() {
                if course.category.eq_ignore_ascii_case(&category)
                    || course.description.to_lowercase().contains(&needle)
                {
                    candidates.push(Candidate::new(
                        course.course_id,
                        score,
                        reason.clone(),
                        urgency,
                        self.name(),
                        self.weight(),
                    ));
                }
            }
        }

        Ok(candidates)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use crate::recommend::test_support::*;

    #[tokio::test]
    async fn test_no_attempts_yields_no_candidates() {
        let snap = snapshot(vec![course(
            "Crypto 101",
            "cryptography",
            Difficulty::Beginner,
            4,
        )]);
        let found = SkillGapAnalysis.candidates(&snap).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_gap_below_60_is_urgent() {
        let crypto = course("Crypto 101", "cryptography", Difficulty::Beginner, 4);
        let mut snap = snapshot(vec![crypto.clone()]);
        let user = snap.user_id;
        snap.quiz_attempts = vec![
            attempt(user, "cryptography", 50.0),
            attempt(user, "cryptography", 58.0),
        ];

        let found = SkillGapAnalysis.candidates(&snap).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].score, URGENT_SCORE);
        assert_eq!(found[0].urgency, Urgency::High);
        assert_eq!(
            found[0].reasons[0],
            "Improve cryptography skills (current score: 54%)"
        );
    }

    #[tokio::test]
    async fn test_gap_between_60_and_75_is_moderate() {
        let crypto = course("Crypto 101", "cryptography", Difficulty::Beginner, 4);
        let mut snap = snapshot(vec![crypto]);
        let user = snap.user_id;
        snap.quiz_attempts = vec![attempt(user, "cryptography", 70.0)];

        let found = SkillGapAnalysis.candidates(&snap).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].score, MODERATE_SCORE);
        assert_eq!(found[0].urgency, Urgency::Medium);
    }

    #[tokio::test]
    async fn test_strong_category_is_not_a_gap() {
        let crypto = course("Crypto 101", "cryptography", Difficulty::Beginner, 4);
        let mut snap = snapshot(vec![crypto]);
        let user = snap.user_id;
        snap.quiz_attempts = vec![attempt(user, "cryptography", 88.0)];

        let found = SkillGapAnalysis.candidates(&snap).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_description_substring_matches_other_categories() {
        // Different category, but the description mentions the gap skill
        let mut workshop = course("Hands-on Lab", "workshop", Difficulty::Beginner, 2);
        workshop.description = "Applied Cryptography drills".to_string();
        let unrelated = course("Cloud Intro", "cloud-security", Difficulty::Beginner, 2);

        let mut snap = snapshot(vec![workshop.clone(), unrelated]);
        let user = snap.user_id;
        snap.quiz_attempts = vec![attempt(user, "cryptography", 40.0)];

        let found = SkillGapAnalysis.candidates(&snap).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].course_id, workshop.course_id);
    }
}
