//! Category affinity
//!
//! Accumulates engagement per category from enrollment progress and quiz
//! activity, then doubles down on the learner's two strongest categories.

use crate::models::{Candidate, Urgency};
use crate::recommend::{AlgorithmError, RecommendationAlgorithm, SignalSnapshot};
use std::collections::BTreeMap;

/// Number of top categories to recommend from
const TOP_CATEGORIES: usize = 2;
/// Accumulated engagement that maps to a full score of 1.0
const SATURATION: f64 = 3.0;

pub struct CategoryAffinity;

/// Accumulated engagement per category: progress fractions (1.0 when the
/// course is completed) plus quiz percentages normalized to [0, 1].
pub fn category_scores(signals: &SignalSnapshot) -> BTreeMap<String, f64> {
    let mut scores: BTreeMap<String, f64> = BTreeMap::new();

    for record in &signals.progress {
        let Some(course) = signals.course_by_id(record.course_id) else {
            continue;
        };
        let gain = if record.completed {
            1.0
        } else {
            (record.progress / 100.0).clamp(0.0, 1.0)
        };
        *scores.entry(course.category.clone()).or_insert(0.0) += gain;
    }

    for attempt in &signals.quiz_attempts {
        *scores.entry(attempt.category.clone()).or_insert(0.0) +=
            (attempt.percentage / 100.0).clamp(0.0, 1.0);
    }

    scores
}

/// The learner's strongest category, if any signals exist
pub fn strongest_category(signals: &SignalSnapshot) -> Option<String> {
    let mut best: Option<(String, f64)> = None;
    for (category, score) in category_scores(signals) {
        match &best {
            Some((_, best_score)) if score <= *best_score => {}
            _ => best = Some((category, score)),
        }
    }
    best.map(|(category, _)| category)
}

#[async_trait::async_trait]
impl RecommendationAlgorithm for CategoryAffinity {
    fn name(&self) -> &'static str {
        "category-affinity"
    }

    fn weight(&self) -> f64 {
        0.8
    }

    async fn candidates(
        &self,
        signals: &SignalSnapshot,
    ) -> Result<Vec<Candidate>, AlgorithmError> {
        let mut ranked: Vec<(String, f64)> = category_scores(signals).into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut candidates = Vec::new();
        for (category, accumulated) in ranked.into_iter().take(TOP_CATEGORIES) {
            let score = (accumulated / SATURATION).min(1.0);
            let reason = format!("You're making strong progress in {}", category);

            for course in signals.catalog.iter() {
                if course.category.eq_ignore_ascii_case(&category) {
                    candidates.push(Candidate::new(
                        course.course_id,
                        score,
                        reason.clone(),
                        Urgency::Low,
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
