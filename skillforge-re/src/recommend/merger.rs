//! Candidate merging and ranking
//!
//! Folds every algorithm's candidates into at most one entry per course,
//! filters, sorts, and enriches the survivors. The fold keeps the union of
//! all contributing reasons; how duplicate scores combine is an explicit,
//! pluggable choice.

use crate::models::{Candidate, CourseRecord, Recommendation, Strength, Urgency};
use crate::recommend::SignalSnapshot;
use tracing::debug;
use uuid::Uuid;

/// Default number of recommendations returned
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

/// Completion-time factor applied for learners with prior progress
const RETURNING_LEARNER_FACTOR: f64 = 1.2;

/// How duplicate candidates for one course combine into a single score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineStrategy {
    /// Highest single-algorithm score wins (reasons are still unioned)
    #[default]
    MaxScore,
    /// Weight-normalized average: min(1, sum(w*s) / sum(w))
    WeightedAverage,
}

/// Merge controls
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub include_completed: bool,
    pub focus_area: Option<String>,
    pub max_recommendations: usize,
    pub strategy: CombineStrategy,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            include_completed: false,
            focus_area: None,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            strategy: CombineStrategy::default(),
        }
    }
}

/// Merge outcome: the ranked slice plus how many distinct courses survived
/// the fold
#[derive(Debug)]
pub struct MergeOutcome {
    pub recommendations: Vec<Recommendation>,
    pub total_analyzed: usize,
}

#[derive(Debug)]
struct Folded {
    course_id: Uuid,
    max_score: f64,
    weighted_sum: f64,
    weight_total: f64,
    reasons: Vec<String>,
    urgency: Urgency,
}

/// Fold, filter, rank, slice, and enrich
pub fn merge_and_rank(
    candidates: Vec<Candidate>,
    signals: &SignalSnapshot,
    options: &MergeOptions,
) -> MergeOutcome {
    let completed = signals.completed_course_ids();
    let mut folded: Vec<Folded> = Vec::new();

    for candidate in candidates {
        if !options.include_completed && completed.contains(&candidate.course_id) {
            continue;
        }

        let idx = match folded.iter().position(|f| f.course_id == candidate.course_id) {
            Some(idx) => idx,
            None => {
                folded.push(Folded {
                    course_id: candidate.course_id,
                    max_score: 0.0,
                    weighted_sum: 0.0,
                    weight_total: 0.0,
                    reasons: Vec::new(),
                    urgency: Urgency::Low,
                });
                folded.len() - 1
            }
        };

        let entry = &mut folded[idx];
        entry.max_score = entry.max_score.max(candidate.score);
        entry.weighted_sum += candidate.score * candidate.weight;
        entry.weight_total += candidate.weight;
        entry.urgency = entry.urgency.max(candidate.urgency);
        for reason in candidate.reasons {
            if !entry.reasons.contains(&reason) {
                entry.reasons.push(reason);
            }
        }
    }

    let total_analyzed = folded.len();

    let mut scored: Vec<(Folded, f64)> = folded
        .into_iter()
        .map(|fold| {
            let score = match options.strategy {
                CombineStrategy::MaxScore => fold.max_score,
                CombineStrategy::WeightedAverage => {
                    if fold.weight_total > 0.0 {
                        (fold.weighted_sum / fold.weight_total).min(1.0)
                    } else {
                        0.0
                    }
                }
            }
            .clamp(0.0, 1.0);
            (fold, score)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| a.0.course_id.cmp(&b.0.course_id))
    });

    let has_progress = !signals.progress.is_empty();
    let mut recommendations = Vec::new();

    for (fold, score) in scored {
        if recommendations.len() == options.max_recommendations {
            break;
        }
        let Some(course) = signals.course_by_id(fold.course_id) else {
            debug!(course_id = %fold.course_id, "Candidate course missing from catalog, dropping");
            continue;
        };
        if let Some(focus) = options.focus_area.as_deref() {
            if !matches_focus(course, &fold.reasons, focus) {
                continue;
            }
        }
        recommendations.push(enrich(course.clone(), score, fold, has_progress));
    }

    MergeOutcome {
        recommendations,
        total_analyzed,
    }
}

fn matches_focus(course: &CourseRecord, reasons: &[String], focus: &str) -> bool {
    let needle = focus.to_lowercase();
    course.category.to_lowercase().contains(&needle)
        || reasons.iter().any(|r| r.to_lowercase().contains(&needle))
}

fn enrich(course: CourseRecord, score: f64, fold: Folded, has_progress: bool) -> Recommendation {
    let confidence = (score * 100.0).min(99.0);
    let factor = if has_progress {
        RETURNING_LEARNER_FACTOR
    } else {
        1.0
    };
    let estimated_hours = (course.lesson_count() as f64 * factor).round() as u32;

    Recommendation {
        strength: Strength::from_score(score),
        course,
        score,
        confidence,
        reasons: fold.reasons,
        urgency: fold.urgency,
        estimated_hours,
    }
}

// ============================================================================
// Tests
// ============================================================================
