//! Recommendation output types

use crate::models::CourseRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How urgently a recommendation should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Raw per-algorithm recommendation candidate, before merging
#[derive(Debug, Clone)]
pub struct Candidate {
    pub course_id: Uuid,
    /// Raw algorithm score in [0, 1]
    pub score: f64,
    pub reasons: Vec<String>,
    pub urgency: Urgency,
    /// Producing algorithm tag ("skill-based", "peer-collaborative", ...)
    pub algorithm: &'static str,
    /// Per-algorithm merge weight (applied by the weighted-average strategy)
    pub weight: f64,
}

impl Candidate {
    pub fn new(
        course_id: Uuid,
        score: f64,
        reason: impl Into<String>,
        urgency: Urgency,
        algorithm: &'static str,
        weight: f64,
    ) -> Self {
        Self {
            course_id,
            score: score.clamp(0.0, 1.0),
            reasons: vec![reason.into()],
            urgency,
            algorithm,
            weight,
        }
    }
}

/// Qualitative recommendation strength derived from the merged score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

impl Strength {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Strength::Strong
        } else if score >= 0.6 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

/// A merged, enriched course recommendation
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub course: CourseRecord,
    pub score: f64,
    /// min(score x 100, 99)
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub urgency: Urgency,
    pub strength: Strength,
    /// Rough completion estimate in hours
    pub estimated_hours: u32,
}

/// Derived learner level shared by several algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl UserLevel {
    /// 0 completed courses is Beginner, 1-2 Intermediate, 3+ Advanced
    pub fn from_completed_count(completed: usize) -> Self {
        match completed {
            0 => UserLevel::Beginner,
            1..=2 => UserLevel::Intermediate,
            _ => UserLevel::Advanced,
        }
    }
}

impl std::fmt::Display for UserLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            UserLevel::Beginner => "Beginner",
            UserLevel::Intermediate => "Intermediate",
            UserLevel::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

/// Per-request summary statistics
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSummary {
    /// Distinct courses the ranker analyzed before slicing
    pub total_analyzed: usize,
    pub user_level: UserLevel,
    pub strongest_category: Option<String>,
    pub next_milestone: String,
}

/// Facade response envelope: the only shape external callers ever observe
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RecommendationSummary>,
}

impl RecommendationReport {
    pub fn success(
        recommendations: Vec<Recommendation>,
        summary: RecommendationSummary,
    ) -> Self {
        Self {
            success: true,
            error: None,
            recommendations,
            summary: Some(summary),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            recommendations: Vec::new(),
            summary: None,
        }
    }
}
