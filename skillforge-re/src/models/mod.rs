//! Domain models for skillforge-re

pub mod course;
pub mod recommendation;
pub mod records;

pub use course::{CourseRecord, Difficulty};
pub use recommendation::{
    Candidate, Recommendation, RecommendationReport, RecommendationSummary, Strength, Urgency,
    UserLevel,
};
pub use records::{ProgressRecord, QuizAttemptRecord, UserProfile};
