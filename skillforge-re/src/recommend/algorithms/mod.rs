//! Recommendation scoring algorithms
//!
//! Six independent strategies, one per angle on the learner's history. Each
//! implements [`RecommendationAlgorithm`](crate::recommend::RecommendationAlgorithm)
//! and carries a fixed merge weight.

pub mod ai_personalized;
pub mod category_affinity;
pub mod difficulty_progression;
pub mod peer_collaborative;
pub mod performance_tier;
pub mod skill_gap;

pub use ai_personalized::AiPersonalized;
pub use category_affinity::CategoryAffinity;
pub use difficulty_progression::DifficultyProgression;
pub use peer_collaborative::PeerCollaborative;
pub use performance_tier::PerformanceTier;
pub use skill_gap::SkillGapAnalysis;
