//! Course catalog records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered course difficulty tiers
///
/// The numeric weight drives difficulty-progression scoring: each tier is
/// one step above the previous, Beginner = 1 through Advanced = 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    #[serde(rename = "Beginner to Intermediate")]
    BeginnerToIntermediate,
    Intermediate,
    #[serde(rename = "Intermediate to Advanced")]
    IntermediateToAdvanced,
    Advanced,
}

impl Difficulty {
    /// Progression weight, 1 (Beginner) through 5 (Advanced)
    pub fn weight(self) -> u8 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::BeginnerToIntermediate => 2,
            Difficulty::Intermediate => 3,
            Difficulty::IntermediateToAdvanced => 4,
            Difficulty::Advanced => 5,
        }
    }

    pub fn from_weight(weight: u8) -> Option<Self> {
        match weight {
            1 => Some(Difficulty::Beginner),
            2 => Some(Difficulty::BeginnerToIntermediate),
            3 => Some(Difficulty::Intermediate),
            4 => Some(Difficulty::IntermediateToAdvanced),
            5 => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    /// Human-readable label, also the database representation
    pub fn as_label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::BeginnerToIntermediate => "Beginner to Intermediate",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::IntermediateToAdvanced => "Intermediate to Advanced",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Beginner" => Some(Difficulty::Beginner),
            "Beginner to Intermediate" => Some(Difficulty::BeginnerToIntermediate),
            "Intermediate" => Some(Difficulty::Intermediate),
            "Intermediate to Advanced" => Some(Difficulty::IntermediateToAdvanced),
            "Advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A course in the training catalog
///
/// Read-mostly: loaded once into the in-memory catalog cache and treated as
/// immutable by the recommendation core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    /// Category tag, e.g. "network-security" or "workshop"
    pub category: String,
    pub difficulty: Difficulty,
    /// Ordered lesson titles
    pub lessons: Vec<String>,
    /// List price in cents
    pub price_cents: i64,
}

impl CourseRecord {
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_weights_are_ordered() {
        assert_eq!(Difficulty::Beginner.weight(), 1);
        assert_eq!(Difficulty::Advanced.weight(), 5);
        assert!(Difficulty::Beginner < Difficulty::Intermediate);
        assert!(Difficulty::IntermediateToAdvanced < Difficulty::Advanced);
    }

    #[test]
    fn test_difficulty_weight_roundtrip() {
        for weight in 1..=5 {
            let difficulty = Difficulty::from_weight(weight).unwrap();
            assert_eq!(difficulty.weight(), weight);
        }
        assert!(Difficulty::from_weight(0).is_none());
        assert!(Difficulty::from_weight(6).is_none());
    }

    #[test]
    fn test_difficulty_label_roundtrip() {
        for difficulty in [
            Difficulty::Beginner,
            Difficulty::BeginnerToIntermediate,
            Difficulty::Intermediate,
            Difficulty::IntermediateToAdvanced,
            Difficulty::Advanced,
        ] {
            assert_eq!(Difficulty::parse_label(difficulty.as_label()), Some(difficulty));
        }
        assert!(Difficulty::parse_label("Expert").is_none());
    }
}
