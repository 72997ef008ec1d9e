//! AI-personalized recommendations
//!
//! Sends a compact learner profile and the catalog title list to the advisor
//! endpoint and maps mentioned titles back onto catalog courses. Strictly
//! best-effort: every failure path (network, timeout, unparseable output)
//! yields an empty candidate list and never blocks the other algorithms.
//!
//! The prompt asks for a structured JSON array of titles; free-text scanning
//! is only the fallback, and its substring matching can false-positive when
//! one course title contains another (see the tests).

use crate::models::{Candidate, CourseRecord, Urgency};
use crate::recommend::{AlgorithmError, RecommendationAlgorithm, SignalSnapshot};
use crate::services::AdvisorClient;
use serde_json::json;
use strsim::jaro_winkler;
use tracing::{debug, warn};
use uuid::Uuid;

const SYSTEM_INSTRUCTION: &str = "You are a cybersecurity learning advisor. Recommend the \
courses that best close the learner's gaps and sustain their momentum.";

/// Fixed score for advisor picks
const AI_SCORE: f64 = 0.85;
/// At most this many advisor picks survive
const MAX_AI_PICKS: usize = 3;
/// Fuzzy-match floor for titles returned by the advisor
const TITLE_SIMILARITY: f64 = 0.92;

pub struct AiPersonalized {
    client: Option<AdvisorClient>,
}

impl AiPersonalized {
    /// Passing None disables the algorithm (it emits no candidates)
    pub fn new(client: Option<AdvisorClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RecommendationAlgorithm for AiPersonalized {
    fn name(&self) -> &'static str {
        "ai-personalized"
    }

    fn weight(&self) -> f64 {
        1.1
    }

    async fn candidates(
        &self,
        signals: &SignalSnapshot,
    ) -> Result<Vec<Candidate>, AlgorithmError> {
        let Some(client) = &self.client else {
            debug!("Advisor client not configured, skipping AI recommendations");
            return Ok(Vec::new());
        };
        if signals.catalog.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_prompt(signals);
        let text = match client.generate(&prompt, SYSTEM_INSTRUCTION).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Advisor call failed, skipping AI recommendations");
                return Ok(Vec::new());
            }
        };

        let picks = match_titles(&text, &signals.catalog);
        debug!(picks = picks.len(), "Advisor picks mapped onto catalog");

        Ok(picks
            .into_iter()
            .map(|course_id| {
                Candidate::new(
                    course_id,
                    AI_SCORE,
                    "Hand-picked by your learning advisor",
                    Urgency::Low,
                    self.name(),
                    self.weight(),
                )
            })
            .collect())
    }
}

fn build_prompt(signals: &SignalSnapshot) -> String {
    let means = signals.category_quiz_means();
    let strongest = means
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(category, _)| category.clone());
    let weakest = means
        .iter()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(category, _)| category.clone());

    let profile = json!({
        "level": signals.user_level().to_string(),
        "completed_courses": signals.completed_count(),
        "average_quiz_score": signals.mean_quiz_percentage(),
        "strongest_category": strongest,
        "weakest_category": weakest,
        "learning_pattern": learning_pattern(signals),
    });

    let titles: Vec<&str> = signals.catalog.iter().map(|c| c.title.as_str()).collect();

    format!(
        "Learner profile: {}\nAvailable courses: {}\nRespond with a JSON array of up to {} \
         course titles from the list, best fit first.",
        profile,
        json!(titles),
        MAX_AI_PICKS
    )
}

/// Coarse engagement tag for the advisor prompt
fn learning_pattern(signals: &SignalSnapshot) -> &'static str {
    if signals.quiz_attempts.len() < 3 {
        "exploring"
    } else if signals.mean_quiz_percentage().unwrap_or(0.0) >= 80.0 {
        "mastering"
    } else {
        "building"
    }
}

/// Map advisor output onto catalog course ids, structured parse first
pub(crate) fn match_titles(text: &str, catalog: &[CourseRecord]) -> Vec<Uuid> {
    if let Some(titles) = parse_structured(text) {
        let mut picks = Vec::new();
        for title in titles {
            if let Some(course) = best_title_match(&title, catalog) {
                if !picks.contains(&course.course_id) {
                    picks.push(course.course_id);
                    if picks.len() == MAX_AI_PICKS {
                        break;
                    }
                }
            }
        }
        if !picks.is_empty() {
            return picks;
        }
    }

    // Fallback: scan the free text for catalog titles it mentions. This can
    // over-match when one title is a substring of another.
    let haystack = text.to_lowercase();
    let mut picks = Vec::new();
    for course in catalog {
        if haystack.contains(&course.title.to_lowercase()) {
            picks.push(course.course_id);
            if picks.len() == MAX_AI_PICKS {
                break;
            }
        }
    }
    picks
}

/// First JSON array of strings embedded in the response text
fn parse_structured(text: &str) -> Option<Vec<String>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Vec<String>>(&text[start..=end]).ok()
}

fn best_title_match<'a>(title: &str, catalog: &'a [CourseRecord]) -> Option<&'a CourseRecord> {
    let wanted = title.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    if let Some(course) = catalog.iter().find(|c| c.title.to_lowercase() == wanted) {
        return Some(course);
    }

    catalog
        .iter()
        .map(|course| (course, jaro_winkler(&course.title.to_lowercase(), &wanted)))
        .filter(|(_, similarity)| *similarity >= TITLE_SIMILARITY)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(course, _)| course)
}

// ============================================================================
// Tests
// ============================================================================
