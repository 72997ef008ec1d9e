//! Peer-collaborative filtering
//!
//! Surfaces the courses most often completed by other learners at the same
//! derived level. Owns its own read of the shared progress table; a failure
//! there degrades to no candidates rather than failing the request.

use crate::db;
use crate::models::{Candidate, ProgressRecord, Urgency, UserLevel};
use crate::recommend::{AlgorithmError, RecommendationAlgorithm, SignalSnapshot};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// Number of peer-popular courses to surface
const MAX_PEER_PICKS: usize = 3;

pub struct PeerCollaborative {
    db: SqlitePool,
}

impl PeerCollaborative {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl RecommendationAlgorithm for PeerCollaborative {
    fn name(&self) -> &'static str {
        "peer-collaborative"
    }

    fn weight(&self) -> f64 {
        0.7
    }

    async fn candidates(
        &self,
        signals: &SignalSnapshot,
    ) -> Result<Vec<Candidate>, AlgorithmError> {
        let all_progress = match db::progress::list_all(&self.db).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "Peer progress unavailable, skipping peer recommendations");
                return Ok(Vec::new());
            }
        };

        let mut by_user: HashMap<Uuid, Vec<ProgressRecord>> = HashMap::new();
        for record in all_progress {
            if record.user_id != signals.user_id {
                by_user.entry(record.user_id).or_default().push(record);
            }
        }

        // Tally completions among peers at the learner's derived level
        let level = signals.user_level();
        let mut peer_count = 0usize;
        let mut tally: HashMap<Uuid, usize> = HashMap::new();

        for records in by_user.values() {
            let completed: Vec<Uuid> = records
                .iter()
                .filter(|r| r.completed)
                .map(|r| r.course_id)
                .collect();
            if UserLevel::from_completed_count(completed.len()) != level {
                continue;
            }
            peer_count += 1;
            for course_id in completed {
                *tally.entry(course_id).or_insert(0) += 1;
            }
        }

        if peer_count == 0 {
            return Ok(Vec::new());
        }

        let mut ranked: Vec<(Uuid, usize)> = tally.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(ranked
            .into_iter()
            .take(MAX_PEER_PICKS)
            .map(|(course_id, matches)| {
                let fraction = matches as f64 / peer_count as f64;
                Candidate::new(
                    course_id,
                    fraction,
                    format!(
                        "Completed by {:.0}% of learners at your level",
                        fraction * 100.0
                    ),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use crate::recommend::test_support::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    async fn seed(pool: &SqlitePool, user: Uuid, course: Uuid, completed: bool) {
        db::progress::upsert(pool, &progress(user, course, completed, 100.0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_popular_courses_among_level_peers() {
        let pool = test_pool().await;

        let course_a = course("A", "forensics", Difficulty::Beginner, 3);
        let course_b = course("B", "forensics", Difficulty::Beginner, 3);
        let snap = {
            let mut snap = snapshot(vec![course_a.clone(), course_b.clone()]);
            let me = snap.user_id;
            // One completed course puts the learner at Intermediate level
            snap.progress = vec![progress(me, course_a.course_id, true, 100.0)];
            snap
        };

        // Two Intermediate-level peers (1 completion each) and one Advanced
        // peer (3 completions) who must not count
        let peer_1 = Uuid::new_v4();
        let peer_2 = Uuid::new_v4();
        let advanced_peer = Uuid::new_v4();
        seed(&pool, peer_1, course_b.course_id, true).await;
        seed(&pool, peer_2, course_b.course_id, true).await;
        for extra in [course_a.course_id, course_b.course_id, Uuid::new_v4()] {
            seed(&pool, advanced_peer, extra, true).await;
        }

        let algorithm = PeerCollaborative::new(pool);
        let found = algorithm.candidates(&snap).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].course_id, course_b.course_id);
        // 2 of 2 peers completed it
        assert_eq!(found[0].score, 1.0);
        assert!(found[0].reasons[0].contains("100%"));
    }

    #[tokio::test]
    async fn test_caps_at_three_picks() {
        let pool = test_pool().await;

        // One completed course puts the learner (and each peer below) at
        // Intermediate level
        let mut snap = snapshot(vec![]);
        snap.progress = vec![progress(snap.user_id, Uuid::new_v4(), true, 100.0)];

        // Four peers, four distinct completed courses
        for _ in 0..4 {
            seed(&pool, Uuid::new_v4(), Uuid::new_v4(), true).await;
        }

        let algorithm = PeerCollaborative::new(pool);
        let found = algorithm.candidates(&snap).await.unwrap();
        assert_eq!(found.len(), MAX_PEER_PICKS);
    }

    #[tokio::test]
    async fn test_no_peers_yields_no_candidates() {
        let pool = test_pool().await;
        let snap = snapshot(vec![]);

        let algorithm = PeerCollaborative::new(pool);
        assert!(algorithm.candidates(&snap).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_outage_degrades_to_empty() {
        let pool = test_pool().await;
        pool.close().await;
        let snap = snapshot(vec![]);

        let algorithm = PeerCollaborative::new(pool);
        assert!(algorithm.candidates(&snap).await.unwrap().is_empty());
    }
}
