//! Index degradation alert log
//!
//! Records queries that fell back to unindexed execution so an operator can
//! create the missing index. Entries are deduplicated by source + index link
//! and persisted as a single JSON file under the service root folder.
//! Persistence problems degrade to an empty log and never fail the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Upper bound on retained alerts; least-recently-seen entries are evicted
const DEFAULT_CAP: usize = 200;

/// One degraded-query diagnostic entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexAlert {
    /// Dedupe key: `source` + "|" + `index_link`
    pub key: String,
    /// Query site that degraded, e.g. "quiz_attempts.by_user"
    pub source: String,
    /// Error message from the failed primary query
    pub message: String,
    /// Index-creation link extracted from the error, empty when none
    pub index_link: String,
    /// Table or collection path the query targeted
    pub path: String,
    /// Number of occurrences since first_seen
    pub count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Extra context, e.g. the sort parameters in use
    pub details: Value,
}

/// A degradation occurrence to record
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub source: String,
    pub message: String,
    pub index_link: String,
    pub path: String,
    pub details: Value,
}

impl AlertEvent {
    pub fn key(&self) -> String {
        format!("{}|{}", self.source, self.index_link)
    }
}

/// Append/dedupe/persist log of query degradation events
pub struct IndexAlertLog {
    file_path: Option<PathBuf>,
    cap: usize,
    entries: RwLock<Vec<IndexAlert>>,
}

impl IndexAlertLog {
    /// Open a log backed by the given JSON file, loading any existing
    /// entries. A missing, unreadable, or corrupt file yields an empty log.
    pub fn open(file_path: PathBuf) -> Self {
        let entries = load_entries(&file_path);
        Self {
            file_path: Some(file_path),
            cap: DEFAULT_CAP,
            entries: RwLock::new(entries),
        }
    }

    /// Log without persistence (tests, ephemeral deployments)
    pub fn in_memory() -> Self {
        Self {
            file_path: None,
            cap: DEFAULT_CAP,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap.max(1);
        self
    }

    /// Upsert by key: bump count and last_seen on recurrence, insert
    /// otherwise. Never fails; persistence problems are logged and swallowed.
    pub async fn record(&self, event: AlertEvent) {
        let now = skillforge_common::time::now();
        let key = event.key();
        let mut entries = self.entries.write().await;

        if let Some(existing) = entries.iter_mut().find(|a| a.key == key) {
            existing.count += 1;
            existing.last_seen = now;
            existing.message = event.message;
            existing.details = event.details;
        } else {
            if entries.len() >= self.cap {
                if let Some(oldest) = entries
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, a)| a.last_seen)
                    .map(|(i, _)| i)
                {
                    let evicted = entries.remove(oldest);
                    debug!(key = %evicted.key, "Alert log full, evicted least-recently-seen entry");
                }
            }
            entries.push(IndexAlert {
                key,
                source: event.source,
                message: event.message,
                index_link: event.index_link,
                path: event.path,
                count: 1,
                first_seen: now,
                last_seen: now,
                details: event.details,
            });
        }

        self.persist(&entries);
    }

    /// All alerts, most recently seen first
    pub async fn list(&self) -> Vec<IndexAlert> {
        let mut alerts = self.entries.read().await.clone();
        alerts.sort_by(|a, b| {
            b.last_seen
                .cmp(&a.last_seen)
                .then_with(|| a.key.cmp(&b.key))
        });
        alerts
    }

    /// Remove one alert by key; returns whether it existed
    pub async fn dismiss(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|a| a.key != key);
        let removed = entries.len() != before;
        if removed {
            self.persist(&entries);
        }
        removed
    }

    /// Remove all alerts
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
        self.persist(&entries);
    }

    fn persist(&self, entries: &[IndexAlert]) {
        let Some(path) = &self.file_path else {
            return;
        };
        match serde_json::to_string_pretty(entries) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    warn!(path = %path.display(), error = %err, "Failed to persist index alert log");
                }
            }
            Err(err) => {
                warn!(error = %err, "Failed to serialize index alert log");
            }
        }
    }
}

fn load_entries(path: &PathBuf) -> Vec<IndexAlert> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Index alert log is corrupt, starting empty");
                Vec::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Index alert log unreadable, starting empty");
            Vec::new()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
