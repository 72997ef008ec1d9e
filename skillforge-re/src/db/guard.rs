//! Resilient query executor
//!
//! Every data accessor that needs a server-sorted read goes through
//! [`run_guarded`]: it runs the primary (indexed, server-sorted) query and,
//! when the store reports a missing index, transparently re-runs the fallback
//! (same predicate, no server-side sort), sorts the rows in memory, and
//! records a diagnostic alert. Every other error class is rethrown unchanged.

use crate::alerts::{AlertEvent, IndexAlertLog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use skillforge_common::time::epoch_millis_or_zero;
use std::cmp::Ordering;
use std::future::Future;
use thiserror::Error;
use tracing::warn;

/// Classification of a failed store query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// The query shape is unsupported as issued (e.g. missing composite index)
    FailedPrecondition,
    /// The caller is not allowed to run this query
    PermissionDenied,
    /// The requested row does not exist
    NotFound,
    /// The store is unreachable or the pool is exhausted
    Unavailable,
    /// Anything else
    Other,
}

/// A failed store query with its classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
}

impl QueryError {
    pub fn new(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Other, message)
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        let message = err.to_string();
        let kind = match &err {
            sqlx::Error::RowNotFound => QueryErrorKind::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                QueryErrorKind::Unavailable
            }
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("no such index") {
                    QueryErrorKind::FailedPrecondition
                } else if msg.contains("not authorized") {
                    QueryErrorKind::PermissionDenied
                } else {
                    QueryErrorKind::Other
                }
            }
            _ => QueryErrorKind::Other,
        };
        Self { kind, message }
    }
}

/// Sort direction for the in-memory fallback sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Sort key extracted from a row
///
/// Timestamps coerce to epoch millis and missing values to 0, so the
/// in-memory order matches what the server-sorted query would have produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        use SortValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Text(a), Text(b)) => a.cmp(b),
            // Numeric values order before text
            (Int(_) | Float(_), Text(_)) => Ordering::Less,
            (Text(_), Int(_) | Float(_)) => Ordering::Greater,
        }
    }
}

impl From<i64> for SortValue {
    fn from(v: i64) -> Self {
        SortValue::Int(v)
    }
}

impl From<f64> for SortValue {
    fn from(v: f64) -> Self {
        SortValue::Float(v)
    }
}

impl From<&str> for SortValue {
    fn from(v: &str) -> Self {
        SortValue::Text(v.to_string())
    }
}

impl From<String> for SortValue {
    fn from(v: String) -> Self {
        SortValue::Text(v)
    }
}

impl From<DateTime<Utc>> for SortValue {
    fn from(v: DateTime<Utc>) -> Self {
        SortValue::Int(v.timestamp_millis())
    }
}

impl From<Option<DateTime<Utc>>> for SortValue {
    fn from(v: Option<DateTime<Utc>>) -> Self {
        SortValue::Int(epoch_millis_or_zero(v))
    }
}

/// Identification of a guarded query site
#[derive(Debug, Clone, Copy)]
pub struct GuardSpec<'a> {
    /// Query site tag, e.g. "quiz_attempts.by_user"
    pub source: &'a str,
    /// Table or collection path, for diagnostics
    pub path: &'a str,
    /// Field the primary query sorts by; None disables the fallback sort
    pub sort_field: Option<&'a str>,
    pub sort_dir: SortDir,
}

/// Result of a guarded query
#[derive(Debug)]
pub struct GuardedRows<T> {
    pub rows: Vec<T>,
    /// True when the fallback path served this result
    pub index_required: bool,
    /// Index-creation link extracted from the error message, empty when none
    pub index_link: String,
}

/// Execute `primary`, degrading to `fallback` plus an in-memory sort when the
/// store reports a missing index.
///
/// Index-miss detection: error kind is FailedPrecondition, or the message
/// contains an index-requirement phrase. Every other failure is rethrown
/// unchanged. On degradation an [`IndexAlert`](crate::alerts::IndexAlert) is
/// recorded; recording never propagates a failure to the caller.
pub async fn run_guarded<T, P, FB, FbFut, K>(
    spec: GuardSpec<'_>,
    primary: P,
    fallback: FB,
    sort_key: K,
    alerts: &IndexAlertLog,
) -> Result<GuardedRows<T>, QueryError>
where
    P: Future<Output = Result<Vec<T>, QueryError>>,
    FB: FnOnce() -> FbFut,
    FbFut: Future<Output = Result<Vec<T>, QueryError>>,
    K: Fn(&T) -> SortValue,
{
    match primary.await {
        Ok(rows) => Ok(GuardedRows {
            rows,
            index_required: false,
            index_link: String::new(),
        }),
        Err(err) if is_index_miss(&err) => {
            let index_link = extract_index_link(&err.message);
            warn!(
                source = spec.source,
                path = spec.path,
                index_link = %index_link,
                "Primary query requires a missing index, serving fallback with in-memory sort"
            );

            let mut rows = fallback().await?;
            if spec.sort_field.is_some() {
                sort_rows(&mut rows, &sort_key, spec.sort_dir);
            }

            alerts
                .record(AlertEvent {
                    source: spec.source.to_string(),
                    message: err.message.clone(),
                    index_link: index_link.clone(),
                    path: spec.path.to_string(),
                    details: json!({
                        "sort_field": spec.sort_field,
                        "sort_dir": spec.sort_dir.as_str(),
                    }),
                })
                .await;

            Ok(GuardedRows {
                rows,
                index_required: true,
                index_link,
            })
        }
        Err(err) => Err(err),
    }
}

fn is_index_miss(err: &QueryError) -> bool {
    matches!(err.kind, QueryErrorKind::FailedPrecondition)
        || err.message.contains("requires an index")
        || err.message.contains("no such index")
}

/// First URL embedded in an error message, empty string when none
pub fn extract_index_link(message: &str) -> String {
    for scheme in ["https://", "http://"] {
        if let Some(start) = message.find(scheme) {
            let rest = &message[start..];
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '"' || c == ')')
                .unwrap_or(rest.len());
            return rest[..end].trim_end_matches(['.', ',']).to_string();
        }
    }
    String::new()
}

fn sort_rows<T, K>(rows: &mut [T], key: &K, dir: SortDir)
where
    K: Fn(&T) -> SortValue,
{
    rows.sort_by(|a, b| {
        let ord = key(a).compare(&key(b));
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}

// ============================================================================
// Tests
// ============================================================================
