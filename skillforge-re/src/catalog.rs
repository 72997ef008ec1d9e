//! In-memory course catalog cache
//!
//! The catalog is read-mostly: loaded once per process and shared by every
//! recommendation request. The cache is an explicit component with a visible
//! reload/invalidate contract rather than ambient global state.
//!
//! A failed load caches an empty catalog instead of retrying on every
//! request; operators refresh it through the reload endpoint.

use crate::db;
use crate::db::guard::QueryError;
use crate::models::CourseRecord;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub struct CourseCatalog {
    state: RwLock<Option<Arc<Vec<CourseRecord>>>>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// Cached catalog, loading it on first use
    pub async fn get_or_load(&self, db: &SqlitePool) -> Arc<Vec<CourseRecord>> {
        if let Some(catalog) = self.state.read().await.as_ref() {
            return Arc::clone(catalog);
        }

        let mut state = self.state.write().await;
        // Another task may have populated while we waited for the write lock
        if let Some(catalog) = state.as_ref() {
            return Arc::clone(catalog);
        }

        let courses = match db::courses::list_all(db).await {
            Ok(courses) => {
                debug!(count = courses.len(), "Course catalog loaded");
                courses
            }
            Err(err) => {
                warn!(
                    error = %err,
                    "Course catalog load failed, caching empty catalog until reload"
                );
                Vec::new()
            }
        };

        let catalog = Arc::new(courses);
        *state = Some(Arc::clone(&catalog));
        catalog
    }

    /// Replace the cached catalog from the store; the old cache survives a
    /// failed reload.
    pub async fn reload(&self, db: &SqlitePool) -> Result<usize, QueryError> {
        let courses = db::courses::list_all(db).await?;
        let count = courses.len();
        *self.state.write().await = Some(Arc::new(courses));
        debug!(count, "Course catalog reloaded");
        Ok(count)
    }

    /// Drop the cache; the next access reloads from the store
    pub async fn invalidate(&self) {
        *self.state.write().await = None;
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.is_some()
    }
}

impl Default for CourseCatalog {
    fn default() -> Self {
        Self::new()
    }
}
