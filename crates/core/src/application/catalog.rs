// Report Catalog - fetch-once cache of available report definitions

use crate::domain::ReportDefinition;
use crate::error::{Result, TrackerError};
use crate::port::{ReportBackend, TimeProvider};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Report types change rarely; a cached catalog is acceptable for this long
pub const CATALOG_STALENESS_MS: i64 = 10 * 60 * 1000;

struct CachedCatalog {
    fetched_at: i64,
    definitions: Vec<ReportDefinition>,
}

/// Cached view of the static report catalog.
///
/// Fetched once per session and reused within the staleness window. An empty
/// catalog is a valid result; a failed fetch surfaces as
/// `TrackerError::CatalogUnavailable` and must be treated by callers as
/// "show empty state", never as "no parameters required".
pub struct ReportCatalog {
    backend: Arc<dyn ReportBackend>,
    time_provider: Arc<dyn TimeProvider>,
    cache: Mutex<Option<CachedCatalog>>,
}

impl ReportCatalog {
    pub fn new(backend: Arc<dyn ReportBackend>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            backend,
            time_provider,
            cache: Mutex::new(None),
        }
    }

    /// List available report definitions, serving the cache when fresh
    pub async fn list(&self) -> Result<Vec<ReportDefinition>> {
        let mut cache = self.cache.lock().await;
        let now = self.time_provider.now_millis();

        if let Some(cached) = cache.as_ref() {
            if now - cached.fetched_at < CATALOG_STALENESS_MS {
                debug!(
                    age_ms = now - cached.fetched_at,
                    "Serving report catalog from cache"
                );
                return Ok(cached.definitions.clone());
            }
        }

        let definitions = self
            .backend
            .list_reports()
            .await
            .map_err(|e| TrackerError::CatalogUnavailable(e.to_string()))?;

        info!(count = definitions.len(), "Report catalog loaded");
        *cache = Some(CachedCatalog {
            fetched_at: now,
            definitions: definitions.clone(),
        });
        Ok(definitions)
    }
}
