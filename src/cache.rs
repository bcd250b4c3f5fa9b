// Staleness-gated access to the router: serves the last MetricSet until the TTL
// expires, then refreshes. The staleness check and the snapshot install happen
// under one async mutex, so at most one refresh is ever in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::{RefreshError, SnapshotError};
use crate::metrics::MetricSink;
use crate::models::MetricSet;
use crate::refresh::{RefreshConfig, refresh};
use crate::router_client::RouterClient;

#[derive(Default)]
struct CacheState {
    /// None until the first successful refresh (always stale).
    refreshed_at: Option<Instant>,
    snapshot: Option<Arc<MetricSet>>,
}

impl CacheState {
    /// Compares elapsed time against the TTL; no deadline is ever computed, so
    /// any TTL is safe.
    fn fresh(&self, now: Instant, ttl: Duration) -> Option<Arc<MetricSet>> {
        match (self.refreshed_at, &self.snapshot) {
            (Some(at), Some(snapshot)) if now.saturating_duration_since(at) < ttl => {
                Some(snapshot.clone())
            }
            _ => None,
        }
    }
}

pub struct CacheController {
    client: Arc<dyn RouterClient>,
    sink: Arc<dyn MetricSink>,
    refresh_config: RefreshConfig,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl CacheController {
    /// `ttl` of zero refreshes on every call.
    pub fn new(
        client: Arc<dyn RouterClient>,
        sink: Arc<dyn MetricSink>,
        refresh_config: RefreshConfig,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            sink,
            refresh_config,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Current snapshot, refreshing first if the cache is stale.
    ///
    /// A failed refresh leaves the timestamp untouched (next call retries) and
    /// serves the previous snapshot; with no previous snapshot the error is returned.
    #[instrument(skip(self), fields(ttl_secs = self.ttl.as_secs()))]
    pub async fn get_snapshot(&self) -> Result<Arc<MetricSet>, SnapshotError> {
        // held across the refresh: concurrent callers queue here and then see the new snapshot
        let mut state = self.state.lock().await;
        if let Some(snapshot) = state.fresh(Instant::now(), self.ttl) {
            debug!("serving cached snapshot");
            return Ok(snapshot);
        }

        match self.refresh_and_publish().await {
            Ok(set) => {
                let set = Arc::new(set);
                state.snapshot = Some(set.clone());
                state.refreshed_at = Some(Instant::now());
                Ok(set)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    operation = "refresh",
                    serving_previous = state.snapshot.is_some(),
                    "SRM refresh failed"
                );
                state
                    .snapshot
                    .clone()
                    .ok_or(SnapshotError::Unavailable(e))
            }
        }
    }

    async fn refresh_and_publish(&self) -> Result<MetricSet, RefreshError> {
        let set = refresh(self.client.as_ref(), &self.refresh_config).await?;
        self.sink
            .publish(&set)
            .map_err(|e| RefreshError::Publish {
                message: e.to_string(),
            })?;
        Ok(set)
    }
}
