// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cache::CacheController;
use crate::metrics::PrometheusSink;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) cache: Arc<CacheController>,
    pub(crate) sink: Arc<PrometheusSink>,
}

/// `sink` must be the same sink the cache publishes into.
pub fn app(cache: Arc<CacheController>, sink: Arc<PrometheusSink>) -> Router {
    let state = AppState { cache, sink };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .route("/api/snapshot", get(http::snapshot_handler)) // GET /api/snapshot
        .route("/version", get(http::version_handler)) // GET /version
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
