// GET handlers: index, metrics, api/snapshot, version

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use super::AppState;
use crate::version::VersionInfo;

pub(super) const INDEX_HTML: &str = "<h1>Welcome to SRM-Exporter.</h1>Click <a href='/metrics'>here</a> to see metrics.";

/// GET /: static landing page.
pub(super) async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn server_error(message: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

/// GET /metrics: Prometheus text exposition of the current snapshot.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> Response {
    if let Err(e) = state.cache.get_snapshot().await {
        return server_error(e.to_string());
    }
    match state.sink.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "encode_metrics", "metrics encoding failed");
            server_error(e.to_string())
        }
    }
}

/// GET /api/snapshot: current MetricSet as JSON (same cache gate as /metrics).
pub(super) async fn snapshot_handler(State(state): State<AppState>) -> Response {
    match state.cache.get_snapshot().await {
        Ok(set) => axum::Json(set.as_ref().clone()).into_response(),
        Err(e) => server_error(e.to_string()),
    }
}

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(VersionInfo::current())
}
