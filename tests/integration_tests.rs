// Integration tests: HTTP endpoints

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::FakeRouter;
use srm_exporter::cache::CacheController;
use srm_exporter::metrics::PrometheusSink;
use srm_exporter::refresh::RefreshConfig;
use srm_exporter::routes;

fn test_server(router: Arc<FakeRouter>, ttl_secs: u64) -> TestServer {
    let sink = Arc::new(PrometheusSink::new());
    let cache = Arc::new(CacheController::new(
        router,
        sink.clone(),
        RefreshConfig::default(),
        Duration::from_secs(ttl_secs),
    ));
    TestServer::new(routes::app(cache, sink))
}

#[tokio::test]
async fn test_root_endpoint_links_metrics() {
    let server = test_server(Arc::new(FakeRouter::new()), 60);
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("href='/metrics'"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let router = Arc::new(FakeRouter::new());
    let server = test_server(router.clone(), 60);

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    assert!(response.text().contains("srm_total_download_bytes{period=\"live\"} 2660"));

    server.get("/metrics").await.assert_status_ok();
    assert_eq!(router.count("system_info"), 1);
}

#[tokio::test]
async fn test_metrics_first_failure_is_server_error() {
    let router = Arc::new(FakeRouter::new());
    router.fail_on("traffic:day");
    let server = test_server(router.clone(), 60);

    let response = server.get("/metrics").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("period=day"));

    router.heal();
    server.get("/metrics").await.assert_status_ok();
}

#[tokio::test]
async fn test_metrics_keeps_serving_after_later_failure() {
    let router = Arc::new(FakeRouter::new());
    let server = test_server(router.clone(), 0);

    let first = server.get("/metrics").await.text();
    router.fail_on("device_list");
    let response = server.get("/metrics").await;
    response.assert_status_ok();
    assert_eq!(response.text(), first);
}

#[tokio::test]
async fn test_snapshot_endpoint() {
    let server = test_server(Arc::new(FakeRouter::new()), 60);
    let response = server.get("/api/snapshot").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["systemInfo"]["model"], "RT2600ac");
    assert_eq!(json["traffic"][0]["period"], "live");
    assert_eq!(json["traffic"][0]["totalDownloadBytes"], 2660);
    assert_eq!(json["traffic"][0]["topDownloaders"][0]["identifier"], "aa:bb:cc:00:00:01");
    assert_eq!(json["devices"][0]["wireless"]["ssid"], "home");
    assert!(json["devices"][1]["wireless"].is_null());
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = test_server(Arc::new(FakeRouter::new()), 60);
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("srm-exporter")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}
