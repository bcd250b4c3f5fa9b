use anyhow::Result;
use srm_exporter::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    // bounded pool: scrapes beyond worker_threads queue on the runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(app_config.server.worker_threads)
        .enable_all()
        .build()?;
    runtime.block_on(serve(app_config))
}

async fn serve(app_config: config::AppConfig) -> Result<()> {
    let client = Arc::new(router_client::SrmClient::new(
        &app_config.router.client_config(),
    )?);
    let sink = Arc::new(metrics::PrometheusSink::new());
    let cache = Arc::new(cache::CacheController::new(
        client,
        sink.clone(),
        refresh::RefreshConfig {
            call_timeout: app_config.router.request_timeout(),
            ..Default::default()
        },
        app_config.cache.ttl(),
    ));

    let app = routes::app(cache, sink);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        router = %app_config.router.host,
        cache_ttl_secs = app_config.cache.ttl_secs,
        "Starting {} {} on http://{}",
        version::NAME,
        version::VERSION,
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Received shutdown signal");
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Received shutdown signal");
}
