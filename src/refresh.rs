// One full refresh: poll the router in a fixed order and build a MetricSet.
// Any failure aborts the cycle; nothing partial is returned.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::error::{Fetch, RefreshError};
use crate::format::human_size;
use crate::identity::resolve_devices;
use crate::models::{MetricSet, PeriodTraffic};
use crate::router_client::{ClientError, RouterClient};
use crate::system::{build_system_info, build_utilization};
use crate::traffic::{Period, TOP_N, aggregate_period};

/// Timing knobs for a refresh.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub periods: Vec<Period>,
    /// Applied to each router call individually.
    pub call_timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            periods: Period::ALL.to_vec(),
            call_timeout: Duration::from_secs(10),
        }
    }
}

async fn guarded<T>(
    fetch: Fetch,
    period: Option<Period>,
    limit: Duration,
    call: impl Future<Output = Result<T, ClientError>>,
) -> Result<T, RefreshError> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(RefreshError::Transport {
            fetch,
            period,
            message: e.to_string(),
        }),
        Err(_) => Err(RefreshError::Timeout {
            fetch,
            period,
            timeout_secs: limit.as_secs(),
        }),
    }
}

#[instrument(skip_all, fields(periods = config.periods.len()))]
pub async fn refresh(
    client: &dyn RouterClient,
    config: &RefreshConfig,
) -> Result<MetricSet, RefreshError> {
    let started = std::time::Instant::now();
    let limit = config.call_timeout;
    debug!(operation = "refresh", "refresh started");

    let raw_info = guarded(Fetch::SystemInfo, None, limit, client.fetch_system_info()).await?;
    let system_info = build_system_info(&raw_info)?;

    // identities must be complete before any traffic record is resolved
    let raw_devices = guarded(Fetch::DeviceList, None, limit, client.fetch_device_list()).await?;
    let devices = resolve_devices(&raw_devices)?;

    let raw_util = guarded(
        Fetch::SystemUtilization,
        None,
        limit,
        client.fetch_system_utilization(),
    )
    .await?;
    let utilization = build_utilization(&raw_util)?;

    let mut traffic = Vec::with_capacity(config.periods.len());
    for &period in &config.periods {
        let raw = guarded(
            Fetch::Traffic,
            Some(period),
            limit,
            client.fetch_traffic(period),
        )
        .await?;
        let aggregated = aggregate_period(period, &raw, &devices.identities)?;
        log_period(&aggregated);
        traffic.push(aggregated);
    }

    let collected_at = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    debug!(
        operation = "refresh",
        devices = devices.connections.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "refresh complete"
    );

    Ok(MetricSet {
        collected_at,
        system_info,
        utilization,
        devices: devices.connections,
        traffic,
    })
}

fn log_period(t: &PeriodTraffic) {
    if t.period == Period::Live {
        info!(
            "Total download={} Total upload={}",
            human_size(t.total_download_bytes),
            human_size(t.total_upload_bytes)
        );
    }
    for (rank, entry) in t.top_downloaders.top(TOP_N).iter().enumerate() {
        debug!(period = %t.period, rank = rank + 1, mac = %entry.identifier, "top downloader {}", human_size(entry.bytes));
    }
    for (rank, entry) in t.top_uploaders.top(TOP_N).iter().enumerate() {
        debug!(period = %t.period, rank = rank + 1, mac = %entry.identifier, "top uploader {}", human_size(entry.bytes));
    }
}
