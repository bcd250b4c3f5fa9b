// Prometheus exposition of a MetricSet
//
// Each publish builds a fresh registry from one MetricSet and swaps it in whole,
// so a scrape never sees values from two refreshes and series for devices that
// disappeared are dropped.

use std::sync::RwLock;

use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

use crate::models::MetricSet;

/// Receives each successfully refreshed MetricSet.
pub trait MetricSink: Send + Sync {
    fn publish(&self, set: &MetricSet) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct PrometheusSink {
    current: RwLock<Option<Registry>>,
}

impl PrometheusSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text exposition of the last published set (empty before the first publish).
    pub fn encode(&self) -> anyhow::Result<String> {
        let guard = self
            .current
            .read()
            .map_err(|e| anyhow::anyhow!("metrics lock poisoned: {}", e))?;
        let families = guard.as_ref().map(Registry::gather).unwrap_or_default();
        let mut buf = Vec::new();
        TextEncoder::new().encode(&families, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

impl MetricSink for PrometheusSink {
    fn publish(&self, set: &MetricSet) -> anyhow::Result<()> {
        let registry = build_registry(set)?;
        let mut guard = self
            .current
            .write()
            .map_err(|e| anyhow::anyhow!("metrics lock poisoned: {}", e))?;
        *guard = Some(registry);
        Ok(())
    }
}

fn gauge(registry: &Registry, name: &str, help: &str) -> prometheus::Result<Gauge> {
    let g = Gauge::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(g.clone()))?;
    Ok(g)
}

fn gauge_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> prometheus::Result<GaugeVec> {
    let g = GaugeVec::new(Opts::new(name, help), labels)?;
    registry.register(Box::new(g.clone()))?;
    Ok(g)
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

pub fn build_registry(set: &MetricSet) -> prometheus::Result<Registry> {
    let registry = Registry::new();
    publish_system(&registry, set)?;
    publish_devices(&registry, set)?;
    publish_traffic(&registry, set)?;
    gauge(
        &registry,
        "srm_exporter_last_refresh_timestamp_seconds",
        "Unix time of the last successful SRM refresh",
    )?
    .set(set.collected_at as f64);
    Ok(registry)
}

fn publish_system(registry: &Registry, set: &MetricSet) -> prometheus::Result<()> {
    let info = &set.system_info;
    gauge_vec(
        registry,
        "srm_system_info",
        "SRM System Informations",
        &[
            "cpu_clock_speed",
            "cpu_cores",
            "cpu_series",
            "cpu_vendor",
            "enabled_ntp",
            "firmware_date",
            "firmware_ver",
            "model",
            "ntp_server",
            "ram_size",
            "serial",
            "up_time",
        ],
    )?
    .with_label_values(&[
        info.cpu_clock_speed.as_str(),
        info.cpu_cores.as_str(),
        info.cpu_series.as_str(),
        info.cpu_vendor.as_str(),
        info.enabled_ntp.as_str(),
        info.firmware_date.as_str(),
        info.firmware_ver.as_str(),
        info.model.as_str(),
        info.ntp_server.as_str(),
        info.ram_size.as_str(),
        info.serial.as_str(),
        info.up_time.as_str(),
    ])
    .set(1.0);

    let u = &set.utilization;
    let m = &u.memory;
    let scalars: [(&str, &str, f64); 13] = [
        ("srm_system_load", "SRM System current load", u.cpu_load),
        (
            "srm_disk_total_utilization",
            "SRM Disk utilization total",
            u.disk_total_utilization,
        ),
        ("srm_memory_size", "SRM System memory size on KB", m.memory_size),
        ("srm_avail_real", "SRM System real memory available", m.avail_real),
        ("srm_avail_swap", "SRM System swap available", m.avail_swap),
        ("srm_buffer", "SRM System buffer memory", m.buffer),
        ("srm_cached", "SRM System cached memory", m.cached),
        ("srm_real_usage", "SRM System real memory usage", m.real_usage),
        ("srm_swap_usage", "SRM System swap memory usage", m.swap_usage),
        ("srm_total_real", "SRM System total memory real", m.total_real),
        ("srm_total_swap", "SRM System total swap", m.total_swap),
        (
            "srm_network_rx_total",
            "SRM System Network total received",
            u.network_rx_total,
        ),
        (
            "srm_network_tx_total",
            "SRM System Network total sent",
            u.network_tx_total,
        ),
    ];
    for (name, help, value) in scalars {
        gauge(registry, name, help)?.set(value);
    }
    Ok(())
}

fn publish_devices(registry: &Registry, set: &MetricSet) -> prometheus::Result<()> {
    let by_device = ["mac", "hostname"];
    let current_rate = gauge_vec(
        registry,
        "srm_device_current_rate",
        "SRM device connection rate",
        &by_device,
    )?;
    let is_online = gauge_vec(
        registry,
        "srm_device_is_online",
        "SRM device online status",
        &["mac", "hostname", "connection", "ip6_addr", "ip_addr"],
    )?;
    let is_wireless = gauge_vec(
        registry,
        "srm_device_is_wireless",
        "SRM device wireless type",
        &[
            "mac",
            "hostname",
            "band",
            "ip6_addr",
            "ip_addr",
            "rate_quality",
            "wifi_ssid",
        ],
    )?;
    let signal = gauge_vec(
        registry,
        "srm_device_signalstrength",
        "SRM device signal strength",
        &by_device,
    )?;
    let rx_rate = gauge_vec(
        registry,
        "srm_device_transferRXRate",
        "SRM device RX transfer rate",
        &by_device,
    )?;
    let tx_rate = gauge_vec(
        registry,
        "srm_device_transferTXRate",
        "SRM device TX transfer rate",
        &by_device,
    )?;

    for d in &set.devices {
        let id = [d.mac.as_str(), d.hostname.as_str()];
        current_rate.with_label_values(&id).set(d.current_rate);
        is_online
            .with_label_values(&[
                d.mac.as_str(),
                d.hostname.as_str(),
                d.connection.as_deref().unwrap_or(""),
                d.ip6_addr.as_str(),
                d.ip_addr.as_str(),
            ])
            .set(flag(d.is_online));
        let w = d.wireless.as_ref();
        is_wireless
            .with_label_values(&[
                d.mac.as_str(),
                d.hostname.as_str(),
                w.and_then(|w| w.band.as_deref()).unwrap_or(""),
                d.ip6_addr.as_str(),
                d.ip_addr.as_str(),
                w.and_then(|w| w.rate_quality.as_deref()).unwrap_or(""),
                w.and_then(|w| w.ssid.as_deref()).unwrap_or(""),
            ])
            .set(flag(d.is_wireless()));
        signal.with_label_values(&id).set(d.signal_strength());
        rx_rate.with_label_values(&id).set(d.transfer_rx_rate);
        tx_rate.with_label_values(&id).set(d.transfer_tx_rate);
    }
    Ok(())
}

fn publish_traffic(registry: &Registry, set: &MetricSet) -> prometheus::Result<()> {
    let labels = ["period", "mac", "hostname"];
    let download_bytes = gauge_vec(
        registry,
        "srm_device_download_bytes",
        "SRM device downloaded bytes for the period",
        &labels,
    )?;
    let upload_bytes = gauge_vec(
        registry,
        "srm_device_upload_bytes",
        "SRM device uploaded bytes for the period",
        &labels,
    )?;
    let download_packets = gauge_vec(
        registry,
        "srm_device_download_packets",
        "SRM device downloaded packets for the period",
        &labels,
    )?;
    let upload_packets = gauge_vec(
        registry,
        "srm_device_upload_packets",
        "SRM device uploaded packets for the period",
        &labels,
    )?;
    let total_download = gauge_vec(
        registry,
        "srm_total_download_bytes",
        "SRM total download bytes for the period",
        &["period"],
    )?;
    let total_upload = gauge_vec(
        registry,
        "srm_total_upload_bytes",
        "SRM total upload bytes for the period",
        &["period"],
    )?;

    for t in &set.traffic {
        let period = t.period.as_str();
        total_download
            .with_label_values(&[period])
            .set(t.total_download_bytes as f64);
        total_upload
            .with_label_values(&[period])
            .set(t.total_upload_bytes as f64);
        for r in &t.records {
            let l = [period, r.mac.as_str(), r.hostname.as_str()];
            download_bytes
                .with_label_values(&l)
                .set(r.download_bytes as f64);
            upload_bytes.with_label_values(&l).set(r.upload_bytes as f64);
            download_packets
                .with_label_values(&l)
                .set(r.download_packets as f64);
            upload_packets
                .with_label_values(&l)
                .set(r.upload_packets as f64);
        }
    }
    Ok(())
}
