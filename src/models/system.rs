// Router hardware descriptors and utilization models

use serde::Serialize;

/// Static hardware/firmware descriptors; display-only, exposed as labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub cpu_clock_speed: String,
    pub cpu_cores: String,
    pub cpu_family: String,
    pub cpu_series: String,
    pub cpu_vendor: String,
    pub enabled_ntp: String,
    pub firmware_date: String,
    pub firmware_ver: String,
    pub model: String,
    pub ntp_server: String,
    pub ram_size: String,
    pub serial: String,
    pub up_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUtilization {
    pub memory_size: f64,
    pub avail_real: f64,
    pub avail_swap: f64,
    pub buffer: f64,
    pub cached: f64,
    pub real_usage: f64,
    pub swap_usage: f64,
    pub total_real: f64,
    pub total_swap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemUtilization {
    /// system_load + user_load
    pub cpu_load: f64,
    pub disk_total_utilization: f64,
    pub memory: MemoryUtilization,
    /// Taken from the router's own "total" network entry.
    pub network_rx_total: f64,
    pub network_tx_total: f64,
}
