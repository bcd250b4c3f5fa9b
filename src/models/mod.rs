// Normalized records produced by one refresh cycle

mod device;
mod system;
mod traffic;

use serde::Serialize;

pub use device::{DeviceConnection, DeviceIdentity, WirelessLink};
pub use system::{MemoryUtilization, SystemInfo, SystemUtilization};
pub use traffic::{PeriodTraffic, TrafficRecord};

/// Everything one refresh produced. Built whole, never patched afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSet {
    /// Unix seconds at which the refresh completed.
    pub collected_at: u64,
    pub system_info: SystemInfo,
    pub utilization: SystemUtilization,
    pub devices: Vec<DeviceConnection>,
    pub traffic: Vec<PeriodTraffic>,
}

impl MetricSet {
    pub fn period(&self, period: crate::traffic::Period) -> Option<&PeriodTraffic> {
        self.traffic.iter().find(|t| t.period == period)
    }
}
