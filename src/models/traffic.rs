// Per-period traffic models

use serde::Serialize;

use crate::traffic::{Period, Ranking};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficRecord {
    pub period: Period,
    /// Lowercase, colon-delimited identifier.
    pub mac: String,
    pub hostname: String,
    /// None when the device was not in this cycle's device list.
    pub ip_addr: Option<String>,
    pub download_bytes: u64,
    pub upload_bytes: u64,
    pub download_packets: u64,
    pub upload_packets: u64,
}

/// Aggregated traffic for one period. Totals always equal the sum over `records`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTraffic {
    pub period: Period,
    pub records: Vec<TrafficRecord>,
    pub total_download_bytes: u64,
    pub total_upload_bytes: u64,
    pub top_downloaders: Ranking,
    pub top_uploaders: Ranking,
}
