// Per-period traffic aggregation: identity join, fleet totals, top-talker rankings.

pub mod ranking;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::RefreshError;
use crate::format::human_size;
use crate::identity::{IdentityMap, normalize_identifier};
use crate::models::{PeriodTraffic, TrafficRecord};
use crate::router_client::Fields;

pub use ranking::{Ranking, RankingEntry, TOP_N};

const RECORD: &str = "traffic";
const TOTAL_OVERFLOW: &str = "a byte count whose period total fits in u64";

/// Traffic aggregation window, as understood by the router API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Live,
    Day,
    Week,
    Month,
}

impl Period {
    /// Fetch order within one refresh.
    pub const ALL: [Period; 4] = [Period::Live, Period::Day, Period::Week, Period::Month];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Live => "live",
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(Period::Live),
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(format!("unknown period {other:?}")),
        }
    }
}

/// Aggregates one period's raw traffic records. Fails on the first bad record so a
/// period is never half-built.
pub fn aggregate_period(
    period: Period,
    raw: &[Value],
    identities: &IdentityMap,
) -> Result<PeriodTraffic, RefreshError> {
    let mut records = Vec::with_capacity(raw.len());
    let mut downloads = Vec::with_capacity(raw.len());
    let mut uploads = Vec::with_capacity(raw.len());
    let mut total_download_bytes = 0u64;
    let mut total_upload_bytes = 0u64;

    for value in raw {
        let f = Fields::new(RECORD, value)?;
        let mac = normalize_identifier(f.str("deviceID")?);
        let download_bytes = f.u64("download")?;
        let upload_bytes = f.u64("upload")?;
        let download_packets = f.u64("download_packets")?;
        let upload_packets = f.u64("upload_packets")?;

        total_download_bytes = total_download_bytes
            .checked_add(download_bytes)
            .ok_or_else(|| RefreshError::malformed(RECORD, "download", TOTAL_OVERFLOW))?;
        total_upload_bytes = total_upload_bytes
            .checked_add(upload_bytes)
            .ok_or_else(|| RefreshError::malformed(RECORD, "upload", TOTAL_OVERFLOW))?;
        downloads.push(RankingEntry::new(download_bytes, mac.clone()));
        uploads.push(RankingEntry::new(upload_bytes, mac.clone()));

        let record = TrafficRecord {
            period,
            hostname: identities.name_or_identifier(&mac),
            ip_addr: identities.address(&mac).map(str::to_owned),
            mac,
            download_bytes,
            upload_bytes,
            download_packets,
            upload_packets,
        };
        debug!(
            period = %period,
            "{} ({}) Download={} Upload={}",
            record.hostname,
            record.mac,
            human_size(record.download_bytes),
            human_size(record.upload_bytes)
        );
        records.push(record);
    }

    Ok(PeriodTraffic {
        period,
        records,
        total_download_bytes,
        total_upload_bytes,
        top_downloaders: downloads.into_iter().collect(),
        top_uploaders: uploads.into_iter().collect(),
    })
}
