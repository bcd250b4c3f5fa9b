// Refresh failure taxonomy: transport/auth, missing field, malformed field.

use std::fmt;

use thiserror::Error;

use crate::traffic::Period;

/// Which router call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    SystemInfo,
    DeviceList,
    SystemUtilization,
    Traffic,
}

impl Fetch {
    pub fn as_str(self) -> &'static str {
        match self {
            Fetch::SystemInfo => "system_info",
            Fetch::DeviceList => "device_list",
            Fetch::SystemUtilization => "system_utilization",
            Fetch::Traffic => "traffic",
        }
    }
}

impl fmt::Display for Fetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders " (period=week)" when a period is attached, nothing otherwise.
pub struct PeriodSuffix(pub Option<Period>);

impl fmt::Display for PeriodSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, " (period={p})"),
            None => Ok(()),
        }
    }
}

/// Any of these aborts the whole refresh cycle.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("{fetch} fetch failed{}: {message}", PeriodSuffix(*.period))]
    Transport {
        fetch: Fetch,
        period: Option<Period>,
        message: String,
    },

    #[error("{fetch} fetch timed out after {timeout_secs}s{}", PeriodSuffix(*.period))]
    Timeout {
        fetch: Fetch,
        period: Option<Period>,
        timeout_secs: u64,
    },

    #[error("{record} record is missing field `{field}`")]
    MissingField { record: &'static str, field: String },

    #[error("{record} field `{field}` is not {expected}")]
    Malformed {
        record: &'static str,
        field: String,
        expected: &'static str,
    },

    #[error("metric sink rejected the snapshot: {message}")]
    Publish { message: String },
}

impl RefreshError {
    pub fn missing(record: &'static str, field: impl Into<String>) -> Self {
        Self::MissingField {
            record,
            field: field.into(),
        }
    }

    pub fn malformed(record: &'static str, field: impl Into<String>, expected: &'static str) -> Self {
        Self::Malformed {
            record,
            field: field.into(),
            expected,
        }
    }
}

/// Returned by the cache when there is nothing valid to serve.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no metrics available yet: {0}")]
    Unavailable(#[source] RefreshError),
}
