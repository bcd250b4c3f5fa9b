// Router API contract consumed by the refresh pipeline, plus the SRM binding.

pub mod fields;
mod srm;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::traffic::Period;

pub use fields::Fields;
pub use srm::{SrmClient, SrmClientConfig};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("router API error code {code}")]
    Api { code: i64 },

    #[error("unexpected response envelope: {0}")]
    Envelope(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Authenticated access to the appliance. Each call returns raw JSON; shape
/// checks happen in the builders so that missing fields surface as refresh failures.
#[async_trait]
pub trait RouterClient: Send + Sync {
    /// Static hardware/firmware descriptors (a single object).
    async fn fetch_system_info(&self) -> Result<Value, ClientError>;

    /// Utilization object with nested cpu/disk/memory/network sections.
    async fn fetch_system_utilization(&self) -> Result<Value, ClientError>;

    /// One raw record per known device.
    async fn fetch_device_list(&self) -> Result<Vec<Value>, ClientError>;

    /// One raw record per device with traffic in `period`.
    async fn fetch_traffic(&self, period: Period) -> Result<Vec<Value>, ClientError>;
}
