// Build identity: user agent sent to the router and the /version payload

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `srm-exporter/<version>`, sent on every SRM API request.
pub fn user_agent() -> String {
    format!("{NAME}/{VERSION}")
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
        }
    }
}
