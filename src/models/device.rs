// Device identity and connection models

use serde::Serialize;

/// Resolved identity of a device for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIdentity {
    /// Hostname, or the identifier itself when the router reports none.
    pub name: String,
    pub ipv4: String,
    pub ipv6: String,
}

/// Attributes only wireless clients carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WirelessLink {
    pub band: Option<String>,
    pub rate_quality: Option<String>,
    pub signal_strength: f64,
    pub ssid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConnection {
    /// Identifier as reported by the router (original casing).
    pub mac: String,
    pub hostname: String,
    pub ip_addr: String,
    pub ip6_addr: String,
    pub connection: Option<String>,
    pub current_rate: f64,
    pub is_online: bool,
    pub transfer_rx_rate: f64,
    pub transfer_tx_rate: f64,
    /// Present only when the router flags the device as wireless.
    pub wireless: Option<WirelessLink>,
}

impl DeviceConnection {
    pub fn is_wireless(&self) -> bool {
        self.wireless.is_some()
    }

    pub fn signal_strength(&self) -> f64 {
        self.wireless.as_ref().map_or(0.0, |w| w.signal_strength)
    }
}
