// Device identity resolution: joins device-list and traffic records on a
// canonical lowercase, colon-delimited identifier.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::RefreshError;
use crate::models::{DeviceConnection, DeviceIdentity, WirelessLink};
use crate::router_client::Fields;

const RECORD: &str = "device";

/// Lowercases and translates `-` delimiters to `:` (traffic records use `AA-BB-..`).
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase().replace('-', ":")
}

/// Identifier -> identity for a single refresh cycle. Never merged across cycles.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    by_id: HashMap<String, DeviceIdentity>,
}

impl IdentityMap {
    pub fn get(&self, identifier: &str) -> Option<&DeviceIdentity> {
        self.by_id.get(identifier)
    }

    /// Display name, falling back to the identifier itself.
    pub fn name_or_identifier(&self, identifier: &str) -> String {
        self.get(identifier)
            .map_or_else(|| identifier.to_string(), |d| d.name.clone())
    }

    pub fn address(&self, identifier: &str) -> Option<&str> {
        self.get(identifier).map(|d| d.ipv4.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn insert(&mut self, identifier: String, identity: DeviceIdentity) {
        // duplicates: last seen wins
        self.by_id.insert(identifier, identity);
    }
}

/// Output of resolving one device-list fetch.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDevices {
    pub identities: IdentityMap,
    pub connections: Vec<DeviceConnection>,
}

/// Builds the identity map and one connection record per device.
pub fn resolve_devices(raw: &[Value]) -> Result<ResolvedDevices, RefreshError> {
    let mut resolved = ResolvedDevices {
        identities: IdentityMap::default(),
        connections: Vec::with_capacity(raw.len()),
    };
    for value in raw {
        let connection = parse_connection(&Fields::new(RECORD, value)?)?;
        let identifier = normalize_identifier(&connection.mac);
        let name = if connection.hostname.is_empty() {
            identifier.clone()
        } else {
            connection.hostname.clone()
        };
        resolved.identities.insert(
            identifier,
            DeviceIdentity {
                name,
                ipv4: connection.ip_addr.clone(),
                ipv6: connection.ip6_addr.clone(),
            },
        );
        resolved.connections.push(connection);
    }
    Ok(resolved)
}

fn parse_connection(f: &Fields<'_>) -> Result<DeviceConnection, RefreshError> {
    let wireless = if f.bool("is_wireless")? {
        Some(WirelessLink {
            band: f.opt_str("band")?.map(str::to_owned),
            rate_quality: f.opt_str("rate_quality")?.map(str::to_owned),
            signal_strength: f.f64_or_zero("signalstrength")?,
            ssid: f.opt_str("wifi_ssid")?.map(str::to_owned),
        })
    } else {
        None
    };
    Ok(DeviceConnection {
        mac: f.str("mac")?.to_owned(),
        hostname: f.str("hostname")?.to_owned(),
        ip_addr: f.str("ip_addr")?.to_owned(),
        ip6_addr: f.str("ip6_addr")?.to_owned(),
        connection: f.opt_str("connection")?.map(str::to_owned),
        current_rate: f.f64_or_zero("current_rate")?,
        is_online: f.bool("is_online")?,
        transfer_rx_rate: f.f64_or_zero("transferRXRate")?,
        transfer_tx_rate: f.f64_or_zero("transferTXRate")?,
        wireless,
    })
}
