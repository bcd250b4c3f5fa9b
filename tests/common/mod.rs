// Shared test helpers: canned SRM payloads and a scriptable RouterClient
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use srm_exporter::router_client::{ClientError, RouterClient};
use srm_exporter::traffic::Period;

pub fn system_info_json() -> Value {
    json!({
        "cpu_clock_speed": 1400,
        "cpu_cores": "2",
        "cpu_family": "ARMv7",
        "cpu_series": "IPQ8065",
        "cpu_vendor": "Qualcomm",
        "enabled_ntp": true,
        "firmware_date": "2023/05/10",
        "firmware_ver": "SRM 1.3.1-9346 Update 8",
        "model": "RT2600ac",
        "ntp_server": "time.google.com",
        "ram_size": 512,
        "serial": "1790PDN123456",
        "up_time": "12:03:44"
    })
}

pub fn utilization_json() -> Value {
    json!({
        "cpu": { "system_load": 5, "user_load": 7, "other_load": 1 },
        "disk": { "total": { "utilization": 3 }, "disk": [] },
        "memory": {
            "memory_size": 524288,
            "avail_real": 120000,
            "avail_swap": 0,
            "buffer": 10000,
            "cached": 90000,
            "real_usage": 40,
            "swap_usage": 0,
            "total_real": 500000,
            "total_swap": 0
        },
        "network": [
            { "device": "eth0", "rx": 10, "tx": 20 },
            { "device": "total", "rx": 111, "tx": 222 },
            { "device": "eth1", "rx": 1, "tx": 2 }
        ]
    })
}

pub fn laptop() -> Value {
    json!({
        "mac": "AA:BB:CC:00:00:01",
        "hostname": "laptop",
        "ip_addr": "192.168.1.10",
        "ip6_addr": "fe80::1",
        "is_online": true,
        "is_wireless": true,
        "band": "5G",
        "connection": "wifi",
        "current_rate": 866,
        "rate_quality": "high",
        "signalstrength": 70,
        "transferRXRate": 1200,
        "transferTXRate": 300,
        "wifi_ssid": "home"
    })
}

pub fn nas() -> Value {
    json!({
        "mac": "AA:BB:CC:00:00:02",
        "hostname": "",
        "ip_addr": "192.168.1.11",
        "ip6_addr": "",
        "is_online": false,
        "is_wireless": false,
        "connection": "ethernet"
    })
}

pub fn devices_json() -> Vec<Value> {
    vec![laptop(), nas()]
}

pub fn traffic_record(device_id: &str, download: u64, upload: u64) -> Value {
    json!({
        "deviceID": device_id,
        "download": download,
        "upload": upload,
        "download_packets": download / 100,
        "upload_packets": upload / 100
    })
}

/// laptop and nas from the device list plus one device the list does not know.
pub fn traffic_json() -> Vec<Value> {
    vec![
        traffic_record("AA-BB-CC-00-00-01", 1536, 512),
        traffic_record("aa-bb-cc-00-00-02", 1024, 2048),
        traffic_record("AA-BB-CC-00-00-99", 100, 0),
    ]
}

struct FakeData {
    system_info: Value,
    utilization: Value,
    devices: Vec<Value>,
    traffic: HashMap<Period, Vec<Value>>,
}

/// In-memory router. Records every call by label ("system_info", "device_list",
/// "system_utilization", "traffic:<period>") and can fail any label on demand.
pub struct FakeRouter {
    data: Mutex<FakeData>,
    calls: Mutex<Vec<String>>,
    fail_on: Mutex<Option<String>>,
    delay: Duration,
}

impl Default for FakeRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRouter {
    pub fn new() -> Self {
        let traffic = Period::ALL.iter().map(|p| (*p, traffic_json())).collect();
        Self {
            data: Mutex::new(FakeData {
                system_info: system_info_json(),
                utilization: utilization_json(),
                devices: devices_json(),
                traffic,
            }),
            calls: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
            delay: Duration::ZERO,
        }
    }

    /// Each call sleeps this long first (use with paused tokio time).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_on(&self, label: &str) {
        *self.fail_on.lock().unwrap() = Some(label.to_string());
    }

    pub fn heal(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    pub fn set_devices(&self, devices: Vec<Value>) {
        self.data.lock().unwrap().devices = devices;
    }

    pub fn set_traffic(&self, period: Period, records: Vec<Value>) {
        self.data.lock().unwrap().traffic.insert(period, records);
    }

    pub fn set_utilization(&self, utilization: Value) {
        self.data.lock().unwrap().utilization = utilization;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, label: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == label).count()
    }

    async fn enter(&self, label: String) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(label.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_on.lock().unwrap().as_deref() == Some(label.as_str()) {
            return Err(ClientError::Api { code: 400 });
        }
        Ok(())
    }
}

#[async_trait]
impl RouterClient for FakeRouter {
    async fn fetch_system_info(&self) -> Result<Value, ClientError> {
        self.enter("system_info".into()).await?;
        Ok(self.data.lock().unwrap().system_info.clone())
    }

    async fn fetch_system_utilization(&self) -> Result<Value, ClientError> {
        self.enter("system_utilization".into()).await?;
        Ok(self.data.lock().unwrap().utilization.clone())
    }

    async fn fetch_device_list(&self) -> Result<Vec<Value>, ClientError> {
        self.enter("device_list".into()).await?;
        Ok(self.data.lock().unwrap().devices.clone())
    }

    async fn fetch_traffic(&self, period: Period) -> Result<Vec<Value>, ClientError> {
        self.enter(format!("traffic:{period}")).await?;
        Ok(self
            .data
            .lock()
            .unwrap()
            .traffic
            .get(&period)
            .cloned()
            .unwrap_or_default())
    }
}
