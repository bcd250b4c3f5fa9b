// Flattens the single-shot system info and utilization responses.

use serde_json::Value;

use crate::error::RefreshError;
use crate::models::{MemoryUtilization, SystemInfo, SystemUtilization};
use crate::router_client::Fields;

pub fn build_system_info(raw: &Value) -> Result<SystemInfo, RefreshError> {
    let f = Fields::new("system_info", raw)?;
    Ok(SystemInfo {
        cpu_clock_speed: f.display("cpu_clock_speed")?,
        cpu_cores: f.display("cpu_cores")?,
        cpu_family: f.display("cpu_family")?,
        cpu_series: f.display("cpu_series")?,
        cpu_vendor: f.display("cpu_vendor")?,
        enabled_ntp: f.display("enabled_ntp")?,
        firmware_date: f.display("firmware_date")?,
        firmware_ver: f.display("firmware_ver")?,
        model: f.display("model")?,
        ntp_server: f.display("ntp_server")?,
        ram_size: f.display("ram_size")?,
        serial: f.display("serial")?,
        up_time: f.display("up_time")?,
    })
}

/// Every section is required; a missing child field aborts instead of reading as zero.
pub fn build_utilization(raw: &Value) -> Result<SystemUtilization, RefreshError> {
    let root = Fields::new("system_utilization", raw)?;

    let cpu = root.object("cpu", "utilization.cpu")?;
    let cpu_load = cpu.f64("system_load")? + cpu.f64("user_load")?;

    let disk_total = root
        .object("disk", "utilization.disk")?
        .object("total", "utilization.disk.total")?;
    let disk_total_utilization = disk_total.f64("utilization")?;

    let mem = root.object("memory", "utilization.memory")?;
    let memory = MemoryUtilization {
        memory_size: mem.f64("memory_size")?,
        avail_real: mem.f64("avail_real")?,
        avail_swap: mem.f64("avail_swap")?,
        buffer: mem.f64("buffer")?,
        cached: mem.f64("cached")?,
        real_usage: mem.f64("real_usage")?,
        swap_usage: mem.f64("swap_usage")?,
        total_real: mem.f64("total_real")?,
        total_swap: mem.f64("total_swap")?,
    };

    let (network_rx_total, network_tx_total) = network_total(&root)?;

    Ok(SystemUtilization {
        cpu_load,
        disk_total_utilization,
        memory,
        network_rx_total,
        network_tx_total,
    })
}

/// RX/TX of the router's synthetic "total" entry; per-interface entries are not summed.
fn network_total(root: &Fields<'_>) -> Result<(f64, f64), RefreshError> {
    for entry in root.array("network")? {
        let nic = Fields::new("utilization.network", entry)?;
        if nic.str("device")? == "total" {
            return Ok((nic.f64("rx")?, nic.f64("tx")?));
        }
    }
    Err(RefreshError::missing("utilization.network", "device=total"))
}
