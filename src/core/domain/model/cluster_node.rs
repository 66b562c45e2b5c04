use serde::{Deserialize, Serialize};

/// Normalized snapshot of one hypervisor node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterNode {
    pub name: String,
    /// Lifecycle status from the node list (`online`, `unknown`, ...).
    pub status: String,
    /// CPU utilization percent, one decimal.
    pub cpu_usage: f64,
    pub cpu_cores: u64,
    pub mem_used: u64,
    pub mem_total: u64,
    pub mem_percent: f64,
    /// Root filesystem usage.
    pub disk_used: u64,
    pub disk_total: u64,
    pub disk_percent: f64,
    pub uptime: u64,
    pub uptime_formatted: String,
}
