use crate::core::domain::value_object::GuestKind;
use serde::{Deserialize, Serialize};

/// Normalized view of a VM or container, shared by both kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestResource {
    /// Guest id; unique within a cluster.
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GuestKind,
    pub status: String,
    /// Owning node.
    pub node: String,
    pub cpu_usage: f64,
    pub cpu_cores: u64,
    pub mem_used: u64,
    pub mem_max: u64,
    pub mem_percent: f64,
    pub disk_used: u64,
    pub disk_max: u64,
    pub uptime: u64,
    pub uptime_formatted: String,
    pub netin: u64,
    pub netout: u64,
}

impl GuestResource {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}
