//! Domain model for node status from the `/nodes/{node}/status` endpoint.

use crate::core::domain::value_object::serde_helpers;
use serde::{Deserialize, Serialize};

/// Detailed status information for a Proxmox node.
///
/// Every field is optional: a node that is half up still reports something,
/// and the normalizer fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NodeStatus {
    /// CPU usage fraction (0.0 to 1.0).
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub cpu: Option<f64>,
    /// CPU topology.
    #[serde(default)]
    pub cpuinfo: Option<CpuInfo>,
    /// Memory usage in bytes.
    #[serde(default)]
    pub memory: Option<UsageInfo>,
    /// Root filesystem usage in bytes.
    #[serde(default)]
    pub rootfs: Option<UsageInfo>,
    /// System uptime in seconds.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub uptime: Option<u64>,
}

/// CPU information block of a node status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CpuInfo {
    /// Logical CPU count.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub cpus: Option<u64>,
}

/// Used/total pair for memory or a filesystem.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UsageInfo {
    /// Total capacity in bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub total: Option<u64>,
    /// Used bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub used: Option<u64>,
}
