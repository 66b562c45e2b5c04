use crate::core::domain::model::cluster_node::ClusterNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time aggregate over the whole cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub timestamp: DateTime<Utc>,
    pub total_vms: usize,
    pub running: usize,
    /// Always `total_vms - running`.
    pub stopped: usize,
    pub proxmox_host: String,
    pub nodes: Vec<ClusterNode>,
    /// Set when topology discovery failed and the counts are empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness answer of the monitor itself; never touches upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
        }
    }
}
