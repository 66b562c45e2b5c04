//! Domain model for node list items from the `/nodes` endpoint.
//!
//! The list is the root of every fan-out: each entry names a node whose
//! status and guest inventories are then fetched individually.

use crate::core::domain::value_object::serde_helpers;
use serde::{Deserialize, Serialize};

fn default_status() -> String {
    "unknown".to_string()
}

/// A node in the Proxmox cluster.
///
/// This struct represents a node as returned by the `/api2/json/nodes` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeListItem {
    /// The node name (e.g., "pve1").
    pub node: String,
    /// Current node status (e.g., "online", "offline", "unknown").
    #[serde(default = "default_status")]
    pub status: String,
    /// Maximum CPU count (number of cores/threads), used when the node
    /// status carries no `cpuinfo`.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub maxcpu: Option<u64>,
}
