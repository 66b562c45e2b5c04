//! Raw guest records from `/nodes/{node}/qemu` and `/nodes/{node}/lxc`.
//!
//! The same two shapes are returned by the per-guest `status/current`
//! endpoints. VM and container payloads overlap but are not identical (a
//! container may carry `hostname` instead of `name`), so each keeps its own
//! struct and the pair is wrapped in [`RawGuest`].

use crate::core::domain::value_object::{GuestKind, serde_helpers};
use serde::{Deserialize, Serialize};

/// A QEMU virtual machine as listed by a node.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VmListItem {
    /// The VM identifier (unique per cluster).
    #[serde(default, deserialize_with = "serde_helpers::vmid::deserialize")]
    pub vmid: u32,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current status (e.g., "running", "stopped").
    #[serde(default)]
    pub status: String,
    /// CPU usage fraction (0.0 to 1.0).
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub cpu: Option<f64>,
    /// Configured vCPU count.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub cpus: Option<u64>,
    /// Maximum CPU count.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub maxcpu: Option<u64>,
    /// Memory usage in bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub mem: Option<u64>,
    /// Maximum memory in bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub maxmem: Option<u64>,
    /// Disk usage in bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub disk: Option<u64>,
    /// Maximum disk space in bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub maxdisk: Option<u64>,
    /// Bytes received since start.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub netin: Option<u64>,
    /// Bytes sent since start.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub netout: Option<u64>,
    /// Uptime in seconds (if running).
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub uptime: Option<u64>,
}

/// An LXC container as listed by a node.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LxcListItem {
    /// The container identifier (string on older PVE releases).
    #[serde(default, deserialize_with = "serde_helpers::vmid::deserialize")]
    pub vmid: u32,
    /// Container name.
    #[serde(default)]
    pub name: Option<String>,
    /// Container hostname, used when `name` is absent.
    #[serde(default)]
    pub hostname: Option<String>,
    /// Current status (e.g., "running", "stopped").
    #[serde(default)]
    pub status: String,
    /// CPU usage fraction (0.0 to 1.0).
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub cpu: Option<f64>,
    /// Configured core count.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub cpus: Option<u64>,
    /// Maximum CPU count.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub maxcpu: Option<u64>,
    /// Memory usage in bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub mem: Option<u64>,
    /// Maximum memory in bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub maxmem: Option<u64>,
    /// Root disk usage in bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub disk: Option<u64>,
    /// Root disk size in bytes.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub maxdisk: Option<u64>,
    /// Bytes received since start.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub netin: Option<u64>,
    /// Bytes sent since start.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub netout: Option<u64>,
    /// Uptime in seconds (if running).
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub uptime: Option<u64>,
}

/// A raw guest record of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGuest {
    Vm(VmListItem),
    Container(LxcListItem),
}

impl RawGuest {
    #[must_use]
    pub fn kind(&self) -> GuestKind {
        match self {
            RawGuest::Vm(_) => GuestKind::Vm,
            RawGuest::Container(_) => GuestKind::Container,
        }
    }

    /// Decodes a JSON record of the given kind.
    ///
    /// # Errors
    /// Returns the serde error when the record is not an object of the expected shape.
    pub fn from_value(kind: GuestKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            GuestKind::Vm => RawGuest::Vm(serde_json::from_value(value)?),
            GuestKind::Container => RawGuest::Container(serde_json::from_value(value)?),
        })
    }
}
