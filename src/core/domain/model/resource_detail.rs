//! On-demand detail view of a single guest.

use crate::core::domain::model::guest_resource::GuestResource;
use serde::{Deserialize, Serialize};

/// Raw guest configuration as returned by `.../{vmid}/config`.
pub type GuestConfig = serde_json::Map<String, serde_json::Value>;

/// A configuration key paired with its raw value (`net0` → `virtio=...,bridge=vmbr0`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

/// Configuration fields that only VMs have.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VmSettings {
    pub sockets: Option<u64>,
    pub cores: Option<u64>,
    pub ostype: Option<String>,
    pub boot: Option<String>,
    pub bios: Option<String>,
    pub machine: Option<String>,
    pub scsihw: Option<String>,
}

/// Configuration fields that only containers have.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSettings {
    pub cores: Option<u64>,
    pub ostype: Option<String>,
    pub hostname: Option<String>,
    pub arch: Option<String>,
    /// Swap size in MiB as configured.
    pub swap: Option<u64>,
}

/// Kind-specific part of a [`ResourceDetail`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GuestSettings {
    Vm(VmSettings),
    Container(ContainerSettings),
}

/// Live metrics plus configuration-derived fields for one guest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDetail {
    #[serde(flatten)]
    pub resource: GuestResource,
    #[serde(flatten)]
    pub settings: GuestSettings,
    pub description: Option<String>,
    /// Every `net*` configuration key.
    pub networks: Vec<ConfigEntry>,
    /// Every disk-bus key whose value looks like a volume specifier.
    pub disks: Vec<ConfigEntry>,
    pub mem_used_formatted: String,
    pub mem_max_formatted: String,
    pub disk_max_formatted: String,
}
