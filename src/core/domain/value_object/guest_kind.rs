use crate::core::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two guest flavours a node hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuestKind {
    /// A QEMU/KVM virtual machine.
    #[serde(rename = "VM")]
    Vm,
    /// An LXC container.
    #[serde(rename = "LXC")]
    Container,
}

impl GuestKind {
    /// Path segment used by the API (`/nodes/{node}/{segment}`).
    #[must_use]
    pub fn api_segment(&self) -> &'static str {
        match self {
            GuestKind::Vm => "qemu",
            GuestKind::Container => "lxc",
        }
    }

    /// Prefix for synthesized names of unnamed guests.
    #[must_use]
    pub fn name_prefix(&self) -> &'static str {
        match self {
            GuestKind::Vm => "VM",
            GuestKind::Container => "CT",
        }
    }
}

impl fmt::Display for GuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_segment())
    }
}

impl FromStr for GuestKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qemu" | "vm" => Ok(GuestKind::Vm),
            "lxc" | "ct" | "container" => Ok(GuestKind::Container),
            other => Err(ValidationError::Field {
                field: "kind".to_string(),
                message: format!("'{}' is not a guest kind (qemu or lxc)", other),
            }),
        }
    }
}
