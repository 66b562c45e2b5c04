//! Raw RRD samples from the `rrddata` endpoints.
//!
//! Node and guest samples name their memory counters differently
//! (`memused`/`memtotal` versus `mem`/`maxmem`); the two shapes stay separate
//! here and meet only in the normalized [`TimeSeriesPoint`](super::time_series::TimeSeriesPoint).

use crate::core::domain::value_object::serde_helpers;
use serde::{Deserialize, Serialize};

/// One sample of `/nodes/{node}/rrddata`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NodeRrdSample {
    /// Sample timestamp (UNIX epoch). Samples without one are dropped.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub time: Option<u64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub cpu: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub memused: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub memtotal: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub netin: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub netout: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub diskread: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub diskwrite: Option<f64>,
}

/// One sample of `/nodes/{node}/{qemu|lxc}/{vmid}/rrddata`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GuestRrdSample {
    /// Sample timestamp (UNIX epoch). Samples without one are dropped.
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub time: Option<u64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub cpu: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub mem: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub maxmem: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub netin: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub netout: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub diskread: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_f64::deserialize")]
    pub diskwrite: Option<f64>,
}
