//! Raw task record from `/cluster/tasks`.

use crate::core::domain::value_object::serde_helpers;
use serde::{Deserialize, Serialize};

/// A recorded cluster operation as upstream reports it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TaskListItem {
    /// Unique process identifier (`UPID:...`).
    #[serde(default)]
    pub upid: String,
    /// Operation code, e.g. `qmstart` or `vzdump`.
    #[serde(default, rename = "type")]
    pub task_type: String,
    /// Final status text; absent while the task runs. `OK` on success.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub user: String,
    /// Affected object, usually a guest id.
    #[serde(default, deserialize_with = "serde_helpers::option_string::deserialize")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub starttime: Option<u64>,
    #[serde(default, deserialize_with = "serde_helpers::option_u64::deserialize")]
    pub endtime: Option<u64>,
}
