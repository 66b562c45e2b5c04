use serde::{Deserialize, Serialize};

/// Outcome of a cluster task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// No end time recorded yet.
    Running,
    /// Ended with the upstream `OK` sentinel.
    Success,
    /// Ended with any other status text.
    Error,
}

/// Normalized view of one recorded cluster operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterTask {
    /// Upstream process identifier (UPID).
    pub id: String,
    /// Raw operation code.
    #[serde(rename = "type")]
    pub task_type: String,
    pub description: String,
    pub status: TaskStatus,
    pub node: String,
    pub user: String,
    pub vmid: Option<String>,
    pub starttime: u64,
    pub endtime: Option<u64>,
    /// Seconds between start and end; `0` while running.
    pub duration: u64,
    /// Raw non-OK status text; empty otherwise.
    pub error: String,
}
