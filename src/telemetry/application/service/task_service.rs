use crate::{
    core::{
        domain::{
            error::ProxmoxResult,
            model::{cluster_task::ClusterTask, task_list_item::TaskListItem},
        },
        infrastructure::api_client::ProxmoxApi,
    },
    telemetry::{application::service::decode_list, domain::normalizer},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const TASKS_PATH: &str = "cluster/tasks";

/// Number of tasks returned when the caller does not choose.
pub const DEFAULT_TASK_LIMIT: usize = 50;

/// Task History Fetcher.
#[derive(Clone)]
pub struct TaskService {
    api: Arc<dyn ProxmoxApi>,
    timeout: Duration,
}

impl TaskService {
    pub fn new(api: Arc<dyn ProxmoxApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// The `limit` most recent tasks, newest first.
    ///
    /// # Errors
    /// Returns the upstream failure unchanged.
    pub async fn recent_tasks(&self, limit: usize) -> ProxmoxResult<Vec<ClusterTask>> {
        let data = self.api.get(TASKS_PATH, self.timeout).await?;
        let raw: Vec<TaskListItem> = decode_list(TASKS_PATH, data)?;
        debug!(count = raw.len(), limit, "Fetched cluster tasks");
        Ok(latest(raw, limit))
    }
}

/// Normalizes, orders by `starttime` descending (stable) and keeps `limit`.
fn latest(raw: Vec<TaskListItem>, limit: usize) -> Vec<ClusterTask> {
    let mut tasks: Vec<ClusterTask> = raw.iter().map(normalizer::normalize_task).collect();
    tasks.sort_by(|a, b| b.starttime.cmp(&a.starttime));
    tasks.truncate(limit);
    tasks
}
