use crate::{
    core::{
        domain::{error::ProxmoxResult, model::node_list_item::NodeListItem},
        infrastructure::api_client::ProxmoxApi,
    },
    telemetry::application::service::decode_list,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const NODES_PATH: &str = "nodes";

/// Discovers the cluster's nodes. Every fan-out starts here.
#[derive(Clone)]
pub struct TopologyService {
    api: Arc<dyn ProxmoxApi>,
    timeout: Duration,
}

impl TopologyService {
    pub fn new(api: Arc<dyn ProxmoxApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Lists every node the cluster knows about, in upstream order.
    ///
    /// # Errors
    /// Any failure here is fatal for the caller's aggregate: without the node
    /// list there is nothing to fan out over.
    pub async fn list_nodes(&self) -> ProxmoxResult<Vec<NodeListItem>> {
        let data = self.api.get(NODES_PATH, self.timeout).await?;
        let nodes: Vec<NodeListItem> = decode_list(NODES_PATH, data)?;
        debug!(count = nodes.len(), "Discovered cluster nodes");
        Ok(nodes)
    }
}
