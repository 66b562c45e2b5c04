//! Per-node fan-out over guest inventories and node status.
//!
//! Topology is read once; then every node is queried concurrently, and
//! within a node the VM and container inventories are fetched concurrently.
//! Each branch produces its own buffer. Buffers are merged after all branches
//! settle, and a failed branch contributes nothing but a [`BranchFailure`].

use crate::{
    core::{
        domain::{
            error::{ProxmoxError, ProxmoxResult},
            model::{
                cluster_node::ClusterNode, guest::RawGuest, guest_resource::GuestResource,
                node_list_item::NodeListItem, node_status::NodeStatus,
            },
            value_object::GuestKind,
        },
        infrastructure::api_client::ProxmoxApi,
    },
    telemetry::{
        application::service::{decode, decode_list, topology_service::TopologyService},
        domain::normalizer,
    },
};
use futures::future::join_all;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Which part of a node's collection failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchScope {
    NodeStatus,
    Guests(GuestKind),
}

impl fmt::Display for BranchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchScope::NodeStatus => f.write_str("status"),
            BranchScope::Guests(kind) => f.write_str(kind.api_segment()),
        }
    }
}

/// A branch of a collection pass that contributed nothing.
#[derive(Debug)]
pub struct BranchFailure {
    pub node: String,
    pub scope: BranchScope,
    pub error: ProxmoxError,
}

/// Merged output of a collection pass plus the branches that failed.
#[derive(Debug)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub failures: Vec<BranchFailure>,
}

impl<T> Collection<T> {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn log_failures(&self) {
        for failure in &self.failures {
            warn!(
                node = %failure.node,
                scope = %failure.scope,
                error = %failure.error,
                "Collection branch failed; skipping"
            );
        }
    }
}

/// Resource Collector.
#[derive(Clone)]
pub struct CollectorService {
    api: Arc<dyn ProxmoxApi>,
    topology: TopologyService,
    timeout: Duration,
}

impl CollectorService {
    pub fn new(api: Arc<dyn ProxmoxApi>, timeout: Duration) -> Self {
        Self {
            topology: TopologyService::new(Arc::clone(&api), timeout),
            api,
            timeout,
        }
    }

    /// Collects every VM and container on every node.
    ///
    /// # Errors
    /// Only topology discovery is fatal. Per-node failures are recorded in
    /// [`Collection::failures`].
    pub async fn collect_all(&self) -> ProxmoxResult<Collection<GuestResource>> {
        let nodes = self.topology.list_nodes().await?;
        Ok(self.collect_guests(&nodes).await)
    }

    /// Collects the guests of the given nodes.
    pub async fn collect_guests(&self, nodes: &[NodeListItem]) -> Collection<GuestResource> {
        let branches = nodes.iter().map(|node| self.collect_node(&node.node));
        let mut collection = Collection {
            items: Vec::new(),
            failures: Vec::new(),
        };
        for (vms, containers) in join_all(branches).await {
            for branch in [vms, containers] {
                match branch {
                    Ok(mut items) => collection.items.append(&mut items),
                    Err(failure) => collection.failures.push(failure),
                }
            }
        }
        collection.log_failures();
        debug!(
            guests = collection.items.len(),
            failed_branches = collection.failures.len(),
            "Guest collection finished"
        );
        collection
    }

    async fn collect_node(
        &self,
        node: &str,
    ) -> (
        Result<Vec<GuestResource>, BranchFailure>,
        Result<Vec<GuestResource>, BranchFailure>,
    ) {
        tokio::join!(
            self.collect_kind(node, GuestKind::Vm),
            self.collect_kind(node, GuestKind::Container)
        )
    }

    async fn collect_kind(
        &self,
        node: &str,
        kind: GuestKind,
    ) -> Result<Vec<GuestResource>, BranchFailure> {
        self.fetch_kind(node, kind).await.map_err(|error| BranchFailure {
            node: node.to_string(),
            scope: BranchScope::Guests(kind),
            error,
        })
    }

    async fn fetch_kind(&self, node: &str, kind: GuestKind) -> ProxmoxResult<Vec<GuestResource>> {
        let path = format!("nodes/{}/{}", node, kind.api_segment());
        let data = self.api.get(&path, self.timeout).await?;
        let records: Vec<Value> = decode_list(&path, data)?;
        records
            .into_iter()
            .map(|record| {
                RawGuest::from_value(kind, record)
                    .map(|raw| normalizer::normalize_guest(node, &raw))
                    .map_err(|e| ProxmoxError::Decode(format!("{}: {}", path, e)))
            })
            .collect()
    }

    /// Fetches and normalizes the status of every node.
    ///
    /// # Errors
    /// Only topology discovery is fatal. Nodes whose status call fails are
    /// left out of [`Collection::items`].
    pub async fn node_statuses(&self) -> ProxmoxResult<Collection<ClusterNode>> {
        let nodes = self.topology.list_nodes().await?;
        Ok(self.collect_statuses(&nodes).await)
    }

    /// Fetches and normalizes the status of the given nodes.
    pub async fn collect_statuses(&self, nodes: &[NodeListItem]) -> Collection<ClusterNode> {
        let branches = nodes.iter().map(|item| async move {
            self.fetch_status(&item.node)
                .await
                .map(|status| normalizer::normalize_node(item, &status))
                .map_err(|error| BranchFailure {
                    node: item.node.clone(),
                    scope: BranchScope::NodeStatus,
                    error,
                })
        });

        let mut collection = Collection {
            items: Vec::new(),
            failures: Vec::new(),
        };
        for branch in join_all(branches).await {
            match branch {
                Ok(node) => collection.items.push(node),
                Err(failure) => collection.failures.push(failure),
            }
        }
        collection.log_failures();
        collection
    }

    async fn fetch_status(&self, node: &str) -> ProxmoxResult<NodeStatus> {
        let path = format!("nodes/{}/status", node);
        let data = self.api.get(&path, self.timeout).await?;
        match data {
            Value::Null => Ok(NodeStatus::default()),
            other => decode(&path, other),
        }
    }

    pub fn topology(&self) -> &TopologyService {
        &self.topology
    }
}
