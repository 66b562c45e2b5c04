use crate::{
    core::{
        domain::{
            error::{ProxmoxError, ProxmoxResult},
            model::{
                guest::RawGuest,
                resource_detail::{GuestConfig, ResourceDetail},
            },
            value_object::{GuestKind, NodeName},
        },
        infrastructure::api_client::ProxmoxApi,
    },
    telemetry::{application::service::decode, domain::normalizer},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// On-demand detail lookup for one guest.
#[derive(Clone)]
pub struct DetailService {
    api: Arc<dyn ProxmoxApi>,
    timeout: Duration,
}

impl DetailService {
    pub fn new(api: Arc<dyn ProxmoxApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Fetches configuration and live status concurrently and merges them.
    ///
    /// # Errors
    /// `NotFound` when upstream answers either guest call with a non-success
    /// status; transport, login and decode failures pass through unchanged.
    pub async fn resource_detail(
        &self,
        node: &NodeName,
        kind: GuestKind,
        vmid: u32,
    ) -> ProxmoxResult<ResourceDetail> {
        let base = format!("nodes/{}/{}/{}", node, kind.api_segment(), vmid);
        let config_path = format!("{}/config", base);
        let status_path = format!("{}/status/current", base);

        let (config, status) = tokio::join!(
            self.api.get(&config_path, self.timeout),
            self.api.get(&status_path, self.timeout)
        );
        // Only a refusal of the guest path itself means the guest is missing;
        // a failed ticket login surfaces with its own path.
        let not_found = |requested: &str, error: ProxmoxError| match error {
            ProxmoxError::UpstreamStatus { ref path, .. } if path == requested => {
                ProxmoxError::NotFound(format!("{} {} on node {}", kind.name_prefix(), vmid, node))
            }
            other => other,
        };
        let config = config.map_err(|e| not_found(&config_path, e))?;
        let status = status.map_err(|e| not_found(&status_path, e))?;

        let config: GuestConfig = match config {
            Value::Null => GuestConfig::new(),
            other => decode(&config_path, other)?,
        };
        let status = RawGuest::from_value(kind, status)
            .map_err(|e| ProxmoxError::Decode(format!("{}: {}", status_path, e)))?;

        debug!(%node, %kind, vmid, keys = config.len(), "Fetched guest detail");
        Ok(normalizer::normalize_detail(node.as_str(), vmid, &status, &config))
    }
}
