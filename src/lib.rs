mod auth;
mod core;
mod telemetry;

pub mod config;
pub mod http;

pub use crate::core::domain::error::{ProxmoxError, ProxmoxResult, ValidationError};
pub use crate::core::domain::model::{
    client_config::{ClientConfig, RateLimitConfig},
    cluster_node::ClusterNode,
    cluster_summary::{ClusterSummary, HealthStatus},
    cluster_task::{ClusterTask, TaskStatus},
    guest_resource::GuestResource,
    proxmox_auth::ProxmoxAuth,
    proxmox_connection::{Credentials, ProxmoxConnection, TicketCredentials},
    resource_detail::{ConfigEntry, GuestSettings, ResourceDetail},
    time_series::{TimeSeries, TimeSeriesPoint},
};
pub use crate::core::domain::value_object::{
    GuestKind, NodeName, ProxmoxApiToken, ProxmoxCSRFToken, ProxmoxHost, ProxmoxTicket,
    ProxmoxUrl, Timeframe,
};
pub use crate::core::infrastructure::api_client::{ApiClient, ProxmoxApi};
pub use crate::telemetry::application::service::{
    collector_service::{BranchFailure, BranchScope, Collection},
    task_service::DEFAULT_TASK_LIMIT,
};
pub use crate::telemetry::domain::normalizer::{format_bytes, format_uptime};

use crate::telemetry::application::service::{
    collector_service::CollectorService, detail_service::DetailService,
    series_service::SeriesService, task_service::TaskService,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

const DEFAULT_PORT: u16 = 8006;

/// Read-only monitor over a Proxmox VE cluster.
///
/// Every operation re-polls upstream. "List everything" operations never
/// fail: unreachable branches are logged and left out. Single-target
/// operations return their failure.
///
/// # Examples
///
/// ```no_run
/// use pve_monitor::{ProxmoxMonitor, ProxmoxResult};
///
/// #[tokio::main]
/// async fn main() -> ProxmoxResult<()> {
///     let monitor = ProxmoxMonitor::builder()
///         .host("proxmox.example.com")
///         .port(8006)
///         .api_token("monitor@pve", "dashboard", "6f2c1b0e-0000-4000-8000-000000000000")
///         .accept_invalid_certs(true)
///         .build()?;
///
///     let summary = monitor.cluster_summary().await;
///     println!("{} of {} guests running", summary.running, summary.total_vms);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ProxmoxMonitor {
    proxmox_host: String,
    collector: CollectorService,
    series: SeriesService,
    tasks: TaskService,
    detail: DetailService,
}

/// Builder for [`ProxmoxMonitor`] configuration
#[derive(Default)]
pub struct ProxmoxMonitorBuilder {
    host: Option<String>,
    port: Option<u16>,
    base_url: Option<String>,
    api_token: Option<(String, String, String)>,
    ticket: Option<TicketCredentials>,
    secure: Option<bool>,
    accept_invalid_certs: bool,
    client_config: ClientConfig,
}

impl ProxmoxMonitorBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Uses an explicit API root instead of `https://{host}:{port}/api2/json/`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Authenticates with a static API token. Takes precedence over
    /// [`credentials`](Self::credentials).
    pub fn api_token(
        mut self,
        user: impl Into<String>,
        token_name: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        self.api_token = Some((user.into(), token_name.into(), secret.into()));
        self
    }

    /// Authenticates with a session ticket obtained from these credentials.
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        self.ticket = Some(TicketCredentials {
            username: username.into(),
            password: password.into(),
            realm: realm.into(),
        });
        self
    }

    /// Use HTTPS (default) or plain HTTP when composing the URL from host and port.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Accept self-signed upstream certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.client_config.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Validates the configuration and builds the upstream client.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Validation` when the host, URL or credentials
    /// are missing or malformed.
    pub fn build(self) -> ProxmoxResult<ProxmoxMonitor> {
        let url = match &self.base_url {
            Some(base) => ProxmoxUrl::parse(base)?,
            None => {
                let host = ProxmoxHost::new(self.host.clone().ok_or_else(|| {
                    ValidationError::Field {
                        field: "host".to_string(),
                        message: "Host is required".to_string(),
                    }
                })?)?;
                ProxmoxUrl::new(
                    &host,
                    self.port.unwrap_or(DEFAULT_PORT),
                    self.secure.unwrap_or(true),
                )?
            }
        };
        let host = match &self.host {
            Some(host) => ProxmoxHost::new(host.clone())?,
            None => url_host(&url)?,
        };

        let credentials = match (self.api_token, self.ticket) {
            (Some((user, token_name, secret)), _) => {
                Credentials::ApiToken(ProxmoxApiToken::new(user, token_name, secret)?)
            }
            (None, Some(ticket)) => Credentials::Ticket(ticket),
            (None, None) => {
                return Err(ValidationError::Field {
                    field: "credentials".to_string(),
                    message: "Either an API token or username/password is required"
                        .to_string(),
                }
                .into());
            }
        };

        let connection =
            ProxmoxConnection::new(host.clone(), url, credentials, self.accept_invalid_certs);
        let client = ApiClient::new(connection, self.client_config.clone())?;
        Ok(ProxmoxMonitor::from_api(
            Arc::new(client),
            host.as_str(),
            &self.client_config,
        ))
    }
}

fn url_host(url: &ProxmoxUrl) -> ProxmoxResult<ProxmoxHost> {
    let parsed = url::Url::parse(url.as_str())
        .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;
    let host = parsed
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
        .ok_or_else(|| ValidationError::Field {
            field: "base_url".to_string(),
            message: "URL has no host".to_string(),
        })?;
    Ok(ProxmoxHost::new(host)?)
}

impl ProxmoxMonitor {
    /// Creates a new builder for ProxmoxMonitor configuration
    pub fn builder() -> ProxmoxMonitorBuilder {
        ProxmoxMonitorBuilder::default()
    }

    /// Wires the monitor over any [`ProxmoxApi`] implementation.
    ///
    /// `proxmox_host` is reported verbatim in [`ClusterSummary::proxmox_host`].
    pub fn from_api(
        api: Arc<dyn ProxmoxApi>,
        proxmox_host: impl Into<String>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            proxmox_host: proxmox_host.into(),
            collector: CollectorService::new(Arc::clone(&api), config.inventory_timeout),
            series: SeriesService::new(Arc::clone(&api), config.history_timeout),
            tasks: TaskService::new(Arc::clone(&api), config.history_timeout),
            detail: DetailService::new(api, config.inventory_timeout),
        }
    }

    /// Host identity reported in summaries.
    pub fn proxmox_host(&self) -> &str {
        &self.proxmox_host
    }

    /// Every VM and container across all nodes. Empty if topology is unreachable.
    pub async fn list_resources(&self) -> Vec<GuestResource> {
        match self.collector.collect_all().await {
            Ok(collection) => collection.items,
            Err(e) => {
                warn!(error = %e, "Topology discovery failed; returning no guests");
                Vec::new()
            }
        }
    }

    /// Guest counts plus node statuses, taken from one topology read.
    ///
    /// If topology discovery fails the summary has zero counts, no nodes and
    /// `error` set.
    pub async fn cluster_summary(&self) -> ClusterSummary {
        let nodes = match self.collector.topology().list_nodes().await {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(error = %e, "Topology discovery failed; summary is empty");
                return ClusterSummary {
                    timestamp: Utc::now(),
                    total_vms: 0,
                    running: 0,
                    stopped: 0,
                    proxmox_host: self.proxmox_host.clone(),
                    nodes: Vec::new(),
                    error: Some(e.to_string()),
                };
            }
        };

        let (guests, statuses) = tokio::join!(
            self.collector.collect_guests(&nodes),
            self.collector.collect_statuses(&nodes)
        );
        let total_vms = guests.items.len();
        let running = guests.items.iter().filter(|g| g.is_running()).count();
        debug!(total_vms, running, nodes = statuses.items.len(), "Cluster summary");

        ClusterSummary {
            timestamp: Utc::now(),
            total_vms,
            running,
            stopped: total_vms - running,
            proxmox_host: self.proxmox_host.clone(),
            nodes: statuses.items,
            error: None,
        }
    }

    /// Status of every node that answered. Empty if topology is unreachable.
    pub async fn node_statuses(&self) -> Vec<ClusterNode> {
        match self.collector.node_statuses().await {
            Ok(collection) => collection.items,
            Err(e) => {
                warn!(error = %e, "Topology discovery failed; returning no nodes");
                Vec::new()
            }
        }
    }

    /// Configuration and live metrics of one guest.
    ///
    /// # Errors
    /// `Validation` for a malformed node name, `NotFound` when upstream
    /// refuses either lookup, otherwise the transport failure.
    pub async fn resource_detail(
        &self,
        node: &str,
        kind: GuestKind,
        vmid: u32,
    ) -> ProxmoxResult<ResourceDetail> {
        let node = NodeName::new(node)?;
        self.detail.resource_detail(&node, kind, vmid).await
    }

    /// Historical samples of one node.
    ///
    /// # Errors
    /// `Validation` for a malformed node name, otherwise the upstream failure.
    pub async fn node_series(&self, node: &str, timeframe: Timeframe) -> ProxmoxResult<TimeSeries> {
        let node = NodeName::new(node)?;
        self.series.node_series(&node, timeframe).await
    }

    /// Historical samples of one guest.
    ///
    /// # Errors
    /// `Validation` for a malformed node name, otherwise the upstream failure.
    pub async fn guest_series(
        &self,
        node: &str,
        kind: GuestKind,
        vmid: u32,
        timeframe: Timeframe,
    ) -> ProxmoxResult<TimeSeries> {
        let node = NodeName::new(node)?;
        self.series.guest_series(&node, kind, vmid, timeframe).await
    }

    /// The `limit` most recent cluster tasks, newest first.
    ///
    /// # Errors
    /// Returns the upstream failure.
    pub async fn recent_tasks(&self, limit: usize) -> ProxmoxResult<Vec<ClusterTask>> {
        self.tasks.recent_tasks(limit).await
    }

    /// Liveness of the monitor itself.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::ok()
    }
}

#[cfg(test)]
mod tests;
