//! Read-only JSON endpoints over [`ProxmoxMonitor`].

use crate::{
    ClusterNode, ClusterSummary, ClusterTask, DEFAULT_TASK_LIMIT, GuestKind, GuestResource,
    HealthStatus, ProxmoxError, ProxmoxMonitor, ResourceDetail, TimeSeries, Timeframe,
    ValidationError,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

/// Builds the API router.
pub fn router(monitor: ProxmoxMonitor) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/vms", get(list_vms))
        .route("/api/status", get(cluster_status))
        .route("/api/nodes", get(list_nodes))
        .route("/api/nodes/{node}/rrddata", get(node_rrddata))
        .route("/api/guests/{node}/{kind}/{vmid}", get(guest_detail))
        .route("/api/guests/{node}/{kind}/{vmid}/rrddata", get(guest_rrddata))
        .route("/api/tasks", get(recent_tasks))
        .with_state(monitor)
}

/// A [`ProxmoxError`] rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(ProxmoxError);

impl From<ProxmoxError> for ApiError {
    fn from(error: ProxmoxError) -> Self {
        Self(error)
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self(ProxmoxError::Validation(error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ProxmoxError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxmoxError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        if status == StatusCode::BAD_GATEWAY {
            warn!(error = %self.0, "Upstream request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
struct SeriesQuery {
    timeframe: Option<String>,
}

impl SeriesQuery {
    fn timeframe(&self) -> Result<Timeframe, ValidationError> {
        self.timeframe
            .as_deref()
            .map_or(Ok(Timeframe::default()), str::parse)
    }
}

#[derive(Debug, Deserialize)]
struct TasksQuery {
    limit: Option<usize>,
}

fn parse_guest(kind: &str, vmid: &str) -> Result<(GuestKind, u32), ValidationError> {
    let kind = kind.parse::<GuestKind>()?;
    let vmid = vmid.parse::<u32>().map_err(|_| ValidationError::Field {
        field: "vmid".to_string(),
        message: format!("'{}' is not a guest id", vmid),
    })?;
    Ok((kind, vmid))
}

async fn health(State(monitor): State<ProxmoxMonitor>) -> Json<HealthStatus> {
    Json(monitor.health())
}

async fn list_vms(State(monitor): State<ProxmoxMonitor>) -> Json<Vec<GuestResource>> {
    Json(monitor.list_resources().await)
}

async fn cluster_status(State(monitor): State<ProxmoxMonitor>) -> Json<ClusterSummary> {
    Json(monitor.cluster_summary().await)
}

async fn list_nodes(State(monitor): State<ProxmoxMonitor>) -> Json<Vec<ClusterNode>> {
    Json(monitor.node_statuses().await)
}

async fn node_rrddata(
    State(monitor): State<ProxmoxMonitor>,
    Path(node): Path<String>,
    Query(query): Query<SeriesQuery>,
) -> ApiResult<TimeSeries> {
    let timeframe = query.timeframe()?;
    Ok(Json(monitor.node_series(&node, timeframe).await?))
}

async fn guest_detail(
    State(monitor): State<ProxmoxMonitor>,
    Path((node, kind, vmid)): Path<(String, String, String)>,
) -> ApiResult<ResourceDetail> {
    let (kind, vmid) = parse_guest(&kind, &vmid)?;
    Ok(Json(monitor.resource_detail(&node, kind, vmid).await?))
}

async fn guest_rrddata(
    State(monitor): State<ProxmoxMonitor>,
    Path((node, kind, vmid)): Path<(String, String, String)>,
    Query(query): Query<SeriesQuery>,
) -> ApiResult<TimeSeries> {
    let (kind, vmid) = parse_guest(&kind, &vmid)?;
    let timeframe = query.timeframe()?;
    Ok(Json(monitor.guest_series(&node, kind, vmid, timeframe).await?))
}

async fn recent_tasks(
    State(monitor): State<ProxmoxMonitor>,
    Query(query): Query<TasksQuery>,
) -> ApiResult<Vec<ClusterTask>> {
    let limit = query.limit.unwrap_or(DEFAULT_TASK_LIMIT);
    Ok(Json(monitor.recent_tasks(limit).await?))
}
