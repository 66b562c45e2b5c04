mod cluster_tests;
mod node_tests;
mod vm_tests;

use crate::ProxmoxMonitor;
use serde_json::Value;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub(super) const TEST_TOKEN_HEADER: &str = "PVEAPIToken=monitor@pve!dashboard=secret";

/// Monitor pointed at a wiremock server, authenticated with an API token.
pub(super) fn create_monitor(mock_server: &MockServer) -> ProxmoxMonitor {
    ProxmoxMonitor::builder()
        .base_url(mock_server.uri())
        .api_token("monitor@pve", "dashboard", "secret")
        .build()
        .unwrap()
}

/// Mounts `GET {api_path}` answering `{"data": data}`.
pub(super) async fn mount_data(mock_server: &MockServer, api_path: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api2/json/{}", api_path)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data })))
        .mount(mock_server)
        .await;
}

/// Mounts `GET {api_path}` answering with a bare status code.
pub(super) async fn mount_status(mock_server: &MockServer, api_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/api2/json/{}", api_path)))
        .respond_with(ResponseTemplate::new(status))
        .mount(mock_server)
        .await;
}
