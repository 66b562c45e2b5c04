use super::{create_monitor, mount_data, mount_status};
use crate::{DEFAULT_TASK_LIMIT, ProxmoxError, TaskStatus};
use serde_json::{Value, json};
use wiremock::MockServer;

async fn mount_two_node_cluster(mock_server: &MockServer) {
    mount_data(
        mock_server,
        "nodes",
        json!([{ "node": "pve1", "status": "online" }, { "node": "pve2", "status": "online" }]),
    )
    .await;
    mount_data(
        mock_server,
        "nodes/pve1/qemu",
        json!([
            { "vmid": 100, "name": "web", "status": "running" },
            { "vmid": 101, "name": "build", "status": "stopped" }
        ]),
    )
    .await;
    mount_data(
        mock_server,
        "nodes/pve1/lxc",
        json!([{ "vmid": 200, "hostname": "dns", "status": "running" }]),
    )
    .await;
    mount_data(
        mock_server,
        "nodes/pve1/status",
        json!({ "cpu": 0.1, "memory": { "total": 100, "used": 40 } }),
    )
    .await;
}

#[tokio::test]
async fn test_cluster_summary_success() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_two_node_cluster(&mock_server).await;
    mount_data(
        &mock_server,
        "nodes/pve2/qemu",
        json!([{ "vmid": 300, "status": "paused" }]),
    )
    .await;
    mount_data(&mock_server, "nodes/pve2/lxc", json!([])).await;
    mount_data(&mock_server, "nodes/pve2/status", json!({ "cpu": 0.2 })).await;

    let summary = monitor.cluster_summary().await;
    assert_eq!(summary.total_vms, 4);
    assert_eq!(summary.running, 2);
    assert_eq!(summary.stopped, 2);
    assert_eq!(summary.nodes.len(), 2);
    assert!(summary.error.is_none());
    assert_eq!(summary.proxmox_host, "127.0.0.1");

    let rendered = serde_json::to_value(&summary).unwrap();
    assert!(rendered["timestamp"].is_string());
    assert!(rendered.get("error").is_none());
}

#[tokio::test]
async fn test_cluster_summary_counts_only_reachable_branches() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_two_node_cluster(&mock_server).await;
    mount_status(&mock_server, "nodes/pve2/qemu", 500).await;
    mount_status(&mock_server, "nodes/pve2/lxc", 500).await;
    mount_status(&mock_server, "nodes/pve2/status", 500).await;

    let summary = monitor.cluster_summary().await;
    assert_eq!(summary.total_vms, 3);
    assert_eq!(summary.running, 2);
    assert_eq!(summary.stopped, 1);
    assert_eq!(summary.nodes.len(), 1);
    assert_eq!(summary.nodes[0].name, "pve1");
    assert_eq!(summary.nodes[0].mem_percent, 40.0);
    assert!(summary.error.is_none());
}

#[tokio::test]
async fn test_cluster_summary_when_topology_fails() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_status(&mock_server, "nodes", 503).await;

    let summary = monitor.cluster_summary().await;
    assert_eq!(summary.total_vms, 0);
    assert_eq!(summary.running, 0);
    assert_eq!(summary.stopped, 0);
    assert!(summary.nodes.is_empty());
    assert!(summary.error.as_deref().unwrap().contains("503"));
}

fn sample_tasks() -> Value {
    json!([
        {
            "upid": "UPID:pve1:0001A2B3:0C4D5E6F:65A1B2C3:qmstart:100:root@pam:",
            "type": "qmstart",
            "id": "100",
            "node": "pve1",
            "user": "root@pam",
            "starttime": 1700000100,
            "endtime": 1700000103,
            "status": "OK"
        },
        {
            "upid": "UPID:pve1:0001A2B4:0C4D5E70:65A1B2C4:vzdump::root@pam:",
            "type": "vzdump",
            "id": "",
            "node": "pve1",
            "user": "root@pam",
            "starttime": 1700000300
        },
        {
            "upid": "UPID:pve2:0001A2B5:0C4D5E71:65A1B2C5:qmigrate:101:admin@pve:",
            "type": "qmigrate",
            "id": "101",
            "node": "pve2",
            "user": "admin@pve",
            "starttime": 1700000200,
            "endtime": 1700000260,
            "status": "migration problems"
        }
    ])
}

#[tokio::test]
async fn test_recent_tasks_success() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_data(&mock_server, "cluster/tasks", sample_tasks()).await;

    let tasks = monitor.recent_tasks(DEFAULT_TASK_LIMIT).await.unwrap();
    let starts: Vec<u64> = tasks.iter().map(|t| t.starttime).collect();
    assert_eq!(starts, vec![1700000300, 1700000200, 1700000100]);

    assert_eq!(tasks[0].status, TaskStatus::Running);
    assert_eq!(tasks[0].duration, 0);
    assert_eq!(tasks[0].description, "Backup");

    // Unknown operation codes are shown as-is.
    assert_eq!(tasks[1].description, "qmigrate");
    assert_eq!(tasks[1].status, TaskStatus::Error);
    assert_eq!(tasks[1].error, "migration problems");
    assert_eq!(tasks[1].duration, 60);

    assert_eq!(tasks[2].status, TaskStatus::Success);
    assert_eq!(tasks[2].description, "VM start");
    assert_eq!(tasks[2].vmid.as_deref(), Some("100"));
    assert_eq!(tasks[2].error, "");
}

#[tokio::test]
async fn test_recent_tasks_limit() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_data(&mock_server, "cluster/tasks", sample_tasks()).await;

    let tasks = monitor.recent_tasks(2).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].starttime, 1700000300);
    assert_eq!(tasks[1].starttime, 1700000200);
}

#[tokio::test]
async fn test_recent_tasks_empty() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_data(&mock_server, "cluster/tasks", json!([])).await;

    assert!(monitor.recent_tasks(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_recent_tasks_failure() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_status(&mock_server, "cluster/tasks", 403).await;

    assert!(matches!(
        monitor.recent_tasks(10).await,
        Err(ProxmoxError::UpstreamStatus { status: 403, .. })
    ));
}
