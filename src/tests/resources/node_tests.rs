use super::{create_monitor, mount_data, mount_status};
use crate::{ProxmoxError, ProxmoxMonitor, Timeframe};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

#[tokio::test]
async fn test_node_statuses_success() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_data(
        &mock_server,
        "nodes",
        json!([
            {
                "node": "pve1",
                "status": "online",
                "cpu": 0.15,
                "maxcpu": 8,
                "mem": 8589934592_i64,
                "maxmem": 17179869184_i64,
                "uptime": 1234567,
                "id": "node/pve1",
                "ssl_fingerprint": "AA:BB:CC:DD:EE:FF"
            },
            { "node": "pve2", "status": "online", "maxcpu": 16 }
        ]),
    )
    .await;
    mount_data(
        &mock_server,
        "nodes/pve1/status",
        json!({
            "cpu": 0.0567,
            "cpuinfo": { "cpus": 8, "sockets": 1, "model": "AMD EPYC 7302P 16-Core Processor" },
            "memory": { "total": 17179869184_i64, "used": 8589934592_i64, "free": 8589934592_i64 },
            "rootfs": { "total": 107374182400_i64, "used": 26843545600_i64, "avail": 80530636800_i64 },
            "uptime": 1234567,
            "kversion": "Linux 6.8.12-4-pve #1 SMP PREEMPT_DYNAMIC",
            "pveversion": "pve-manager/8.3.0/c1689ccb1065a83b"
        }),
    )
    .await;
    mount_data(
        &mock_server,
        "nodes/pve2/status",
        json!({ "cpu": 0, "uptime": 0 }),
    )
    .await;

    let mut nodes = monitor.node_statuses().await;
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(nodes.len(), 2);

    let pve1 = &nodes[0];
    assert_eq!(pve1.name, "pve1");
    assert_eq!(pve1.status, "online");
    assert_eq!(pve1.cpu_usage, 5.7);
    assert_eq!(pve1.cpu_cores, 8);
    assert_eq!(pve1.mem_percent, 50.0);
    assert_eq!(pve1.disk_total, 107374182400);
    assert_eq!(pve1.disk_percent, 25.0);
    assert_eq!(pve1.uptime_formatted, "14j 6h 56m");

    // Missing totals are reported as zero, never divided by.
    let pve2 = &nodes[1];
    assert_eq!(pve2.cpu_cores, 16);
    assert_eq!(pve2.mem_total, 0);
    assert_eq!(pve2.mem_percent, 0.0);
    assert_eq!(pve2.disk_percent, 0.0);
    assert_eq!(pve2.uptime_formatted, "N/A");
}

#[tokio::test]
async fn test_node_statuses_skip_unreachable_node() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_data(
        &mock_server,
        "nodes",
        json!([{ "node": "pve1", "status": "online" }, { "node": "pve2", "status": "unknown" }]),
    )
    .await;
    mount_data(&mock_server, "nodes/pve1/status", json!({ "cpu": 0.1 })).await;
    mount_status(&mock_server, "nodes/pve2/status", 500).await;

    let nodes = monitor.node_statuses().await;
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name, "pve1");
}

#[tokio::test]
async fn test_node_statuses_empty() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_data(&mock_server, "nodes", json!([])).await;

    assert!(monitor.node_statuses().await.is_empty());
}

#[tokio::test]
async fn test_node_series_drops_samples_without_time() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    let mut samples: Vec<Value> = (0..8)
        .rev()
        .map(|i| {
            json!({
                "time": 1700000000 + i * 60,
                "cpu": 0.5,
                "memused": 1073741824_i64,
                "memtotal": 4294967296_i64,
                "netin": 1024.5,
                "netout": 2048.0,
                "diskread": 0,
                "diskwrite": 4096
            })
        })
        .collect();
    samples.insert(2, json!({ "cpu": 0.9 }));
    samples.insert(6, json!({ "memused": 1 }));

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/rrddata"))
        .and(query_param("timeframe", "hour"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": samples })))
        .mount(&mock_server)
        .await;

    let series = monitor.node_series("pve1", Timeframe::Hour).await.unwrap();
    assert_eq!(series.points.len(), 8);
    assert!(series.points.windows(2).all(|w| w[0].time < w[1].time));

    let first = &series.points[0];
    assert_eq!(first.time, 1700000000);
    assert_eq!(first.cpu_usage, 50.0);
    assert_eq!(first.mem_total, 4294967296);
    assert_eq!(first.mem_percent, 25.0);
    assert_eq!(first.netin, 1024.5);
    assert_eq!(first.diskwrite, 4096.0);
}

#[tokio::test]
async fn test_node_series_failure_is_an_error() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_status(&mock_server, "nodes/pve9/rrddata", 500).await;

    let result = monitor.node_series("pve9", Timeframe::Day).await;
    assert!(matches!(
        result,
        Err(ProxmoxError::UpstreamStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_node_statuses_with_ticket_auth() {
    let mock_server = MockServer::start().await;
    let monitor = ProxmoxMonitor::builder()
        .base_url(mock_server.uri())
        .credentials("monitor", "secret", "pve")
        .build()
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api2/json/access/ticket"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "ticket": "PVE:monitor@pve:4EEC61E2::sig",
                "CSRFPreventionToken": "4EEC61E2:csrf",
                "username": "monitor@pve"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes"))
        .and(header("Cookie", "PVEAuthCookie=PVE:monitor@pve:4EEC61E2::sig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "node": "pve1", "status": "online" }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/status"))
        .and(header("Cookie", "PVEAuthCookie=PVE:monitor@pve:4EEC61E2::sig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cpu": 0.02, "cpuinfo": { "cpus": 4 } }
        })))
        .mount(&mock_server)
        .await;

    let nodes = monitor.node_statuses().await;
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].cpu_usage, 2.0);
    assert_eq!(nodes[0].cpu_cores, 4);
}
