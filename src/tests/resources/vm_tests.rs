use super::{TEST_TOKEN_HEADER, create_monitor, mount_data, mount_status};
use crate::{GuestKind, GuestSettings, ProxmoxError, ProxmoxMonitor, Timeframe};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

#[tokio::test]
async fn test_list_resources_success() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes"))
        .and(header("Authorization", TEST_TOKEN_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "node": "pve1", "status": "online" },
                { "node": "pve2", "status": "online" }
            ]
        })))
        .mount(&mock_server)
        .await;

    mount_data(
        &mock_server,
        "nodes/pve1/qemu",
        json!([
            {
                "vmid": 100,
                "name": "ubuntu-vm",
                "status": "running",
                "cpu": 0.0523,
                "cpus": 4,
                "mem": 2147483648_i64,
                "maxmem": 8589934592_i64,
                "disk": 0,
                "maxdisk": 34359738368_i64,
                "netin": 123456,
                "netout": 654321,
                "uptime": 123456
            },
            {
                "vmid": 101,
                "status": "stopped",
                "maxmem": 4294967296_i64,
                "cpus": 2
            }
        ]),
    )
    .await;
    mount_data(
        &mock_server,
        "nodes/pve1/lxc",
        json!([
            {
                "vmid": "200",
                "hostname": "debian-ct",
                "status": "running",
                "cpu": 0.01,
                "cpus": 1,
                "mem": 268435456,
                "maxmem": 536870912,
                "swap": 0,
                "maxswap": 536870912,
                "uptime": 3600
            }
        ]),
    )
    .await;
    mount_data(
        &mock_server,
        "nodes/pve2/qemu",
        json!([{ "vmid": 300, "name": "windows", "status": "running", "maxmem": 0 }]),
    )
    .await;
    mount_data(&mock_server, "nodes/pve2/lxc", json!([])).await;

    let guests = monitor.list_resources().await;
    assert_eq!(guests.len(), 4);

    let vm = guests.iter().find(|g| g.id == 100).unwrap();
    assert_eq!(vm.name, "ubuntu-vm");
    assert_eq!(vm.kind, GuestKind::Vm);
    assert_eq!(vm.node, "pve1");
    assert_eq!(vm.cpu_usage, 5.2);
    assert_eq!(vm.cpu_cores, 4);
    assert_eq!(vm.mem_percent, 25.0);
    assert_eq!(vm.uptime_formatted, "1j 10h 17m");
    assert_eq!(vm.netin, 123456);

    let stopped = guests.iter().find(|g| g.id == 101).unwrap();
    assert_eq!(stopped.name, "VM-101");
    assert_eq!(stopped.uptime_formatted, "N/A");
    assert!(!stopped.is_running());

    let ct = guests.iter().find(|g| g.id == 200).unwrap();
    assert_eq!(ct.name, "debian-ct");
    assert_eq!(ct.kind, GuestKind::Container);
    assert_eq!(ct.mem_percent, 50.0);

    let windows = guests.iter().find(|g| g.id == 300).unwrap();
    assert_eq!(windows.node, "pve2");
    assert_eq!(windows.mem_percent, 0.0);
}

#[tokio::test]
async fn test_list_resources_isolates_failing_node() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_data(
        &mock_server,
        "nodes",
        json!([{ "node": "pve1" }, { "node": "pve2" }]),
    )
    .await;
    mount_data(
        &mock_server,
        "nodes/pve1/qemu",
        json!([{ "vmid": 100, "status": "running" }, { "vmid": 101, "status": "running" }]),
    )
    .await;
    mount_status(&mock_server, "nodes/pve1/lxc", 500).await;
    mount_status(&mock_server, "nodes/pve2/qemu", 503).await;
    mount_data(
        &mock_server,
        "nodes/pve2/lxc",
        json!([{ "vmid": 200, "status": "stopped" }]),
    )
    .await;

    let guests = monitor.list_resources().await;
    let mut ids: Vec<u32> = guests.iter().map(|g| g.id).collect();
    ids.sort();
    assert_eq!(ids, vec![100, 101, 200]);
}

#[tokio::test]
async fn test_list_resources_empty_when_topology_fails() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_status(&mock_server, "nodes", 401).await;

    assert!(monitor.list_resources().await.is_empty());
}

#[tokio::test]
async fn test_vm_detail_success() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_data(
        &mock_server,
        "nodes/pve1/qemu/100/config",
        json!({
            "name": "ubuntu-vm",
            "sockets": 1,
            "cores": 4,
            "memory": "8192",
            "ostype": "l26",
            "boot": "order=scsi0;ide2;net0",
            "bios": "seabios",
            "machine": "pc-q35-8.1",
            "scsihw": "virtio-scsi-single",
            "description": "Ubuntu 24.04 build runner",
            "net0": "virtio=BC:24:11:2E:3F:01,bridge=vmbr0,firewall=1",
            "scsi0": "local-lvm:vm-100-disk-0,iothread=1,size=32G",
            "ide2": "none,media=cdrom",
            "digest": "f3c1d2a9"
        }),
    )
    .await;
    mount_data(
        &mock_server,
        "nodes/pve1/qemu/100/status/current",
        json!({
            "vmid": 100,
            "status": "running",
            "cpu": 0.25,
            "cpus": 4,
            "mem": 4294967296_i64,
            "maxmem": 8589934592_i64,
            "maxdisk": 34359738368_i64,
            "uptime": 7260
        }),
    )
    .await;

    let detail = monitor
        .resource_detail("pve1", GuestKind::Vm, 100)
        .await
        .unwrap();

    assert_eq!(detail.resource.name, "ubuntu-vm");
    assert_eq!(detail.resource.cpu_usage, 25.0);
    assert_eq!(detail.resource.mem_percent, 50.0);
    assert_eq!(detail.resource.uptime_formatted, "2h 1m");
    assert_eq!(detail.mem_used_formatted, "4.0 GB");
    assert_eq!(detail.mem_max_formatted, "8.0 GB");
    assert_eq!(detail.disk_max_formatted, "32.0 GB");
    assert_eq!(
        detail.description.as_deref(),
        Some("Ubuntu 24.04 build runner")
    );
    assert_eq!(detail.networks.len(), 1);
    assert_eq!(detail.networks[0].key, "net0");
    assert_eq!(detail.disks.len(), 1);
    assert_eq!(detail.disks[0].key, "scsi0");

    match detail.settings {
        GuestSettings::Vm(vm) => {
            assert_eq!(vm.sockets, Some(1));
            assert_eq!(vm.cores, Some(4));
            assert_eq!(vm.ostype.as_deref(), Some("l26"));
            assert_eq!(vm.boot.as_deref(), Some("order=scsi0;ide2;net0"));
            assert_eq!(vm.scsihw.as_deref(), Some("virtio-scsi-single"));
        }
        other => panic!("expected VM settings, got {:?}", other),
    }
}

#[tokio::test]
async fn test_container_detail_success() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_data(
        &mock_server,
        "nodes/pve1/lxc/200/config",
        json!({
            "hostname": "debian-ct",
            "arch": "amd64",
            "cores": 2,
            "swap": 512,
            "ostype": "debian",
            "rootfs": "local-lvm:vm-200-disk-0,size=8G",
            "mp0": "tank:subvol-200-disk-1,mp=/srv,size=100G",
            "net0": "name=eth0,bridge=vmbr0,ip=dhcp,type=veth"
        }),
    )
    .await;
    mount_data(
        &mock_server,
        "nodes/pve1/lxc/200/status/current",
        json!({ "vmid": "200", "status": "running", "mem": 0, "maxmem": 0 }),
    )
    .await;

    let detail = monitor
        .resource_detail("pve1", GuestKind::Container, 200)
        .await
        .unwrap();

    assert_eq!(detail.resource.name, "debian-ct");
    assert_eq!(detail.resource.mem_percent, 0.0);
    assert_eq!(detail.mem_max_formatted, "0 B");
    assert_eq!(detail.disks.len(), 2);
    match detail.settings {
        GuestSettings::Container(ct) => {
            assert_eq!(ct.arch.as_deref(), Some("amd64"));
            assert_eq!(ct.swap, Some(512));
        }
        other => panic!("expected container settings, got {:?}", other),
    }
}

#[tokio::test]
async fn test_detail_of_missing_guest_is_not_found() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_status(&mock_server, "nodes/pve1/qemu/999/config", 500).await;
    mount_status(&mock_server, "nodes/pve1/qemu/999/status/current", 500).await;

    let result = monitor.resource_detail("pve1", GuestKind::Vm, 999).await;
    assert!(matches!(result, Err(ProxmoxError::NotFound(_))));
}

#[tokio::test]
async fn test_detail_during_login_outage_is_not_not_found() {
    let mock_server = MockServer::start().await;
    let monitor = ProxmoxMonitor::builder()
        .base_url(mock_server.uri())
        .credentials("monitor", "secret", "pve")
        .build()
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api2/json/access/ticket"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = monitor.resource_detail("pve1", GuestKind::Vm, 100).await;
    match result {
        Err(ProxmoxError::UpstreamStatus { status, path }) => {
            assert_eq!(status, 502);
            assert_eq!(path, "access/ticket");
        }
        other => panic!("expected the login failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_detail_rejects_malformed_node() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    let result = monitor
        .resource_detail("../../access", GuestKind::Vm, 100)
        .await;
    assert!(matches!(result, Err(ProxmoxError::Validation(_))));
}

#[tokio::test]
async fn test_guest_series_success() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/100/rrddata"))
        .and(query_param("timeframe", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "time": 1700001800, "cpu": 0.2, "mem": 1024, "maxmem": 4096, "netin": 10.5 },
                { "time": 1700000000, "cpu": 0.1, "mem": 2048, "maxmem": 4096, "diskread": 512.25 },
                { "cpu": 0.3 }
            ]
        })))
        .mount(&mock_server)
        .await;

    let series = monitor
        .guest_series("pve1", GuestKind::Vm, 100, Timeframe::Week)
        .await
        .unwrap();

    assert_eq!(series.timeframe, Timeframe::Week);
    assert_eq!(series.points.len(), 2);
    assert_eq!(series.points[0].time, 1700000000);
    assert_eq!(series.points[0].mem_percent, 50.0);
    assert_eq!(series.points[0].diskread, 512.25);
    assert_eq!(series.points[1].cpu_usage, 20.0);
    assert_eq!(series.points[1].netin, 10.5);
}

#[tokio::test]
async fn test_guest_series_failure_is_an_error() {
    let mock_server = MockServer::start().await;
    let monitor = create_monitor(&mock_server);

    mount_status(&mock_server, "nodes/pve1/lxc/200/rrddata", 500).await;

    let result = monitor
        .guest_series("pve1", GuestKind::Container, 200, Timeframe::Day)
        .await;
    assert!(matches!(
        result,
        Err(ProxmoxError::UpstreamStatus { status: 500, .. })
    ));
}
