//! Maps raw upstream records onto the canonical metrics model.
//!
//! All derived values (percentages, rounding, uptime and byte renderings)
//! are computed here and nowhere else, for live snapshots and history alike.
//! Every function is pure.

use crate::core::domain::{
    model::{
        cluster_node::ClusterNode,
        cluster_task::{ClusterTask, TaskStatus},
        guest::{LxcListItem, RawGuest, VmListItem},
        guest_resource::GuestResource,
        node_list_item::NodeListItem,
        node_status::NodeStatus,
        resource_detail::{
            ConfigEntry, ContainerSettings, GuestConfig, GuestSettings, ResourceDetail,
            VmSettings,
        },
        rrd_sample::{GuestRrdSample, NodeRrdSample},
        task_list_item::TaskListItem,
        time_series::TimeSeriesPoint,
    },
    value_object::GuestKind,
};
use serde_json::Value;

/// Status text upstream records for a task that finished cleanly.
pub const TASK_SUCCESS_SENTINEL: &str = "OK";

/// Configuration key prefixes that name a disk bus.
const DISK_PREFIXES: [&str; 6] = ["scsi", "sata", "ide", "virtio", "rootfs", "mp"];

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Operation code → label. Unknown codes are shown verbatim.
const TASK_LABELS: &[(&str, &str)] = &[
    ("qmstart", "VM start"),
    ("qmstop", "VM stop"),
    ("qmshutdown", "VM shutdown"),
    ("qmreboot", "VM reboot"),
    ("qmsuspend", "VM suspend"),
    ("qmresume", "VM resume"),
    ("qmcreate", "VM create"),
    ("qmdestroy", "VM destroy"),
    ("qmclone", "VM clone"),
    ("qmmigrate", "VM migrate"),
    ("qmrestore", "VM restore"),
    ("qmsnapshot", "VM snapshot"),
    ("qmrollback", "VM snapshot rollback"),
    ("qmdelsnapshot", "VM snapshot delete"),
    ("qmconfig", "VM configure"),
    ("vzstart", "CT start"),
    ("vzstop", "CT stop"),
    ("vzshutdown", "CT shutdown"),
    ("vzreboot", "CT reboot"),
    ("vzcreate", "CT create"),
    ("vzdestroy", "CT destroy"),
    ("vzmigrate", "CT migrate"),
    ("vzrestore", "CT restore"),
    ("vzdump", "Backup"),
    ("startall", "Start all guests"),
    ("stopall", "Stop all guests"),
    ("aptupdate", "Package update"),
    ("imgcopy", "Image copy"),
    ("download", "Download"),
    ("srvreload", "Service reload"),
    ("srvrestart", "Service restart"),
];

/// Rounds to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scales an upstream CPU fraction (0.0–1.0) to a one-decimal percent.
#[must_use]
pub fn cpu_percent(fraction: Option<f64>) -> f64 {
    round1(fraction.unwrap_or(0.0) * 100.0)
}

/// `used / max * 100`, one decimal; `0` whenever `max` is not positive.
#[must_use]
pub fn percent(used: f64, max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    round1(used / max * 100.0)
}

/// Renders uptime compactly: `"{d}j {h}h {m}m"`, `"{h}h {m}m"` or `"{m}m"`.
/// Zero is `"N/A"`. Truncates; seconds are never shown.
#[must_use]
pub fn format_uptime(seconds: u64) -> String {
    if seconds == 0 {
        return "N/A".to_string();
    }
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if days > 0 {
        format!("{}j {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Renders a byte count with one decimal in the first unit below 1024.
#[must_use]
pub fn format_bytes(bytes: f64) -> String {
    if bytes == 0.0 || !bytes.is_finite() {
        return "0 B".to_string();
    }
    let mut value = bytes;
    for unit in BYTE_UNITS {
        if value.abs() < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} PB", value)
}

/// Combines a node list entry with its detailed status.
#[must_use]
pub fn normalize_node(item: &NodeListItem, status: &NodeStatus) -> ClusterNode {
    let memory = status.memory.clone().unwrap_or_default();
    let rootfs = status.rootfs.clone().unwrap_or_default();
    let mem_used = memory.used.unwrap_or(0);
    let mem_total = memory.total.unwrap_or(0);
    let disk_used = rootfs.used.unwrap_or(0);
    let disk_total = rootfs.total.unwrap_or(0);
    let uptime = status.uptime.unwrap_or(0);

    ClusterNode {
        name: item.node.clone(),
        status: item.status.clone(),
        cpu_usage: cpu_percent(status.cpu),
        cpu_cores: status
            .cpuinfo
            .as_ref()
            .and_then(|info| info.cpus)
            .or(item.maxcpu)
            .unwrap_or(1),
        mem_used,
        mem_total,
        mem_percent: percent(mem_used as f64, mem_total as f64),
        disk_used,
        disk_total,
        disk_percent: percent(disk_used as f64, disk_total as f64),
        uptime,
        uptime_formatted: format_uptime(uptime),
    }
}

/// Normalizes a VM record owned by `node`.
#[must_use]
pub fn normalize_vm(node: &str, vm: &VmListItem) -> GuestResource {
    let name = vm
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| synthesized_name(GuestKind::Vm, vm.vmid));
    build_resource(
        node,
        GuestKind::Vm,
        GuestCounters {
            vmid: vm.vmid,
            name,
            status: &vm.status,
            cpu: vm.cpu,
            cpus: vm.cpus.or(vm.maxcpu),
            mem: vm.mem,
            maxmem: vm.maxmem,
            disk: vm.disk,
            maxdisk: vm.maxdisk,
            netin: vm.netin,
            netout: vm.netout,
            uptime: vm.uptime,
        },
    )
}

/// Normalizes a container record owned by `node`. Name falls back to the
/// container hostname, then to `CT-{vmid}`.
#[must_use]
pub fn normalize_container(node: &str, ct: &LxcListItem) -> GuestResource {
    let name = ct
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| ct.hostname.clone().filter(|h| !h.is_empty()))
        .unwrap_or_else(|| synthesized_name(GuestKind::Container, ct.vmid));
    build_resource(
        node,
        GuestKind::Container,
        GuestCounters {
            vmid: ct.vmid,
            name,
            status: &ct.status,
            cpu: ct.cpu,
            cpus: ct.cpus.or(ct.maxcpu),
            mem: ct.mem,
            maxmem: ct.maxmem,
            disk: ct.disk,
            maxdisk: ct.maxdisk,
            netin: ct.netin,
            netout: ct.netout,
            uptime: ct.uptime,
        },
    )
}

/// Dispatches on the guest kind.
#[must_use]
pub fn normalize_guest(node: &str, raw: &RawGuest) -> GuestResource {
    match raw {
        RawGuest::Vm(vm) => normalize_vm(node, vm),
        RawGuest::Container(ct) => normalize_container(node, ct),
    }
}

fn synthesized_name(kind: GuestKind, vmid: u32) -> String {
    format!("{}-{}", kind.name_prefix(), vmid)
}

/// The projection both guest shapes share.
struct GuestCounters<'a> {
    vmid: u32,
    name: String,
    status: &'a str,
    cpu: Option<f64>,
    cpus: Option<u64>,
    mem: Option<u64>,
    maxmem: Option<u64>,
    disk: Option<u64>,
    maxdisk: Option<u64>,
    netin: Option<u64>,
    netout: Option<u64>,
    uptime: Option<u64>,
}

fn build_resource(node: &str, kind: GuestKind, c: GuestCounters<'_>) -> GuestResource {
    let mem_used = c.mem.unwrap_or(0);
    let mem_max = c.maxmem.unwrap_or(0);
    let uptime = c.uptime.unwrap_or(0);
    GuestResource {
        id: c.vmid,
        name: c.name,
        kind,
        status: c.status.to_string(),
        node: node.to_string(),
        cpu_usage: cpu_percent(c.cpu),
        cpu_cores: c.cpus.unwrap_or(1),
        mem_used,
        mem_max,
        mem_percent: percent(mem_used as f64, mem_max as f64),
        disk_used: c.disk.unwrap_or(0),
        disk_max: c.maxdisk.unwrap_or(0),
        uptime,
        uptime_formatted: format_uptime(uptime),
        netin: c.netin.unwrap_or(0),
        netout: c.netout.unwrap_or(0),
    }
}

/// Normalizes a node RRD sample; `None` when the sample has no timestamp.
#[must_use]
pub fn normalize_node_sample(sample: &NodeRrdSample) -> Option<TimeSeriesPoint> {
    let time = sample.time?;
    Some(build_point(
        time,
        sample.cpu,
        sample.memused,
        sample.memtotal,
        [sample.netin, sample.netout, sample.diskread, sample.diskwrite],
    ))
}

/// Normalizes a guest RRD sample; `None` when the sample has no timestamp.
#[must_use]
pub fn normalize_guest_sample(sample: &GuestRrdSample) -> Option<TimeSeriesPoint> {
    let time = sample.time?;
    Some(build_point(
        time,
        sample.cpu,
        sample.mem,
        sample.maxmem,
        [sample.netin, sample.netout, sample.diskread, sample.diskwrite],
    ))
}

fn build_point(
    time: u64,
    cpu: Option<f64>,
    mem_used: Option<f64>,
    mem_total: Option<f64>,
    [netin, netout, diskread, diskwrite]: [Option<f64>; 4],
) -> TimeSeriesPoint {
    let mem_used = mem_used.unwrap_or(0.0).max(0.0);
    let mem_total = mem_total.unwrap_or(0.0).max(0.0);
    TimeSeriesPoint {
        time,
        cpu_usage: cpu_percent(cpu),
        mem_used: mem_used as u64,
        mem_total: mem_total as u64,
        mem_percent: percent(mem_used, mem_total),
        netin: netin.unwrap_or(0.0),
        netout: netout.unwrap_or(0.0),
        diskread: diskread.unwrap_or(0.0),
        diskwrite: diskwrite.unwrap_or(0.0),
    }
}

/// Human label for an operation code.
#[must_use]
pub fn task_description(code: &str) -> String {
    TASK_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Derives status, duration and description for one raw task.
#[must_use]
pub fn normalize_task(raw: &TaskListItem) -> ClusterTask {
    let starttime = raw.starttime.unwrap_or(0);
    let raw_status = raw.status.clone().unwrap_or_default();

    let (status, error, duration) = match raw.endtime {
        None => (TaskStatus::Running, String::new(), 0),
        Some(end) => {
            let duration = end.saturating_sub(starttime);
            if raw_status == TASK_SUCCESS_SENTINEL {
                (TaskStatus::Success, String::new(), duration)
            } else {
                (TaskStatus::Error, raw_status, duration)
            }
        }
    };

    ClusterTask {
        id: raw.upid.clone(),
        task_type: raw.task_type.clone(),
        description: task_description(&raw.task_type),
        status,
        node: raw.node.clone(),
        user: raw.user.clone(),
        vmid: raw.id.clone().filter(|id| !id.is_empty()),
        starttime,
        endtime: raw.endtime,
        duration,
        error,
    }
}

fn config_string(config: &GuestConfig, key: &str) -> Option<String> {
    match config.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn config_u64(config: &GuestConfig, key: &str) -> Option<u64> {
    match config.get(key)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Every `net*` key with its raw value.
#[must_use]
pub fn network_entries(config: &GuestConfig) -> Vec<ConfigEntry> {
    config
        .iter()
        .filter(|(key, _)| key.starts_with("net"))
        .filter_map(|(key, _)| {
            config_string(config, key).map(|value| ConfigEntry {
                key: key.clone(),
                value,
            })
        })
        .collect()
}

/// Every disk-bus key whose value looks like a storage volume (`storage:volume`).
#[must_use]
pub fn disk_entries(config: &GuestConfig) -> Vec<ConfigEntry> {
    config
        .iter()
        .filter(|(key, _)| DISK_PREFIXES.iter().any(|prefix| key.starts_with(prefix)))
        .filter_map(|(key, value)| match value {
            Value::String(s) if s.contains(':') => Some(ConfigEntry {
                key: key.clone(),
                value: s.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Builds the detail view from a guest's configuration and live status.
///
/// `vmid` is the requested id; status payloads do not always echo it.
#[must_use]
pub fn normalize_detail(
    node: &str,
    vmid: u32,
    status: &RawGuest,
    config: &GuestConfig,
) -> ResourceDetail {
    let mut status = status.clone();
    match &mut status {
        RawGuest::Vm(vm) => {
            vm.vmid = vmid;
            vm.name = vm
                .name
                .take()
                .filter(|n| !n.is_empty())
                .or_else(|| config_string(config, "name"));
        }
        RawGuest::Container(ct) => {
            ct.vmid = vmid;
            ct.hostname = ct
                .hostname
                .take()
                .filter(|h| !h.is_empty())
                .or_else(|| config_string(config, "hostname"));
        }
    }
    let resource = normalize_guest(node, &status);

    let settings = match status.kind() {
        GuestKind::Vm => GuestSettings::Vm(VmSettings {
            sockets: config_u64(config, "sockets"),
            cores: config_u64(config, "cores"),
            ostype: config_string(config, "ostype"),
            boot: config_string(config, "boot"),
            bios: config_string(config, "bios"),
            machine: config_string(config, "machine"),
            scsihw: config_string(config, "scsihw"),
        }),
        GuestKind::Container => GuestSettings::Container(ContainerSettings {
            cores: config_u64(config, "cores"),
            ostype: config_string(config, "ostype"),
            hostname: config_string(config, "hostname"),
            arch: config_string(config, "arch"),
            swap: config_u64(config, "swap"),
        }),
    };

    ResourceDetail {
        mem_used_formatted: format_bytes(resource.mem_used as f64),
        mem_max_formatted: format_bytes(resource.mem_max as f64),
        disk_max_formatted: format_bytes(resource.disk_max as f64),
        resource,
        settings,
        description: config_string(config, "description"),
        networks: network_entries(config),
        disks: disk_entries(config),
    }
}
