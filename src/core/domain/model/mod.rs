pub mod client_config;
pub mod cluster_node;
pub mod cluster_summary;
pub mod cluster_task;
pub mod guest;
pub mod guest_resource;
pub mod node_list_item;
pub mod node_status;
pub mod proxmox_auth;
pub mod proxmox_connection;
pub mod resource_detail;
pub mod rrd_sample;
pub mod task_list_item;
pub mod time_series;
