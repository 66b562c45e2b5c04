mod guest_kind;
mod node_name;
mod proxmox_api_token;
mod proxmox_csrf_token;
mod proxmox_host;
mod proxmox_ticket;
mod proxmox_uri;
pub(crate) mod serde_helpers;
mod timeframe;

pub use guest_kind::GuestKind;
pub use node_name::NodeName;
pub use proxmox_api_token::ProxmoxApiToken;
pub use proxmox_csrf_token::ProxmoxCSRFToken;
pub use proxmox_host::ProxmoxHost;
pub use proxmox_ticket::ProxmoxTicket;
pub use proxmox_uri::ProxmoxUrl;
pub use timeframe::Timeframe;
