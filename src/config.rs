//! Process configuration, read once at startup from flags or environment.

use crate::{ProxmoxError, ProxmoxMonitor, ProxmoxMonitorBuilder, ProxmoxResult, ValidationError};
use clap::{ArgAction, Parser};
use std::net::SocketAddr;

#[derive(Parser, Clone)]
#[command(name = "pve-monitor", version, about = "Read-only Proxmox VE cluster monitor")]
pub struct MonitorConfig {
    /// Proxmox host name or address.
    #[arg(long, env = "PROXMOX_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long, env = "PROXMOX_PORT", default_value_t = 8006)]
    pub port: u16,

    /// Full API root, overriding host and port (e.g. `https://pve:8006/api2/json`).
    #[arg(long, env = "PROXMOX_BASE_URL")]
    pub base_url: Option<String>,

    /// User owning the API token.
    #[arg(long, env = "PROXMOX_API_USER", default_value = "root@pam")]
    pub api_user: String,

    #[arg(long, env = "PROXMOX_API_TOKEN_NAME")]
    pub token_name: Option<String>,

    #[arg(long, env = "PROXMOX_API_TOKEN", hide_env_values = true)]
    pub token_secret: Option<String>,

    /// Ticket authentication, used when no API token is configured.
    #[arg(long, env = "PROXMOX_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "PROXMOX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "PROXMOX_REALM", default_value = "pam")]
    pub realm: String,

    /// Verify the upstream TLS certificate. Off by default for self-signed clusters.
    #[arg(long, env = "PROXMOX_VERIFY_TLS", default_value_t = false, action = ArgAction::Set)]
    pub verify_tls: bool,

    /// Client-side limit on upstream requests per second.
    #[arg(long, env = "PROXMOX_RATE_LIMIT_RPS")]
    pub rate_limit_rps: Option<u32>,

    /// Burst allowance for the rate limit; defaults to the per-second rate.
    #[arg(long, env = "PROXMOX_RATE_LIMIT_BURST", requires = "rate_limit_rps")]
    pub rate_limit_burst: Option<u32>,

    /// Address the HTTP API listens on.
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind_addr: SocketAddr,
}

impl MonitorConfig {
    /// Applies this configuration to a monitor builder.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Validation` when neither a complete API token
    /// nor a username/password pair is configured.
    pub fn builder(&self) -> ProxmoxResult<ProxmoxMonitorBuilder> {
        let mut builder = ProxmoxMonitor::builder()
            .host(self.host.clone())
            .port(self.port)
            .accept_invalid_certs(!self.verify_tls);

        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }

        builder = match (
            &self.token_name,
            &self.token_secret,
            &self.username,
            &self.password,
        ) {
            (Some(name), Some(secret), _, _) => {
                builder.api_token(self.api_user.clone(), name.clone(), secret.clone())
            }
            (_, _, Some(username), Some(password)) => {
                builder.credentials(username.clone(), password.clone(), self.realm.clone())
            }
            _ => {
                return Err(ProxmoxError::Validation(ValidationError::Field {
                    field: "credentials".to_string(),
                    message: "set PROXMOX_API_TOKEN_NAME and PROXMOX_API_TOKEN, \
                              or PROXMOX_USERNAME and PROXMOX_PASSWORD"
                        .to_string(),
                }));
            }
        };

        if let Some(rps) = self.rate_limit_rps {
            builder = builder.rate_limit(rps, self.rate_limit_burst.unwrap_or(rps));
        }

        Ok(builder)
    }

    /// Builds the monitor this configuration describes.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Validation` for incomplete or malformed settings.
    pub fn into_monitor(&self) -> ProxmoxResult<ProxmoxMonitor> {
        self.builder()?.build()
    }

    /// Which authentication scheme the configuration selects.
    pub fn auth_scheme(&self) -> &'static str {
        if self.token_name.is_some() && self.token_secret.is_some() {
            "api-token"
        } else {
            "ticket"
        }
    }
}
