use crate::core::domain::value_object::{ProxmoxApiToken, ProxmoxHost, ProxmoxUrl};
use std::fmt;

/// Username/password/realm triple exchanged for a session ticket.
#[derive(Clone, PartialEq, Eq)]
pub struct TicketCredentials {
    pub username: String,
    pub password: String,
    pub realm: String,
}

impl fmt::Debug for TicketCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("realm", &self.realm)
            .finish()
    }
}

/// How requests are authenticated upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Static API token sent on every request.
    ApiToken(ProxmoxApiToken),
    /// Session ticket obtained from `/access/ticket` and refreshed on expiry.
    Ticket(TicketCredentials),
}

/// Everything needed to reach one Proxmox API endpoint. Fixed at startup.
#[derive(Debug, Clone)]
pub struct ProxmoxConnection {
    host: ProxmoxHost,
    url: ProxmoxUrl,
    credentials: Credentials,
    accept_invalid_certs: bool,
}

impl ProxmoxConnection {
    pub fn new(
        host: ProxmoxHost,
        url: ProxmoxUrl,
        credentials: Credentials,
        accept_invalid_certs: bool,
    ) -> Self {
        Self {
            host,
            url,
            credentials,
            accept_invalid_certs,
        }
    }

    pub fn host(&self) -> &ProxmoxHost {
        &self.host
    }

    pub fn url(&self) -> &ProxmoxUrl {
        &self.url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Self-signed upstream certificates are accepted when `true`.
    pub fn accepts_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }
}
