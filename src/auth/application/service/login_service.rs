use crate::{
    auth::application::{
        request::login_request::LoginRequest, response::login_response::LoginResponse,
    },
    core::domain::{
        error::{ProxmoxError, ProxmoxResult},
        model::{
            proxmox_auth::ProxmoxAuth,
            proxmox_connection::{ProxmoxConnection, TicketCredentials},
        },
        value_object::{ProxmoxCSRFToken, ProxmoxTicket},
    },
};

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tracing::debug;

/// Exchanges username/password/realm for a ticket + CSRF token pair.
pub struct LoginService {
    default_headers: HeaderMap,
}

impl LoginService {
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self { default_headers }
    }

    pub async fn execute(
        &self,
        http_client: &Client,
        connection: &ProxmoxConnection,
        credentials: &TicketCredentials,
        timeout: Duration,
    ) -> ProxmoxResult<ProxmoxAuth> {
        let url = connection.url().endpoint("access/ticket")?;
        let request = LoginRequest {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            realm: credentials.realm.clone(),
        };

        debug!(user = %credentials.username, realm = %credentials.realm, "requesting ticket");

        let response = http_client
            .post(url)
            .headers(self.default_headers.clone())
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProxmoxError::Transport(format!("Login request failed: {}", e)))?;

        match response.status() {
            StatusCode::OK => self.handle_successful_login(response).await,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                ProxmoxError::Authentication("Invalid credentials provided".to_string()),
            ),
            status => Err(ProxmoxError::UpstreamStatus {
                status: status.as_u16(),
                path: "access/ticket".to_string(),
            }),
        }
    }

    async fn handle_successful_login(
        &self,
        response: reqwest::Response,
    ) -> ProxmoxResult<ProxmoxAuth> {
        let login_response = response.json::<LoginResponse>().await.map_err(|e| {
            ProxmoxError::Decode(format!("Failed to parse login response: {}", e))
        })?;

        let data = login_response.data.ok_or_else(|| {
            ProxmoxError::Authentication("Login rejected: empty ticket response".to_string())
        })?;

        let ticket = ProxmoxTicket::new(data.ticket)?;
        let csrf_token = ProxmoxCSRFToken::new(data.csrf_token)?;
        debug!(user = ?data.username, "ticket issued");

        Ok(ProxmoxAuth::new(ticket, Some(csrf_token)))
    }
}

impl Default for LoginService {
    fn default() -> Self {
        Self::new()
    }
}
