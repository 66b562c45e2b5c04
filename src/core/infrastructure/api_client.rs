//! Upstream HTTP client: credential framing, TLS relaxation, per-call timeouts.

use crate::{
    auth::application::service::login_service::LoginService,
    core::domain::{
        error::{ProxmoxError, ProxmoxResult, ValidationError},
        model::{
            client_config::ClientConfig,
            proxmox_auth::ProxmoxAuth,
            proxmox_connection::{Credentials, ProxmoxConnection, TicketCredentials},
        },
    },
};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, RequestBuilder, StatusCode, header::AUTHORIZATION};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Read access to the Proxmox API.
///
/// `get` resolves `path` (relative to `/api2/json/`, query string allowed)
/// and returns the unwrapped `data` member of the response. Every failure is
/// a typed [`ProxmoxError`]; callers choose whether it aborts or is skipped.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProxmoxApi: Send + Sync {
    async fn get(&self, path: &str, timeout: Duration) -> ProxmoxResult<Value>;
}

/// Production [`ProxmoxApi`] backed by `reqwest`.
///
/// With token credentials the `Authorization: PVEAPIToken=...` header is added
/// to each request. With ticket credentials a ticket is obtained lazily,
/// reused until its lifetime elapses, and refreshed once on `401 Unauthorized`.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<ProxmoxConnection>,
    auth: Arc<RwLock<Option<ProxmoxAuth>>>,
    config: Arc<ClientConfig>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`. Ticket sessions start unauthenticated.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Validation` for a zero rate limit and
    /// `ProxmoxError::Transport` if the HTTP client cannot be built.
    pub fn new(connection: ProxmoxConnection, config: ClientConfig) -> ProxmoxResult<Self> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(connection.accepts_invalid_certs())
            .build()
            .map_err(|e| ProxmoxError::Transport(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let per_second = NonZeroU32::new(rl.requests_per_second).ok_or_else(|| {
                    ValidationError::Field {
                        field: "rate_limit.requests_per_second".to_string(),
                        message: "must be greater than 0".to_string(),
                    }
                })?;
                let burst =
                    NonZeroU32::new(rl.burst_size).ok_or_else(|| ValidationError::Field {
                        field: "rate_limit.burst_size".to_string(),
                        message: "must be greater than 0".to_string(),
                    })?;
                let quota = Quota::per_second(per_second).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            auth: Arc::new(RwLock::new(None)),
            config: Arc::new(config),
            rate_limiter,
        })
    }

    /// Sets the ticket session (used after an external login).
    #[cfg(test)]
    pub(crate) async fn set_auth(&self, auth: ProxmoxAuth) {
        let mut lock = self.auth.write().await;
        *lock = Some(auth);
    }

    /// Returns the current ticket session, if any.
    #[cfg(test)]
    pub(crate) async fn auth(&self) -> Option<ProxmoxAuth> {
        self.auth.read().await.clone()
    }

    async fn execute_get(&self, path: &str, timeout: Duration) -> ProxmoxResult<Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let ticket_credentials = match self.connection.credentials() {
            Credentials::Ticket(credentials) => {
                self.ensure_authenticated(credentials).await?;
                Some(credentials)
            }
            Credentials::ApiToken(_) => None,
        };

        let sent_ticket = self.current_ticket().await;
        let mut response = self.send(path, timeout).await?;

        // Ticket revoked or expired early: refresh once and retry; no further recursion.
        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(credentials) = ticket_credentials {
                debug!(path, "ticket rejected, logging in again");
                self.refresh_auth(credentials, sent_ticket.as_deref()).await?;
                response = self.send(path, timeout).await?;
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(ProxmoxError::UpstreamStatus {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let mut body = response.json::<Value>().await.map_err(|e| {
            ProxmoxError::Decode(format!("Failed to parse response for '{}': {}", path, e))
        })?;

        Ok(body
            .as_object_mut()
            .and_then(|object| object.remove("data"))
            .unwrap_or(Value::Null))
    }

    async fn send(&self, path: &str, timeout: Duration) -> ProxmoxResult<reqwest::Response> {
        let url = self.connection.url().endpoint(path)?;
        debug!(%url, timeout_ms = timeout.as_millis() as u64, "GET");

        let request = self.http_client.get(url).timeout(timeout);
        let request = self.with_credentials(request).await;

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProxmoxError::Transport(format!(
                    "Request to '{}' timed out after {}s",
                    path,
                    timeout.as_secs()
                ))
            } else {
                ProxmoxError::Transport(format!("HTTP request to '{}' failed: {}", path, e))
            }
        })
    }

    async fn with_credentials(&self, request: RequestBuilder) -> RequestBuilder {
        match self.connection.credentials() {
            Credentials::ApiToken(token) => {
                request.header(AUTHORIZATION, token.authorization_header())
            }
            Credentials::Ticket(_) => {
                let auth_guard = self.auth.read().await;
                match auth_guard.as_ref() {
                    Some(auth) => {
                        let request = request.header("Cookie", auth.ticket().as_cookie_header());
                        match auth.csrf_token() {
                            Some(csrf) => request.header("CSRFPreventionToken", csrf.as_str()),
                            None => request,
                        }
                    }
                    None => request,
                }
            }
        }
    }

    async fn current_ticket(&self) -> Option<String> {
        self.auth
            .read()
            .await
            .as_ref()
            .map(|auth| auth.ticket().as_str().to_string())
    }

    fn is_fresh(&self, auth: Option<&ProxmoxAuth>) -> bool {
        auth.is_some_and(|auth| !auth.ticket().is_expired(self.config.ticket_lifetime))
    }

    /// Ensures that we have a valid (non-expired) ticket. If not, logs in.
    ///
    /// The login runs under the write lock, so concurrent callers that find
    /// no ticket wait for a single login instead of each starting one.
    async fn ensure_authenticated(&self, credentials: &TicketCredentials) -> ProxmoxResult<()> {
        if self.is_fresh(self.auth.read().await.as_ref()) {
            return Ok(());
        }

        let mut lock = self.auth.write().await;
        // Someone else may have logged in while we waited for the lock.
        if self.is_fresh(lock.as_ref()) {
            return Ok(());
        }
        *lock = Some(self.login(credentials).await?);
        Ok(())
    }

    /// Replaces a ticket that upstream rejected.
    ///
    /// Skips the login when the stored ticket is no longer `rejected`, i.e.
    /// another request already refreshed it.
    async fn refresh_auth(
        &self,
        credentials: &TicketCredentials,
        rejected: Option<&str>,
    ) -> ProxmoxResult<()> {
        let mut lock = self.auth.write().await;
        let current = lock.as_ref().map(|auth| auth.ticket().as_str());
        if current.is_some() && current != rejected {
            return Ok(());
        }
        *lock = Some(self.login(credentials).await?);
        Ok(())
    }

    async fn login(&self, credentials: &TicketCredentials) -> ProxmoxResult<ProxmoxAuth> {
        LoginService::new()
            .execute(
                &self.http_client,
                &self.connection,
                credentials,
                self.config.inventory_timeout,
            )
            .await
            .inspect_err(|e| warn!(error = %e, "ticket login failed"))
    }
}

#[async_trait]
impl ProxmoxApi for ApiClient {
    async fn get(&self, path: &str, timeout: Duration) -> ProxmoxResult<Value> {
        self.execute_get(path, timeout).await
    }
}
