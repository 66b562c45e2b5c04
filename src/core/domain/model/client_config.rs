use std::time::Duration;

/// Client-side rate limit applied to every upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Tunables of the upstream client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Timeout for inventory, status and configuration calls.
    pub inventory_timeout: Duration,
    /// Timeout for RRD history and task list calls.
    pub history_timeout: Duration,
    /// How long a ticket is reused before logging in again.
    pub ticket_lifetime: Duration,
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            inventory_timeout: Duration::from_secs(5),
            history_timeout: Duration::from_secs(10),
            // PVE tickets are valid for two hours.
            ticket_lifetime: Duration::from_secs(2 * 60 * 60),
            rate_limit: None,
        }
    }
}
