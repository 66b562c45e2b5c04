use crate::core::domain::error::ValidationError;
use crate::core::domain::value_object::proxmox_host::ProxmoxHost;
use std::fmt;
use url::Url;

const API_ROOT: &str = "api2/json/";
const MAX_URL_LENGTH: usize = 2083;

/// A validated Proxmox API root URL, always ending in `/api2/json/`.
///
/// Endpoint paths are resolved relative to this root, so `nodes/pve1/status`
/// becomes `https://pve.example.com:8006/api2/json/nodes/pve1/status`.
///
/// # Examples
///
/// ```
/// use pve_monitor::{ProxmoxHost, ProxmoxUrl};
///
/// let host = ProxmoxHost::new("pve.example.com").unwrap();
/// let url = ProxmoxUrl::new(&host, 8006, true).unwrap();
/// assert_eq!(url.as_str(), "https://pve.example.com:8006/api2/json/");
/// assert_eq!(
///     url.endpoint("nodes").unwrap().as_str(),
///     "https://pve.example.com:8006/api2/json/nodes"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxUrl(Url);

impl ProxmoxUrl {
    /// Builds the API root from host and port.
    ///
    /// # Errors
    /// Returns `ValidationError` if the port is zero or the resulting URL is invalid.
    pub fn new(host: &ProxmoxHost, port: u16, secure: bool) -> Result<Self, ValidationError> {
        if port == 0 {
            return Err(ValidationError::Field {
                field: "port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }
        let scheme = if secure { "https" } else { "http" };
        Self::parse(&format!("{}://{}:{}/", scheme, host.authority(), port))
    }

    /// Parses an explicit base URL. The `/api2/json/` root is appended when
    /// the URL does not already point at it.
    ///
    /// # Errors
    /// Returns `ValidationError` on an unparseable URL or a non-HTTP scheme.
    pub fn parse(base: &str) -> Result<Self, ValidationError> {
        if base.len() > MAX_URL_LENGTH {
            return Err(ValidationError::Format(format!(
                "URL exceeds maximum length of {} characters",
                MAX_URL_LENGTH
            )));
        }

        let mut url = Url::parse(base)
            .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::ConstraintViolation(format!(
                "Invalid scheme '{}'. Must be one of: http, https",
                url.scheme()
            )));
        }

        url.set_query(None);
        url.set_fragment(None);

        let path = url.path().trim_end_matches('/').to_string();
        let root = API_ROOT.trim_end_matches('/');
        let path = if path.ends_with(root) {
            format!("{}/", path)
        } else {
            format!("{}/{}", path, API_ROOT)
        };
        url.set_path(&path);

        Ok(Self(url))
    }

    /// Resolves an API path (optionally carrying a query string) against the root.
    ///
    /// # Errors
    /// Returns `ValidationError` if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, ValidationError> {
        self.0
            .join(path.trim_start_matches('/'))
            .map_err(|e| ValidationError::Format(format!("Invalid API path '{}': {}", path, e)))
    }

    /// Returns the root as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProxmoxUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
