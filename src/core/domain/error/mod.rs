use thiserror::Error;

/// The main error type for monitoring operations.
///
/// Every upstream call resolves to either a value or one of these variants;
/// nothing crosses a component boundary as a panic. Collection paths decide
/// per branch whether a variant aborts the aggregate or is absorbed.
#[derive(Error, Debug)]
pub enum ProxmoxError {
    /// The upstream API could not be reached (connect failure, TLS failure,
    /// per-call timeout).
    ///
    /// # Fields
    /// * `0` - A description of what went wrong on the wire
    #[error("Transport error: {0}")]
    Transport(String),

    /// The upstream API answered with a non-success status code.
    ///
    /// # Fields
    /// * `status` - The HTTP status code returned
    /// * `path` - The API path that was requested
    #[error("Upstream returned {status} for '{path}'")]
    UpstreamStatus { status: u16, path: String },

    /// The targeted node or guest does not exist upstream.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Represents authentication failures
    ///
    /// # Fields
    /// * `0` - A description of the authentication failure
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The upstream payload did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Represents validation failures of configuration or request input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ProxmoxError {
    /// Returns `true` when the upstream answered but refused the request,
    /// as opposed to never being reached.
    pub fn is_upstream_status(&self) -> bool {
        matches!(self, ProxmoxError::UpstreamStatus { .. })
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with a ProxmoxError
pub type ProxmoxResult<T> = Result<T, ProxmoxError>;
