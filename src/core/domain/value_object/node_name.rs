use crate::core::domain::error::ValidationError;
use std::fmt;

/// A cluster node name as used in API paths (`/nodes/{node}/...`).
///
/// Node names are hostnames, so anything outside `[A-Za-z0-9._-]` is
/// rejected before it can be spliced into a request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName(String);

impl NodeName {
    /// # Errors
    /// Returns `ValidationError` for empty, overlong or non-hostname values.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_node_name(&name)?;
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn validate_node_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Field {
            field: "node".to_string(),
            message: "Node name cannot be empty".to_string(),
        });
    }
    if name.len() > 63 {
        return Err(ValidationError::Format(format!(
            "Node name exceeds 63 characters (got {})",
            name.len()
        )));
    }
    if name.starts_with('.') || name.contains("..") {
        return Err(ValidationError::Format(format!(
            "Node name '{}' is not a hostname",
            name
        )));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.';
    if !name.chars().all(allowed) {
        return Err(ValidationError::Format(format!(
            "Node name '{}' contains invalid characters",
            name
        )));
    }
    Ok(())
}
