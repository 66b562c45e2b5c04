use crate::core::domain::error::ValidationError;
use std::fmt;

/// A long-lived Proxmox API token (`<user>@<realm>!<tokenname>` + secret).
///
/// Attached to every request as
/// `Authorization: PVEAPIToken=<user>!<tokenname>=<secret>`.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxmoxApiToken {
    user: String,
    token_name: String,
    secret: String,
}

impl ProxmoxApiToken {
    /// Creates a validated API token.
    ///
    /// # Errors
    /// Returns `ValidationError` if any part is empty, the user lacks a realm
    /// or the token name contains reserved separators.
    pub fn new(
        user: impl Into<String>,
        token_name: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let token = Self {
            user: user.into(),
            token_name: token_name.into(),
            secret: secret.into(),
        };
        validate_api_token(&token)?;
        Ok(token)
    }

    /// The authenticating user, e.g. `root@pam`.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The full token id, e.g. `root@pam!monitor`.
    #[must_use]
    pub fn token_id(&self) -> String {
        format!("{}!{}", self.user, self.token_name)
    }

    /// Value of the `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("PVEAPIToken={}={}", self.token_id(), self.secret)
    }
}

// The secret never reaches logs.
impl fmt::Debug for ProxmoxApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxmoxApiToken")
            .field("token_id", &self.token_id())
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn validate_api_token(token: &ProxmoxApiToken) -> Result<(), ValidationError> {
    for (field, value) in [
        ("api_user", &token.user),
        ("api_token_name", &token.token_name),
        ("api_token", &token.secret),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::Field {
                field: field.to_string(),
                message: format!("{} cannot be empty", field),
            });
        }
    }

    if !token.user.contains('@') {
        return Err(ValidationError::Format(format!(
            "API user '{}' must include a realm (user@realm)",
            token.user
        )));
    }

    if token.token_name.contains(['!', '=', ' ']) {
        return Err(ValidationError::Format(
            "API token name cannot contain '!', '=' or spaces".to_string(),
        ));
    }

    Ok(())
}
