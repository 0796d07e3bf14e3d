//! Environment variable token source.
//!
//! Read-only: a token supplied through the environment is never written back
//! and is skipped when a new session is forced, since it is the token that
//! was just rejected.

/// Variable the Pulumi CLI also reads.
pub const ACCESS_TOKEN_ENV: &str = "PULUMI_ACCESS_TOKEN";

/// Reads an access token from one environment variable.
pub struct EnvTokenSource {
    var: String,
}

impl EnvTokenSource {
    pub fn new() -> Self {
        Self::with_var(ACCESS_TOKEN_ENV)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// The token, if the variable is set to something non-blank.
    pub fn token(&self) -> Option<String> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
            Ok(_) => None,
            // Present but not Unicode: treat as unset, tokens are ASCII
            Err(_) => None,
        }
    }
}

impl Default for EnvTokenSource {
    fn default() -> Self {
        Self::new()
    }
}
