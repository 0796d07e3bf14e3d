//! Credential types.

use std::fmt;

/// A Pulumi access token.
///
/// Held transiently between the identity session and an outbound request;
/// `Debug` never prints the value.
#[derive(Clone)]
pub struct AuthenticationToken {
    access_token: String,
}

impl AuthenticationToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// The raw token, for building the `Authorization` header.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AuthenticationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationToken(\"***\")")
    }
}

/// Parameters for one request to the host identity mechanism.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRequest {
    /// Ignore any cached credential and ask the user again.
    pub force_new_session: bool,
    /// Why re-authentication is being requested, shown to the user.
    pub detail: Option<String>,
}
