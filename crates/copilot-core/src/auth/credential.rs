//! Credential storage port.

use copilot_types::error::CopilotError;

/// Durable storage for a single access token.
///
/// Implemented by the OS keychain adapter in copilot-infra.
pub trait CredentialStore: Send + Sync {
    /// Load the stored token, if any.
    fn load(&self) -> impl std::future::Future<Output = Result<Option<String>, CopilotError>> + Send;

    /// Replace the stored token.
    fn store(&self, token: &str) -> impl std::future::Future<Output = Result<(), CopilotError>> + Send;

    /// Remove the stored token. Returns `false` if nothing was stored.
    fn clear(&self) -> impl std::future::Future<Output = Result<bool, CopilotError>> + Send;
}
