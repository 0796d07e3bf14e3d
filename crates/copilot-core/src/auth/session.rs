//! Host identity mechanism port.

use copilot_types::auth::{AuthenticationToken, SessionRequest};
use copilot_types::error::CopilotError;

/// Obtains access tokens from wherever the host keeps them, prompting the
/// user when needed.
///
/// Implementations live in copilot-infra (`StoredCredentialSession`).
pub trait IdentitySession: Send + Sync {
    /// Return a token, or `None` if the user declined to sign in.
    ///
    /// With `force_new_session` set, any cached credential must be ignored
    /// and `detail` shown to the user.
    fn get_session(
        &self,
        request: SessionRequest,
    ) -> impl std::future::Future<Output = Result<Option<AuthenticationToken>, CopilotError>> + Send;
}
