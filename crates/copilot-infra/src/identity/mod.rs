//! Host identity session backed by stored credentials.
//!
//! Resolution order for a normal request (first match wins):
//! 1. `PULUMI_ACCESS_TOKEN`
//! 2. the credential store (OS keychain)
//! 3. an interactive prompt, whose answer is saved to the store
//!
//! A forced request skips 1 and 2 and goes straight to the prompt.

pub mod env;
pub mod login;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use copilot_core::auth::credential::CredentialStore;
use copilot_core::auth::session::IdentitySession;
use copilot_types::auth::{AuthenticationToken, SessionRequest};
use copilot_types::error::CopilotError;

use self::env::EnvTokenSource;

/// Asks the user for an access token. Implemented by the host.
pub trait CredentialPrompt: Send + Sync {
    /// Prompt for a token, showing `detail` when re-authentication was
    /// forced. `Ok(None)` means the user declined.
    fn prompt_token(
        &self,
        detail: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Option<SecretString>, CopilotError>> + Send;
}

/// [`IdentitySession`] over the environment, a [`CredentialStore`] and a
/// [`CredentialPrompt`].
pub struct StoredCredentialSession<C, P> {
    env: Option<EnvTokenSource>,
    store: C,
    prompt: P,
}

impl<C: CredentialStore, P: CredentialPrompt> StoredCredentialSession<C, P> {
    pub fn new(store: C, prompt: P) -> Self {
        Self {
            env: Some(EnvTokenSource::new()),
            store,
            prompt,
        }
    }

    /// Replace (or disable, with `None`) the environment source.
    pub fn with_env(mut self, env: Option<EnvTokenSource>) -> Self {
        self.env = env;
        self
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    async fn cached_token(&self) -> Option<String> {
        if let Some(token) = self.env.as_ref().and_then(EnvTokenSource::token) {
            debug!(source = "environment", "using cached access token");
            return Some(token);
        }
        match self.store.load().await {
            Ok(Some(token)) if !token.trim().is_empty() => {
                debug!(source = "credential store", "using cached access token");
                Some(token)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "credential store unavailable");
                None
            }
        }
    }
}

impl<C: CredentialStore, P: CredentialPrompt> IdentitySession for StoredCredentialSession<C, P> {
    async fn get_session(
        &self,
        request: SessionRequest,
    ) -> Result<Option<AuthenticationToken>, CopilotError> {
        if !request.force_new_session {
            if let Some(token) = self.cached_token().await {
                return Ok(Some(AuthenticationToken::new(token)));
            }
        }

        let Some(secret) = self.prompt.prompt_token(request.detail.as_deref()).await? else {
            info!("sign-in declined");
            return Ok(None);
        };
        let token = secret.expose_secret().trim().to_string();
        if token.is_empty() {
            info!("sign-in declined");
            return Ok(None);
        }

        if let Err(e) = self.store.store(&token).await {
            warn!(error = %e, "could not save access token");
        }
        Ok(Some(AuthenticationToken::new(token)))
    }
}
