//! Verifying an access token before it is stored.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use copilot_core::auth::credential::CredentialStore;
use copilot_core::auth::provider::TokenProvider;
use copilot_core::auth::session::IdentitySession;
use copilot_core::backend::CopilotBackend;
use copilot_types::auth::{AuthenticationToken, SessionRequest};
use copilot_types::config::CopilotConfig;
use copilot_types::error::CopilotError;
use copilot_types::user::User;

use crate::pulumi::PulumiApiClient;

/// Session that only ever yields the token it was built with. Bypasses the
/// environment and the store.
pub struct SuppliedTokenSession {
    token: String,
}

impl SuppliedTokenSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl IdentitySession for SuppliedTokenSession {
    async fn get_session(
        &self,
        _request: SessionRequest,
    ) -> Result<Option<AuthenticationToken>, CopilotError> {
        Ok(Some(AuthenticationToken::new(self.token.clone())))
    }
}

/// Check `token` against `GET /api/user` and write it to `store` only once
/// the backend accepts it.
pub async fn login_with_token<C: CredentialStore>(
    config: &CopilotConfig,
    user_agent: &str,
    store: &C,
    token: &str,
) -> anyhow::Result<User> {
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("No access token given.");
    }

    let tokens = Arc::new(TokenProvider::new(SuppliedTokenSession::new(token)));
    let client = PulumiApiClient::new(config, user_agent, tokens)?;
    let user = client.get_user_info(&CancellationToken::new()).await?;

    store.store(token).await?;
    info!(user = %user.github_login, "access token verified and stored");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        token: Mutex<Option<String>>,
    }

    impl MemoryStore {
        fn current(&self) -> Option<String> {
            self.token.lock().unwrap().clone()
        }
    }

    impl CredentialStore for MemoryStore {
        async fn load(&self) -> Result<Option<String>, CopilotError> {
            Ok(self.current())
        }

        async fn store(&self, token: &str) -> Result<(), CopilotError> {
            *self.token.lock().unwrap() = Some(token.to_string());
            Ok(())
        }

        async fn clear(&self) -> Result<bool, CopilotError> {
            Ok(self.token.lock().unwrap().take().is_some())
        }
    }

    fn config_for(server: &MockServer) -> CopilotConfig {
        CopilotConfig {
            api_url: server.uri(),
            ..CopilotConfig::default()
        }
    }

    #[tokio::test]
    async fn test_accepted_token_is_stored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .and(header("authorization", "token pul-good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u-1",
                "name": "Ada",
                "email": "ada@example.com",
                "githubLogin": "ada",
                "avatarUrl": "",
                "organizations": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = MemoryStore::default();
        let user = login_with_token(&config_for(&server), "pulumi-copilot-cli/test", &store, " pul-good ")
            .await
            .unwrap();

        assert_eq!(user.github_login, "ada");
        assert_eq!(store.current(), Some("pul-good".to_string()));
    }

    #[tokio::test]
    async fn test_rejected_token_is_not_stored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .and(header("authorization", "token pul-bad"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let store = MemoryStore::default();
        let err = login_with_token(&config_for(&server), "pulumi-copilot-cli/test", &store, "pul-bad")
            .await
            .unwrap_err();

        assert_eq!(err.downcast_ref::<CopilotError>(), Some(&CopilotError::rejected()));
        assert_eq!(store.current(), None);
    }

    #[tokio::test]
    async fn test_unreachable_api_stores_nothing() {
        let config = CopilotConfig {
            api_url: "http://127.0.0.1:1".to_string(),
            ..CopilotConfig::default()
        };
        let store = MemoryStore::default();
        let err = login_with_token(&config, "pulumi-copilot-cli/test", &store, "pul-any")
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CopilotError>(),
            Some(CopilotError::Connectivity(_))
        ));
        assert_eq!(store.current(), None);
    }

    #[tokio::test]
    async fn test_blank_token_never_reaches_the_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = MemoryStore::default();
        assert!(login_with_token(&config_for(&server), "pulumi-copilot-cli/test", &store, "   ")
            .await
            .is_err());
        assert_eq!(store.current(), None);
    }
}
