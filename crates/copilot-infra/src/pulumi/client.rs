//! PulumiApiClient -- concrete [`CopilotBackend`] over the Pulumi Cloud REST
//! API.
//!
//! Every call asks the token provider for a token first and sends it as
//! `Authorization: token <value>`. A 401 invalidates the provider so the next
//! call re-authenticates; the current call still fails. Calls race the
//! caller's cancellation token and are never retried.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use copilot_core::auth::provider::AuthenticationTokenProvider;
use copilot_core::backend::{CopilotBackend, cancellable};
use copilot_types::chat::{ChatRequest, ChatResponse};
use copilot_types::config::CopilotConfig;
use copilot_types::error::{CopilotError, TOKEN_REJECTED_DETAIL};
use copilot_types::user::User;

const USER_PATH: &str = "/api/user";
const CHAT_PATH: &str = "/api/ai/chat/preview";

/// Longest error body echoed back to the user.
const MAX_ERROR_BODY: usize = 512;

/// Pulumi Cloud client.
///
/// Does not derive Debug; the token provider may hold credentials.
pub struct PulumiApiClient<T> {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<T>,
}

impl<T: AuthenticationTokenProvider> PulumiApiClient<T> {
    /// Build a client for `config.api_url`, sending `user_agent` and
    /// `X-Pulumi-Source: {config.source}` on every request.
    pub fn new(config: &CopilotConfig, user_agent: &str, tokens: Arc<T>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        headers.insert("X-Pulumi-Source", HeaderValue::from_str(&config.source)?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn token_provider(&self) -> &Arc<T> {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&ChatRequest>,
    ) -> Result<R, CopilotError> {
        let token = self
            .tokens
            .request()
            .await?
            .ok_or(CopilotError::Unauthenticated)?;

        let mut request = self
            .client
            .request(method.clone(), self.url(path))
            .header(AUTHORIZATION, format!("token {}", token.access_token()));
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, path, "pulumi api request");
        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| CopilotError::Connectivity(e.to_string()))?;

        let status = response.status();
        debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pulumi api response"
        );

        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate(Some(TOKEN_REJECTED_DETAIL.to_string()));
            return Err(CopilotError::rejected());
        }
        if !status.is_success() {
            let mut error_body = response.text().await.unwrap_or_default();
            if error_body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| error_body.is_char_boundary(*i))
                    .unwrap_or(0);
                error_body.truncate(cut);
            }
            return Err(CopilotError::Connectivity(
                format!("HTTP {status}: {error_body}").trim_end().to_string(),
            ));
        }

        response.json::<R>().await.map_err(|e| {
            if e.is_decode() {
                CopilotError::InvalidResponse(e.to_string())
            } else {
                CopilotError::Connectivity(e.to_string())
            }
        })
    }
}

impl<T: AuthenticationTokenProvider> CopilotBackend for PulumiApiClient<T> {
    #[tracing::instrument(name = "pulumi.get_user_info", skip_all)]
    async fn get_user_info(&self, cancel: &CancellationToken) -> Result<User, CopilotError> {
        cancellable(cancel, self.call(Method::GET, USER_PATH, None)).await
    }

    #[tracing::instrument(
        name = "pulumi.send_prompt",
        skip_all,
        fields(org = %request.org_id(), conversation_id = ?request.conversation_id)
    )]
    async fn send_prompt(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatResponse, CopilotError> {
        cancellable(cancel, self.call(Method::POST, CHAT_PATH, Some(request))).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use copilot_core::auth::provider::TokenProvider;
    use copilot_core::auth::session::IdentitySession;
    use copilot_types::auth::{AuthenticationToken, SessionRequest};

    use super::*;

    /// Identity session handing out a fixed token and recording requests.
    struct FixedSession {
        token: Option<&'static str>,
        requests: Mutex<Vec<SessionRequest>>,
    }

    impl IdentitySession for FixedSession {
        async fn get_session(
            &self,
            request: SessionRequest,
        ) -> Result<Option<AuthenticationToken>, CopilotError> {
            self.requests.lock().unwrap().push(request);
            Ok(self.token.map(AuthenticationToken::new))
        }
    }

    fn client_for(
        server: &MockServer,
        token: Option<&'static str>,
    ) -> PulumiApiClient<TokenProvider<FixedSession>> {
        let config = CopilotConfig {
            api_url: server.uri(),
            ..CopilotConfig::default()
        };
        let tokens = Arc::new(TokenProvider::new(FixedSession {
            token,
            requests: Mutex::new(Vec::new()),
        }));
        PulumiApiClient::new(&config, "pulumi-copilot-cli/test", tokens).unwrap()
    }

    fn user_json() -> serde_json::Value {
        json!({
            "id": "u-1",
            "name": "Ada",
            "email": "ada@example.com",
            "githubLogin": "ada",
            "avatarUrl": "",
            "hasMFA": false,
            "organizations": [{"githubLogin": "acme", "name": "Acme", "avatarUrl": ""}]
        })
    }

    #[tokio::test]
    async fn test_get_user_info_sends_client_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .and(header("authorization", "token pul-123"))
            .and(header("user-agent", "pulumi-copilot-cli/test"))
            .and(header("x-pulumi-source", "cli"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("pul-123"));
        let user = client
            .get_user_info(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(user.organizations[0].github_login, "acme");
    }

    #[tokio::test]
    async fn test_send_prompt_posts_wire_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai/chat/preview"))
            .and(body_json(json!({
                "conversationId": "c-1",
                "query": "list my projects",
                "state": {"client": {"cloudContext": {"orgId": "acme", "url": "https://app.pulumi.com"}}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conversationId": "c-1",
                "messages": [{"kind": "response", "role": "assistant", "content": "3 projects"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("pul-123"));
        let request = ChatRequest::new(
            "list my projects",
            "acme",
            Some("https://app.pulumi.com".to_string()),
            Some("c-1".to_string()),
        );
        let response = client
            .send_prompt(&request, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.conversation_id, "c-1");
        assert_eq!(response.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_token_never_reaches_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client
            .get_user_info(&CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, CopilotError::Unauthenticated);
        assert_eq!(
            err.to_string(),
            "Please login to Pulumi Cloud to use this feature."
        );
    }

    #[tokio::test]
    async fn test_unauthorized_invalidates_and_next_call_forces_new_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("stale"));
        let err = client
            .get_user_info(&CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CopilotError::AuthenticationRejected {
                detail: TOKEN_REJECTED_DETAIL.to_string()
            }
        );
        assert!(client.token_provider().is_invalidated());

        let _ = client.get_user_info(&CancellationToken::new()).await;
        let requests = client.token_provider().session().requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].force_new_session);
        assert!(requests[1].force_new_session);
        assert_eq!(requests[1].detail.as_deref(), Some(TOKEN_REJECTED_DETAIL));
    }

    #[tokio::test]
    async fn test_server_error_is_connectivity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai/chat/preview"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("pul-123"));
        let err = client
            .send_prompt(&ChatRequest::new("hi", "acme", None, None), &CancellationToken::new())
            .await
            .unwrap_err();
        match &err {
            CopilotError::Connectivity(cause) => {
                assert!(cause.contains("503"));
                assert!(cause.contains("maintenance"));
            }
            other => panic!("expected connectivity error, got {other:?}"),
        }
        assert!(!client.token_provider().is_invalidated());
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("pul-123"));
        let err = client
            .get_user_info(&CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CopilotError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connectivity() {
        let config = CopilotConfig {
            api_url: "http://127.0.0.1:1".to_string(),
            ..CopilotConfig::default()
        };
        let tokens = Arc::new(TokenProvider::new(FixedSession {
            token: Some("pul-123"),
            requests: Mutex::new(Vec::new()),
        }));
        let client = PulumiApiClient::new(&config, "pulumi-copilot-cli/test", tokens).unwrap();

        let err = client
            .get_user_info(&CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CopilotError::Connectivity(_)));
        assert!(err.to_string().starts_with("Pulumi REST API is unavailable: "));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_in_flight_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai/chat/preview"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"conversationId": "c", "messages": []}))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Some("pul-123"));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = client
            .send_prompt(&ChatRequest::new("hi", "acme", None, None), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, CopilotError::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_already_cancelled_skips_token_and_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("pul-123"));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client.get_user_info(&cancel).await.unwrap_err();
        assert_eq!(err, CopilotError::Cancelled);
        assert!(client
            .token_provider()
            .session()
            .requests
            .lock()
            .unwrap()
            .is_empty());
    }
}
