//! Application state wiring the Copilot stack together.
//!
//! `AppState` pins the generic core types (token provider, handler) to the
//! keychain, the REST client and the terminal prompts.

use std::sync::Arc;

use copilot_core::auth::provider::TokenProvider;
use copilot_core::handler::Handler;
use copilot_infra::config::{apply_env_overrides, load_config, resolve_data_dir, user_agent};
use copilot_infra::identity::StoredCredentialSession;
use copilot_infra::keychain::KeychainCredentialStore;
use copilot_infra::pulumi::PulumiApiClient;
use copilot_types::config::CopilotConfig;

use crate::cli::activity::Activity;
use crate::cli::prompts::{TerminalCredentialPrompt, TerminalOrganizationPicker};

/// Concrete type aliases for the core generics pinned to infra implementations.
pub type ConcreteSession = StoredCredentialSession<KeychainCredentialStore, TerminalCredentialPrompt>;

pub type ConcreteTokenProvider = TokenProvider<ConcreteSession>;

pub type ConcreteClient = PulumiApiClient<ConcreteTokenProvider>;

pub type ConcreteHandler = Handler<ConcreteClient, TerminalOrganizationPicker>;

pub struct AppState {
    pub config: CopilotConfig,
    pub handler: ConcreteHandler,
    pub activity: Activity,
}

impl AppState {
    /// Load configuration and build the handler.
    ///
    /// `api_url` comes from `--api-url` and beats both the file and the
    /// environment. With `interactive` false the spinner never draws.
    pub async fn init(api_url: Option<String>, interactive: bool) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        let mut config = apply_env_overrides(load_config(&data_dir).await);
        if let Some(url) = api_url {
            config.api_url = url;
        }
        tracing::debug!(api_url = %config.api_url, data_dir = %data_dir.display(), "configuration loaded");

        let activity = if interactive {
            Activity::new()
        } else {
            Activity::hidden()
        };

        let console_url = config
            .console_context()
            .unwrap_or_else(|| CopilotConfig::default().console_url);
        let session = StoredCredentialSession::new(
            KeychainCredentialStore::new(),
            TerminalCredentialPrompt::new(activity.clone(), &console_url),
        );
        let tokens = Arc::new(TokenProvider::new(session));
        let client = PulumiApiClient::new(&config, &user_agent(), tokens)?;

        let handler = Handler::new(
            client,
            TerminalOrganizationPicker::new(activity.clone()),
            config.participant_id.clone(),
        )
        .with_console_url(config.console_context());

        Ok(Self {
            config,
            handler,
            activity,
        })
    }

    /// The credential store behind the session, for `login` and `logout`.
    pub fn credential_store(&self) -> &KeychainCredentialStore {
        self.handler.backend().token_provider().session().store()
    }
}
