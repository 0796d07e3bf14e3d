//! Client configuration.
//!
//! `CopilotConfig` mirrors `config.toml` in the data directory. Every field
//! has a default so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Copilot client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopilotConfig {
    /// Pulumi Cloud REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Pulumi Cloud console URL, sent as the cloud context of each prompt.
    #[serde(default = "default_console_url")]
    pub console_url: String,

    /// Value of the `X-Pulumi-Source` header.
    #[serde(default = "default_source")]
    pub source: String,

    /// Whole-request timeout for REST calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Participant id stamped on turns this client authors.
    #[serde(default = "default_participant_id")]
    pub participant_id: String,
}

fn default_api_url() -> String {
    "https://api.pulumi.com".to_string()
}

fn default_console_url() -> String {
    "https://app.pulumi.com".to_string()
}

fn default_source() -> String {
    "cli".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_participant_id() -> String {
    "pulumi.copilot".to_string()
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            console_url: default_console_url(),
            source: default_source(),
            request_timeout_secs: default_request_timeout_secs(),
            participant_id: default_participant_id(),
        }
    }
}

impl CopilotConfig {
    /// Console URL as sent on the wire; blank disables it.
    pub fn console_context(&self) -> Option<String> {
        let url = self.console_url.trim();
        (!url.is_empty()).then(|| url.to_string())
    }
}
