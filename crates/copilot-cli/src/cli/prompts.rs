//! Interactive terminal prompts that back the core's ports.
//!
//! dialoguer blocks on the terminal, so each prompt runs on the blocking
//! pool through [`Activity::prompt`]: spinner suspended, and Ctrl+C left to
//! the prompt instead of cancelling the turn.

use console::style;
use dialoguer::{Password, Select};
use secrecy::SecretString;
use tracing::warn;

use copilot_core::organization::OrganizationPicker;
use copilot_infra::identity::CredentialPrompt;
use copilot_types::error::CopilotError;
use copilot_types::user::OrganizationSummary;

use super::activity::Activity;

/// Asks for a Pulumi access token with hidden input.
pub struct TerminalCredentialPrompt {
    activity: Activity,
    token_page: String,
}

impl TerminalCredentialPrompt {
    pub fn new(activity: Activity, console_url: &str) -> Self {
        Self {
            activity,
            token_page: format!("{}/account/tokens", console_url.trim_end_matches('/')),
        }
    }
}

impl CredentialPrompt for TerminalCredentialPrompt {
    async fn prompt_token(&self, detail: Option<&str>) -> Result<Option<SecretString>, CopilotError> {
        let activity = self.activity.clone();
        let detail = detail.map(str::to_string);
        let token_page = self.token_page.clone();

        let answer = tokio::task::spawn_blocking(move || {
            activity.prompt(|| {
                eprintln!();
                if let Some(detail) = &detail {
                    eprintln!("  {} {}", style("!").yellow().bold(), detail);
                }
                eprintln!(
                    "  {} Create an access token at {}",
                    style("i").blue().bold(),
                    style(&token_page).underlined()
                );
                Password::new()
                    .with_prompt("Pulumi access token (empty to cancel)")
                    .allow_empty_password(true)
                    .interact()
            })
        })
        .await
        .map_err(|e| CopilotError::Credential(format!("token prompt failed: {e}")))?;

        match answer {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(e) => {
                // Not a terminal, or the prompt was interrupted
                warn!(error = %e, "token prompt unavailable");
                Ok(None)
            }
        }
    }
}

/// Arrow-key pick list of organizations. Esc dismisses.
pub struct TerminalOrganizationPicker {
    activity: Activity,
}

impl TerminalOrganizationPicker {
    pub fn new(activity: Activity) -> Self {
        Self { activity }
    }
}

/// Pick-list label: the display name, with the handle when they differ.
pub fn organization_label(organization: &OrganizationSummary) -> String {
    let name = organization.display_name();
    if name == organization.github_login {
        name.to_string()
    } else {
        format!("{name} ({})", organization.github_login)
    }
}

impl OrganizationPicker for TerminalOrganizationPicker {
    async fn pick(
        &self,
        organizations: &[OrganizationSummary],
    ) -> Result<Option<String>, CopilotError> {
        let items: Vec<String> = organizations.iter().map(organization_label).collect();
        let handles: Vec<String> = organizations
            .iter()
            .map(|o| o.github_login.clone())
            .collect();
        let activity = self.activity.clone();

        let selection = tokio::task::spawn_blocking(move || {
            activity.prompt(|| {
                Select::new()
                    .with_prompt("Select a Pulumi organization")
                    .items(&items)
                    .default(0)
                    .interact_opt()
            })
        })
        .await;

        match selection {
            Err(e) => {
                warn!(error = %e, "organization prompt task failed");
                Ok(None)
            }
            Ok(selection) => Self::chosen(selection, &handles),
        }
    }
}

impl TerminalOrganizationPicker {
    fn chosen(
        selection: dialoguer::Result<Option<usize>>,
        handles: &[String],
    ) -> Result<Option<String>, CopilotError> {
        match selection {
            Ok(Some(index)) => Ok(handles.get(index).cloned()),
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(error = %e, "organization pick list unavailable");
                Ok(None)
            }
        }
    }
}
