//! Credential commands: login, logout, whoami.

use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Password;
use tokio_util::sync::CancellationToken;

use copilot_core::auth::credential::CredentialStore;
use copilot_core::backend::CopilotBackend;
use copilot_infra::config::user_agent;
use copilot_infra::identity::login::login_with_token;
use copilot_types::user::User;

use crate::state::AppState;

/// Check an access token against Pulumi Cloud, then store it in the keychain.
///
/// The supplied token is verified on its own, never whatever the
/// environment or the keychain currently holds, and a rejected token is not
/// stored.
///
/// # Examples
///
/// ```bash
/// # Hidden prompt (recommended)
/// pulumi-copilot login
///
/// # Script/automation mode
/// pulumi-copilot login --token pul-...
/// ```
pub async fn login(state: &AppState, token: Option<String>, json: bool) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => Password::new()
            .with_prompt("Pulumi access token")
            .interact()?,
    };

    let user = login_with_token(
        &state.config,
        &user_agent(),
        state.credential_store(),
        &token,
    )
    .await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"loggedIn": true, "user": user.github_login})
        );
    } else {
        println!(
            "  {} Logged in as {}",
            style("✓").green().bold(),
            style(&user.github_login).bold()
        );
    }
    Ok(())
}

pub async fn logout(state: &AppState, json: bool) -> Result<()> {
    let removed = state.credential_store().clear().await?;

    if json {
        println!("{}", serde_json::json!({"loggedOut": removed}));
    } else if removed {
        println!("  {} Access token removed", style("✓").green().bold());
    } else {
        println!("  {} No stored access token", style("i").blue().bold());
    }
    Ok(())
}

/// Show the signed-in user and their organizations.
pub async fn whoami(state: &AppState, json: bool) -> Result<()> {
    let user = state
        .handler
        .backend()
        .get_user_info(&CancellationToken::new())
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} ({})",
        style(&user.name).bold(),
        style(&user.github_login).cyan()
    );
    if !user.email.is_empty() {
        println!("  {}", style(&user.email).dim());
    }
    println!();

    if user.organizations.is_empty() {
        println!(
            "  {} You are not a member of any Pulumi organization.",
            style("!").yellow().bold()
        );
        println!();
        return Ok(());
    }

    println!("{}", organization_table(&user));
    println!();
    Ok(())
}

fn organization_table(user: &User) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Organization").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Name").add_attribute(comfy_table::Attribute::Bold),
        ]);

    for org in &user.organizations {
        table.add_row(vec![
            Cell::new(&org.github_login),
            Cell::new(org.display_name()),
        ]);
    }
    table
}
