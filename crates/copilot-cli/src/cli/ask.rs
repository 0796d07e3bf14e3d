//! One-shot `ask` command.

use anyhow::{Result, bail};
use console::style;

use copilot_core::handler::TurnOutcome;
use copilot_types::host::{ChatFollowup, ORG_COMMAND, TurnRequest};

use super::chat::renderer::ChatRenderer;
use super::stream::{CollectingStream, StreamEffect, TerminalStream};
use super::turn::{record_turn, run_turn};
use crate::state::AppState;

/// Ask one question. `--org` is applied as an override turn first, so it
/// goes through the same membership check as `/org` in a chat session.
///
/// Exits non-zero when any turn fails or is cancelled.
pub async fn ask(state: &AppState, prompt: String, org: Option<String>, json: bool) -> Result<()> {
    let mut requests = Vec::new();
    if let Some(org) = org {
        requests.push(TurnRequest::command(ORG_COMMAND, org));
    }
    requests.push(TurnRequest::prompt(prompt));

    let participant = state.handler.participant_id().to_string();
    let renderer = ChatRenderer::new();
    let mut collected = CollectingStream::default();
    let mut history = Vec::new();
    let mut last: Option<(TurnOutcome, Vec<ChatFollowup>)> = None;

    for request in &requests {
        let outcome = if json {
            run_turn(state, request, &history, &mut collected).await
        } else {
            let mut stream = TerminalStream::new(&renderer, &state.activity);
            run_turn(state, request, &history, &mut stream).await
        };

        let result = outcome.clone().into_result();
        let followups = state.handler.provide_followups(&result);
        record_turn(&mut history, &participant, request, result);

        let stop = outcome.error().is_some() || outcome.is_cancelled();
        last = Some((outcome, followups));
        if stop {
            break;
        }
    }

    let Some((outcome, followups)) = last else {
        return Ok(());
    };

    if json {
        print_json(&outcome, &followups, &collected.effects)?;
    } else if !followups.is_empty() {
        println!();
        for followup in &followups {
            println!("  {} {}", style("-").dim(), followup.label);
        }
        println!(
            "  {}",
            style("Pass --org <handle> to choose one.").dim()
        );
    }

    if outcome.is_cancelled() {
        bail!("Cancelled.");
    }
    if let Some(error) = outcome.error() {
        bail!("{error}");
    }
    Ok(())
}

fn print_json(
    outcome: &TurnOutcome,
    followups: &[ChatFollowup],
    effects: &[StreamEffect],
) -> Result<()> {
    let metadata = outcome.metadata();
    let body = serde_json::json!({
        "organization": metadata.and_then(|m| m.organization.clone()),
        "conversationId": metadata.and_then(|m| m.conversation_id.clone()),
        "output": effects,
        "followups": followups,
        "cancelled": outcome.is_cancelled(),
        "error": outcome.error().map(ToString::to_string),
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
