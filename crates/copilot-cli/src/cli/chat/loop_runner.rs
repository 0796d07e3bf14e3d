//! Main chat loop: read a line, run a turn, show follow-ups.

use anyhow::Result;
use console::style;

use copilot_core::handler::TurnOutcome;
use copilot_types::host::{ChatFollowup, ChatTurn, ORG_COMMAND, TurnRequest};
use copilot_types::session::TurnMetadata;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{self, InputEvent};
use super::renderer::ChatRenderer;
use crate::cli::stream::TerminalStream;
use crate::cli::turn::{record_turn, run_turn};
use crate::state::AppState;

/// Session-local state of the REPL.
#[derive(Default)]
struct Session {
    history: Vec<ChatTurn>,
    followups: Vec<ChatFollowup>,
    /// Metadata of the most recent turn that produced some.
    last_metadata: Option<TurnMetadata>,
}

impl Session {
    fn prompt(&self) -> String {
        match self.last_metadata.as_ref().and_then(|m| m.organization.as_deref()) {
            Some(org) => format!("{} > ", org),
            None => "copilot > ".to_string(),
        }
    }

    fn reset(&mut self) {
        *self = Session::default();
    }
}

/// Run the interactive chat loop until `/exit` or Ctrl+D.
///
/// `org` is applied as an override turn before the first prompt.
pub async fn run_chat_loop(state: &AppState, org: Option<String>) -> Result<()> {
    let renderer = ChatRenderer::new();
    let participant = state.handler.participant_id().to_string();
    let mut session = Session::default();

    print_welcome_banner(&state.config.api_url, org.as_deref());

    if let Some(org) = org {
        let request = TurnRequest::command(ORG_COMMAND, org);
        run_and_record(state, &renderer, &participant, &mut session, &request).await;
    }

    loop {
        let event = input::read_line(&session.prompt())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

        let text = match event {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("  {}", style("(Ctrl+D or /exit to leave)").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        let request = match commands::parse(&text) {
            None => TurnRequest::prompt(text),
            Some(ChatCommand::Help) => {
                commands::print_help();
                continue;
            }
            Some(ChatCommand::Clear) => {
                input::clear_screen();
                continue;
            }
            Some(ChatCommand::Exit) => break,
            Some(ChatCommand::New) => {
                session.reset();
                println!("  {} Started a new conversation", style("✓").green().bold());
                continue;
            }
            Some(ChatCommand::History) => {
                print_history(&session.history);
                continue;
            }
            Some(ChatCommand::Org(handle)) => TurnRequest::command(ORG_COMMAND, handle),
            Some(ChatCommand::Followup(n)) => match session.followups.get(n - 1) {
                Some(followup) => followup.to_request(),
                None => {
                    println!("  {} No follow-up #{n}", style("!").yellow().bold());
                    continue;
                }
            },
            Some(ChatCommand::Unknown(cmd)) => {
                println!(
                    "  {} Unknown command {}. Type /help",
                    style("!").yellow().bold(),
                    style(cmd).bold()
                );
                continue;
            }
        };

        run_and_record(state, &renderer, &participant, &mut session, &request).await;
    }

    println!();
    println!("  {}", style("Goodbye.").dim());
    Ok(())
}

async fn run_and_record(
    state: &AppState,
    renderer: &ChatRenderer,
    participant: &str,
    session: &mut Session,
    request: &TurnRequest,
) {
    let outcome = {
        let mut stream = TerminalStream::new(renderer, &state.activity);
        run_turn(state, request, &session.history, &mut stream).await
    };
    report_outcome(&outcome);

    if let Some(metadata) = outcome.metadata() {
        session.last_metadata = Some(metadata.clone());
    }
    let result = outcome.into_result();
    session.followups = state.handler.provide_followups(&result);
    print_followups(&session.followups);
    record_turn(&mut session.history, participant, request, result);
}

fn report_outcome(outcome: &TurnOutcome) {
    if outcome.is_cancelled() {
        println!("  {}", style("Cancelled.").dim());
    } else if let Some(error) = outcome.error() {
        println!();
        println!("  {} {}", style("✗").red().bold(), error);
    }
}

fn print_followups(followups: &[ChatFollowup]) {
    if followups.is_empty() {
        return;
    }
    println!();
    for (i, followup) in followups.iter().enumerate() {
        println!(
            "  {} {}",
            style(format!("/{}", i + 1)).cyan(),
            followup.label
        );
    }
    println!();
}

fn print_history(history: &[ChatTurn]) {
    if history.is_empty() {
        println!("  {}", style("No turns yet.").dim());
        return;
    }

    println!();
    for turn in history {
        match turn {
            ChatTurn::Request { prompt, command, .. } => match command {
                Some(command) => println!("  {} /{command} {prompt}", style(">").cyan()),
                None => println!("  {} {prompt}", style(">").cyan()),
            },
            ChatTurn::Response { result, .. } => {
                if let Some(error) = &result.error {
                    println!("    {}", style(&error.message).red());
                } else if result.metadata.is_none() {
                    println!("    {}", style("(cancelled)").dim());
                } else {
                    println!("    {}", style("(answered)").dim());
                }
            }
        }
    }
    println!();
}
