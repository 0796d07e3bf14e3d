//! Slash command parsing for the chat loop.
//!
//! Commands start with `/`. `/org` becomes an organization override turn;
//! `/1`, `/2`, ... submit the numbered follow-up suggestions.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    Exit,
    /// Drop the local history and start a new conversation.
    New,
    History,
    /// Switch the active organization; an empty handle clears it.
    Org(String),
    /// Submit follow-up number N (1-based).
    Followup(usize),
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim().to_string()).unwrap_or_default();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" => Some(ChatCommand::New),
        "/history" => Some(ChatCommand::History),
        "/org" => Some(ChatCommand::Org(arg)),
        other => match other[1..].parse::<usize>() {
            Ok(n) if n > 0 => Some(ChatCommand::Followup(n)),
            _ => Some(ChatCommand::Unknown(other.to_string())),
        },
    }
}

pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}  {}", style("/org <handle>").cyan(), "Switch organization");
    println!("  {}           {}", style("/org").cyan(), "Clear the organization");
    println!("  {}             {}", style("/N").cyan(), "Use follow-up suggestion N");
    println!("  {}        {}", style("/history").cyan(), "Show this conversation");
    println!("  {}            {}", style("/new").cyan(), "Start a new conversation");
    println!("  {}          {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}           {}", style("/help").cyan(), "Show this help message");
    println!("  {}           {}", style("/exit").cyan(), "End the chat session");
    println!();
    println!(
        "  {}",
        style("Ctrl+C cancels the current answer, Ctrl+D exits").dim()
    );
    println!();
}
