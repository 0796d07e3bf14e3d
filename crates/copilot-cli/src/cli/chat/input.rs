//! Async line input for the chat loop.
//!
//! `Readline` switches the terminal to raw mode for as long as it lives, so
//! a fresh one is created for each line and dropped before the turn runs.
//! While a turn runs the terminal is cooked: Ctrl+C reaches the signal
//! handler and the interactive prompts draw normally.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent};

#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// User submitted a line (trimmed).
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt (Ctrl+C) at the prompt.
    Interrupted,
}

/// Read one line with `prompt`.
pub async fn read_line(prompt: &str) -> Result<InputEvent, ReadlineError> {
    let (mut rl, _writer) = Readline::new(prompt.to_string())?;
    Ok(match rl.readline().await {
        Ok(ReadlineEvent::Line(line)) => InputEvent::Message(line.trim().to_string()),
        Ok(ReadlineEvent::Eof) => InputEvent::Eof,
        Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
        Err(_) => InputEvent::Eof,
    })
}

/// Clear the terminal screen.
pub fn clear_screen() {
    let _ = console::Term::stdout().clear_screen();
}
