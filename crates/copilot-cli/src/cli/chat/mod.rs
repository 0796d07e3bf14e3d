//! Interactive chat session with Pulumi Copilot.
//!
//! The loop owns the turn history and hands it to the handler on every turn;
//! the conversation binding lives entirely in that history.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
