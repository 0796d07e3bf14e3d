//! Shared types for Pulumi Copilot.
//!
//! This crate contains the wire types exchanged with the Pulumi Cloud REST API,
//! the per-turn session state recovered from chat history, the shapes the chat
//! host hands to the core, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod host;
pub mod session;
pub mod user;
