//! Conversation logic and port traits for Pulumi Copilot.
//!
//! This crate defines the "ports" (token provider, identity session,
//! credential store, backend, organization picker, response stream) that the
//! infrastructure and host layers implement, plus the request handler that
//! drives a single chat turn. It depends only on `copilot-types` -- never on
//! `copilot-infra` or any HTTP/keychain crate.

pub mod auth;
pub mod backend;
pub mod followup;
pub mod handler;
pub mod organization;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
