//! Infrastructure layer for Pulumi Copilot.
//!
//! Contains implementations of the ports defined in `copilot-core`: the
//! Pulumi Cloud REST client, OS keychain credential storage, the stored
//! credential identity session, and the `config.toml` loader.

pub mod config;
pub mod identity;
pub mod keychain;
pub mod pulumi;
