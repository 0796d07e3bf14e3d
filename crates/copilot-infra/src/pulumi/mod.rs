//! Pulumi Cloud REST API adapter.

pub mod client;

pub use client::PulumiApiClient;
