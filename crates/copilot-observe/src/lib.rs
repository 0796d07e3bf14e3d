//! Observability setup for Pulumi Copilot: structured logging through
//! `tracing`, optionally exported as OpenTelemetry spans.

pub mod tracing_setup;
