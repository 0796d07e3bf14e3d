//! Pulumi Copilot terminal client.
//!
//! Binary name: `pulumi-copilot`
//!
//! Parses CLI arguments, initializes tracing and the Copilot stack, then
//! dispatches to the chat session or a one-shot command.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,copilot=debug",
        _ => "trace",
    };
    copilot_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    // Shell completions don't need the Copilot stack
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "pulumi-copilot", &mut std::io::stdout());
        return Ok(());
    }

    let interactive = !cli.json && !cli.quiet;
    let state = AppState::init(cli.api_url.clone(), interactive).await?;

    let result = match cli.command {
        Commands::Chat { org } => cli::chat::loop_runner::run_chat_loop(&state, org).await,
        Commands::Ask { prompt, org } => {
            cli::ask::ask(&state, prompt.join(" "), org, cli.json).await
        }
        Commands::Login { token } => cli::auth::login(&state, token, cli.json).await,
        Commands::Logout => cli::auth::logout(&state, cli.json).await,
        Commands::Whoami => cli::auth::whoami(&state, cli.json).await,
        Commands::Completions { .. } => Ok(()),
    };

    copilot_observe::tracing_setup::shutdown_tracing();
    result
}
