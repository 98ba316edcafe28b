//! Mnema CLI entry point.
//!
//! Binary name: `mnema`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! interactive chat loop or one of the utility commands.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,mnema=debug",
        _ => "trace",
    };
    mnema_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "mnema", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.server.clone()).await;

    match cli.command {
        None | Some(Commands::Chat) => {
            cli::chat::run_chat_loop(&state).await?;
        }

        Some(Commands::Nodes { limit }) => {
            cli::nodes::list_nodes(&state, limit, cli.json).await?;
        }

        Some(Commands::Completions { .. }) => unreachable!("handled above"),
    }

    mnema_observe::tracing_setup::shutdown_tracing();
    Ok(())
}
