mod cli;
mod commands;
mod console;
mod discovery;
mod error;
mod kubernetes;
mod record;
mod relay;
#[cfg(test)]
mod tests;
mod types;
mod utils;

use clap::Parser;
use tracing::debug;

use cli::{Cli, Command};
use commands::{Action, EventsCommand, LogsCommand};
use console::Console;
use error::RunlogError;
use kubernetes::Kubectl;
use record::RunRecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries only what the operator asked for
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        let code = match err.downcast_ref::<RunlogError>() {
            Some(e) => e.exit_code(),
            None => 1,
        };
        debug!("{:?}", err);
        eprintln!("{}", err);
        std::process::exit(code);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let store = RunRecordStore::new(cli.app_dir.clone()).with_namespace(cli.namespace.clone());
    let mut console = Console::stdout();
    debug!("Using app directory {}", cli.app_dir.display());

    match cli.command {
        Command::Logs {
            since,
            retries,
            kubetail,
        } => {
            let kubectl = Kubectl::new(cli.kubectl);
            debug!("Listing pods with {}", kubectl.program());
            LogsCommand::new(store, kubectl, kubetail, since, retries)
                .action(&mut console)
                .await?
        }
        Command::Events { watch } => {
            EventsCommand {
                store,
                kubectl: cli.kubectl,
                watch,
            }
            .action(&mut console)
            .await?
        }
    }
    Ok(())
}
