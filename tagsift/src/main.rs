use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbosity level
    let cli = Cli::parse();

    // Initialize tracing with appropriate verbosity. Logs go to stderr;
    // stdout carries only the serialized tags.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        2.. => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    // Process commands
    match cli.command {
        Commands::Request(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cli::commands::request::execute(args))?;
        }
        Commands::Issue(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cli::commands::issue::execute(args))?;
        }
    }

    Ok(())
}
