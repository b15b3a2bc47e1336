use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use resale_pricer::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Initialize tracing/logging early
    init_tracing();

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Serve => {
            commands::serve::execute(&args.config).await?;
        }
        cli::Commands::Check => {
            commands::check::execute(&args.config)?;
        }
        cli::Commands::Suggest { item } => {
            commands::suggest::execute(&args.config, &item).await?;
        }
        cli::Commands::Version => {
            println!("resale-pricer v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
