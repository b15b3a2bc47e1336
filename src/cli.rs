use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "resale-pricer", version, about = "Used-item price estimation service")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the pricing server (default)
    Serve,

    /// Validate configuration and dataset without starting the server
    Check,

    /// Price one item offline and print the suggestion JSON
    Suggest {
        /// JSON file containing the query item
        #[arg(short, long)]
        item: PathBuf,
    },

    /// Show version information
    Version,
}

impl Cli {
    /// Get the command to execute, defaulting to Serve if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
