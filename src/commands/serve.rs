use anyhow::Result;
use colored::Colorize;
use resale_pricer::{config, server};
use std::path::Path;
use tracing::info;

/// Execute the serve command
///
/// Loads configuration, then starts the server and blocks until shutdown.
pub async fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Starting resale pricer...".green());

    let cfg = config::load_config(&config_path.to_string_lossy())?;
    info!("Configuration loaded from {}", config_path.display());

    // Start the server (blocks until shutdown)
    server::start_server(cfg).await?;

    Ok(())
}
