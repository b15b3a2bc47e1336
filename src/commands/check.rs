use anyhow::Result;
use colored::Colorize;
use resale_pricer::{config, engine::ListingStore};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Execute the check command
///
/// This validates the configuration file and the listings dataset
/// without starting the server
pub fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Checking configuration...".yellow());
    info!("Loading and validating configuration");

    let cfg = config::load_config(&config_path.to_string_lossy())?;

    println!("{}", "✓ Configuration valid".green());
    println!();

    // Print summary
    println!("{}", "Configuration Summary:".bold());
    println!(
        "  {}: {}:{}",
        "Server".cyan(),
        cfg.server.host,
        cfg.server.port
    );
    println!("  {}: {}", "Log Level".cyan(), cfg.server.log_level);
    println!(
        "  {}: {} comparables, {}s market timeout",
        "Engine".cyan(),
        cfg.engine.comparables_k,
        cfg.engine.market_timeout_seconds
    );
    println!(
        "  {}: {} conditions, {} categories, {} brands",
        "Scoring Tables".cyan(),
        cfg.scoring.condition_scores.len(),
        cfg.scoring.category_decay.len(),
        cfg.scoring.brand_multipliers.len()
    );
    println!(
        "  {}: {}",
        "LLM".cyan(),
        if cfg.llm.enabled {
            format!("enabled ({})", cfg.llm.model).green()
        } else {
            "disabled".red()
        }
    );
    println!();

    println!("{}", "Checking dataset...".yellow());
    let store = ListingStore::from_csv(&cfg.dataset.path)?;

    println!("{}", "✓ Dataset loaded".green());
    println!("  {}: {}", "Path".cyan(), cfg.dataset.path);
    println!("  {}: {}", "Listings".cyan(), store.len());

    if store.is_empty() {
        println!(
            "  {}",
            "⚠ dataset is empty; every request will use the baseline anchor".yellow()
        );
    } else {
        let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
        for listing in store.listings() {
            *by_category.entry(listing.category.as_str()).or_insert(0) += 1;
        }
        for (category, count) in &by_category {
            println!("    {} → {}", category, count);
        }
    }

    info!("Configuration and dataset check completed successfully");
    Ok(())
}
