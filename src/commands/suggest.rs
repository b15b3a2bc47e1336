use anyhow::{Context, Result};
use resale_pricer::{
    config,
    engine::{ListingStore, PriceSuggestor},
    models::QueryItem,
    providers::OfflineProvider,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Execute the suggest command
///
/// Prices one item offline (no market search, deterministic reasoning) and
/// prints the API-shaped response as pretty JSON on stdout.
pub async fn execute(config_path: &Path, item_path: &Path) -> Result<()> {
    let cfg = config::load_config(&config_path.to_string_lossy())?;

    let raw = std::fs::read_to_string(item_path)
        .with_context(|| format!("Failed to read item file {}", item_path.display()))?;
    let item: QueryItem = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid query item in {}", item_path.display()))?;

    if item.category.trim().is_empty() {
        anyhow::bail!("category is required");
    }

    let store = Arc::new(ListingStore::from_csv(&cfg.dataset.path)?);
    info!(
        "Loaded {} listings from {}",
        store.len(),
        cfg.dataset.path
    );

    let provider = Arc::new(OfflineProvider);
    let suggestor = PriceSuggestor::new(
        store,
        cfg.scoring.clone(),
        provider.clone(),
        provider,
        &cfg.engine,
    );

    let suggestion = suggestor.suggest(&item).await;

    let response = serde_json::json!({
        "input": item,
        "fair_price_range": suggestion.fair_price_range(),
        "suggestion": suggestion,
    });

    // stdout carries only the JSON so the command can be piped
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    // Note: Testing this command requires config and item files on disk
    // and is better suited for integration tests
}
