use crate::providers::{
    MarketQuote, MarketSource, ProviderError, ReasoningContext, ReasoningProvider,
};
use async_trait::async_trait;

/// Deterministic provider with no I/O.
///
/// The default when the LLM is disabled in config, and the stand-in used
/// by tests: market search reports no quotes (narrowing the blend), and
/// explanations come from a fixed template over the numeric context.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

#[async_trait]
impl MarketSource for OfflineProvider {
    async fn fetch_market_samples(&self, _query: &str) -> Result<Vec<MarketQuote>, ProviderError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl ReasoningProvider for OfflineProvider {
    async fn explain(&self, context: &ReasoningContext<'_>) -> Result<String, ProviderError> {
        Ok(fallback_reasoning(context))
    }
}

/// Templated explanation built only from the numeric context. Also used
/// by the engine when a reasoning call fails, so numeric output is never
/// blocked on prose.
pub fn fallback_reasoning(context: &ReasoningContext<'_>) -> String {
    let item = context.item;
    let item_name = item
        .title
        .clone()
        .unwrap_or_else(|| format!("{} {}", item.brand, item.category));

    let mut basis: Vec<String> = Vec::new();
    if !context.comps.is_empty() {
        basis.push(format!(
            "{} comparable listing{}",
            context.comps.len(),
            plural(context.comps.len())
        ));
    }
    if !context.market_samples.is_empty() {
        basis.push(format!(
            "{} market sample{}",
            context.market_samples.len(),
            plural(context.market_samples.len())
        ));
    }
    basis.push(format!("a depreciation baseline of ₹{:.0}", context.baseline));

    format!(
        "Based on {}, a fair price for your {} ({}, {} months old) is around ₹{:.0}. \
         A realistic range is ₹{:.0} - ₹{:.0}.",
        basis.join(" and "),
        item_name,
        item.condition,
        item.age_months,
        context.central_price,
        context.suggested_min,
        context.suggested_max,
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
