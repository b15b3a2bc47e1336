use crate::config::EngineConfig;
use crate::engine::store::ListingStore;
use crate::engine::tables::ScoringTables;
use crate::engine::{baseline, blend, comparables, market, range};
use crate::metrics;
use crate::models::{QueryItem, Suggestion};
use crate::providers::offline::fallback_reasoning;
use crate::providers::{MarketSource, ReasoningContext, ReasoningProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// The price estimation engine.
///
/// Owns the immutable listing snapshot, the injected scoring tables, and
/// the two provider ports. `suggest` runs the whole pipeline: comparables,
/// baseline, market fetch (timeout-bounded), blend, range, reasoning.
/// Nothing in here is fatal; every missing signal narrows the blend.
pub struct PriceSuggestor {
    store: Arc<ListingStore>,
    tables: ScoringTables,
    market: Arc<dyn MarketSource>,
    reasoning: Arc<dyn ReasoningProvider>,
    comparables_k: usize,
    market_timeout: Duration,
}

impl PriceSuggestor {
    pub fn new(
        store: Arc<ListingStore>,
        tables: ScoringTables,
        market: Arc<dyn MarketSource>,
        reasoning: Arc<dyn ReasoningProvider>,
        engine: &EngineConfig,
    ) -> Self {
        Self {
            store,
            tables,
            market,
            reasoning,
            comparables_k: engine.comparables_k,
            market_timeout: Duration::from_secs(engine.market_timeout_seconds),
        }
    }

    pub fn store(&self) -> &ListingStore {
        &self.store
    }

    /// Produce a full suggestion for one query item.
    pub async fn suggest(&self, item: &QueryItem) -> Suggestion {
        let started = Instant::now();

        let comps =
            comparables::nearest_comparables(&self.store, &self.tables, item, self.comparables_k);
        let comp_prices: Vec<f64> = comps.iter().map(|c| c.asking_price).collect();
        let comp_center = blend::comp_center(&comps);
        let comp_spread = comp_center.map(|center| range::signal_spread(center, &comp_prices));

        let baseline_center = baseline::baseline_price(&self.store, &self.tables, item);

        let samples = self.fetch_market_samples(item).await;
        let sample_prices: Vec<f64> = samples.iter().map(|s| s.price).collect();
        let market_center = blend::market_center(&samples);
        let market_spread =
            market_center.map(|center| range::signal_spread(center, &sample_prices));

        let (central_price, method) = blend::blend(comp_center, market_center, baseline_center);
        let (suggested_min, suggested_max) =
            range::suggested_range(central_price, comp_spread, market_spread);

        let context = ReasoningContext {
            item,
            comps: &comps,
            market_samples: &samples,
            baseline: baseline_center,
            central_price,
            suggested_min,
            suggested_max,
        };
        let reasoning = match self.reasoning.explain(&context).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "reasoning provider failed, using fallback explanation");
                fallback_reasoning(&context)
            }
        };

        let elapsed = started.elapsed();
        metrics::record_suggestion(method.as_str(), elapsed);
        info!(
            category = %item.category,
            brand = %item.brand,
            method = %method,
            comps = comps.len(),
            market_samples = samples.len(),
            central_price = central_price,
            "price suggestion computed"
        );

        Suggestion {
            suggested_min,
            suggested_max,
            central_price,
            method,
            comps_used: comps,
            reasoning,
        }
    }

    /// Fetch and normalize market quotes. One attempt behind a timeout;
    /// failure or timeout degrades to no samples.
    async fn fetch_market_samples(&self, item: &QueryItem) -> Vec<crate::models::MarketSample> {
        let query = market_query(item);

        let quotes = match tokio::time::timeout(
            self.market_timeout,
            self.market.fetch_market_samples(&query),
        )
        .await
        {
            Ok(Ok(quotes)) => quotes,
            Ok(Err(err)) => {
                warn!(error = %err, "market search failed, continuing without samples");
                metrics::record_market_fetch_failure("provider_error");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    timeout_seconds = self.market_timeout.as_secs(),
                    "market search timed out, continuing without samples"
                );
                metrics::record_market_fetch_failure("timeout");
                Vec::new()
            }
        };

        market::normalize_quotes(&quotes)
    }
}

/// Search query sent to the market source.
fn market_query(item: &QueryItem) -> String {
    format!(
        "{} {} used price {} months",
        item.brand,
        item.title.as_deref().unwrap_or(""),
        item.age_months
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlendMethod, Listing};
    use crate::providers::{MarketQuote, OfflineProvider, ProviderError};
    use async_trait::async_trait;

    struct FixedMarket(Vec<MarketQuote>);

    #[async_trait]
    impl MarketSource for FixedMarket {
        async fn fetch_market_samples(
            &self,
            _query: &str,
        ) -> Result<Vec<MarketQuote>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    struct FailingMarket;

    #[async_trait]
    impl MarketSource for FailingMarket {
        async fn fetch_market_samples(
            &self,
            _query: &str,
        ) -> Result<Vec<MarketQuote>, ProviderError> {
            Err(ProviderError::MalformedPayload("boom".to_string()))
        }
    }

    struct HangingMarket;

    #[async_trait]
    impl MarketSource for HangingMarket {
        async fn fetch_market_samples(
            &self,
            _query: &str,
        ) -> Result<Vec<MarketQuote>, ProviderError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
    }

    struct FailingReasoner;

    #[async_trait]
    impl ReasoningProvider for FailingReasoner {
        async fn explain(&self, _context: &ReasoningContext<'_>) -> Result<String, ProviderError> {
            Err(ProviderError::Disabled)
        }
    }

    fn laptop(id: u32, age_months: u32, price: f64) -> Listing {
        Listing {
            id,
            title: format!("MacBook {}", id),
            category: "Laptop".to_string(),
            brand: "Apple".to_string(),
            condition: "Good".to_string(),
            age_months,
            asking_price: price,
            location: "Mumbai".to_string(),
        }
    }

    fn laptop_query() -> QueryItem {
        QueryItem {
            title: Some("MacBook Air 2020".to_string()),
            category: "Laptop".to_string(),
            brand: "Apple".to_string(),
            condition: "Good".to_string(),
            age_months: 30,
            asking_price: Some(55000.0),
            location: Some("Mumbai".to_string()),
        }
    }

    fn engine_config() -> EngineConfig {
        EngineConfig {
            comparables_k: 5,
            market_timeout_seconds: 1,
        }
    }

    fn suggestor(
        listings: Vec<Listing>,
        market: Arc<dyn MarketSource>,
        reasoning: Arc<dyn ReasoningProvider>,
    ) -> PriceSuggestor {
        PriceSuggestor::new(
            Arc::new(ListingStore::from_listings(listings)),
            ScoringTables::default(),
            market,
            reasoning,
            &engine_config(),
        )
    }

    #[tokio::test]
    async fn test_empty_store_no_market_is_baseline_only() {
        let s = suggestor(vec![], Arc::new(OfflineProvider), Arc::new(OfflineProvider));
        let suggestion = s.suggest(&laptop_query()).await;

        assert_eq!(suggestion.method, BlendMethod::BaselineOnly);
        assert!(suggestion.comps_used.is_empty());
        // closed-form fallback: asking / max(cond, 0.5) * cond * brand * exp(-decay * age)
        let expected = 55000.0 / 0.82 * 0.82 * 1.15 * (-0.030_f64 * 30.0).exp();
        assert!((suggestion.central_price - expected).abs() < 1e-6);
        assert!(!suggestion.reasoning.is_empty());
    }

    #[tokio::test]
    async fn test_comps_without_market_blends_two_signals() {
        let listings = vec![laptop(1, 12, 60000.0), laptop(2, 48, 30000.0)];
        let s = suggestor(
            listings,
            Arc::new(OfflineProvider),
            Arc::new(OfflineProvider),
        );
        let suggestion = s.suggest(&laptop_query()).await;

        assert_eq!(suggestion.method, BlendMethod::CompsBaseline);
        // both listings are 18 months away from the query; ties keep dataset order
        let ids: Vec<u32> = suggestion.comps_used.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);

        // equal distances mean equal weights, so the comp center is the plain mean
        let comp_center = 45000.0;
        assert!(suggestion.suggested_min <= comp_center);
        assert!(suggestion.suggested_max >= comp_center);
        assert!(suggestion.suggested_min <= suggestion.central_price);
        assert!(suggestion.central_price <= suggestion.suggested_max);
    }

    #[tokio::test]
    async fn test_market_samples_join_the_blend() {
        let quotes = vec![
            MarketQuote {
                source: "a".to_string(),
                title: "MacBook Air".to_string(),
                price_text: "₹40,000".to_string(),
            },
            MarketQuote {
                source: "b".to_string(),
                title: "MacBook Air".to_string(),
                price_text: "no price listed".to_string(),
            },
        ];
        let listings = vec![laptop(1, 12, 60000.0), laptop(2, 48, 30000.0)];
        let s = suggestor(
            listings,
            Arc::new(FixedMarket(quotes)),
            Arc::new(OfflineProvider),
        );
        let suggestion = s.suggest(&laptop_query()).await;

        // the unparseable quote is dropped, the parseable one still counts
        assert_eq!(suggestion.method, BlendMethod::CompsWebBaseline);
    }

    #[tokio::test]
    async fn test_market_failure_degrades_to_comps_and_baseline() {
        let listings = vec![laptop(1, 12, 60000.0), laptop(2, 48, 30000.0)];
        let s = suggestor(listings, Arc::new(FailingMarket), Arc::new(OfflineProvider));
        let suggestion = s.suggest(&laptop_query()).await;

        assert_eq!(suggestion.method, BlendMethod::CompsBaseline);
    }

    #[tokio::test]
    async fn test_market_timeout_degrades_to_comps_and_baseline() {
        let listings = vec![laptop(1, 12, 60000.0), laptop(2, 48, 30000.0)];
        let s = suggestor(listings, Arc::new(HangingMarket), Arc::new(OfflineProvider));
        let suggestion = s.suggest(&laptop_query()).await;

        assert_eq!(suggestion.method, BlendMethod::CompsBaseline);
    }

    #[tokio::test]
    async fn test_reasoning_failure_uses_fallback_text() {
        let listings = vec![laptop(1, 12, 60000.0)];
        let s = suggestor(listings, Arc::new(OfflineProvider), Arc::new(FailingReasoner));
        let suggestion = s.suggest(&laptop_query()).await;

        assert!(suggestion.reasoning.contains("fair price"));
        assert!(suggestion.suggested_min <= suggestion.central_price);
    }

    #[tokio::test]
    async fn test_identical_inputs_identical_output() {
        let listings = vec![
            laptop(1, 12, 60000.0),
            laptop(2, 48, 30000.0),
            laptop(3, 30, 45000.0),
        ];
        let s = suggestor(
            listings,
            Arc::new(OfflineProvider),
            Arc::new(OfflineProvider),
        );

        let first = s.suggest(&laptop_query()).await;
        let second = s.suggest(&laptop_query()).await;

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_market_query_format() {
        let q = laptop_query();
        assert_eq!(
            market_query(&q),
            "Apple MacBook Air 2020 used price 30 months"
        );

        let mut untitled = q;
        untitled.title = None;
        assert_eq!(market_query(&untitled), "Apple  used price 30 months");
    }
}
