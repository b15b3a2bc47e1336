//! External collaborator ports for the price engine.
//!
//! The engine depends on two narrow traits: [`MarketSource`] for live
//! market quotes and [`ReasoningProvider`] for the natural-language
//! explanation. Both are best-effort; the engine degrades on any
//! [`ProviderError`] instead of failing the request.
//!
//! Two adapters ship in this crate:
//! - [`LlmClient`]: one OpenAI-compatible chat-completions client backing
//!   both ports
//! - [`OfflineProvider`]: deterministic, no I/O; the default when the LLM
//!   is disabled and the stand-in used by tests

pub mod llm;
pub mod offline;

pub use llm::LlmClient;
pub use offline::OfflineProvider;

use crate::models::{Comparable, MarketSample, QueryItem};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures surfaced by provider adapters.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },
    #[error("provider returned a malformed payload: {0}")]
    MalformedPayload(String),
    #[error("provider is disabled")]
    Disabled,
}

/// A raw market observation before normalization. `price_text` is
/// free-form ("₹30,500 – ₹33,000", "Rs. 29,999", ...); the engine's
/// normalizer decides whether it is usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub source: String,
    pub title: String,
    pub price_text: String,
}

/// Everything the reasoning provider is allowed to see: the numeric
/// outcome plus the inputs that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ReasoningContext<'a> {
    pub item: &'a QueryItem,
    pub comps: &'a [Comparable],
    pub market_samples: &'a [MarketSample],
    pub baseline: f64,
    pub central_price: f64,
    pub suggested_min: f64,
    pub suggested_max: f64,
}

/// Source of live market quotes for a textual search query.
#[async_trait]
pub trait MarketSource: Send + Sync + 'static {
    async fn fetch_market_samples(&self, query: &str) -> Result<Vec<MarketQuote>, ProviderError>;
}

/// Turns a numeric pricing outcome into a short prose justification.
#[async_trait]
pub trait ReasoningProvider: Send + Sync + 'static {
    async fn explain(&self, context: &ReasoningContext<'_>) -> Result<String, ProviderError>;
}
