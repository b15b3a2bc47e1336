use crate::config::LlmConfig;
use crate::providers::{
    MarketQuote, MarketSource, ProviderError, ReasoningContext, ReasoningProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const MARKET_SYSTEM_PROMPT: &str = "You are a price research assistant for the Indian \
used-goods market. Respond with a JSON array only; each element must be an object with \
string fields \"source\", \"title\" and \"price\". Prices are in INR. No prose.";

const REASONING_SYSTEM_PROMPT: &str = "You explain used-item price suggestions to sellers \
on an Indian resale marketplace. Two or three plain sentences, prices in INR. Use only \
the numbers you are given; do not invent market facts.";

/// One OpenAI-compatible chat-completions client backing both provider
/// ports. Every failure maps to a [`ProviderError`]; the engine decides
/// how to degrade.
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(client: Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        if !self.config.enabled {
            return Err(ProviderError::Disabled);
        }

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": 0.2,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::UpstreamStatus { status, message });
        }

        let payload: serde_json::Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::MalformedPayload(
                    "missing choices[0].message.content".to_string(),
                )
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl MarketSource for LlmClient {
    async fn fetch_market_samples(&self, query: &str) -> Result<Vec<MarketQuote>, ProviderError> {
        let user = format!("Find current resale prices for: {query}");
        let content = self.chat(MARKET_SYSTEM_PROMPT, &user).await?;
        parse_quote_payload(&content)
    }
}

#[async_trait]
impl ReasoningProvider for LlmClient {
    async fn explain(&self, context: &ReasoningContext<'_>) -> Result<String, ProviderError> {
        let item = context.item;
        let item_name = item
            .title
            .clone()
            .unwrap_or_else(|| format!("{} {}", item.brand, item.category));

        let user = format!(
            "Item: {} ({} months old, condition {}).\n\
             Comparable listings used: {}.\n\
             Market samples used: {}.\n\
             Formula baseline: {:.0} INR.\n\
             Blended central estimate: {:.0} INR.\n\
             Suggested range: {:.0} - {:.0} INR.\n\
             Write the explanation now.",
            item_name,
            item.age_months,
            item.condition,
            context.comps.len(),
            context.market_samples.len(),
            context.baseline,
            context.central_price,
            context.suggested_min,
            context.suggested_max,
        );

        self.chat(REASONING_SYSTEM_PROMPT, &user).await
    }
}

/// Parse the model's reply into quotes. Tolerates code fences around the
/// array and elements with a numeric instead of string price; elements
/// with no usable price field are skipped.
fn parse_quote_payload(content: &str) -> Result<Vec<MarketQuote>, ProviderError> {
    let stripped = strip_code_fences(content);
    let values: Vec<serde_json::Value> = serde_json::from_str(stripped)
        .map_err(|e| ProviderError::MalformedPayload(format!("expected a JSON array: {e}")))?;

    Ok(values.iter().filter_map(quote_from_value).collect())
}

fn quote_from_value(value: &serde_json::Value) -> Option<MarketQuote> {
    let price_text = match value.get("price") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return None,
    };

    Some(MarketQuote {
        source: value
            .get("source")
            .and_then(|v| v.as_str())
            .unwrap_or("web")
            .to_string(),
        title: value
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        price_text,
    })
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}
