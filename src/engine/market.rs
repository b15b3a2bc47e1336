use crate::models::MarketSample;
use crate::providers::MarketQuote;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBER_RE: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();
}

/// Parse a free-form price string into a numeric central value.
///
/// Handles currency markers (`₹`, `Rs.`), thousands separators, and stated
/// ranges with hyphen, en dash, or em dash. A single number is used as-is;
/// several numbers average; no number at all yields `None`. Never fails on
/// malformed input.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned = text
        .replace('₹', "")
        .replace("Rs.", "")
        .replace(',', "")
        .replace('\u{2013}', "-")
        .replace('\u{2014}', "-");

    let values: Vec<f64> = NUMBER_RE
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Turn raw market quotes into normalized samples, dropping quotes whose
/// price text yields no number.
pub fn normalize_quotes(quotes: &[MarketQuote]) -> Vec<MarketSample> {
    quotes
        .iter()
        .filter_map(|quote| {
            parse_price_text(&quote.price_text).map(|price| MarketSample {
                source: quote.source.clone(),
                title: quote.title.clone(),
                price,
            })
        })
        .collect()
}
