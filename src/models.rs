use serde::{Deserialize, Serialize};
use std::fmt;

/// A historical marketplace listing from the dataset snapshot.
///
/// Listings are immutable after load; per-request annotations (distance,
/// weight) live on [`Comparable`] instead of being written back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub brand: String,
    pub condition: String,
    pub age_months: u32,
    pub asking_price: f64,
    pub location: String,
}

/// The item a seller wants priced.
///
/// Same shape as [`Listing`] minus `id`, with `asking_price` optional (used
/// only as a fallback anchor when the category has no history). `condition`
/// stays a free-form string: values outside Like New/Good/Fair are accepted
/// and scored with the default condition multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryItem {
    #[serde(default)]
    pub title: Option<String>,
    pub category: String,
    pub brand: String,
    pub condition: String,
    pub age_months: u32,
    #[serde(default)]
    pub asking_price: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
}

/// A historical listing judged similar to the query item, annotated with
/// its composite distance and the derived blending weight.
#[derive(Debug, Clone, Serialize)]
pub struct Comparable {
    pub id: u32,
    pub title: String,
    pub brand: String,
    pub condition: String,
    pub age_months: u32,
    pub asking_price: f64,
    pub distance: f64,
    pub weight: f64,
}

/// A normalized market observation. Quotes whose price text yields no
/// number are dropped during normalization, so `price` is always present.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSample {
    pub source: String,
    pub title: String,
    pub price: f64,
}

/// Which signals went into the blended central price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMethod {
    #[serde(rename = "ensemble(comps+web+baseline)")]
    CompsWebBaseline,
    #[serde(rename = "ensemble(web+baseline)")]
    WebBaseline,
    #[serde(rename = "ensemble(comps+baseline)")]
    CompsBaseline,
    #[serde(rename = "baseline_only")]
    BaselineOnly,
}

impl BlendMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompsWebBaseline => "ensemble(comps+web+baseline)",
            Self::WebBaseline => "ensemble(web+baseline)",
            Self::CompsBaseline => "ensemble(comps+baseline)",
            Self::BaselineOnly => "baseline_only",
        }
    }
}

impl fmt::Display for BlendMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's answer for one query item.
///
/// Invariant: `suggested_min <= central_price <= suggested_max` and
/// `suggested_min >= 0`.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub suggested_min: f64,
    pub suggested_max: f64,
    pub central_price: f64,
    pub method: BlendMethod,
    pub comps_used: Vec<Comparable>,
    pub reasoning: String,
}

impl Suggestion {
    /// Display form of the range, e.g. `"28100 - 31500"`.
    pub fn fair_price_range(&self) -> String {
        format!(
            "{} - {}",
            self.suggested_min as i64,
            self.suggested_max as i64
        )
    }
}
