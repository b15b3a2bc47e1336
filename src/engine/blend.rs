use crate::models::{BlendMethod, Comparable, MarketSample};

/// Weighted average of comparable asking prices, using the retrieval
/// weights. `None` when there are no comparables.
pub fn comp_center(comps: &[Comparable]) -> Option<f64> {
    if comps.is_empty() {
        return None;
    }
    let total_weight: f64 = comps.iter().map(|c| c.weight).sum();
    let weighted_sum: f64 = comps.iter().map(|c| c.weight * c.asking_price).sum();
    Some(weighted_sum / total_weight)
}

/// Plain mean of normalized market samples. `None` when there are none.
pub fn market_center(samples: &[MarketSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().map(|s| s.price).sum::<f64>() / samples.len() as f64)
}

/// Fixed-weight combination of whichever signals reported.
///
/// comps + web + baseline -> 0.45 / 0.30 / 0.25
/// web + baseline         -> 0.60 / 0.40
/// comps + baseline       -> 0.55 / 0.45
/// baseline alone passes through unchanged.
pub fn blend(
    comp_center: Option<f64>,
    market_center: Option<f64>,
    baseline: f64,
) -> (f64, BlendMethod) {
    match (comp_center, market_center) {
        (Some(comps), Some(web)) => (
            0.45 * comps + 0.30 * web + 0.25 * baseline,
            BlendMethod::CompsWebBaseline,
        ),
        (None, Some(web)) => (0.60 * web + 0.40 * baseline, BlendMethod::WebBaseline),
        (Some(comps), None) => (0.55 * comps + 0.45 * baseline, BlendMethod::CompsBaseline),
        (None, None) => (baseline, BlendMethod::BaselineOnly),
    }
}
