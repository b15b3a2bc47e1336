/// Proportional component of the overall spread.
const SPREAD_RATIO: f64 = 0.12;
/// Absolute floor so the range never collapses for cheap items.
const SPREAD_FLOOR: f64 = 1200.0;

/// Proportional component of a per-signal spread.
const SIGNAL_SPREAD_RATIO: f64 = 0.08;
/// Dispersion component of a per-signal spread.
const SIGNAL_STDDEV_FACTOR: f64 = 0.5;

/// Spread contributed by one signal (comparables or market samples):
/// 8% of that signal's center, or half the population standard deviation
/// of its prices, whichever is larger.
pub fn signal_spread(center: f64, prices: &[f64]) -> f64 {
    (SIGNAL_SPREAD_RATIO * center).max(SIGNAL_STDDEV_FACTOR * population_stddev(prices))
}

/// The suggested (min, max) range around the blended center.
///
/// The half-width is the largest of 12% of the center, the absolute floor,
/// and whichever per-signal spreads exist. Both ends round to the nearest
/// hundred; the minimum clamps at zero after rounding.
pub fn suggested_range(
    center: f64,
    comp_spread: Option<f64>,
    market_spread: Option<f64>,
) -> (f64, f64) {
    let mut spread = (SPREAD_RATIO * center).max(SPREAD_FLOOR);
    if let Some(s) = comp_spread {
        spread = spread.max(s);
    }
    if let Some(s) = market_spread {
        spread = spread.max(s);
    }

    let suggested_min = round_to_hundred(center - spread).max(0.0);
    let suggested_max = round_to_hundred(center + spread);
    (suggested_min, suggested_max)
}

fn round_to_hundred(value: f64) -> f64 {
    (value / 100.0).round() * 100.0
}

fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
