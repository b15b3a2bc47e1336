use crate::engine::store::ListingStore;
use crate::engine::tables::ScoringTables;
use crate::models::{Listing, QueryItem};

/// Depreciation-formula estimate of the item's present-day value.
///
/// Back-solves an implied as-new price from every same-category listing
/// (undoing that listing's age, condition, and brand adjustments), takes
/// the median, then projects that level forward through the query's own
/// age, condition, and brand. When the category has at least two listings
/// of the query's brand, the median is taken over that subset only.
///
/// With an empty category pool the as-new level is anchored on the query's
/// asking price instead (missing asking price counts as zero, so the
/// baseline bottoms out at zero rather than failing).
pub fn baseline_price(store: &ListingStore, tables: &ScoringTables, query: &QueryItem) -> f64 {
    let decay = tables.decay_for_category(&query.category);
    let cond_mult = tables.condition_score(&query.condition);
    let brand_mult = tables.brand_multiplier(&query.brand);

    let pool: Vec<&Listing> = store.in_category(&query.category).collect();

    let new_price_est = if pool.is_empty() {
        query.asking_price.unwrap_or(0.0) / cond_mult.max(0.5)
    } else {
        let implied_new: Vec<f64> = pool.iter().map(|l| implied_new_price(tables, decay, l)).collect();

        let brand_subset: Vec<f64> = pool
            .iter()
            .zip(&implied_new)
            .filter(|(l, _)| l.brand.eq_ignore_ascii_case(&query.brand))
            .map(|(_, implied)| *implied)
            .collect();

        if brand_subset.len() >= 2 {
            median(&brand_subset)
        } else {
            median(&implied_new)
        }
    };

    new_price_est * cond_mult * brand_mult * (-decay * query.age_months as f64).exp()
}

/// What this listing says the item cost new, given the category decay rate.
fn implied_new_price(tables: &ScoringTables, decay: f64, listing: &Listing) -> f64 {
    let cond = tables.condition_score(&listing.condition);
    let brand = tables.brand_multiplier(&listing.brand);
    listing.asking_price * (decay * listing.age_months as f64).exp() / (cond * brand)
}

/// Median with even-length inputs averaging the two middle values.
/// Callers guarantee a non-empty slice.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
