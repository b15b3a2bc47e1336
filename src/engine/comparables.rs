use crate::engine::store::ListingStore;
use crate::engine::tables::ScoringTables;
use crate::models::{Comparable, Listing, QueryItem};

/// Additive term keeping weights finite for an exact match.
pub const DISTANCE_EPSILON: f64 = 0.01;

/// Age differences are normalized across five years of ownership.
const AGE_NORMALIZER: f64 = 60.0;

const AGE_WEIGHT: f64 = 0.6;
const CONDITION_WEIGHT: f64 = 0.35;
const BRAND_WEIGHT: f64 = 0.05;

const BRAND_MISMATCH_PENALTY: f64 = 0.30;
const LOCATION_MISMATCH_PENALTY: f64 = 0.05;

/// Composite similarity distance between a query item and one listing.
///
/// Non-negative. Age dominates, condition second; brand and location act as
/// small penalties. A query without a location takes the location penalty
/// against every listing, which leaves the ordering unaffected.
pub fn distance(tables: &ScoringTables, query: &QueryItem, listing: &Listing) -> f64 {
    let d_age =
        (query.age_months as f64 - listing.age_months as f64).abs() / AGE_NORMALIZER;
    let d_cond = (tables.condition_score(&query.condition)
        - tables.condition_score(&listing.condition))
    .abs();
    let d_brand = if query.brand.eq_ignore_ascii_case(&listing.brand) {
        0.0
    } else {
        BRAND_MISMATCH_PENALTY
    };
    let d_loc = match &query.location {
        Some(location) if location.eq_ignore_ascii_case(&listing.location) => 0.0,
        _ => LOCATION_MISMATCH_PENALTY,
    };

    AGE_WEIGHT * d_age + CONDITION_WEIGHT * d_cond + BRAND_WEIGHT * d_brand + d_loc
}

/// Up to `k` same-category listings ordered by ascending distance.
///
/// The sort is stable, so equally distant listings keep their dataset
/// order. An empty category pool yields an empty result.
pub fn nearest_comparables(
    store: &ListingStore,
    tables: &ScoringTables,
    query: &QueryItem,
    k: usize,
) -> Vec<Comparable> {
    let mut scored: Vec<(f64, &Listing)> = store
        .in_category(&query.category)
        .map(|listing| (distance(tables, query, listing), listing))
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    scored.truncate(k);

    scored
        .into_iter()
        .map(|(dist, listing)| Comparable {
            id: listing.id,
            title: listing.title.clone(),
            brand: listing.brand.clone(),
            condition: listing.condition.clone(),
            age_months: listing.age_months,
            asking_price: listing.asking_price,
            distance: dist,
            weight: 1.0 / (dist + DISTANCE_EPSILON),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: u32, brand: &str, condition: &str, age_months: u32, price: f64) -> Listing {
        Listing {
            id,
            title: format!("listing-{}", id),
            category: "Mobile".to_string(),
            brand: brand.to_string(),
            condition: condition.to_string(),
            age_months,
            asking_price: price,
            location: "Mumbai".to_string(),
        }
    }

    fn query(brand: &str, condition: &str, age_months: u32) -> QueryItem {
        QueryItem {
            title: None,
            category: "Mobile".to_string(),
            brand: brand.to_string(),
            condition: condition.to_string(),
            age_months,
            asking_price: None,
            location: Some("Mumbai".to_string()),
        }
    }

    #[test]
    fn test_identical_listing_has_zero_distance() {
        let tables = ScoringTables::default();
        let l = listing(1, "Apple", "Good", 24, 30000.0);
        let q = query("Apple", "Good", 24);
        assert_eq!(distance(&tables, &q, &l), 0.0);
    }

    #[test]
    fn test_age_term_is_normalized_over_five_years() {
        let tables = ScoringTables::default();
        let l = listing(1, "Apple", "Good", 54, 30000.0);
        let q = query("Apple", "Good", 24);
        // |24 - 54| / 60 = 0.5, weighted by 0.6
        assert!((distance(&tables, &q, &l) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_brand_mismatch_penalty_is_case_insensitive() {
        let tables = ScoringTables::default();
        let l = listing(1, "APPLE", "Good", 24, 30000.0);
        let q = query("apple", "Good", 24);
        assert_eq!(distance(&tables, &q, &l), 0.0);

        let other = listing(2, "Samsung", "Good", 24, 30000.0);
        // 0.05 * 0.30 for the brand term
        assert!((distance(&tables, &q, &other) - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_missing_query_location_penalizes_every_listing() {
        let tables = ScoringTables::default();
        let l = listing(1, "Apple", "Good", 24, 30000.0);
        let mut q = query("Apple", "Good", 24);
        q.location = None;
        assert!((distance(&tables, &q, &l) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_comparables_orders_by_distance() {
        let tables = ScoringTables::default();
        let store = ListingStore::from_listings(vec![
            listing(1, "Apple", "Good", 48, 25000.0),
            listing(2, "Apple", "Good", 25, 31000.0),
            listing(3, "Apple", "Good", 24, 32000.0),
        ]);
        let q = query("Apple", "Good", 24);

        let comps = nearest_comparables(&store, &tables, &q, 5);
        assert_eq!(comps.len(), 3);
        assert_eq!(comps[0].id, 3);
        assert_eq!(comps[1].id, 2);
        assert_eq!(comps[2].id, 1);
    }

    #[test]
    fn test_ties_keep_dataset_order() {
        let tables = ScoringTables::default();
        let store = ListingStore::from_listings(vec![
            listing(7, "Apple", "Good", 30, 28000.0),
            listing(3, "Apple", "Good", 30, 29000.0),
            listing(9, "Apple", "Good", 30, 27000.0),
        ]);
        let q = query("Apple", "Good", 24);

        let comps = nearest_comparables(&store, &tables, &q, 5);
        let ids: Vec<u32> = comps.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 3, 9]);
    }

    #[test]
    fn test_k_truncates_the_pool() {
        let tables = ScoringTables::default();
        let store = ListingStore::from_listings(
            (1..=8)
                .map(|i| listing(i, "Apple", "Good", 20 + i, 30000.0))
                .collect(),
        );
        let q = query("Apple", "Good", 24);

        let comps = nearest_comparables(&store, &tables, &q, 5);
        assert_eq!(comps.len(), 5);
    }

    #[test]
    fn test_empty_category_pool_is_empty_result() {
        let tables = ScoringTables::default();
        let store = ListingStore::from_listings(vec![listing(1, "Apple", "Good", 24, 30000.0)]);
        let mut q = query("Apple", "Good", 24);
        q.category = "Furniture".to_string();

        assert!(nearest_comparables(&store, &tables, &q, 5).is_empty());
    }

    #[test]
    fn test_exact_match_weight_is_bounded_by_epsilon() {
        let tables = ScoringTables::default();
        let store = ListingStore::from_listings(vec![listing(1, "Apple", "Good", 24, 30000.0)]);
        let q = query("Apple", "Good", 24);

        let comps = nearest_comparables(&store, &tables, &q, 5);
        assert_eq!(comps[0].distance, 0.0);
        assert!((comps[0].weight - 100.0).abs() < 1e-9);
    }
}
