use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scoring tables for condition, depreciation, and brand retention.
///
/// Built once (from compiled-in defaults plus config overrides) and injected
/// into the engine at construction. Lookups are exact-key with an explicit
/// default for anything the tables do not name, so unknown categories,
/// brands, and conditions are always scorable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringTables {
    /// Condition name -> value multiplier (1.0 = as new).
    #[serde(default = "default_condition_scores")]
    pub condition_scores: HashMap<String, f64>,
    #[serde(default = "default_condition_score")]
    pub default_condition_score: f64,

    /// Category -> monthly exponential decay rate.
    #[serde(default = "default_category_decay")]
    pub category_decay: HashMap<String, f64>,
    #[serde(default = "default_decay_rate")]
    pub default_decay_rate: f64,

    /// Brand -> resale retention multiplier.
    #[serde(default = "default_brand_multipliers")]
    pub brand_multipliers: HashMap<String, f64>,
    #[serde(default = "default_brand_multiplier")]
    pub default_brand_multiplier: f64,
}

impl ScoringTables {
    pub fn condition_score(&self, condition: &str) -> f64 {
        self.condition_scores
            .get(condition)
            .copied()
            .unwrap_or(self.default_condition_score)
    }

    pub fn decay_for_category(&self, category: &str) -> f64 {
        self.category_decay
            .get(category)
            .copied()
            .unwrap_or(self.default_decay_rate)
    }

    pub fn brand_multiplier(&self, brand: &str) -> f64 {
        self.brand_multipliers
            .get(brand)
            .copied()
            .unwrap_or(self.default_brand_multiplier)
    }
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self {
            condition_scores: default_condition_scores(),
            default_condition_score: default_condition_score(),
            category_decay: default_category_decay(),
            default_decay_rate: default_decay_rate(),
            brand_multipliers: default_brand_multipliers(),
            default_brand_multiplier: default_brand_multiplier(),
        }
    }
}

fn default_condition_scores() -> HashMap<String, f64> {
    HashMap::from([
        ("Like New".to_string(), 1.00),
        ("Good".to_string(), 0.82),
        ("Fair".to_string(), 0.70),
    ])
}

fn default_condition_score() -> f64 {
    0.80
}

fn default_category_decay() -> HashMap<String, f64> {
    HashMap::from([
        // Mobiles and fashion depreciate fastest, furniture slowest
        ("Mobile".to_string(), 0.035),
        ("Laptop".to_string(), 0.030),
        ("Electronics".to_string(), 0.025),
        ("Camera".to_string(), 0.022),
        ("Furniture".to_string(), 0.015),
        ("Fashion".to_string(), 0.040),
    ])
}

fn default_decay_rate() -> f64 {
    0.025
}

fn default_brand_multipliers() -> HashMap<String, f64> {
    HashMap::from([
        // premium retention brands
        ("Apple".to_string(), 1.15),
        ("Sony".to_string(), 1.10),
        ("Canon".to_string(), 1.05),
        ("Samsung".to_string(), 1.05),
        ("OnePlus".to_string(), 1.05),
        // value brands
        ("Xiaomi".to_string(), 0.98),
        ("Motorola".to_string(), 0.97),
        // neutral defaults
        ("HP".to_string(), 1.00),
        ("Dell".to_string(), 1.00),
        ("LG".to_string(), 1.00),
        ("Ikea".to_string(), 1.00),
        ("UrbanLadder".to_string(), 1.00),
        ("Adidas".to_string(), 1.00),
        ("Nike".to_string(), 1.00),
    ])
}

fn default_brand_multiplier() -> f64 {
    1.00
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_condition_scores() {
        let tables = ScoringTables::default();
        assert_eq!(tables.condition_score("Like New"), 1.00);
        assert_eq!(tables.condition_score("Good"), 0.82);
        assert_eq!(tables.condition_score("Fair"), 0.70);
    }

    #[test]
    fn test_unknown_condition_uses_default() {
        let tables = ScoringTables::default();
        assert_eq!(tables.condition_score("Mint"), 0.80);
        assert_eq!(tables.condition_score(""), 0.80);
    }

    #[test]
    fn test_default_decay_rates() {
        let tables = ScoringTables::default();
        assert_eq!(tables.decay_for_category("Mobile"), 0.035);
        assert_eq!(tables.decay_for_category("Furniture"), 0.015);
        assert_eq!(tables.decay_for_category("Houseboat"), 0.025);
    }

    #[test]
    fn test_brand_multipliers() {
        let tables = ScoringTables::default();
        assert_eq!(tables.brand_multiplier("Apple"), 1.15);
        assert_eq!(tables.brand_multiplier("Motorola"), 0.97);
        assert_eq!(tables.brand_multiplier("NoName"), 1.00);
    }

    #[test]
    fn test_table_lookups_are_exact_case() {
        // comparisons between items are case-insensitive, table lookups are not
        let tables = ScoringTables::default();
        assert_eq!(tables.brand_multiplier("apple"), 1.00);
        assert_eq!(tables.condition_score("good"), 0.80);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let toml = r#"
            default_condition_score = 0.75

            [category_decay]
            Drone = 0.05
        "#;
        let tables: ScoringTables = toml::from_str(toml).unwrap();
        assert_eq!(tables.default_condition_score, 0.75);
        assert_eq!(tables.decay_for_category("Drone"), 0.05);
        // untouched sections fall back to compiled-in defaults
        assert_eq!(tables.brand_multiplier("Apple"), 1.15);
        assert_eq!(tables.condition_score("Good"), 0.82);
        // the decay map was replaced wholesale, so Mobile now uses the default
        assert_eq!(tables.decay_for_category("Mobile"), 0.025);
    }
}
