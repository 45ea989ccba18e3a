//! # Ingredient Availability Matcher
//!
//! Given a recipe's ingredient list and the user's current pantry snapshot,
//! classify each ingredient as available or missing. The classification is a
//! pure function of its inputs: no side effects, same result on every call.
//!
//! Matching is name-based and deliberately fuzzy (pantry names are messy
//! OCR/free-text). The strategy is pluggable through [`MatchStrategy`] so a
//! stronger algorithm (token-set overlap, edit distance) can be substituted
//! without touching the scorer.
//!
//! By default availability is quantity-blind: any positive-quantity pantry
//! item with a matching name marks the ingredient available, whether or not
//! the quantity suffices for the recipe's requested amount. Unit labels are
//! too inconsistent to compare amounts reliably, so the stricter mode is
//! opt-in via [`MatcherConfig::quantity_aware`] and only gates when both
//! sides canonicalize to the same unit.

use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::pantry_model::{PantryItem, RecipeIngredient};
use crate::text_processing::{normalize_name, NoiseLineDetector};
use crate::units::CanonicalUnit;

/// Name matching strategy at the matcher's fuzzy seam
pub trait MatchStrategy: Send + Sync {
    /// Whether a normalized ingredient name matches a normalized pantry name
    fn matches(&self, ingredient: &str, pantry_item: &str) -> bool;
}

/// Default strategy: exact match, or substring containment in either
/// direction ("egg" in "eggs", "cherry tomatoes" vs "tomatoes")
///
/// Containment requires the contained name to be at least three characters;
/// one- and two-letter fragments match far too much of a real pantry.
pub struct SubstringStrategy;

impl MatchStrategy for SubstringStrategy {
    fn matches(&self, ingredient: &str, pantry_item: &str) -> bool {
        if ingredient.is_empty() || pantry_item.is_empty() {
            return false;
        }
        if ingredient == pantry_item {
            return true;
        }
        (ingredient.len() >= 3 && pantry_item.contains(ingredient))
            || (pantry_item.len() >= 3 && ingredient.contains(pantry_item))
    }
}

/// Configuration options for availability matching
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Require pantry quantity >= recipe amount when units are comparable
    pub quantity_aware: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            quantity_aware: false,
        }
    }
}

/// The availability partition for one recipe against one pantry snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityReport {
    /// Normalized ingredient name -> name of the pantry item that matched
    pub available: BTreeMap<String, String>,
    /// Normalized names of ingredients with no pantry match
    pub missing: BTreeSet<String>,
    /// Noise and malformed lines that were ignored, in input order
    pub skipped_lines: Vec<String>,
    /// Count of valid ingredients processed, tracked independently of the
    /// two sets so the partition invariant is checkable
    valid: usize,
}

impl AvailabilityReport {
    /// Ingredients matched in the pantry
    pub fn available_names(&self) -> BTreeSet<String> {
        self.available.keys().cloned().collect()
    }

    /// Number of ingredients matched in the pantry
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Number of ingredients with no pantry match
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    /// Count of valid (post-filter, de-duplicated) ingredients
    pub fn valid_count(&self) -> usize {
        self.valid
    }

    /// Verify the count invariant: available and missing are disjoint and
    /// together cover every valid ingredient
    pub fn counts_are_consistent(&self) -> bool {
        self.available.keys().all(|name| !self.missing.contains(name))
            && self.available.len() + self.missing.len() == self.valid
    }
}

/// Classifies recipe ingredients as available or missing against a pantry
pub struct AvailabilityMatcher {
    strategy: Box<dyn MatchStrategy>,
    noise: NoiseLineDetector,
    config: MatcherConfig,
}

impl AvailabilityMatcher {
    /// Create a matcher with the default substring strategy and config
    pub fn new() -> Self {
        Self {
            strategy: Box::new(SubstringStrategy),
            noise: NoiseLineDetector::new(),
            config: MatcherConfig::default(),
        }
    }

    /// Substitute the name matching strategy
    pub fn with_strategy(mut self, strategy: Box<dyn MatchStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the matcher configuration
    pub fn with_config(mut self, config: MatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Classify a recipe's ingredients against a pantry snapshot
    ///
    /// Noise lines (instruction artifacts) and malformed lines (no usable
    /// name) are skipped and reported, never fatal. Duplicate ingredients
    /// de-duplicate by normalized name, keeping the first occurrence.
    /// Depleted pantry items never match. An empty ingredient list yields
    /// an empty report.
    pub fn classify(
        &self,
        ingredients: &[RecipeIngredient],
        pantry: &[PantryItem],
    ) -> AvailabilityReport {
        let mut available = BTreeMap::new();
        let mut missing = BTreeSet::new();
        let mut skipped_lines = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut valid = 0usize;

        // Depleted items are logically used up and must not count
        let stocked: Vec<(&PantryItem, String)> = pantry
            .iter()
            .filter(|item| !item.is_depleted())
            .map(|item| (item, normalize_name(&item.name)))
            .collect();

        for ingredient in ingredients {
            let name = normalize_name(&ingredient.name);
            if name.is_empty() && ingredient.amount.is_none() {
                warn!("Skipping malformed ingredient line: {:?}", ingredient.name);
                skipped_lines.push(ingredient.name.clone());
                continue;
            }
            if self.noise.is_noise(&ingredient.name) {
                debug!("Skipping noise line: {:?}", ingredient.name);
                skipped_lines.push(ingredient.name.clone());
                continue;
            }
            if !seen.insert(name.clone()) {
                debug!("Skipping duplicate ingredient: {:?}", name);
                continue;
            }
            valid += 1;

            let matched = stocked
                .iter()
                .find(|(item, pantry_name)| {
                    self.strategy.matches(&name, pantry_name)
                        && self.quantity_suffices(ingredient, item)
                })
                .map(|(item, _)| item.name.clone());

            match matched {
                Some(pantry_name) => {
                    available.insert(name, pantry_name);
                }
                None => {
                    missing.insert(name);
                }
            }
        }

        debug!(
            "Classified {} ingredient(s): {} available, {} missing, {} skipped",
            available.len() + missing.len(),
            available.len(),
            missing.len(),
            skipped_lines.len()
        );

        AvailabilityReport {
            available,
            missing,
            skipped_lines,
            valid,
        }
    }

    /// Quantity gate for a name-matched pantry item
    ///
    /// Only active in quantity-aware mode, and only when the recipe states a
    /// positive amount and both unit labels canonicalize to the same known
    /// unit. In every other case presence wins.
    fn quantity_suffices(&self, ingredient: &RecipeIngredient, item: &PantryItem) -> bool {
        if !self.config.quantity_aware {
            return true;
        }
        let amount = match ingredient.amount {
            Some(a) if a > 0.0 => a,
            _ => return true,
        };
        let unit = match ingredient.unit.as_deref() {
            Some(u) => u,
            None => return true,
        };
        if !CanonicalUnit::comparable(unit, &item.unit) {
            return true;
        }
        item.quantity >= amount
    }
}

impl Default for AvailabilityMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pantry() -> Vec<PantryItem> {
        vec![
            PantryItem::new("Eggs", 12.0, ""),
            PantryItem::new("Whole Milk", 1.0, "l"),
            PantryItem::new("Salt", 500.0, "g"),
        ]
    }

    #[test]
    fn test_exact_and_containment_matching() {
        let matcher = AvailabilityMatcher::new();
        let ingredients = vec![
            RecipeIngredient::new("eggs").with_amount(2.0),
            RecipeIngredient::new("milk").with_amount(0.25).with_unit("cup"),
            RecipeIngredient::new("butter").with_amount(1.0).with_unit("tbsp"),
        ];

        let report = matcher.classify(&ingredients, &pantry());

        assert_eq!(
            report.available_names(),
            BTreeSet::from(["eggs".to_string(), "milk".to_string()])
        );
        assert_eq!(report.missing, BTreeSet::from(["butter".to_string()]));
        assert_eq!(report.available_count(), 2);
        assert_eq!(report.missing_count(), 1);
        assert!(report.counts_are_consistent());
        // "milk" matched through containment in "whole milk"
        assert_eq!(report.available.get("milk").map(String::as_str), Some("Whole Milk"));
    }

    #[test]
    fn test_depleted_items_never_match() {
        let matcher = AvailabilityMatcher::new();
        let pantry = vec![PantryItem::new("eggs", 0.0, "")];
        let ingredients = vec![RecipeIngredient::new("eggs")];

        let report = matcher.classify(&ingredients, &pantry);
        assert!(report.available.is_empty());
        assert!(report.missing.contains("eggs"));
    }

    #[test]
    fn test_noise_and_malformed_lines_are_skipped() {
        let matcher = AvailabilityMatcher::new();
        let ingredients = vec![
            RecipeIngredient::new("eggs"),
            RecipeIngredient::new("prep time: 10 min"),
            RecipeIngredient::new("   "),
            RecipeIngredient::new("Servings: 4"),
        ];

        let report = matcher.classify(&ingredients, &pantry());
        assert_eq!(report.valid_count(), 1);
        assert_eq!(report.skipped_lines.len(), 3);
        assert!(report.counts_are_consistent());
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let matcher = AvailabilityMatcher::new();
        let ingredients = vec![
            RecipeIngredient::new("Eggs").with_amount(2.0),
            RecipeIngredient::new("eggs,").with_amount(1.0),
        ];

        let report = matcher.classify(&ingredients, &pantry());
        assert_eq!(report.valid_count(), 1);
        assert!(report.available.contains_key("eggs"));
    }

    #[test]
    fn test_empty_ingredient_list() {
        let matcher = AvailabilityMatcher::new();
        let report = matcher.classify(&[], &pantry());
        assert_eq!(report.valid_count(), 0);
        assert!(report.available.is_empty());
        assert!(report.missing.is_empty());
        assert!(report.counts_are_consistent());
    }

    #[test]
    fn test_matcher_is_idempotent() {
        let matcher = AvailabilityMatcher::new();
        let ingredients = vec![
            RecipeIngredient::new("eggs"),
            RecipeIngredient::new("flour"),
            RecipeIngredient::new("salt"),
        ];
        let first = matcher.classify(&ingredients, &pantry());
        let second = matcher.classify(&ingredients, &pantry());
        assert_eq!(first, second);
    }

    #[test]
    fn test_quantity_blind_by_default() {
        let matcher = AvailabilityMatcher::new();
        // Recipe wants 2 liters, pantry has 1 liter; quantity-blind mode
        // still counts it as available.
        let ingredients = vec![RecipeIngredient::new("milk").with_amount(2.0).with_unit("l")];
        let report = matcher.classify(&ingredients, &pantry());
        assert!(report.available.contains_key("milk"));
    }

    #[test]
    fn test_quantity_aware_gating() {
        let matcher = AvailabilityMatcher::new().with_config(MatcherConfig {
            quantity_aware: true,
        });
        // Comparable units, insufficient quantity: missing
        let ingredients = vec![RecipeIngredient::new("milk").with_amount(2.0).with_unit("liters")];
        let report = matcher.classify(&ingredients, &pantry());
        assert!(report.missing.contains("milk"));

        // Comparable units, sufficient quantity: available
        let ingredients = vec![RecipeIngredient::new("milk").with_amount(0.5).with_unit("l")];
        let report = matcher.classify(&ingredients, &pantry());
        assert!(report.available.contains_key("milk"));

        // Units not comparable (cup vs l): presence wins
        let ingredients = vec![RecipeIngredient::new("milk").with_amount(9.0).with_unit("cups")];
        let report = matcher.classify(&ingredients, &pantry());
        assert!(report.available.contains_key("milk"));
    }

    #[test]
    fn test_short_fragments_do_not_match() {
        let matcher = AvailabilityMatcher::new();
        let pantry = vec![PantryItem::new("apples", 3.0, "")];
        // Two-letter name must not containment-match "apples"
        let ingredients = vec![RecipeIngredient::new("ap")];
        let report = matcher.classify(&ingredients, &pantry);
        assert!(report.missing.contains("ap"));
    }

    #[test]
    fn test_custom_strategy_is_pluggable() {
        struct ExactOnly;
        impl MatchStrategy for ExactOnly {
            fn matches(&self, ingredient: &str, pantry_item: &str) -> bool {
                ingredient == pantry_item
            }
        }

        let matcher = AvailabilityMatcher::new().with_strategy(Box::new(ExactOnly));
        let ingredients = vec![RecipeIngredient::new("milk")];
        // "milk" != "whole milk" under exact matching
        let report = matcher.classify(&ingredients, &pantry());
        assert!(report.missing.contains("milk"));
    }
}
