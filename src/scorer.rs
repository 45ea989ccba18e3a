//! # Preference Scorer Module
//!
//! Computes a weighted additive score for a single (recipe, profile) pair,
//! given the precomputed availability report. The score starts at a neutral
//! midpoint and accumulates signed contributions from each preference factor;
//! allergen matches additionally set a hard safety exclusion that forces the
//! NotRecommended tier no matter what the numeric score says.
//!
//! Missing data is never an error here: an absent cuisine tag, an unrated
//! recipe or an unknown dietary claim all contribute zero.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::matcher::AvailabilityReport;
use crate::pantry_model::RecipeCandidate;
use crate::preference_model::{Rating, UserPreferenceProfile};
use crate::recommend_model::{RecommendationTier, ScoreReason, ScoredRecipe};
use crate::text_processing::normalize_name;

// Scoring constants. The allergen penalty is scored per match for
// explainability, but the veto itself is the tier override plus the
// safety-exclusion flag, not the numeric delta.
pub const BASE_SCORE: f64 = 50.0;
pub const ALLERGEN_PENALTY_PER_MATCH: f64 = -10.0;
pub const DIETARY_MATCH_BONUS: f64 = 5.0;
pub const DIETARY_CONFLICT_PENALTY: f64 = -8.0;
pub const CUISINE_LEVEL_WEIGHT: f64 = 0.5;
pub const EXPIRING_BONUS: f64 = 3.5;
pub const THUMBS_UP_BONUS: f64 = 4.0;
pub const THUMBS_DOWN_PENALTY: f64 = -4.0;
pub const FAVORITE_BONUS: f64 = 3.0;
pub const COMPLETENESS_WEIGHT: f64 = 2.0;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Weights for the additive scoring model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Neutral starting score
    pub base: f64,
    /// Applied once per allergen match, always negative
    pub allergen_per_match: f64,
    /// Recipe satisfies every dietary restriction
    pub dietary_match: f64,
    /// Recipe conflicts with at least one restriction; outweighs positives
    pub dietary_conflict: f64,
    /// Multiplier for the -5..=5 cuisine preference level
    pub cuisine_level: f64,
    /// Any available ingredient is expiring soon
    pub expiring: f64,
    /// Past thumbs-up on this recipe
    pub thumbs_up: f64,
    /// Past thumbs-down on this recipe
    pub thumbs_down: f64,
    /// Recipe saved as favorite
    pub favorite: f64,
    /// Multiplier for the available/valid ingredient fraction
    pub completeness: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base: BASE_SCORE,
            allergen_per_match: ALLERGEN_PENALTY_PER_MATCH,
            dietary_match: DIETARY_MATCH_BONUS,
            dietary_conflict: DIETARY_CONFLICT_PENALTY,
            cuisine_level: CUISINE_LEVEL_WEIGHT,
            expiring: EXPIRING_BONUS,
            thumbs_up: THUMBS_UP_BONUS,
            thumbs_down: THUMBS_DOWN_PENALTY,
            favorite: FAVORITE_BONUS,
            completeness: COMPLETENESS_WEIGHT,
        }
    }
}

/// Scores one recipe for one user given the availability partition
pub struct PreferenceScorer {
    weights: ScoreWeights,
}

impl PreferenceScorer {
    /// Create a scorer with the default weights
    pub fn new() -> Self {
        Self {
            weights: ScoreWeights::default(),
        }
    }

    /// Create a scorer with custom weights
    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score a recipe against a preference profile
    ///
    /// `expiring` holds normalized names of pantry items flagged as expiring
    /// soon (see [`crate::pantry_model::expiring_item_names`], or an external
    /// tracker's signal).
    pub fn score(
        &self,
        recipe: &RecipeCandidate,
        report: &AvailabilityReport,
        profile: &UserPreferenceProfile,
        expiring: &BTreeSet<String>,
    ) -> ScoredRecipe {
        let mut reasons: Vec<ScoreReason> = Vec::new();

        // Safety check first: allergen presence is an absolute veto
        let allergen_hits = self.allergen_matches(report, profile);
        let is_safety_excluded = !allergen_hits.is_empty();
        if is_safety_excluded {
            reasons.push(ScoreReason::new(
                format!("contains allergens: {}", allergen_hits.join(", ")),
                self.weights.allergen_per_match * allergen_hits.len() as f64,
            ));
        }

        self.apply_dietary(recipe, profile, &mut reasons);
        self.apply_cuisine(recipe, profile, &mut reasons);
        self.apply_expiring(report, expiring, &mut reasons);
        self.apply_history(recipe, profile, &mut reasons);
        self.apply_completeness(report, &mut reasons);

        let raw: f64 = self.weights.base + reasons.iter().map(|r| r.delta).sum::<f64>();
        let score = raw.clamp(MIN_SCORE, MAX_SCORE);

        // Most impactful factor first; stable sort keeps evaluation order on ties
        reasons.sort_by(|a, b| {
            b.delta
                .abs()
                .partial_cmp(&a.delta.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let tier = if is_safety_excluded {
            RecommendationTier::NotRecommended
        } else {
            RecommendationTier::from_score(score)
        };

        debug!(
            "Scored recipe {} ({:?}): {:.1} -> {}, excluded={}",
            recipe.id, recipe.title, score, tier, is_safety_excluded
        );

        ScoredRecipe {
            recipe: recipe.clone(),
            score,
            tier,
            reasons,
            is_safety_excluded,
            available_ingredients: report.available_names(),
            missing_ingredients: report.missing.clone(),
        }
    }

    /// Allergens matched by any valid ingredient name (substring,
    /// case-insensitive via normalization)
    fn allergen_matches(
        &self,
        report: &AvailabilityReport,
        profile: &UserPreferenceProfile,
    ) -> Vec<String> {
        let mut hits = Vec::new();
        for allergen in &profile.allergens {
            let allergen_norm = normalize_name(allergen);
            if allergen_norm.is_empty() {
                continue;
            }
            let matched = report
                .available
                .keys()
                .chain(report.missing.iter())
                .any(|name| name.contains(&allergen_norm));
            if matched {
                hits.push(allergen_norm);
            }
        }
        hits
    }

    fn apply_dietary(
        &self,
        recipe: &RecipeCandidate,
        profile: &UserPreferenceProfile,
        reasons: &mut Vec<ScoreReason>,
    ) {
        if profile.dietary_restrictions.is_empty() {
            return;
        }
        // An untagged recipe is unknown, not a conflict
        if recipe.dietary_tags.is_empty() {
            return;
        }
        let tags: BTreeSet<String> = recipe
            .dietary_tags
            .iter()
            .map(|t| normalize_name(t))
            .collect();
        let unmet: Vec<&String> = profile
            .dietary_restrictions
            .iter()
            .filter(|r| !tags.contains(&normalize_name(r)))
            .collect();

        if unmet.is_empty() {
            reasons.push(ScoreReason::new(
                "fits all dietary restrictions",
                self.weights.dietary_match,
            ));
        } else {
            let listed = unmet
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            reasons.push(ScoreReason::new(
                format!("does not satisfy dietary restrictions: {listed}"),
                self.weights.dietary_conflict,
            ));
        }
    }

    fn apply_cuisine(
        &self,
        recipe: &RecipeCandidate,
        profile: &UserPreferenceProfile,
        reasons: &mut Vec<ScoreReason>,
    ) {
        let cuisine = match recipe.cuisine.as_deref() {
            Some(c) => normalize_name(c),
            None => return,
        };
        if let Some(&level) = profile.cuisine_preferences.get(&cuisine) {
            if level != 0 {
                reasons.push(ScoreReason::new(
                    format!("cuisine '{cuisine}' preference level {level}"),
                    f64::from(level) * self.weights.cuisine_level,
                ));
            }
        }
    }

    fn apply_expiring(
        &self,
        report: &AvailabilityReport,
        expiring: &BTreeSet<String>,
        reasons: &mut Vec<ScoreReason>,
    ) {
        if expiring.is_empty() {
            return;
        }
        // Callers may pass raw tracker names; normalize both sides
        let expiring: BTreeSet<String> = expiring.iter().map(|name| normalize_name(name)).collect();
        let used: Vec<&str> = report
            .available
            .values()
            .filter(|pantry_name| expiring.contains(&normalize_name(pantry_name)))
            .map(String::as_str)
            .collect();
        if let Some(first) = used.first() {
            reasons.push(ScoreReason::new(
                format!("uses expiring pantry item: {first}"),
                self.weights.expiring,
            ));
        }
    }

    fn apply_history(
        &self,
        recipe: &RecipeCandidate,
        profile: &UserPreferenceProfile,
        reasons: &mut Vec<ScoreReason>,
    ) {
        match profile.past_ratings.get(&recipe.id) {
            Some(Rating::ThumbsUp) => reasons.push(ScoreReason::new(
                "previously rated thumbs up",
                self.weights.thumbs_up,
            )),
            Some(Rating::ThumbsDown) => reasons.push(ScoreReason::new(
                "previously rated thumbs down",
                self.weights.thumbs_down,
            )),
            Some(Rating::Neutral) | None => {}
        }
        if profile.favorites.contains(&recipe.id) {
            reasons.push(ScoreReason::new("saved as favorite", self.weights.favorite));
        }
    }

    fn apply_completeness(&self, report: &AvailabilityReport, reasons: &mut Vec<ScoreReason>) {
        let valid = report.valid_count();
        if valid == 0 {
            return;
        }
        let fraction = report.available_count() as f64 / valid as f64;
        if fraction > 0.0 {
            reasons.push(ScoreReason::new(
                format!("{} of {} ingredients on hand", report.available_count(), valid),
                self.weights.completeness * fraction,
            ));
        }
    }
}

impl Default for PreferenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::AvailabilityMatcher;
    use crate::pantry_model::{PantryItem, RecipeIngredient};

    fn scrambled_eggs() -> RecipeCandidate {
        RecipeCandidate::new("1", "Scrambled Eggs")
            .with_ingredient(RecipeIngredient::new("eggs").with_amount(2.0))
            .with_ingredient(RecipeIngredient::new("milk").with_amount(0.25).with_unit("cup"))
            .with_ingredient(RecipeIngredient::new("butter").with_amount(1.0).with_unit("tbsp"))
    }

    fn pantry() -> Vec<PantryItem> {
        vec![
            PantryItem::new("eggs", 12.0, ""),
            PantryItem::new("milk", 1.0, "l"),
        ]
    }

    fn score_with(
        recipe: &RecipeCandidate,
        profile: &UserPreferenceProfile,
        expiring: &BTreeSet<String>,
    ) -> ScoredRecipe {
        let report = AvailabilityMatcher::new().classify(&recipe.ingredients, &pantry());
        PreferenceScorer::new().score(recipe, &report, profile, expiring)
    }

    #[test]
    fn test_neutral_profile_scores_near_base() {
        let scored = score_with(
            &scrambled_eggs(),
            &UserPreferenceProfile::empty(),
            &BTreeSet::new(),
        );
        // base 50 + completeness 2.0 * (2/3)
        let expected = 50.0 + 2.0 * (2.0 / 3.0);
        assert!((scored.score - expected).abs() < 1e-9);
        assert!(!scored.is_safety_excluded);
        assert_eq!(scored.tier, RecommendationTier::Suitable);
    }

    #[test]
    fn test_allergen_forces_not_recommended() {
        let mut profile = UserPreferenceProfile::empty();
        profile.allergens.insert("egg".to_string());
        // Pile on positives that would otherwise push the score high
        profile.favorites.insert("1".to_string());
        profile.record_rating("1", Rating::ThumbsUp);

        let scored = score_with(&scrambled_eggs(), &profile, &BTreeSet::new());
        assert!(scored.is_safety_excluded);
        assert_eq!(scored.tier, RecommendationTier::NotRecommended);
        assert!(scored
            .reasons
            .iter()
            .any(|r| r.description.contains("allergens") && r.delta < 0.0));
    }

    #[test]
    fn test_allergen_substring_matches_missing_ingredient_too() {
        let mut profile = UserPreferenceProfile::empty();
        profile.allergens.insert("butter".to_string());
        let scored = score_with(&scrambled_eggs(), &profile, &BTreeSet::new());
        // "butter" is missing from the pantry but still present in the recipe
        assert!(scored.is_safety_excluded);
    }

    #[test]
    fn test_cuisine_preference_contribution() {
        let recipe = scrambled_eggs().with_cuisine("Italian");
        let mut profile = UserPreferenceProfile::empty();
        profile.cuisine_preferences.insert("italian".to_string(), 4);

        let scored = score_with(&recipe, &profile, &BTreeSet::new());
        let cuisine_reason = scored
            .reasons
            .iter()
            .find(|r| r.description.contains("cuisine"))
            .expect("cuisine factor should fire");
        assert!((cuisine_reason.delta - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_cuisine_contributes_nothing() {
        let recipe = scrambled_eggs().with_cuisine("fusion");
        let mut profile = UserPreferenceProfile::empty();
        profile.cuisine_preferences.insert("italian".to_string(), 4);
        let scored = score_with(&recipe, &profile, &BTreeSet::new());
        assert!(!scored.reasons.iter().any(|r| r.description.contains("cuisine")));
    }

    #[test]
    fn test_thumbs_up_strictly_increases_score() {
        let recipe = scrambled_eggs();
        let baseline = score_with(&recipe, &UserPreferenceProfile::empty(), &BTreeSet::new());

        let mut profile = UserPreferenceProfile::empty();
        profile.record_rating("1", Rating::ThumbsUp);
        let rated = score_with(&recipe, &profile, &BTreeSet::new());

        assert!(rated.score > baseline.score);
        assert!((rated.score - baseline.score - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_thumbs_down_suppresses() {
        let recipe = scrambled_eggs();
        let baseline = score_with(&recipe, &UserPreferenceProfile::empty(), &BTreeSet::new());

        let mut profile = UserPreferenceProfile::empty();
        profile.record_rating("1", Rating::ThumbsDown);
        let rated = score_with(&recipe, &profile, &BTreeSet::new());
        assert!(rated.score < baseline.score);
    }

    #[test]
    fn test_favorite_bonus_stacks_with_rating() {
        let recipe = scrambled_eggs();
        let mut profile = UserPreferenceProfile::empty();
        profile.record_rating("1", Rating::ThumbsUp);
        profile.favorites.insert("1".to_string());

        let baseline = score_with(&recipe, &UserPreferenceProfile::empty(), &BTreeSet::new());
        let scored = score_with(&recipe, &profile, &BTreeSet::new());
        assert!((scored.score - baseline.score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_expiring_bonus() {
        let recipe = scrambled_eggs();
        let expiring = BTreeSet::from(["milk".to_string()]);
        let scored = score_with(&recipe, &UserPreferenceProfile::empty(), &expiring);
        let reason = scored
            .reasons
            .iter()
            .find(|r| r.description.contains("expiring"))
            .expect("expiring factor should fire");
        assert!((reason.delta - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_expiring_bonus_accepts_raw_tracker_names() {
        let recipe = scrambled_eggs();
        let pantry = vec![
            PantryItem::new("eggs", 12.0, ""),
            PantryItem::new("Whole Milk", 1.0, "l"),
        ];
        let report = AvailabilityMatcher::new().classify(&recipe.ingredients, &pantry);
        // Un-normalized name, exactly as an external expiry tracker would send it
        let expiring = BTreeSet::from(["Whole Milk".to_string()]);
        let scored =
            PreferenceScorer::new().score(&recipe, &report, &UserPreferenceProfile::empty(), &expiring);
        let reason = scored
            .reasons
            .iter()
            .find(|r| r.description.contains("expiring"))
            .expect("expiring factor should fire");
        assert!((reason.delta - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_dietary_match_and_conflict() {
        let mut profile = UserPreferenceProfile::empty();
        profile
            .dietary_restrictions
            .insert("vegetarian".to_string());

        let compatible = scrambled_eggs().with_dietary_tag("vegetarian");
        let scored = score_with(&compatible, &profile, &BTreeSet::new());
        assert!(scored
            .reasons
            .iter()
            .any(|r| r.description.contains("fits all") && (r.delta - 5.0).abs() < 1e-9));

        let conflicting = scrambled_eggs().with_dietary_tag("gluten free");
        let scored = score_with(&conflicting, &profile, &BTreeSet::new());
        assert!(scored
            .reasons
            .iter()
            .any(|r| r.description.contains("does not satisfy") && (r.delta + 8.0).abs() < 1e-9));

        // Untagged recipe: unknown, no contribution either way
        let untagged = scrambled_eggs();
        let scored = score_with(&untagged, &profile, &BTreeSet::new());
        assert!(!scored.reasons.iter().any(|r| r.description.contains("dietary")));
    }

    #[test]
    fn test_reasons_ordered_by_impact() {
        let recipe = scrambled_eggs().with_cuisine("italian");
        let mut profile = UserPreferenceProfile::empty();
        profile.cuisine_preferences.insert("italian".to_string(), 1); // +0.5
        profile.record_rating("1", Rating::ThumbsUp); // +4.0

        let scored = score_with(&recipe, &profile, &BTreeSet::new());
        let deltas: Vec<f64> = scored.reasons.iter().map(|r| r.delta.abs()).collect();
        let mut sorted = deltas.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(deltas, sorted);
        assert_eq!(scored.reasons[0].description, "previously rated thumbs up");
    }

    #[test]
    fn test_score_clamped() {
        let recipe = scrambled_eggs();
        let mut weights = ScoreWeights::default();
        weights.thumbs_down = -200.0;
        let mut profile = UserPreferenceProfile::empty();
        profile.record_rating("1", Rating::ThumbsDown);

        let report = AvailabilityMatcher::new().classify(&recipe.ingredients, &pantry());
        let scored =
            PreferenceScorer::with_weights(weights).score(&recipe, &report, &profile, &BTreeSet::new());
        assert_eq!(scored.score, 0.0);
    }
}
