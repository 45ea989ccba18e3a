//! # Ranking Pipeline Module
//!
//! Applies the matcher and scorer across a candidate list for one user and
//! one pantry snapshot, producing a fully deterministic ordering: score
//! descending, then available-count descending (less shopping wins ties),
//! then recipe id ascending. Safety-excluded recipes stay in the list so the
//! caller can explain why they are not suggested, but they always sort after
//! every non-excluded recipe regardless of raw score.
//!
//! The pipeline does no I/O. The preference fetch happens once, before this
//! stage; [`rank_for_user`] is the convenience wrapper that performs it with
//! the degrade-gracefully policy and then ranks.

use log::info;
use std::collections::BTreeSet;

use crate::matcher::AvailabilityMatcher;
use crate::pantry_model::{PantryItem, RecipeCandidate};
use crate::preference_model::UserPreferenceProfile;
use crate::preference_store::{load_preferences_or_default, PreferenceStore};
use crate::recommend_model::ScoredRecipe;
use crate::scorer::PreferenceScorer;
use crate::store_config::RecoveryConfig;

/// Score and rank a candidate list against one pantry snapshot and profile
///
/// Pure with respect to its inputs; calling it twice with identical inputs
/// produces identical output. An empty candidate list returns an empty vec.
pub fn rank_candidates(
    matcher: &AvailabilityMatcher,
    scorer: &PreferenceScorer,
    pantry: &[PantryItem],
    candidates: &[RecipeCandidate],
    profile: &UserPreferenceProfile,
    expiring: &BTreeSet<String>,
) -> Vec<ScoredRecipe> {
    let mut ranked: Vec<ScoredRecipe> = candidates
        .iter()
        .map(|candidate| {
            let report = matcher.classify(&candidate.ingredients, pantry);
            scorer.score(candidate, &report, profile, expiring)
        })
        .collect();

    // total_cmp keeps the ordering total even if a custom weight produced a
    // NaN; the pipeline must never panic over one bad score
    ranked.sort_by(|a, b| {
        a.is_safety_excluded
            .cmp(&b.is_safety_excluded)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| b.available_count().cmp(&a.available_count()))
            .then_with(|| a.recipe.id.cmp(&b.recipe.id))
    });

    let excluded = ranked.iter().filter(|r| r.is_safety_excluded).count();
    info!(
        "Ranked {} candidate(s) against {} pantry item(s), {} safety-excluded",
        ranked.len(),
        pantry.len(),
        excluded
    );

    ranked
}

/// Load the user's preferences and rank candidates with default components
///
/// The preference fetch is a soft dependency: on store failure or timeout the
/// ranking proceeds with an empty profile rather than failing the whole call.
pub async fn rank_for_user<S: PreferenceStore>(
    store: &S,
    user_id: &str,
    pantry: &[PantryItem],
    candidates: &[RecipeCandidate],
    expiring: &BTreeSet<String>,
    recovery: &RecoveryConfig,
) -> Vec<ScoredRecipe> {
    let profile = load_preferences_or_default(store, user_id, recovery).await;
    rank_candidates(
        &AvailabilityMatcher::new(),
        &PreferenceScorer::new(),
        pantry,
        candidates,
        &profile,
        expiring,
    )
}
