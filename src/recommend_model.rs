//! # Recommendation Output Model
//!
//! The output unit of the pipeline: a candidate recipe annotated with its
//! numeric score, coarse recommendation tier, the ordered list of factors
//! that fired, the safety-exclusion flag and the availability partition.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::pantry_model::RecipeCandidate;

/// Coarse recommendation bucket derived from a numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationTier {
    HighlyRecommended,
    Recommended,
    Suitable,
    Possible,
    NotRecommended,
}

impl RecommendationTier {
    /// Map a clamped 0..=100 score to its tier
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            RecommendationTier::HighlyRecommended
        } else if score >= 60.0 {
            RecommendationTier::Recommended
        } else if score >= 40.0 {
            RecommendationTier::Suitable
        } else if score >= 20.0 {
            RecommendationTier::Possible
        } else {
            RecommendationTier::NotRecommended
        }
    }
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecommendationTier::HighlyRecommended => "highly recommended",
            RecommendationTier::Recommended => "recommended",
            RecommendationTier::Suitable => "suitable",
            RecommendationTier::Possible => "possible",
            RecommendationTier::NotRecommended => "not recommended",
        };
        write!(f, "{label}")
    }
}

/// One scoring factor that fired, with its signed score contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReason {
    /// Human-readable description of the factor
    pub description: String,
    /// Signed contribution to the score
    pub delta: f64,
}

impl ScoreReason {
    pub fn new(description: impl Into<String>, delta: f64) -> Self {
        Self {
            description: description.into(),
            delta,
        }
    }
}

impl fmt::Display for ScoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:+.1})", self.description, self.delta)
    }
}

/// A candidate recipe annotated by the scorer
///
/// Safety-excluded recipes stay in result lists so callers can explain why
/// something is not suggested, but `is_safety_excluded` must drive distinct
/// rendering; a vetoed recipe is not merely low-scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecipe {
    /// The recipe that was scored
    pub recipe: RecipeCandidate,

    /// Final score, clamped to 0..=100
    pub score: f64,

    /// Coarse bucket; forced to NotRecommended when safety-excluded
    pub tier: RecommendationTier,

    /// Factors that fired, most impactful first
    pub reasons: Vec<ScoreReason>,

    /// True when an ingredient matched one of the user's allergens
    pub is_safety_excluded: bool,

    /// Normalized names of ingredients matched in the pantry
    pub available_ingredients: BTreeSet<String>,

    /// Normalized names of ingredients the user would need to shop for
    pub missing_ingredients: BTreeSet<String>,
}

impl ScoredRecipe {
    /// Number of ingredients matched in the pantry
    pub fn available_count(&self) -> usize {
        self.available_ingredients.len()
    }

    /// Number of ingredients that would need shopping
    pub fn missing_count(&self) -> usize {
        self.missing_ingredients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(
            RecommendationTier::from_score(100.0),
            RecommendationTier::HighlyRecommended
        );
        assert_eq!(
            RecommendationTier::from_score(80.0),
            RecommendationTier::HighlyRecommended
        );
        assert_eq!(RecommendationTier::from_score(79.9), RecommendationTier::Recommended);
        assert_eq!(RecommendationTier::from_score(60.0), RecommendationTier::Recommended);
        assert_eq!(RecommendationTier::from_score(59.9), RecommendationTier::Suitable);
        assert_eq!(RecommendationTier::from_score(40.0), RecommendationTier::Suitable);
        assert_eq!(RecommendationTier::from_score(20.0), RecommendationTier::Possible);
        assert_eq!(
            RecommendationTier::from_score(19.9),
            RecommendationTier::NotRecommended
        );
        assert_eq!(RecommendationTier::from_score(0.0), RecommendationTier::NotRecommended);
    }

    #[test]
    fn test_reason_display() {
        let reason = ScoreReason::new("cuisine 'italian' preference level 4", 2.0);
        assert_eq!(reason.to_string(), "cuisine 'italian' preference level 4 (+2.0)");
        let reason = ScoreReason::new("previously rated thumbs down", -4.0);
        assert_eq!(reason.to_string(), "previously rated thumbs down (-4.0)");
    }
}
