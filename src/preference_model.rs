//! # User Preference Data Model
//!
//! This module defines the preference record for one user: allergens,
//! dietary restrictions, cuisine preference levels, rating history and
//! favorites. Absence of saved preferences is always represented as empty
//! collections, never as a missing profile.
//!
//! Preference saves use replace semantics per category: each save replaces
//! the whole category (all allergens, all restrictions) rather than diffing.
//! [`UserPreferenceProfile::replace_category`] makes that contract explicit.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A past rating the user gave a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    ThumbsUp,
    ThumbsDown,
    Neutral,
}

impl Rating {
    /// Parse a rating from its stored string form; unknown values are Neutral
    pub fn parse(raw: &str) -> Self {
        match raw {
            "thumbs_up" => Rating::ThumbsUp,
            "thumbs_down" => Rating::ThumbsDown,
            _ => Rating::Neutral,
        }
    }

    /// The stored string form of this rating
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::ThumbsUp => "thumbs_up",
            Rating::ThumbsDown => "thumbs_down",
            Rating::Neutral => "neutral",
        }
    }
}

/// A set-valued preference category subject to replace-on-save semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceCategory {
    Allergens,
    DietaryRestrictions,
}

/// The preference record for one user
///
/// Allergens are absolute exclusions, never just a scoring penalty. The
/// profile is read fresh per scoring request; nothing here caches across
/// requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserPreferenceProfile {
    /// Ingredient names the user must never be served
    #[serde(default)]
    pub allergens: BTreeSet<String>,

    /// Dietary restrictions ("vegetarian", "halal")
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,

    /// Cuisine preference levels, -5..=5
    #[serde(default)]
    pub cuisine_preferences: BTreeMap<String, i32>,

    /// Past thumbs ratings keyed by recipe id
    #[serde(default)]
    pub past_ratings: BTreeMap<String, Rating>,

    /// Recipe ids the user saved as favorites
    #[serde(default)]
    pub favorites: BTreeSet<String>,
}

impl UserPreferenceProfile {
    /// The profile of a user with no saved preferences
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no preference data is present at all
    pub fn is_empty(&self) -> bool {
        self.allergens.is_empty()
            && self.dietary_restrictions.is_empty()
            && self.cuisine_preferences.is_empty()
            && self.past_ratings.is_empty()
            && self.favorites.is_empty()
    }

    /// Replace a whole preference category with a new set
    ///
    /// Values previously in the category and absent from `values` are gone
    /// after this call; there is no merging.
    pub fn replace_category(&mut self, category: PreferenceCategory, values: BTreeSet<String>) {
        match category {
            PreferenceCategory::Allergens => self.allergens = values,
            PreferenceCategory::DietaryRestrictions => self.dietary_restrictions = values,
        }
    }

    /// Record a rating for a recipe, overwriting any previous one
    pub fn record_rating(&mut self, recipe_id: &str, rating: Rating) {
        self.past_ratings.insert(recipe_id.to_string(), rating);
    }

    /// Mark or unmark a recipe as favorite
    pub fn set_favorite(&mut self, recipe_id: &str, favorite: bool) {
        if favorite {
            self.favorites.insert(recipe_id.to_string());
        } else {
            self.favorites.remove(recipe_id);
        }
    }
}
