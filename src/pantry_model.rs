//! # Pantry and Recipe Data Model
//!
//! This module defines the data structures the recommendation core consumes:
//! pantry items as scanned or entered by the user, and candidate recipes with
//! their free-text ingredient lines.
//!
//! ## Core Concepts
//!
//! - **PantryItem**: a quantity of a named product the user currently holds
//! - **RecipeIngredient**: one line item of a recipe's ingredient list
//! - **RecipeCandidate**: a recipe under consideration for ranking
//!
//! ## Usage
//!
//! ```rust
//! use prepsense::pantry_model::{PantryItem, RecipeCandidate, RecipeIngredient};
//!
//! let milk = PantryItem::new("Whole Milk", 1.0, "l").with_category("dairy");
//!
//! let omelette = RecipeCandidate::new("42", "Omelette")
//!     .with_ingredient(RecipeIngredient::new("eggs").with_amount(3.0))
//!     .with_cuisine("french");
//! ```

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::text_processing::normalize_name;

/// A quantity of a named product the user currently holds
///
/// Created by receipt OCR ingestion or manual entry, mutated by recipe
/// completion or manual edits. An item with quantity 0 is logically "used up"
/// and never counts as available; whether it is deleted is the caller's
/// policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    /// Free-text product name as entered or scanned
    pub name: String,

    /// Quantity on hand; never negative
    pub quantity: f64,

    /// Free-text unit label ("cup", "g", "bottle")
    #[serde(default)]
    pub unit: String,

    /// Optional category ("dairy", "produce")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Optional expiration date, feeding the expiring-soon signal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl PantryItem {
    /// Create a new pantry item; negative quantities clamp to 0
    pub fn new(name: &str, quantity: f64, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: quantity.max(0.0),
            unit: unit.to_string(),
            category: None,
            expiration_date: None,
        }
    }

    /// Set the item category
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Set the expiration date
    pub fn with_expiration(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }

    /// Whether the item is used up and must not count as available
    pub fn is_depleted(&self) -> bool {
        self.quantity <= 0.0
    }
}

impl fmt::Display for PantryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{} x{}", self.name, self.quantity)
        } else {
            write!(f, "{} x{} {}", self.name, self.quantity, self.unit)
        }
    }
}

/// One line item of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Free-text ingredient name
    pub name: String,

    /// Amount requested by the recipe; absent for "to taste" items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    /// Free-text unit label; may be empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl RecipeIngredient {
    /// Create a new ingredient line with just a name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            amount: None,
            unit: None,
        }
    }

    /// Set the requested amount
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the unit label
    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }
}

impl fmt::Display for RecipeIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.amount, self.unit.as_deref()) {
            (Some(amount), Some(unit)) => write!(f, "{} {} {}", amount, unit, self.name),
            (Some(amount), None) => write!(f, "{} {}", amount, self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// A recipe under consideration for ranking
///
/// Sourced externally (recipe API or saved-recipe store). Availability sets
/// are computed by the matcher per ranking call, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    /// Stable recipe identifier; numeric ids from upstream JSON are accepted
    #[serde(deserialize_with = "deserialize_recipe_id")]
    pub id: String,

    /// Recipe title
    pub title: String,

    /// Ingredient lines, possibly containing upstream parsing noise
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,

    /// Optional cuisine tag ("italian", "mexican")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,

    /// Dietary compatibility claims ("vegetarian", "gluten free")
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub dietary_tags: BTreeSet<String>,

    /// Optional estimated prep time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<u32>,
}

impl RecipeCandidate {
    /// Create a new candidate with an id and title
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            ingredients: Vec::new(),
            cuisine: None,
            dietary_tags: BTreeSet::new(),
            ready_in_minutes: None,
        }
    }

    /// Append an ingredient line
    pub fn with_ingredient(mut self, ingredient: RecipeIngredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// Set the cuisine tag
    pub fn with_cuisine(mut self, cuisine: &str) -> Self {
        self.cuisine = Some(cuisine.to_string());
        self
    }

    /// Add a dietary compatibility claim
    pub fn with_dietary_tag(mut self, tag: &str) -> Self {
        self.dietary_tags.insert(tag.to_string());
        self
    }

    /// Set the estimated prep time
    pub fn with_ready_in_minutes(mut self, minutes: u32) -> Self {
        self.ready_in_minutes = Some(minutes);
        self
    }
}

/// Accept both `"id": 42` and `"id": "42"` from upstream recipe JSON
fn deserialize_recipe_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Compute the expiring-soon signal from a pantry snapshot
///
/// Returns the normalized names of items that expire within `window_days`
/// days of `today` (inclusive) and still have positive quantity. Items with
/// no expiration date never count, and items that already expired are left
/// out: they are a disposal problem, not a cooking suggestion.
pub fn expiring_item_names(
    pantry: &[PantryItem],
    today: NaiveDate,
    window_days: i64,
) -> BTreeSet<String> {
    let horizon = today + Duration::days(window_days);
    pantry
        .iter()
        .filter(|item| !item.is_depleted())
        .filter_map(|item| {
            let date = item.expiration_date?;
            if date >= today && date <= horizon {
                Some(normalize_name(&item.name))
            } else {
                None
            }
        })
        .collect()
}
