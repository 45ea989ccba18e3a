//! # Unit Canonicalization Module
//!
//! Pantry and recipe units arrive as arbitrary free-text labels ("cup",
//! "cups", "c"). All unit comparisons in the crate go through the lookup
//! table here rather than ad hoc string equality, so quantity-aware matching
//! only ever compares amounts expressed in the same canonical unit.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical measurement units with normalization support
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalUnit {
    // Volume units
    Teaspoon,
    Tablespoon,
    FluidOunce,
    Cup,
    Pint,
    Quart,
    Gallon,
    Milliliter,
    Liter,

    // Weight units
    Ounce,
    Pound,
    Gram,
    Kilogram,

    // Count/piece units
    Piece,
    Dozen,

    // Specialized units
    Pinch,
    Dash,
    Clove,
    Package,
    Can,
    Bottle,

    /// Unknown or unspecified unit
    Unknown,
}

impl CanonicalUnit {
    /// Whether this unit was recognized by the canonicalization table
    pub fn is_known(&self) -> bool {
        !matches!(self, CanonicalUnit::Unknown)
    }

    /// Whether two free-text unit labels denote the same known unit
    ///
    /// Unknown units never compare equal, even to themselves: amounts in
    /// unrecognized units are not comparable.
    pub fn comparable(a: &str, b: &str) -> bool {
        let ca = canonical_unit(a);
        ca.is_known() && ca == canonical_unit(b)
    }
}

/// Common unit labels and their variations
static UNIT_TABLE: LazyLock<HashMap<&'static str, CanonicalUnit>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Volume units
    map.insert("tsp", CanonicalUnit::Teaspoon);
    map.insert("teaspoon", CanonicalUnit::Teaspoon);
    map.insert("tbsp", CanonicalUnit::Tablespoon);
    map.insert("tablespoon", CanonicalUnit::Tablespoon);
    map.insert("fl oz", CanonicalUnit::FluidOunce);
    map.insert("fluid ounce", CanonicalUnit::FluidOunce);
    map.insert("cup", CanonicalUnit::Cup);
    map.insert("c", CanonicalUnit::Cup);
    map.insert("pint", CanonicalUnit::Pint);
    map.insert("pt", CanonicalUnit::Pint);
    map.insert("quart", CanonicalUnit::Quart);
    map.insert("qt", CanonicalUnit::Quart);
    map.insert("gallon", CanonicalUnit::Gallon);
    map.insert("gal", CanonicalUnit::Gallon);
    map.insert("ml", CanonicalUnit::Milliliter);
    map.insert("milliliter", CanonicalUnit::Milliliter);
    map.insert("millilitre", CanonicalUnit::Milliliter);
    map.insert("l", CanonicalUnit::Liter);
    map.insert("liter", CanonicalUnit::Liter);
    map.insert("litre", CanonicalUnit::Liter);

    // Weight units
    map.insert("oz", CanonicalUnit::Ounce);
    map.insert("ounce", CanonicalUnit::Ounce);
    map.insert("lb", CanonicalUnit::Pound);
    map.insert("pound", CanonicalUnit::Pound);
    map.insert("g", CanonicalUnit::Gram);
    map.insert("gram", CanonicalUnit::Gram);
    map.insert("kg", CanonicalUnit::Kilogram);
    map.insert("kilogram", CanonicalUnit::Kilogram);

    // Count units
    map.insert("piece", CanonicalUnit::Piece);
    map.insert("item", CanonicalUnit::Piece);
    map.insert("each", CanonicalUnit::Piece);
    map.insert("ea", CanonicalUnit::Piece);
    map.insert("unit", CanonicalUnit::Piece);
    map.insert("dozen", CanonicalUnit::Dozen);
    map.insert("doz", CanonicalUnit::Dozen);

    // Specialized units
    map.insert("pinch", CanonicalUnit::Pinch);
    map.insert("dash", CanonicalUnit::Dash);
    map.insert("clove", CanonicalUnit::Clove);
    map.insert("package", CanonicalUnit::Package);
    map.insert("pkg", CanonicalUnit::Package);
    map.insert("packet", CanonicalUnit::Package);
    map.insert("can", CanonicalUnit::Can);
    map.insert("bottle", CanonicalUnit::Bottle);

    map
});

/// Resolve a free-text unit label to its canonical unit
///
/// Lookup is case-insensitive, tolerates a trailing period ("tbsp.") and
/// falls back to the singular form for pluralized labels ("cups" -> "cup").
/// Unrecognized or empty labels resolve to [`CanonicalUnit::Unknown`].
///
/// # Examples
///
/// ```rust
/// use prepsense::units::{canonical_unit, CanonicalUnit};
///
/// assert_eq!(canonical_unit("Cups"), CanonicalUnit::Cup);
/// assert_eq!(canonical_unit("c"), CanonicalUnit::Cup);
/// assert_eq!(canonical_unit("glug"), CanonicalUnit::Unknown);
/// ```
pub fn canonical_unit(label: &str) -> CanonicalUnit {
    let label = label.trim().trim_end_matches('.').to_lowercase();
    if label.is_empty() {
        return CanonicalUnit::Unknown;
    }

    if let Some(unit) = UNIT_TABLE.get(label.as_str()) {
        return unit.clone();
    }

    // Try without pluralization
    let singular = if label.ends_with('s') && label.len() > 1 {
        &label[..label.len() - 1]
    } else {
        &label
    };

    if let Some(unit) = UNIT_TABLE.get(singular) {
        return unit.clone();
    }

    CanonicalUnit::Unknown
}
