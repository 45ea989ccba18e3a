//! # Text Processing Module
//!
//! This module provides text processing utilities for the PrepSense
//! recommendation core, including ingredient name normalization and
//! regex-based detection of noise lines that leak into recipe ingredient
//! lists from upstream instruction parsing.
//!
//! ## Features
//!
//! - Name normalization (lowercase, trim, strip punctuation, collapse
//!   whitespace) shared by the matcher, the scorer and the expiration helper
//! - Noise line detection for artifacts like "prep time: 10 min",
//!   "servings: 4" or "step 2" that are not real ingredients
//! - Line-by-line classification for recipe ingredient lists

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

// Default pattern for non-ingredient noise lines. These strings are artifacts
// of upstream recipe-instruction parsing, not real ingredients.
const DEFAULT_NOISE_PATTERN: &str = r"(?i)\b(?:prep(?:aration)?\s*time|cook(?:ing)?\s*time|total\s*time|ready\s*in|servings?|serves|yields?|makes\s+\d+|calories|nutrition(?:al)?\s*(?:facts|info(?:rmation)?)?|instructions?|directions?|step\s*\d+|mins?|minutes?|hours?)\b";

lazy_static! {
    static ref NOISE_REGEX: Regex =
        Regex::new(DEFAULT_NOISE_PATTERN).expect("Default noise pattern should be valid");
    static ref NON_ALNUM: Regex =
        Regex::new(r"[^\p{L}\p{N}\s]").expect("Punctuation pattern should be valid");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("Whitespace pattern should be valid");
}

/// Normalize an ingredient or pantry item name for matching.
///
/// Lowercases, trims, replaces punctuation with spaces and collapses runs of
/// whitespace, so that "Extra-Virgin Olive Oil " and "extra virgin olive oil"
/// compare equal. Letters and digits of any script are preserved.
///
/// # Examples
///
/// ```rust
/// use prepsense::text_processing::normalize_name;
///
/// assert_eq!(normalize_name("  Whole Milk!"), "whole milk");
/// assert_eq!(normalize_name("semi-skimmed milk"), "semi skimmed milk");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let stripped = NON_ALNUM.replace_all(&lowered, " ");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

/// Noise line detector using regex patterns for instruction artifacts
pub struct NoiseLineDetector {
    /// Compiled regex pattern for detecting noise lines
    pattern: Regex,
}

impl NoiseLineDetector {
    /// Create a new detector with the default noise pattern
    ///
    /// The pattern matches common instruction artifacts such as prep/cook
    /// times, serving counts, nutrition headers and numbered steps.
    pub fn new() -> Self {
        Self {
            pattern: NOISE_REGEX.clone(),
        }
    }

    /// Create a detector with a custom regex pattern
    ///
    /// # Arguments
    ///
    /// * `pattern` - Custom regex pattern string
    ///
    /// # Examples
    ///
    /// ```rust
    /// use prepsense::text_processing::NoiseLineDetector;
    ///
    /// let detector = NoiseLineDetector::with_pattern(r"(?i)\bready in\b")?;
    /// assert!(detector.is_noise("Ready in 20 min"));
    /// # Ok::<(), regex::Error>(())
    /// ```
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        debug!("Using custom noise pattern: {}", pattern);
        let pattern = Regex::new(pattern)?;
        Ok(Self { pattern })
    }

    /// Check whether a line is a non-ingredient artifact
    ///
    /// A line is noise when it matches the artifact pattern or contains no
    /// letters at all (e.g., "----" separators or bare numbers).
    pub fn is_noise(&self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() || !line.chars().any(|c| c.is_alphabetic()) {
            return true;
        }
        self.pattern.is_match(line)
    }

    /// Partition raw ingredient lines into kept lines and noise
    ///
    /// Returns `(ingredients, noise)` preserving the original order of both.
    pub fn partition_lines<'a>(&self, lines: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
        let mut kept = Vec::new();
        let mut noise = Vec::new();
        for &line in lines {
            if self.is_noise(line) {
                noise.push(line);
            } else {
                kept.push(line);
            }
        }
        if !noise.is_empty() {
            info!(
                "Filtered {} noise line(s) out of {} ingredient line(s)",
                noise.len(),
                lines.len()
            );
        }
        (kept, noise)
    }

    /// Get the pattern string used by this detector
    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for NoiseLineDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_name("Eggs"), "eggs");
        assert_eq!(normalize_name("  Olive Oil  "), "olive oil");
        assert_eq!(normalize_name("salt, fine"), "salt fine");
    }

    #[test]
    fn test_normalize_punctuation_and_whitespace() {
        assert_eq!(
            normalize_name("extra-virgin   olive oil"),
            "extra virgin olive oil"
        );
        assert_eq!(normalize_name("chicken (boneless)"), "chicken boneless");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_name("Semi-Skimmed Milk, 2%");
        assert_eq!(normalize_name(&once), once);
    }

    #[test]
    fn test_noise_detection() {
        let detector = NoiseLineDetector::new();
        assert!(detector.is_noise("prep time: 10 min"));
        assert!(detector.is_noise("Ready in 25 minutes"));
        assert!(detector.is_noise("Servings: 4"));
        assert!(detector.is_noise("step 3"));
        assert!(detector.is_noise("Nutrition Facts"));
        assert!(detector.is_noise("----"));
        assert!(detector.is_noise(""));
    }

    #[test]
    fn test_real_ingredients_are_not_noise() {
        let detector = NoiseLineDetector::new();
        assert!(!detector.is_noise("eggs"));
        assert!(!detector.is_noise("2 cups flour"));
        assert!(!detector.is_noise("unsalted butter"));
        assert!(!detector.is_noise("fresh basil"));
    }

    #[test]
    fn test_partition_lines_keeps_order() {
        let detector = NoiseLineDetector::new();
        let lines = vec!["eggs", "prep time: 10 min", "milk", "serves 2", "butter"];
        let (kept, noise) = detector.partition_lines(&lines);
        assert_eq!(kept, vec!["eggs", "milk", "butter"]);
        assert_eq!(noise, vec!["prep time: 10 min", "serves 2"]);
    }

    #[test]
    fn test_custom_pattern() {
        let detector = NoiseLineDetector::with_pattern(r"(?i)\bkcal\b").unwrap();
        assert!(detector.is_noise("250 kcal"));
        assert!(!detector.is_noise("prep time: 10 min"));
    }
}
