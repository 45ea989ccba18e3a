//! # PrepSense Recommendation Core
//!
//! Recipe preference scoring and recommendation ranking for household pantry
//! tracking: matches recipe ingredients against a pantry snapshot, scores
//! each candidate against the user's preference record (with a hard allergen
//! veto), and returns a deterministically ranked, annotated list.

pub mod matcher;
pub mod pantry_model;
pub mod preference_model;
pub mod preference_store;
pub mod ranking;
pub mod recommend_errors;
pub mod recommend_model;
pub mod scorer;
pub mod store_config;
pub mod text_processing;
pub mod units;
