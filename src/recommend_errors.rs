//! # Recommendation Error Types Module
//!
//! This module defines custom error types used throughout the recommendation
//! pipeline. The pipeline is partial-failure tolerant: a single bad recipe or
//! an unreachable preference store must never abort a whole ranking call, so
//! these errors are recovered close to where they occur.

/// Custom error types for recommendation operations
#[derive(Debug, Clone)]
pub enum RecommendError {
    /// Preference backing store unreachable or returned a bad row
    PreferenceLoad(String),
    /// A recipe ingredient has neither a usable name nor amount
    MalformedIngredient(String),
    /// Preference fetch exceeded its deadline
    Timeout(String),
}

impl std::fmt::Display for RecommendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendError::PreferenceLoad(msg) => write!(f, "Preference load error: {msg}"),
            RecommendError::MalformedIngredient(msg) => {
                write!(f, "Malformed ingredient error: {msg}")
            }
            RecommendError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
        }
    }
}

impl std::error::Error for RecommendError {}

impl From<anyhow::Error> for RecommendError {
    fn from(err: anyhow::Error) -> Self {
        RecommendError::PreferenceLoad(err.to_string())
    }
}

impl From<sqlx::Error> for RecommendError {
    fn from(err: sqlx::Error) -> Self {
        RecommendError::PreferenceLoad(err.to_string())
    }
}
