//! # Preference Store Module
//!
//! Fetching and persisting [`UserPreferenceProfile`] records. The scorer only
//! depends on the [`PreferenceStore`] trait; the PostgreSQL implementation
//! here matches the pantry backend's schema conventions.
//!
//! A user with no saved preferences always loads as a well-formed profile
//! with empty collections, never as an error. Profiles are read fresh per
//! ranking request so reads reflect the most recent save; nothing in this
//! module caches.
//!
//! [`load_preferences_or_default`] implements the degrade-gracefully policy:
//! bounded timeout per attempt, jittered backoff between retries, and an
//! empty profile once retries are exhausted.

use anyhow::{Context, Result};
use log::{info, warn};
use rand::Rng;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::preference_model::{PreferenceCategory, Rating, UserPreferenceProfile};
use crate::recommend_errors::RecommendError;
use crate::store_config::RecoveryConfig;

/// Read access to a user's preference record
pub trait PreferenceStore {
    /// Fetch the profile for a user id
    ///
    /// Must return an empty profile (not an error) for unknown users, and
    /// reflect the most recently saved state.
    fn load_preferences(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserPreferenceProfile, RecommendError>> + Send;
}

fn category_key(category: PreferenceCategory) -> &'static str {
    match category {
        PreferenceCategory::Allergens => "allergen",
        PreferenceCategory::DietaryRestrictions => "dietary_restriction",
    }
}

/// PostgreSQL-backed preference store
pub struct PostgresPreferenceStore {
    pool: PgPool,
}

impl PostgresPreferenceStore {
    /// Connect to the database at `database_url`
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to preference database")?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (shared with the rest of the backend)
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize the preference schema
    pub async fn init_schema(&self) -> Result<()> {
        debug!("Initializing preference schema");

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS user_preference_sets (
                user_id TEXT NOT NULL,
                category TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (user_id, category, value)
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create user_preference_sets table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS user_cuisine_preferences (
                user_id TEXT NOT NULL,
                cuisine TEXT NOT NULL,
                level INT NOT NULL,
                PRIMARY KEY (user_id, cuisine)
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create user_cuisine_preferences table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS user_recipe_ratings (
                user_id TEXT NOT NULL,
                recipe_id TEXT NOT NULL,
                rating TEXT NOT NULL,
                is_favorite BOOLEAN NOT NULL DEFAULT FALSE,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (user_id, recipe_id)
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create user_recipe_ratings table")?;

        Ok(())
    }

    /// Replace a whole set-valued category for a user (replace-on-save)
    ///
    /// Runs in a transaction so readers never observe a half-replaced set.
    pub async fn replace_category(
        &self,
        user_id: &str,
        category: PreferenceCategory,
        values: &BTreeSet<String>,
    ) -> Result<()> {
        let key = category_key(category);
        debug!(user_id = %user_id, category = key, count = values.len(), "Replacing preference category");

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin preference transaction")?;

        sqlx::query("DELETE FROM user_preference_sets WHERE user_id = $1 AND category = $2")
            .bind(user_id)
            .bind(key)
            .execute(&mut *tx)
            .await
            .context("Failed to clear preference category")?;

        for value in values {
            sqlx::query(
                "INSERT INTO user_preference_sets (user_id, category, value) VALUES ($1, $2, $3)",
            )
            .bind(user_id)
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await
            .context("Failed to insert preference value")?;
        }

        tx.commit()
            .await
            .context("Failed to commit preference transaction")?;
        Ok(())
    }

    /// Replace all cuisine preference levels for a user
    pub async fn replace_cuisine_preferences(
        &self,
        user_id: &str,
        preferences: &BTreeMap<String, i32>,
    ) -> Result<()> {
        debug!(user_id = %user_id, count = preferences.len(), "Replacing cuisine preferences");

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin cuisine transaction")?;

        sqlx::query("DELETE FROM user_cuisine_preferences WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear cuisine preferences")?;

        for (cuisine, level) in preferences {
            sqlx::query(
                "INSERT INTO user_cuisine_preferences (user_id, cuisine, level) VALUES ($1, $2, $3)",
            )
            .bind(user_id)
            .bind(cuisine)
            .bind(level)
            .execute(&mut *tx)
            .await
            .context("Failed to insert cuisine preference")?;
        }

        tx.commit()
            .await
            .context("Failed to commit cuisine transaction")?;
        Ok(())
    }

    /// Record or update a rating and favorite flag for a recipe
    pub async fn save_rating(
        &self,
        user_id: &str,
        recipe_id: &str,
        rating: Rating,
        is_favorite: bool,
    ) -> Result<()> {
        debug!(user_id = %user_id, recipe_id = %recipe_id, rating = rating.as_str(), "Saving recipe rating");

        sqlx::query(
            "INSERT INTO user_recipe_ratings (user_id, recipe_id, rating, is_favorite)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id, recipe_id)
             DO UPDATE SET rating = EXCLUDED.rating,
                           is_favorite = EXCLUDED.is_favorite,
                           updated_at = now()",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(rating.as_str())
        .bind(is_favorite)
        .execute(&self.pool)
        .await
        .context("Failed to save recipe rating")?;
        Ok(())
    }
}

impl PreferenceStore for PostgresPreferenceStore {
    async fn load_preferences(
        &self,
        user_id: &str,
    ) -> Result<UserPreferenceProfile, RecommendError> {
        let mut profile = UserPreferenceProfile::empty();

        let rows = sqlx::query(
            "SELECT category, value FROM user_preference_sets WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            let category: String = row.try_get("category")?;
            let value: String = row.try_get("value")?;
            match category.as_str() {
                "allergen" => {
                    profile.allergens.insert(value);
                }
                "dietary_restriction" => {
                    profile.dietary_restrictions.insert(value);
                }
                other => {
                    warn!("Ignoring unknown preference category {other:?} for user {user_id}");
                }
            }
        }

        let rows = sqlx::query(
            "SELECT cuisine, level FROM user_cuisine_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            let cuisine: String = row.try_get("cuisine")?;
            let level: i32 = row.try_get("level")?;
            profile.cuisine_preferences.insert(cuisine, level);
        }

        let rows = sqlx::query(
            "SELECT recipe_id, rating, is_favorite FROM user_recipe_ratings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            let recipe_id: String = row.try_get("recipe_id")?;
            let rating: String = row.try_get("rating")?;
            let is_favorite: bool = row.try_get("is_favorite")?;
            profile
                .past_ratings
                .insert(recipe_id.clone(), Rating::parse(&rating));
            if is_favorite {
                profile.favorites.insert(recipe_id);
            }
        }

        debug!(user_id = %user_id, allergens = profile.allergens.len(), ratings = profile.past_ratings.len(), "Loaded preference profile");
        Ok(profile)
    }
}

/// Load a profile with timeout, retries and an empty-profile fallback
///
/// Never fails: after `max_retries` additional attempts the user gets
/// unpersonalized recommendations instead of an error.
pub async fn load_preferences_or_default<S: PreferenceStore>(
    store: &S,
    user_id: &str,
    recovery: &RecoveryConfig,
) -> UserPreferenceProfile {
    let deadline = Duration::from_millis(recovery.load_timeout_ms);

    for attempt in 0..=recovery.max_retries {
        match tokio::time::timeout(deadline, store.load_preferences(user_id)).await {
            Ok(Ok(profile)) => return profile,
            Ok(Err(err)) => {
                warn!("Preference load attempt {attempt} failed for user {user_id}: {err}");
            }
            Err(_) => {
                warn!(
                    "Preference load attempt {attempt} timed out after {}ms for user {user_id}",
                    recovery.load_timeout_ms
                );
            }
        }

        if attempt < recovery.max_retries {
            let base = recovery.backoff_delay_ms(attempt);
            let jitter = rand::thread_rng().gen_range(0..=base / 4);
            tokio::time::sleep(Duration::from_millis(base + jitter)).await;
        }
    }

    warn!("Preference store unavailable for user {user_id}; proceeding without personalization");
    UserPreferenceProfile::empty()
}

/// Resolve the profile for a ranking run from an optional database URL
///
/// The store is a soft dependency of the ranking pipeline: no URL, a failed
/// connect, or a failed schema init all degrade to an empty profile with a
/// warning. A ranking run never aborts because preferences are unreachable.
pub async fn resolve_profile(
    database_url: Option<&str>,
    user_id: &str,
    recovery: &RecoveryConfig,
) -> UserPreferenceProfile {
    let url = match database_url {
        Some(url) => url,
        None => {
            info!("No preference database configured; ranking without personalization");
            return UserPreferenceProfile::empty();
        }
    };

    let store = match PostgresPreferenceStore::connect(url).await {
        Ok(store) => store,
        Err(err) => {
            warn!("Preference database unreachable ({err:#}); ranking without personalization");
            return UserPreferenceProfile::empty();
        }
    };
    if let Err(err) = store.init_schema().await {
        warn!("Preference schema init failed ({err:#}); ranking without personalization");
        return UserPreferenceProfile::empty();
    }

    load_preferences_or_default(&store, user_id, recovery).await
}
