use anyhow::{Context, Result};
use log::info;
use std::env;
use std::fs;

use prepsense::matcher::AvailabilityMatcher;
use prepsense::pantry_model::{expiring_item_names, PantryItem, RecipeCandidate};
use prepsense::preference_store::resolve_profile;
use prepsense::ranking::rank_candidates;
use prepsense::scorer::PreferenceScorer;
use prepsense::store_config::RecoveryConfig;

const EXPIRING_WINDOW_DAYS: i64 = 3;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: {} <pantry.json> <recipes.json> <user_id>", args[0]);
        std::process::exit(2);
    }
    let (pantry_path, recipes_path, user_id) = (&args[1], &args[2], &args[3]);

    info!("Ranking recipes for user {user_id}");

    let pantry: Vec<PantryItem> = read_json(pantry_path)?;
    let candidates: Vec<RecipeCandidate> = read_json(recipes_path)?;

    info!(
        "Loaded {} pantry item(s) and {} candidate recipe(s)",
        pantry.len(),
        candidates.len()
    );

    let today = chrono::Local::now().date_naive();
    let expiring = expiring_item_names(&pantry, today, EXPIRING_WINDOW_DAYS);

    // The preference store is a soft dependency: without DATABASE_URL, or if
    // it is unreachable, ranking proceeds without personalization.
    let database_url = env::var("DATABASE_URL").ok();
    let profile =
        resolve_profile(database_url.as_deref(), user_id, &RecoveryConfig::default()).await;

    let ranked = rank_candidates(
        &AvailabilityMatcher::new(),
        &PreferenceScorer::new(),
        &pantry,
        &candidates,
        &profile,
        &expiring,
    );

    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {path}"))
}
