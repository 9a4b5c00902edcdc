//! FoodSaver Status Tool
//!
//! Runtime status of the service and the usage guide served to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::inventory::ScoringPolicy;

/// Pantry workflow instructions for AI assistants
pub const PANTRY_INSTRUCTIONS: &str = r#"
# FoodSaver Pantry Instructions

FoodSaver tracks what is in the pantry, when it expires, and what happened to it.

## Adding items

Use `add_food_item` with:
- `name`, `quantity` (> 0), `unit` (e.g. "liter", "pcs", "g")
- `category`: one of fruits_vegetables, dairy_eggs, meat_poultry, seafood, bakery,
  pantry_items, frozen_foods, beverages, snacks, condiments_sauces, grains_pasta, other
  (display names such as "Dairy & Eggs" are accepted too)
- `expiration_date` as YYYY-MM-DD
- `price`: the value of the WHOLE quantity, not a unit price

Adding an item awards 10 points.

## Using food

`consume_food_item` with an optional `quantity`. Leaving it out consumes everything.
Partial use reduces quantity and price proportionally, so the unit price stays the same.
Points depend on how close the item was to expiring:

| Days left | Points |
|-----------|--------|
| 1 or less | 50 |
| 2-3 | 30 |
| more | 20 |

## Waste

Expired items are not recorded as waste automatically. Call `mark_expired_as_waste`
for one item or `sweep_expired_items` for all of them. Only items past their
expiration date can be marked.

`remove_food_item` deletes an item WITHOUT recording it as used or wasted. Use it
for mistakes, not for food that was eaten or thrown away.

## Urgency

| Days left | Urgency |
|-----------|---------|
| < 0 | expired |
| 0 | expires_today |
| 1-3 | expiring_soon |
| 4-7 | expiring_this_week |
| > 7 | fresh |

## Recipes

`suggest_recipes` searches recipes for items expiring within a week and ranks them by
how many pantry items they use. Saving your own recipe with `save_custom_recipe`
awards 25 points.
"#;

/// Runtime status of the FoodSaver service
#[derive(Debug, Clone, Serialize)]
pub struct FoodSaverStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Pantry information
    pub scoring_policy: &'static str,
    pub recipe_api_url: String,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    scoring_policy: ScoringPolicy,
    recipe_api_url: String,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, scoring_policy: ScoringPolicy, recipe_api_url: String) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            scoring_policy,
            recipe_api_url,
        }
    }

    pub fn get_status(&self) -> FoodSaverStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FoodSaverStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            scoring_policy: self.scoring_policy.as_str(),
            recipe_api_url: self.recipe_api_url.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_process_and_config() {
        let tracker = StatusTracker::new(
            PathBuf::from("/nonexistent/foodsaver.db"),
            ScoringPolicy::ValueAsPoints,
            "http://localhost".to_string(),
        );
        let status = tracker.get_status();
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.scoring_policy, "value");
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }
}
