//! Recipe suggestion tools
//!
//! Network lookups run on a snapshot of inventory names, never while the
//! pantry is locked.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::inventory::{expiring_ingredient_queries, matching_ingredients, rank_by_overlap, RecipeMatch};
use crate::models::{CustomRecipe, FoodItem, Recipe};
use crate::recipes::{RecipeResult, RecipeSource};

/// Expiring items searched for
pub const EXPIRING_QUERY_LIMIT: usize = 3;
/// Inventory names searched when nothing is expiring
pub const FALLBACK_QUERY_LIMIT: usize = 5;
pub const EXPIRING_RESULT_LIMIT: usize = 6;
pub const FALLBACK_RESULT_LIMIT: usize = 8;

#[derive(Debug, Serialize)]
pub struct RecipeSuggestionsResponse {
    /// True when suggestions are based on items expiring within a week
    pub based_on_expiring: bool,
    pub queries: Vec<String>,
    pub recipes: Vec<RecipeMatch>,
    pub failed_queries: Vec<String>,
}

/// Run each query, skipping failures, and dedupe by recipe id
async fn collect_by_name(
    source: &dyn RecipeSource,
    queries: &[String],
    cap: usize,
) -> (Vec<Recipe>, Vec<String>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut recipes: Vec<Recipe> = Vec::new();
    let mut failed: Vec<String> = Vec::new();

    for query in queries {
        match source.search_by_name(query).await {
            Ok(found) => {
                debug!(%query, count = found.len(), "Recipe search");
                for recipe in found {
                    if seen.insert(recipe.id.clone()) {
                        recipes.push(recipe);
                    }
                }
            }
            Err(e) => {
                warn!(%query, error = %e, "Recipe search failed");
                failed.push(query.clone());
            }
        }
    }

    recipes.truncate(cap);
    (recipes, failed)
}

/// Suggest recipes that use up what is about to expire, or anything in the
/// pantry when nothing is.
pub async fn suggest_recipes(
    source: &dyn RecipeSource,
    items: &[FoodItem],
    today: NaiveDate,
) -> RecipeSuggestionsResponse {
    let inventory_names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();

    let expiring = expiring_ingredient_queries(items, today, EXPIRING_QUERY_LIMIT);
    let based_on_expiring = !expiring.is_empty();
    let (queries, cap) = if based_on_expiring {
        (expiring, EXPIRING_RESULT_LIMIT)
    } else {
        let fallback: Vec<String> = items
            .iter()
            .map(|i| i.name.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .take(FALLBACK_QUERY_LIMIT)
            .collect();
        (fallback, FALLBACK_RESULT_LIMIT)
    };

    let (recipes, failed_queries) = collect_by_name(source, &queries, cap).await;

    RecipeSuggestionsResponse {
        based_on_expiring,
        queries,
        recipes: rank_by_overlap(recipes, &inventory_names),
        failed_queries,
    }
}

#[derive(Debug, Serialize)]
pub struct SearchRecipesResponse {
    pub query: String,
    pub by_ingredient: bool,
    pub recipes: Vec<RecipeMatch>,
}

pub async fn search_recipes(
    source: &dyn RecipeSource,
    query: &str,
    by_ingredient: bool,
    items: &[FoodItem],
) -> RecipeResult<SearchRecipesResponse> {
    let recipes = if by_ingredient {
        source.search_by_ingredient(query).await?
    } else {
        source.search_by_name(query).await?
    };
    let inventory_names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();

    Ok(SearchRecipesResponse {
        query: query.to_string(),
        by_ingredient,
        recipes: rank_by_overlap(recipes, &inventory_names),
    })
}

#[derive(Debug, Serialize)]
pub struct MatchIngredientsResponse {
    pub matched: Vec<String>,
    pub matched_count: usize,
    pub total_ingredients: usize,
}

pub fn match_ingredients(items: &[FoodItem], ingredients: &[String]) -> MatchIngredientsResponse {
    let inventory_names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    let matched = matching_ingredients(&inventory_names, ingredients);
    MatchIngredientsResponse {
        matched_count: matched.len(),
        total_ingredients: ingredients.len(),
        matched,
    }
}

#[derive(Debug, Serialize)]
pub struct ListCustomRecipesResponse {
    pub recipes: Vec<RecipeMatch>,
    pub total: usize,
}

/// Stored custom recipes, newest first, badged against the pantry
pub fn list_custom_recipes(custom: Vec<CustomRecipe>, items: &[FoodItem]) -> ListCustomRecipesResponse {
    let inventory_names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    let recipes: Vec<RecipeMatch> = custom
        .into_iter()
        .map(|c| RecipeMatch::new(Recipe::from(c), &inventory_names))
        .collect();
    ListCustomRecipesResponse {
        total: recipes.len(),
        recipes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RecipeIngredient};
    use crate::recipes::RecipeError;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    struct FakeSource {
        calls: Mutex<Vec<String>>,
    }

    fn recipe(id: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: format!("Recipe {}", id),
            category: None,
            area: None,
            instructions: String::new(),
            image_url: None,
            source_url: None,
            ingredients: ingredients
                .iter()
                .map(|n| RecipeIngredient { name: n.to_string(), measure: String::new() })
                .collect(),
            is_custom: false,
        }
    }

    #[async_trait]
    impl RecipeSource for FakeSource {
        async fn search_by_name(&self, query: &str) -> RecipeResult<Vec<Recipe>> {
            self.calls.lock().unwrap().push(query.to_string());
            match query {
                "milk" => Ok(vec![recipe("1", &["flour"]), recipe("2", &["milk", "spinach"])]),
                "spinach" => Ok(vec![recipe("2", &["milk", "spinach"]), recipe("3", &["spinach"])]),
                "rice" => Ok(vec![recipe("4", &["rice"])]),
                _ => Err(RecipeError::InvalidResponse("boom".to_string())),
            }
        }

        async fn search_by_ingredient(&self, _ingredient: &str) -> RecipeResult<Vec<Recipe>> {
            Ok(vec![recipe("9", &["rice"])])
        }
    }

    fn item(id: i64, name: &str, days: i64, today: NaiveDate) -> FoodItem {
        let at = today.and_hms_opt(9, 0, 0).unwrap();
        FoodItem {
            id,
            name: name.to_string(),
            category: Category::Other,
            quantity: 1.0,
            unit: "pcs".to_string(),
            expiration_date: today + Duration::days(days),
            price: 1.0,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_suggest_uses_expiring_items_and_skips_failures() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let items = vec![
            item(1, "Milk", 1, today),
            item(2, "Spinach", 2, today),
            item(3, "Caviar", 3, today),
            item(4, "Rice", 100, today),
        ];
        let source = FakeSource { calls: Mutex::new(Vec::new()) };

        let response = suggest_recipes(&source, &items, today).await;
        assert!(response.based_on_expiring);
        assert_eq!(response.queries, vec!["milk", "spinach", "caviar"]);
        assert_eq!(response.failed_queries, vec!["caviar"]);

        let ids: Vec<&str> = response.recipes.iter().map(|m| m.recipe.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[tokio::test]
    async fn test_suggest_falls_back_to_inventory() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let items = vec![item(1, "Rice", 100, today)];
        let source = FakeSource { calls: Mutex::new(Vec::new()) };

        let response = suggest_recipes(&source, &items, today).await;
        assert!(!response.based_on_expiring);
        assert_eq!(response.queries, vec!["rice"]);
        assert_eq!(response.recipes.len(), 1);
        assert_eq!(source.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_by_ingredient() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let items = vec![item(1, "Rice", 100, today)];
        let source = FakeSource { calls: Mutex::new(Vec::new()) };
        let response = search_recipes(&source, "rice", true, &items).await.unwrap();
        assert_eq!(response.recipes[0].recipe.id, "9");
        assert_eq!(response.recipes[0].matched_ingredients, vec!["rice"]);
    }

    #[test]
    fn test_match_ingredients() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let items = vec![item(1, "Bananas", 3, today), item(2, "Milk", 3, today)];
        let ingredients: Vec<String> = vec!["ripe bananas".into(), "sugar".into(), "whole milk".into()];
        let response = match_ingredients(&items, &ingredients);
        assert_eq!(response.matched, vec!["ripe bananas", "whole milk"]);
        assert_eq!(response.total_ingredients, 3);
    }
}
