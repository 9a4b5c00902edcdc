//! Recipe ingredient matching
//!
//! Fuzzy join between pantry item names and recipe ingredient names. Used to
//! rank and badge suggestions; never touches the inventory.

use chrono::NaiveDate;
use serde::Serialize;

use super::expiry::{days_left, WEEK_DAYS};
use crate::models::{FoodItem, Recipe};

/// Recipe ingredients that match at least one inventory name.
///
/// A match is case-insensitive containment in either direction. Blank names
/// on either side never match. Recipe order is kept and exact duplicates are
/// dropped.
pub fn matching_ingredients<S, T>(inventory_names: &[S], recipe_ingredients: &[T]) -> Vec<String>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let names: Vec<String> = inventory_names
        .iter()
        .map(|n| n.as_ref().trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect();

    let mut matched: Vec<String> = Vec::new();
    for ingredient in recipe_ingredients {
        let ingredient = ingredient.as_ref();
        let needle = ingredient.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        let hit = names
            .iter()
            .any(|name| needle.contains(name.as_str()) || name.contains(needle.as_str()));
        if hit && !matched.iter().any(|m| m == ingredient) {
            matched.push(ingredient.to_string());
        }
    }
    matched
}

/// A recipe annotated with the pantry items it would use up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeMatch {
    pub recipe: Recipe,
    pub matched_ingredients: Vec<String>,
}

impl RecipeMatch {
    pub fn new<S: AsRef<str>>(recipe: Recipe, inventory_names: &[S]) -> Self {
        let matched_ingredients = matching_ingredients(inventory_names, &recipe.ingredient_names());
        Self {
            recipe,
            matched_ingredients,
        }
    }

    pub fn match_count(&self) -> usize {
        self.matched_ingredients.len()
    }
}

/// Most matched ingredients first; equal counts keep their incoming order
pub fn rank_by_overlap<S: AsRef<str>>(recipes: Vec<Recipe>, inventory_names: &[S]) -> Vec<RecipeMatch> {
    let mut matches: Vec<RecipeMatch> = recipes
        .into_iter()
        .map(|recipe| RecipeMatch::new(recipe, inventory_names))
        .collect();
    matches.sort_by(|a, b| b.match_count().cmp(&a.match_count()));
    matches
}

/// Lower-cased names of items expiring within a week, most urgent first
pub fn expiring_ingredient_queries<'a, I>(items: I, today: NaiveDate, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a FoodItem>,
{
    let mut expiring: Vec<(i64, i64, String)> = items
        .into_iter()
        .filter_map(|item| {
            let days = days_left(item.expiration_date, today);
            let name = item.name.trim().to_lowercase();
            ((0..=WEEK_DAYS).contains(&days) && !name.is_empty()).then_some((days, item.id, name))
        })
        .collect();
    expiring.sort();

    let mut queries: Vec<String> = Vec::new();
    for (_, _, name) in expiring {
        if queries.len() == limit {
            break;
        }
        if !queries.contains(&name) {
            queries.push(name);
        }
    }
    queries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RecipeIngredient};
    use chrono::Duration;

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
                .map(|name| RecipeIngredient {
                    name: name.to_string(),
                    measure: String::new(),
                })
                .collect(),
            is_custom: false,
        }
    }

    #[test]
    fn test_matching_preserves_recipe_order() {
        let matched = matching_ingredients(
            &["Bananas", "Milk"],
            &["ripe bananas", "sugar", "whole milk"],
        );
        assert_eq!(matched, vec!["ripe bananas", "whole milk"]);
    }

    #[test]
    fn test_matching_is_bidirectional() {
        assert_eq!(matching_ingredients(&["Chicken Breast"], &["chicken"]), vec!["chicken"]);
        assert_eq!(
            matching_ingredients(&["chicken"], &["Chicken Breast"]),
            vec!["Chicken Breast"]
        );
    }

    #[test]
    fn test_matching_dedupes_and_ignores_blanks() {
        let matched = matching_ingredients(&["egg", " "], &["Egg", "Egg", "", "flour"]);
        assert_eq!(matched, vec!["Egg"]);
        let none: Vec<String> = matching_ingredients(&[""], &["salt"]);
        assert!(none.is_empty());
    }

    #[test]
    fn test_rank_by_overlap_is_stable() {
        let recipes = vec![
            recipe("a", &["salt"]),
            recipe("b", &["milk", "eggs"]),
            recipe("c", &["pepper"]),
            recipe("d", &["milk"]),
        ];
        let ranked = rank_by_overlap(recipes, &["Milk", "Eggs"]);
        let ids: Vec<&str> = ranked.iter().map(|m| m.recipe.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
        assert_eq!(ranked[0].match_count(), 2);
    }

    #[test]
    fn test_expiring_ingredient_queries() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let at = today.and_hms_opt(8, 0, 0).unwrap();
        let item = |id: i64, name: &str, days: i64| FoodItem {
            id,
            name: name.to_string(),
            category: Category::Other,
            quantity: 1.0,
            unit: "pcs".to_string(),
            expiration_date: today + Duration::days(days),
            price: 1.0,
            created_at: at,
            updated_at: at,
        };
        let items = vec![
            item(1, "Spinach", 5),
            item(2, "Milk", 1),
            item(3, "Old Bread", -2),
            item(4, "Rice", 90),
            item(5, "Chicken", 0),
            item(6, "Tomatoes", 2),
        ];
        let queries = expiring_ingredient_queries(&items, today, 3);
        assert_eq!(queries, vec!["chicken", "milk", "tomatoes"]);
    }
}
