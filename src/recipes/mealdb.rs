//! TheMealDB client
//!
//! Meals come back with up to 20 numbered `strIngredientN` / `strMeasureN`
//! fields. They are flattened into `RecipeIngredient`s in one place here.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{RecipeError, RecipeResult, RecipeSource};
use crate::models::{Recipe, RecipeIngredient};

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

const MAX_INGREDIENT_FIELDS: usize = 20;
/// Detail lookups issued per ingredient search
const MAX_LOOKUPS: usize = 8;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Flatten the numbered ingredient/measure fields of a raw meal
pub fn normalize_ingredients(meal: &Value) -> Vec<RecipeIngredient> {
    (1..=MAX_INGREDIENT_FIELDS)
        .filter_map(|i| {
            let name = meal
                .get(format!("strIngredient{}", i))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())?;
            let measure = meal
                .get(format!("strMeasure{}", i))
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or("");
            Some(RecipeIngredient {
                name: name.to_string(),
                measure: measure.to_string(),
            })
        })
        .collect()
}

fn text(meal: &Value, key: &str) -> Option<String> {
    meal.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Convert one raw meal object; `None` when it has no id or name
pub fn meal_to_recipe(meal: &Value) -> Option<Recipe> {
    Some(Recipe {
        id: text(meal, "idMeal")?,
        name: text(meal, "strMeal")?,
        category: text(meal, "strCategory"),
        area: text(meal, "strArea"),
        instructions: text(meal, "strInstructions").unwrap_or_default(),
        image_url: text(meal, "strMealThumb"),
        source_url: text(meal, "strSource"),
        ingredients: normalize_ingredients(meal),
        is_custom: false,
    })
}

/// `{"meals": [...]}`; the service sends `null` instead of an empty list
fn meals(body: &Value) -> RecipeResult<&[Value]> {
    match body.get("meals") {
        Some(Value::Array(meals)) => Ok(meals.as_slice()),
        Some(Value::Null) | None => Ok(&[]),
        Some(other) => Err(RecipeError::InvalidResponse(format!(
            "expected meals array, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct MealDbClient {
    base_url: String,
    http: reqwest::Client,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> RecipeResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("foodsaver/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, endpoint: &str, key: &str, value: &str) -> RecipeResult<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, key, value, "Recipe request");

        let response = self.http.get(&url).query(&[(key, value)]).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RecipeError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json::<Value>().await?)
    }

    /// Full details of one meal by id
    pub async fn lookup(&self, id: &str) -> RecipeResult<Option<Recipe>> {
        let body = self.get("lookup.php", "i", id).await?;
        Ok(meals(&body)?.iter().find_map(meal_to_recipe))
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn search_by_name(&self, query: &str) -> RecipeResult<Vec<Recipe>> {
        let body = self.get("search.php", "s", query).await?;
        Ok(meals(&body)?.iter().filter_map(meal_to_recipe).collect())
    }

    /// The filter endpoint only returns ids and names, so each hit is
    /// looked up for its ingredient list.
    async fn search_by_ingredient(&self, ingredient: &str) -> RecipeResult<Vec<Recipe>> {
        let body = self.get("filter.php", "i", ingredient).await?;
        let ids: Vec<String> = meals(&body)?
            .iter()
            .filter_map(|meal| text(meal, "idMeal"))
            .take(MAX_LOOKUPS)
            .collect();

        let mut recipes = Vec::with_capacity(ids.len());
        for id in ids {
            match self.lookup(&id).await {
                Ok(Some(recipe)) => recipes.push(recipe),
                Ok(None) => debug!(%id, "Meal vanished between filter and lookup"),
                Err(e) => warn!(%id, error = %e, "Meal lookup failed"),
            }
        }
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_ingredients_skips_blanks() {
        let meal = json!({
            "strIngredient1": "Chicken",
            "strMeasure1": "1 lb ",
            "strIngredient2": "  ",
            "strMeasure2": "2 tbsp",
            "strIngredient3": null,
            "strIngredient4": "Garlic",
            "strMeasure4": null,
            "strIngredient20": "Salt",
            "strMeasure20": "pinch"
        });
        let ingredients = normalize_ingredients(&meal);
        assert_eq!(
            ingredients,
            vec![
                RecipeIngredient { name: "Chicken".into(), measure: "1 lb".into() },
                RecipeIngredient { name: "Garlic".into(), measure: "".into() },
                RecipeIngredient { name: "Salt".into(), measure: "pinch".into() },
            ]
        );
    }

    #[test]
    fn test_meal_to_recipe() {
        let meal = json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven.",
            "strMealThumb": "https://example.test/thumb.jpg",
            "strSource": "",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup"
        });
        let recipe = meal_to_recipe(&meal).unwrap();
        assert_eq!(recipe.id, "52772");
        assert_eq!(recipe.area.as_deref(), Some("Japanese"));
        assert_eq!(recipe.source_url, None);
        assert_eq!(recipe.ingredient_names(), vec!["soy sauce"]);
        assert!(!recipe.is_custom);

        assert!(meal_to_recipe(&json!({ "strMeal": "No id" })).is_none());
    }

    #[test]
    fn test_meals_handles_null() {
        assert!(meals(&json!({ "meals": null })).unwrap().is_empty());
        assert!(meals(&json!({})).unwrap().is_empty());
        assert!(meals(&json!({ "meals": "nope" })).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = MealDbClient::with_client("http://localhost:9/api/", reqwest::Client::new());
        assert_eq!(client.base_url(), "http://localhost:9/api");
    }
}
