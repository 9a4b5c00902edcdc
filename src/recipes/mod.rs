//! Recipe search collaborator
//!
//! The inventory core only post-processes ingredient lists, so recipe lookup
//! sits behind a small async trait. `MealDbClient` is the production source.

pub mod mealdb;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Recipe;

pub use mealdb::{meal_to_recipe, normalize_ingredients, MealDbClient};

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Recipe service returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Unexpected recipe payload: {0}")]
    InvalidResponse(String),
}

pub type RecipeResult<T> = Result<T, RecipeError>;

/// Anything that can look up recipes; may be slow and may fail
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn search_by_name(&self, query: &str) -> RecipeResult<Vec<Recipe>>;

    async fn search_by_ingredient(&self, ingredient: &str) -> RecipeResult<Vec<Recipe>>;
}
