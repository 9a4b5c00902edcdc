//! Recipe model
//!
//! Recipes come either from the external recipe search service or are
//! authored by the user and stored locally.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default)]
    pub measure: String,
}

/// A recipe in the shape every collaborator normalizes to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: String,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub is_custom: bool,
}

impl Recipe {
    pub fn ingredient_names(&self) -> Vec<&str> {
        self.ingredients.iter().map(|i| i.name.as_str()).collect()
    }
}

/// Data for saving a user-authored recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRecipeCreate {
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub instructions: String,
}

/// A stored user-authored recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRecipe {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: String,
    pub created_at: NaiveDateTime,
}

impl From<CustomRecipe> for Recipe {
    fn from(custom: CustomRecipe) -> Self {
        Self {
            id: format!("custom-{}", custom.id),
            name: custom.name,
            category: None,
            area: None,
            instructions: custom.instructions,
            image_url: None,
            source_url: None,
            ingredients: custom.ingredients,
            is_custom: true,
        }
    }
}

impl CustomRecipe {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let ingredients_json: String = row.get("ingredients")?;
        let ingredients = serde_json::from_str(&ingredients_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            ingredients,
            instructions: row.get("instructions")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &CustomRecipeCreate, at: NaiveDateTime) -> DbResult<Self> {
        let ingredients_json = serde_json::to_string(&data.ingredients)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO custom_recipes (name, ingredients, instructions, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![data.name.trim(), ingredients_json, data.instructions, at],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_recipes WHERE id = ?1")?;
        match stmt.query_row([id], Self::from_row) {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_recipes ORDER BY created_at DESC, id DESC")?;
        let recipes = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }
}
