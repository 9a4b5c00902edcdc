//! Data models
//!
//! Plain data types shared by the inventory core, plus their SQLite row mapping.

mod category;
mod food_item;
mod history_event;
mod progress;
mod recipe;

pub use category::Category;
pub use food_item::{FoodItem, FoodItemCreate, FoodItemUpdate};
pub use history_event::{EventKind, HistoryEvent};
pub use progress::{PantryState, UserProgress};
pub use recipe::{CustomRecipe, CustomRecipeCreate, Recipe, RecipeIngredient};

use rusqlite::types::Type;
use rusqlite::Row;

/// Read a text column through `parse`; unknown values are a conversion failure
fn parse_text_column<T>(
    row: &Row,
    column: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(column)?;
    parse(&raw).ok_or_else(|| {
        let index = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("unrecognized {} '{}'", column, raw).into(),
        )
    })
}
