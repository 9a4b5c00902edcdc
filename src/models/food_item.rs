//! Food Item model
//!
//! A trackable grocery item with quantity, price and expiration date.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::{parse_text_column, Category};

/// A food item in the pantry
///
/// `price` is the value of the entire current quantity, not a unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub quantity: f64,
    pub unit: String,
    pub expiration_date: NaiveDate,
    pub price: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data for creating a new food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    pub category: Option<Category>,
    pub quantity: f64,
    pub unit: String,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub price: f64,
}

/// Data for updating a food item; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItemUpdate {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub price: Option<f64>,
}

impl FoodItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.expiration_date.is_none()
            && self.price.is_none()
    }
}

impl FoodItem {
    /// Price of one unit of quantity
    pub fn unit_price(&self) -> f64 {
        self.price / self.quantity
    }

    /// Apply a patch, returning the patched copy. No validation happens here.
    pub fn patched(&self, patch: &FoodItemUpdate, at: NaiveDateTime) -> Self {
        let mut item = self.clone();
        if let Some(ref name) = patch.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(ref unit) = patch.unit {
            item.unit = unit.trim().to_string();
        }
        if let Some(date) = patch.expiration_date {
            item.expiration_date = date;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        item.updated_at = at;
        item
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: parse_text_column(row, "category", Category::from_str)?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            expiration_date: row.get("expiration_date")?,
            price: row.get("price")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert an item whose id was already assigned by the inventory store
    pub fn insert(conn: &Connection, item: &FoodItem) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO food_items (
                id, name, category, quantity, unit, expiration_date, price, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                item.id,
                item.name,
                item.category.as_str(),
                item.quantity,
                item.unit,
                item.expiration_date,
                item.price,
                item.created_at,
                item.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Overwrite every mutable column of an existing row
    pub fn save(conn: &Connection, item: &FoodItem) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE food_items
            SET name = ?1, category = ?2, quantity = ?3, unit = ?4,
                expiration_date = ?5, price = ?6, updated_at = ?7
            WHERE id = ?8
            "#,
            params![
                item.name,
                item.category.as_str(),
                item.quantity,
                item.unit,
                item.expiration_date,
                item.price,
                item.updated_at,
                item.id,
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Load every live item, oldest id first
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items ORDER BY id ASC")?;
        let items = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_items WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
