//! Pantry orchestration
//!
//! Wraps the in-memory `InventoryStore` with write-through SQLite persistence.
//! Every mutation reloads the store inside one write transaction, so other
//! processes on the same database file (the `sweep_expired` job) are seen.
//! The new store replaces the live one only after the transaction commits.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::{Database, DbError, DbResult};
use crate::inventory::{
    days_left, expiration_label, ConsumptionResult, InventoryError, InventoryStore, ScoringPolicy,
    Urgency,
};
use crate::models::{
    CustomRecipe, CustomRecipeCreate, FoodItem, FoodItemCreate, FoodItemUpdate, HistoryEvent,
    PantryState,
};
use crate::recipes::RecipeError;

#[derive(Error, Debug)]
pub enum PantryError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Recipe search error: {0}")]
    Recipe(#[from] RecipeError),

    #[error("Pantry state is unavailable: {0}")]
    Lock(String),
}

impl PantryError {
    /// Caller mistakes as opposed to server-side failures
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, PantryError::Inventory(_))
    }
}

pub type PantryResult<T> = Result<T, PantryError>;

/// An item together with its derived expiry fields
#[derive(Debug, Clone, Serialize)]
pub struct FoodItemView {
    #[serde(flatten)]
    pub item: FoodItem,
    pub days_left: i64,
    pub urgency: Urgency,
    pub expiration_label: String,
}

impl FoodItemView {
    pub fn new(item: FoodItem, today: chrono::NaiveDate) -> Self {
        let days = days_left(item.expiration_date, today);
        Self {
            item,
            days_left: days,
            urgency: crate::inventory::classify(days),
            expiration_label: expiration_label(days),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddFoodItemResponse {
    pub item: FoodItemView,
    pub points_awarded: u64,
    pub score: u64,
}

#[derive(Debug, Serialize)]
pub struct ConsumeFoodItemResponse {
    #[serde(flatten)]
    pub result: ConsumptionResult,
    pub removed: bool,
    pub score: u64,
}

#[derive(Debug, Serialize)]
pub struct SweepExpiredResponse {
    pub events: Vec<HistoryEvent>,
    pub items_wasted: usize,
    pub total_value: f64,
}

#[derive(Debug, Serialize)]
pub struct SaveCustomRecipeResponse {
    pub recipe: CustomRecipe,
    pub points_awarded: u64,
    pub score: u64,
}

fn validate_custom_recipe(data: &CustomRecipeCreate) -> Result<(), InventoryError> {
    if data.name.trim().is_empty() {
        return Err(InventoryError::validation("Recipe name is required"));
    }
    if !data.ingredients.iter().any(|i| !i.name.trim().is_empty()) {
        return Err(InventoryError::validation(
            "Recipe needs at least one ingredient",
        ));
    }
    Ok(())
}

fn read_store(conn: &Connection, policy: ScoringPolicy) -> DbResult<InventoryStore> {
    let items = FoodItem::list_all(conn)?;
    let events = HistoryEvent::list_all(conn)?;
    let state = PantryState::load(conn)?.unwrap_or_default();
    Ok(InventoryStore::from_parts(items, events, state, policy))
}

/// The live pantry: in-memory store plus its database
pub struct Pantry {
    db: Database,
    store: InventoryStore,
}

impl Pantry {
    /// Load items, history and counters from the database
    pub fn load(db: Database, policy: ScoringPolicy) -> PantryResult<Self> {
        let store = db.with_conn(|conn| read_store(conn, policy))?;

        info!(
            items = store.len(),
            events = store.ledger().len(),
            score = store.progress().score,
            policy = policy.as_str(),
            "Loaded pantry"
        );
        Ok(Self { db, store })
    }

    /// Reload from the database, picking up writes made by other processes
    pub fn refresh(&mut self) -> PantryResult<()> {
        let policy = self.store.policy();
        self.store = self.db.with_conn(|conn| read_store(conn, policy))?;
        Ok(())
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Reload the store inside a write transaction, apply `mutate`, persist
    /// through `persist`, then swap the new store in. On any error the live
    /// store and the database are left untouched.
    fn commit<T, R, M, P>(&mut self, mutate: M, persist: P) -> PantryResult<R>
    where
        M: FnOnce(&mut InventoryStore) -> Result<T, InventoryError>,
        P: FnOnce(&Connection, T) -> DbResult<R>,
    {
        let policy = self.store.policy();
        let outcome = self.db.with_transaction(|tx| -> PantryResult<(InventoryStore, R)> {
            let mut next = read_store(tx, policy)?;
            let change = mutate(&mut next)?;
            let result = persist(tx, change)?;
            PantryState::save(tx, &next.state())?;
            Ok((next, result))
        });

        match outcome {
            Ok((next, result)) => {
                self.store = next;
                Ok(result)
            }
            Err(e) => {
                if !e.is_invalid_request() {
                    warn!(error = %e, "Persisting pantry change failed; change discarded");
                }
                Err(e)
            }
        }
    }

    pub fn add_item(&mut self, data: FoodItemCreate, at: NaiveDateTime) -> PantryResult<AddFoodItemResponse> {
        let item = self.commit(
            |store| store.add(data, at),
            |conn, item| {
                FoodItem::insert(conn, &item)?;
                Ok(item)
            },
        )?;

        let score = self.store.progress().score;
        info!(id = item.id, name = %item.name, "Added food item");
        Ok(AddFoodItemResponse {
            item: FoodItemView::new(item, at.date()),
            points_awarded: self.store.policy().score_for_addition(),
            score,
        })
    }

    pub fn edit_item(
        &mut self,
        id: i64,
        patch: &FoodItemUpdate,
        at: NaiveDateTime,
    ) -> PantryResult<FoodItemView> {
        let item = self.commit(
            |store| store.edit(id, patch, at),
            |conn, item| {
                FoodItem::save(conn, &item)?;
                Ok(item)
            },
        )?;
        info!(id, "Updated food item");
        Ok(FoodItemView::new(item, at.date()))
    }

    pub fn remove_item(&mut self, id: i64) -> PantryResult<FoodItem> {
        let item = self.commit(
            |store| store.remove(id),
            |conn, item| {
                FoodItem::delete(conn, item.id)?;
                Ok(item)
            },
        )?;
        info!(id, name = %item.name, "Removed food item");
        Ok(item)
    }

    pub fn consume_item(
        &mut self,
        id: i64,
        quantity: Option<f64>,
        at: NaiveDateTime,
    ) -> PantryResult<ConsumeFoodItemResponse> {
        let result = self.commit(
            |store| store.consume(id, quantity, at),
            |conn, result| {
                match &result.item {
                    Some(item) => {
                        FoodItem::save(conn, item)?;
                    }
                    None => {
                        FoodItem::delete(conn, id)?;
                    }
                }
                HistoryEvent::insert(conn, &result.event)?;
                Ok(result)
            },
        )?;

        info!(
            id,
            used = result.event.quantity,
            value = result.event.value,
            points = result.points_awarded,
            "Consumed food item"
        );
        Ok(ConsumeFoodItemResponse {
            removed: result.item.is_none(),
            score: self.store.progress().score,
            result,
        })
    }

    pub fn mark_expired(&mut self, id: i64, at: NaiveDateTime) -> PantryResult<HistoryEvent> {
        let event = self.commit(
            |store| store.mark_expired_as_waste(id, at),
            |conn, event| {
                FoodItem::delete(conn, event.item_id)?;
                HistoryEvent::insert(conn, &event)?;
                Ok(event)
            },
        )?;
        info!(id, value = event.value, "Recorded expired item as waste");
        Ok(event)
    }

    pub fn sweep_expired(&mut self, at: NaiveDateTime) -> PantryResult<SweepExpiredResponse> {
        let events = self.commit(
            |store| Ok(store.sweep_expired(at)),
            |conn, events| {
                for event in &events {
                    FoodItem::delete(conn, event.item_id)?;
                    HistoryEvent::insert(conn, event)?;
                }
                Ok(events)
            },
        )?;

        let total_value: f64 = events.iter().map(|e| e.value).sum();
        info!(count = events.len(), total_value, "Swept expired items");
        Ok(SweepExpiredResponse {
            items_wasted: events.len(),
            total_value,
            events,
        })
    }

    pub fn save_custom_recipe(
        &mut self,
        data: &CustomRecipeCreate,
        at: NaiveDateTime,
    ) -> PantryResult<SaveCustomRecipeResponse> {
        validate_custom_recipe(data)?;

        let (recipe, points) = self.commit(
            |store| Ok(store.award_custom_recipe()),
            |conn, points| Ok((CustomRecipe::create(conn, data, at)?, points)),
        )?;

        info!(id = recipe.id, name = %recipe.name, "Saved custom recipe");
        Ok(SaveCustomRecipeResponse {
            recipe,
            points_awarded: points,
            score: self.store.progress().score,
        })
    }

    pub fn list_custom_recipes(&self) -> PantryResult<Vec<CustomRecipe>> {
        Ok(self.db.with_conn(CustomRecipe::list)?)
    }
}
