//! Inventory store
//!
//! Owns the live item collection, the history ledger and the score counters.
//! All mutation goes through the methods here; each one either fully applies
//! or returns an error with the store untouched.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::error::{InventoryError, InventoryResult};
use super::expiry::days_left;
use super::ledger::HistoryLedger;
use super::scoring::ScoringPolicy;
use crate::models::{
    EventKind, FoodItem, FoodItemCreate, FoodItemUpdate, HistoryEvent, PantryState, UserProgress,
};

/// Outcome of a consumption
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionResult {
    pub event: HistoryEvent,
    /// Post-state of the item, `None` once fully consumed
    pub item: Option<FoodItem>,
    pub points_awarded: u64,
}

#[derive(Debug, Clone)]
pub struct InventoryStore {
    items: BTreeMap<i64, FoodItem>,
    next_id: i64,
    ledger: HistoryLedger,
    progress: UserProgress,
    policy: ScoringPolicy,
}

fn validate_fields(name: &str, quantity: f64, unit: &str, price: f64) -> InventoryResult<()> {
    if name.trim().is_empty() {
        return Err(InventoryError::validation("Name is required"));
    }
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(InventoryError::validation(format!(
            "Quantity must be greater than 0 (got {})",
            quantity
        )));
    }
    if unit.trim().is_empty() {
        return Err(InventoryError::validation("Unit is required"));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(InventoryError::validation(format!(
            "Price must not be negative (got {})",
            price
        )));
    }
    Ok(())
}

impl InventoryStore {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self::from_parts(Vec::new(), Vec::new(), PantryState::default(), policy)
    }

    /// Rebuild a store from a persisted snapshot
    pub fn from_parts(
        items: Vec<FoodItem>,
        events: Vec<HistoryEvent>,
        state: PantryState,
        policy: ScoringPolicy,
    ) -> Self {
        let items: BTreeMap<i64, FoodItem> = items.into_iter().map(|i| (i.id, i)).collect();
        // never hand out an id that is already live, even if the state row lags
        let max_live = items.keys().next_back().copied().unwrap_or(0);
        Self {
            items,
            next_id: state.next_item_id.max(max_live + 1),
            ledger: HistoryLedger::from_events(events),
            progress: state.progress,
            policy,
        }
    }

    pub fn get(&self, id: i64) -> InventoryResult<&FoodItem> {
        self.items.get(&id).ok_or(InventoryError::NotFound(id))
    }

    /// Live items in id order
    pub fn items(&self) -> impl Iterator<Item = &FoodItem> + Clone {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Bookkeeping that must be persisted alongside every mutation
    pub fn state(&self) -> PantryState {
        PantryState {
            progress: self.progress.clone(),
            next_item_id: self.next_id,
        }
    }

    pub fn add(&mut self, data: FoodItemCreate, at: NaiveDateTime) -> InventoryResult<FoodItem> {
        let category = data
            .category
            .ok_or_else(|| InventoryError::validation("Category is required"))?;
        validate_fields(&data.name, data.quantity, &data.unit, data.price)?;

        let item = FoodItem {
            id: self.next_id,
            name: data.name.trim().to_string(),
            category,
            quantity: data.quantity,
            unit: data.unit.trim().to_string(),
            expiration_date: data.expiration_date,
            price: data.price,
            created_at: at,
            updated_at: at,
        };

        self.next_id += 1;
        self.items.insert(item.id, item.clone());
        self.progress.score += self.policy.score_for_addition();
        self.progress.items_added += 1;
        Ok(item)
    }

    pub fn edit(
        &mut self,
        id: i64,
        patch: &FoodItemUpdate,
        at: NaiveDateTime,
    ) -> InventoryResult<FoodItem> {
        let updated = self.get(id)?.patched(patch, at);
        validate_fields(&updated.name, updated.quantity, &updated.unit, updated.price)?;

        self.items.insert(id, updated.clone());
        Ok(updated)
    }

    /// Delete an item outright. Not consumption and not waste, so no history.
    pub fn remove(&mut self, id: i64) -> InventoryResult<FoodItem> {
        let item = self.items.remove(&id).ok_or(InventoryError::NotFound(id))?;
        Ok(item)
    }

    /// Consume some or all of an item; `None` means the whole remaining quantity
    pub fn consume(
        &mut self,
        id: i64,
        used_quantity: Option<f64>,
        at: NaiveDateTime,
    ) -> InventoryResult<ConsumptionResult> {
        let item = self.get(id)?.clone();
        let used = used_quantity.unwrap_or(item.quantity);

        // also rejects NaN
        if !(used > 0.0 && used <= item.quantity) {
            return Err(InventoryError::InvalidQuantity {
                requested: used,
                available: item.quantity,
            });
        }

        let full = used >= item.quantity;
        let value = if full {
            item.price
        } else {
            item.price * used / item.quantity
        };
        let days = days_left(item.expiration_date, at.date());

        let event = HistoryEvent {
            id: 0,
            kind: EventKind::Used,
            item_id: item.id,
            item_name: item.name.clone(),
            category: item.category,
            quantity: used,
            unit: item.unit.clone(),
            value,
            date: at,
        };

        let remaining = if full {
            self.items.remove(&id);
            None
        } else {
            let mut next = item;
            next.quantity -= used;
            next.price = (next.price - value).max(0.0);
            next.updated_at = at;
            self.items.insert(id, next.clone());
            Some(next)
        };

        let points = self.policy.score_for_consumption(days, value);
        self.progress.score += points;
        self.progress.items_used += 1;
        let event = self.ledger.append(event);
        Ok(ConsumptionResult {
            event,
            item: remaining,
            points_awarded: points,
        })
    }

    /// Record the full remaining value of an expired item as waste and remove it
    pub fn mark_expired_as_waste(
        &mut self,
        id: i64,
        at: NaiveDateTime,
    ) -> InventoryResult<HistoryEvent> {
        let item = self.get(id)?.clone();
        let days = days_left(item.expiration_date, at.date());
        if days >= 0 {
            return Err(InventoryError::NotExpired { id, days_left: days });
        }

        let event = HistoryEvent {
            id: 0,
            kind: EventKind::Wasted,
            item_id: item.id,
            item_name: item.name,
            category: item.category,
            quantity: item.quantity,
            unit: item.unit,
            value: item.price,
            date: at,
        };

        self.items.remove(&id);
        self.progress.items_wasted += 1;
        let event = self.ledger.append(event);
        Ok(event)
    }

    /// Mark every expired item as waste, in id order
    pub fn sweep_expired(&mut self, at: NaiveDateTime) -> Vec<HistoryEvent> {
        let today = at.date();
        let expired: Vec<i64> = self
            .items
            .values()
            .filter(|item| days_left(item.expiration_date, today) < 0)
            .map(|item| item.id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| self.mark_expired_as_waste(id, at).ok())
            .collect()
    }

    /// Credit a saved custom recipe; returns the points awarded
    pub fn award_custom_recipe(&mut self) -> u64 {
        let points = self.policy.score_for_custom_recipe();
        self.progress.score += points;
        self.progress.recipes_created += 1;
        points
    }
}
