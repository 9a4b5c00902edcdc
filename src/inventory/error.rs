//! Inventory error types

use thiserror::Error;

/// Every failure leaves the store exactly as it was before the call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Food item not found with id: {0}")]
    NotFound(i64),

    #[error("Quantity must be between 0 and {available} (got {requested})")]
    InvalidQuantity { requested: f64, available: f64 },

    #[error("Food item {id} has not expired ({days_left} days left)")]
    NotExpired { id: i64, days_left: i64 },
}

impl InventoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        InventoryError::Validation(msg.into())
    }
}

pub type InventoryResult<T> = Result<T, InventoryError>;
