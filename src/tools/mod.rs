//! FoodSaver Tools module
//!
//! Plain functions behind the MCP tools. Mutations go through `Pantry`;
//! read-only views take a borrowed `InventoryStore`.

pub mod analytics;
pub mod pantry;
pub mod recipes;
pub mod status;

pub use pantry::{Pantry, PantryError, PantryResult};
