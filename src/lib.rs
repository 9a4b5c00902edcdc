//! FoodSaver Library
//!
//! Pantry inventory lifecycle, expiry tracking, scoring and waste analytics,
//! exposed as an MCP server.

pub mod build_info;
pub mod config;
pub mod db;
pub mod inventory;
pub mod mcp;
pub mod models;
pub mod recipes;
pub mod tools;
