//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- FOOD ITEMS
        -- Live pantry contents; ids are assigned by the inventory store
        -- ============================================
        CREATE TABLE food_items (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            quantity REAL NOT NULL CHECK(quantity > 0),
            unit TEXT NOT NULL,
            expiration_date TEXT NOT NULL,       -- YYYY-MM-DD
            price REAL NOT NULL DEFAULT 0 CHECK(price >= 0),  -- value of the whole quantity
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX idx_food_items_expiration ON food_items(expiration_date);
        CREATE INDEX idx_food_items_category ON food_items(category);

        -- ============================================
        -- HISTORY EVENTS
        -- Append-only used/wasted log; no FK to food_items on purpose
        -- ============================================
        CREATE TABLE history_events (
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL CHECK(kind IN ('used', 'wasted')),
            item_id INTEGER NOT NULL,
            item_name TEXT NOT NULL,
            category TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,
            value REAL NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX idx_history_events_date ON history_events(date);
        CREATE INDEX idx_history_events_kind ON history_events(kind);

        -- ============================================
        -- PANTRY STATE
        -- Single row: gamification counters and id allocation
        -- ============================================
        CREATE TABLE pantry_state (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            score INTEGER NOT NULL DEFAULT 0,
            items_added INTEGER NOT NULL DEFAULT 0,
            items_used INTEGER NOT NULL DEFAULT 0,
            items_wasted INTEGER NOT NULL DEFAULT 0,
            recipes_created INTEGER NOT NULL DEFAULT 0,
            next_item_id INTEGER NOT NULL DEFAULT 1,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- CUSTOM RECIPES
        -- User-authored recipes; ingredients stored as JSON
        -- ============================================
        CREATE TABLE custom_recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            ingredients TEXT NOT NULL,
            instructions TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        );
        "#,
    )?;

    tracing::debug!(version = SCHEMA_VERSION, "applied initial schema");
    Ok(())
}
