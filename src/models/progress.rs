//! User Progress model
//!
//! Gamification counters and the persisted pantry bookkeeping row.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Score and activity counters for the single pantry owner
///
/// The streak is not stored here; it is derived from history on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    /// Never decreases
    pub score: u64,
    pub items_added: u64,
    pub items_used: u64,
    pub items_wasted: u64,
    pub recipes_created: u64,
}

/// Everything persisted in the single `pantry_state` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryState {
    pub progress: UserProgress,
    pub next_item_id: i64,
}

impl Default for PantryState {
    fn default() -> Self {
        Self {
            progress: UserProgress::default(),
            next_item_id: 1,
        }
    }
}

impl PantryState {
    /// Load the state row, or `None` on a fresh database
    pub fn load(conn: &Connection) -> DbResult<Option<Self>> {
        let result = conn.query_row(
            r#"
            SELECT score, items_added, items_used, items_wasted, recipes_created, next_item_id
            FROM pantry_state WHERE id = 1
            "#,
            [],
            |row| {
                Ok(PantryState {
                    progress: UserProgress {
                        score: row.get::<_, i64>(0)?.max(0) as u64,
                        items_added: row.get::<_, i64>(1)?.max(0) as u64,
                        items_used: row.get::<_, i64>(2)?.max(0) as u64,
                        items_wasted: row.get::<_, i64>(3)?.max(0) as u64,
                        recipes_created: row.get::<_, i64>(4)?.max(0) as u64,
                    },
                    next_item_id: row.get(5)?,
                })
            },
        );

        match result {
            Ok(state) => Ok(Some(state)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Upsert the state row
    pub fn save(conn: &Connection, state: &PantryState) -> DbResult<()> {
        let p = &state.progress;
        conn.execute(
            r#"
            INSERT INTO pantry_state (
                id, score, items_added, items_used, items_wasted, recipes_created, next_item_id, updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, datetime('now'))
            ON CONFLICT(id) DO UPDATE SET
                score = excluded.score,
                items_added = excluded.items_added,
                items_used = excluded.items_used,
                items_wasted = excluded.items_wasted,
                recipes_created = excluded.recipes_created,
                next_item_id = excluded.next_item_id,
                updated_at = excluded.updated_at
            "#,
            params![
                p.score as i64,
                p.items_added as i64,
                p.items_used as i64,
                p.items_wasted as i64,
                p.recipes_created as i64,
                state.next_item_id,
            ],
        )?;
        Ok(())
    }
}
