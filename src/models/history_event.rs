//! History Event model
//!
//! Immutable record of food being used or wasted. Item name and category are
//! copied at event time so later edits or deletion of the item leave history intact.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::{parse_text_column, Category};

/// What happened to the food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Used,
    Wasted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Used => "used",
            EventKind::Wasted => "wasted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "used" | "consumed" => Some(EventKind::Used),
            "wasted" | "expired" => Some(EventKind::Wasted),
            _ => None,
        }
    }
}

/// A single used/wasted occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// Ledger sequence number; insertion order
    pub id: i64,
    pub kind: EventKind,
    pub item_id: i64,
    pub item_name: String,
    pub category: Category,
    pub quantity: f64,
    pub unit: String,
    /// Monetary value attributed to this event
    pub value: f64,
    pub date: NaiveDateTime,
}

impl HistoryEvent {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            kind: parse_text_column(row, "kind", EventKind::from_str)?,
            item_id: row.get("item_id")?,
            item_name: row.get("item_name")?,
            category: parse_text_column(row, "category", Category::from_str)?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            value: row.get("value")?,
            date: row.get("date")?,
        })
    }

    /// Append to the history table; rows are never updated afterwards
    pub fn insert(conn: &Connection, event: &HistoryEvent) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO history_events (
                id, kind, item_id, item_name, category, quantity, unit, value, date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                event.id,
                event.kind.as_str(),
                event.item_id,
                event.item_name,
                event.category.as_str(),
                event.quantity,
                event.unit,
                event.value,
                event.date,
            ],
        )?;
        Ok(())
    }

    /// Load the full history in insertion order
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM history_events ORDER BY id ASC")?;
        let events = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use chrono::NaiveDate;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn insert_raw(conn: &Connection, kind: &str, category: &str) {
        conn.execute(
            "INSERT INTO history_events (kind, item_id, item_name, category, quantity, unit, value, date)
             VALUES (?1, 1, 'Milk', ?2, 1.0, 'liter', 2.49, '2026-06-01 08:00:00')",
            params![kind, category],
        )
        .unwrap();
    }

    #[test]
    fn test_insert_and_list() {
        let conn = conn();
        let event = HistoryEvent {
            id: 1,
            kind: EventKind::Wasted,
            item_id: 4,
            item_name: "Bread".to_string(),
            category: Category::Bakery,
            quantity: 1.0,
            unit: "loaf".to_string(),
            value: 3.99,
            date: NaiveDate::from_ymd_opt(2026, 6, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        };
        HistoryEvent::insert(&conn, &event).unwrap();
        assert_eq!(HistoryEvent::list_all(&conn).unwrap(), vec![event]);
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let conn = conn();
        insert_raw(&conn, "wasted", "spaceships");
        let err = HistoryEvent::list_all(&conn).unwrap_err();
        assert!(err.to_string().contains("spaceships"), "{}", err);
    }
}
