//! Read-only pantry views
//!
//! Dashboard, analytics, history feed and progress. All of these take a
//! snapshot of the store and recompute from scratch.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::inventory::expiry::sort_by_expiration;
use crate::inventory::{
    needs_attention, AnalyticsSnapshot, EventQuery, ExpirySummary, InventoryStore, ProgressSummary,
    Urgency,
};
use crate::models::{Category, EventKind, FoodItem, HistoryEvent};
use crate::tools::pantry::FoodItemView;

const DASHBOARD_ATTENTION_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
pub struct ListFoodItemsResponse {
    pub items: Vec<FoodItemView>,
    pub total: usize,
}

/// Live items, soonest expiry first, optionally filtered
pub fn list_food_items(
    store: &InventoryStore,
    category: Option<Category>,
    urgency: Option<Urgency>,
    search: Option<&str>,
    today: NaiveDate,
) -> ListFoodItemsResponse {
    let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());

    let mut items: Vec<FoodItem> = store
        .items()
        .filter(|item| category.map_or(true, |c| item.category == c))
        .filter(|item| {
            needle
                .as_ref()
                .map_or(true, |n| item.name.to_lowercase().contains(n.as_str()))
        })
        .cloned()
        .collect();
    sort_by_expiration(&mut items);

    let items: Vec<FoodItemView> = items
        .into_iter()
        .map(|item| FoodItemView::new(item, today))
        .filter(|view| urgency.map_or(true, |u| view.urgency == u))
        .collect();

    ListFoodItemsResponse {
        total: items.len(),
        items,
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub summary: ExpirySummary,
    pub inventory_value: f64,
    pub score: u64,
    /// Most urgent items first
    pub attention_items: Vec<FoodItemView>,
}

pub fn dashboard(store: &InventoryStore, today: NaiveDate) -> DashboardResponse {
    let summary = ExpirySummary::compute(store.items(), today);

    let mut items: Vec<FoodItem> = store.items().cloned().collect();
    sort_by_expiration(&mut items);
    let attention_items = items
        .into_iter()
        .map(|item| FoodItemView::new(item, today))
        .filter(|view| needs_attention(view.days_left))
        .take(DASHBOARD_ATTENTION_LIMIT)
        .collect();

    DashboardResponse {
        summary,
        inventory_value: crate::inventory::inventory_value(store.items()),
        score: store.progress().score,
        attention_items,
    }
}

/// Owned copy of the live items and the history log
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub items: Vec<FoodItem>,
    pub events: Vec<HistoryEvent>,
}

impl StoreSnapshot {
    pub fn take(store: &InventoryStore) -> Self {
        Self {
            items: store.items().cloned().collect(),
            events: store.ledger().snapshot(),
        }
    }
}

/// Analytics over a snapshot; needs no access to the live store
pub fn analytics(snapshot: &StoreSnapshot, window_days: i64, now: NaiveDateTime) -> AnalyticsSnapshot {
    AnalyticsSnapshot::compute(&snapshot.events, &snapshot.items, window_days, now)
}

/// History event with a human relative-time label
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub event: HistoryEvent,
    pub time_ago: String,
}

#[derive(Debug, Serialize)]
pub struct ListHistoryResponse {
    pub events: Vec<HistoryEntry>,
    pub total: usize,
}

/// "Just now", "5m ago", "3h ago", "2d ago"
pub fn relative_time(date: NaiveDateTime, now: NaiveDateTime) -> String {
    let seconds = (now - date).num_seconds().max(0);
    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

/// Newest events first, optionally restricted to one kind/category
pub fn list_history(
    store: &InventoryStore,
    kind: Option<EventKind>,
    category: Option<Category>,
    limit: usize,
    now: NaiveDateTime,
) -> ListHistoryResponse {
    let query = EventQuery {
        kind,
        since: None,
        category,
    };
    let events: Vec<HistoryEntry> = store
        .ledger()
        .recent(&query, limit)
        .into_iter()
        .map(|event| HistoryEntry {
            time_ago: relative_time(event.date, now),
            event: event.clone(),
        })
        .collect();

    ListHistoryResponse {
        total: events.len(),
        events,
    }
}

pub fn progress(store: &InventoryStore, today: NaiveDate) -> ProgressSummary {
    ProgressSummary::compute(store.progress(), store.ledger().events(), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::ScoringPolicy;
    use crate::models::FoodItemCreate;
    use chrono::Duration;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 9, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn stocked_store() -> InventoryStore {
        let mut store = InventoryStore::new(ScoringPolicy::Tiered);
        let rows = [
            ("Milk", Category::DairyEggs, 1, 2.49),
            ("Bread", Category::Bakery, -2, 3.99),
            ("Rice", Category::GrainsPasta, 200, 5.00),
            ("Spinach", Category::FruitsVegetables, 3, 1.50),
        ];
        for (name, category, days, price) in rows {
            store
                .add(
                    FoodItemCreate {
                        name: name.to_string(),
                        category: Some(category),
                        quantity: 1.0,
                        unit: "pcs".to_string(),
                        expiration_date: now().date() + Duration::days(days),
                        price,
                    },
                    now(),
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn test_relative_time() {
        let n = now();
        assert_eq!(relative_time(n, n), "Just now");
        assert_eq!(relative_time(n - Duration::seconds(59), n), "Just now");
        assert_eq!(relative_time(n - Duration::minutes(5), n), "5m ago");
        assert_eq!(relative_time(n - Duration::hours(3), n), "3h ago");
        assert_eq!(relative_time(n - Duration::days(2), n), "2d ago");
        assert_eq!(relative_time(n + Duration::hours(1), n), "Just now");
    }

    #[test]
    fn test_list_food_items_filters() {
        let store = stocked_store();
        let all = list_food_items(&store, None, None, None, now().date());
        let names: Vec<&str> = all.items.iter().map(|v| v.item.name.as_str()).collect();
        assert_eq!(names, vec!["Bread", "Milk", "Spinach", "Rice"]);

        let dairy = list_food_items(&store, Some(Category::DairyEggs), None, None, now().date());
        assert_eq!(dairy.total, 1);

        let expired = list_food_items(&store, None, Some(Urgency::Expired), None, now().date());
        assert_eq!(expired.items[0].item.name, "Bread");

        let search = list_food_items(&store, None, None, Some("SPIN"), now().date());
        assert_eq!(search.total, 1);
    }

    #[test]
    fn test_dashboard() {
        let store = stocked_store();
        let dash = dashboard(&store, now().date());
        assert_eq!(dash.summary.total_items, 4);
        assert_eq!(dash.summary.expired, 1);
        assert_eq!(dash.summary.expiring_soon, 2);
        assert_eq!(dash.summary.needs_attention, 3);
        assert_eq!(dash.attention_items.len(), 3);
        assert!((dash.inventory_value - 12.98).abs() < 1e-9);
        assert_eq!(dash.score, 40);
    }

    #[test]
    fn test_history_newest_first() {
        let mut store = stocked_store();
        store.consume(1, None, now() - Duration::hours(2)).unwrap();
        store.mark_expired_as_waste(2, now()).unwrap();

        let history = list_history(&store, None, None, 10, now());
        assert_eq!(history.total, 2);
        assert_eq!(history.events[0].event.kind, EventKind::Wasted);
        assert_eq!(history.events[0].time_ago, "Just now");
        assert_eq!(history.events[1].time_ago, "2h ago");

        let used = list_history(&store, Some(EventKind::Used), None, 10, now());
        assert_eq!(used.total, 1);
    }

    #[test]
    fn test_analytics_snapshot() {
        let mut store = stocked_store();
        store.consume(1, None, now()).unwrap();
        store.mark_expired_as_waste(2, now()).unwrap();

        let snapshot = analytics(&StoreSnapshot::take(&store), 30, now());
        assert!((snapshot.scalars.total_saved - 2.49).abs() < 1e-9);
        assert!((snapshot.scalars.total_waste - 3.99).abs() < 1e-9);
        assert_eq!(snapshot.weekly.len(), 1);
        assert_eq!(snapshot.categories.len(), 2);
        assert!((snapshot.inventory_value - 6.50).abs() < 1e-9);
    }
}
