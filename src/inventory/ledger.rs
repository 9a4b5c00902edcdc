//! History ledger
//!
//! Append-only log of used/wasted events. There is no update or delete API;
//! analytics are recomputed from this log and stay reproducible.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Category, EventKind, HistoryEvent};

/// Filter for [`HistoryLedger::query`]; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventQuery {
    pub kind: Option<EventKind>,
    /// Inclusive lower bound on the event date
    pub since: Option<NaiveDateTime>,
    pub category: Option<Category>,
}

impl EventQuery {
    pub fn matches(&self, event: &HistoryEvent) -> bool {
        self.kind.map_or(true, |k| event.kind == k)
            && self.since.map_or(true, |since| event.date >= since)
            && self.category.map_or(true, |c| event.category == c)
    }
}

#[derive(Debug, Clone)]
pub struct HistoryLedger {
    events: Vec<HistoryEvent>,
    next_id: i64,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a ledger from persisted events, ordered by their sequence id
    pub fn from_events(mut events: Vec<HistoryEvent>) -> Self {
        events.sort_by_key(|e| e.id);
        let next_id = events.last().map_or(1, |e| e.id + 1);
        Self { events, next_id }
    }

    /// Append an event, assigning it the next sequence id
    pub fn append(&mut self, mut event: HistoryEvent) -> HistoryEvent {
        event.id = self.next_id;
        self.next_id += 1;
        self.events.push(event.clone());
        event
    }

    /// Lazily filter events in insertion order.
    ///
    /// The iterator is `Clone`, so the same query can be walked again without
    /// touching the ledger.
    pub fn query<'a>(
        &'a self,
        query: &'a EventQuery,
    ) -> impl Iterator<Item = &'a HistoryEvent> + Clone + 'a {
        self.events.iter().filter(move |e| query.matches(e))
    }

    /// Newest matching events first (by date, then insertion order)
    pub fn recent(&self, query: &EventQuery, limit: usize) -> Vec<&HistoryEvent> {
        let mut events: Vec<&HistoryEvent> =
            self.events.iter().filter(|e| query.matches(e)).collect();
        events.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        events.truncate(limit);
        events
    }

    /// Owned copy of the log for aggregation while writers keep going
    pub fn snapshot(&self) -> Vec<HistoryEvent> {
        self.events.clone()
    }

    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
