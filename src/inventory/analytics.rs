//! Analytics aggregation
//!
//! Pure recomputation of weekly and per-category summaries from history
//! events, plus scalar KPIs. Nothing is cached; every call starts from the
//! events it is given.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{Category, EventKind, FoodItem, HistoryEvent};

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    wasted: f64,
    saved: f64,
}

impl Totals {
    fn add(&mut self, event: &HistoryEvent) {
        match event.kind {
            EventKind::Wasted => self.wasted += event.value,
            EventKind::Used => self.saved += event.value,
        }
    }

    fn total(&self) -> f64 {
        self.wasted + self.saved
    }
}

/// Values for one Sunday-aligned week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub wasted_value: f64,
    pub saved_value: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub category: Category,
    pub wasted_value: f64,
    pub saved_value: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnalyticsScalars {
    pub total_waste: f64,
    pub total_saved: f64,
    /// saved / (waste + saved), 0 when there is nothing to divide
    pub waste_reduction_ratio: f64,
}

impl AnalyticsScalars {
    pub fn waste_reduction_percentage(&self) -> f64 {
        self.waste_reduction_ratio * 100.0
    }
}

/// Start of the week (Sunday) containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Bucket events from the last `window_days` days by week, oldest week first.
///
/// Weeks without events are omitted rather than zero-filled.
pub fn weekly_buckets<'a, I>(events: I, window_days: i64, now: NaiveDateTime) -> Vec<WeeklyBucket>
where
    I: IntoIterator<Item = &'a HistoryEvent>,
{
    let cutoff = now - Duration::days(window_days.max(0));
    let mut weeks: BTreeMap<NaiveDate, Totals> = BTreeMap::new();

    for event in events.into_iter().filter(|e| e.date >= cutoff) {
        weeks.entry(week_start(event.date.date())).or_default().add(event);
    }

    weeks
        .into_iter()
        .map(|(week_start, totals)| WeeklyBucket {
            week_start,
            wasted_value: totals.wasted,
            saved_value: totals.saved,
            total_value: totals.total(),
        })
        .collect()
}

/// Bucket all events by category, in order of first appearance
pub fn category_buckets<'a, I>(events: I) -> Vec<CategoryBucket>
where
    I: IntoIterator<Item = &'a HistoryEvent>,
{
    let mut buckets: Vec<(Category, Totals)> = Vec::new();

    for event in events {
        match buckets.iter_mut().find(|(c, _)| *c == event.category) {
            Some((_, totals)) => totals.add(event),
            None => {
                let mut totals = Totals::default();
                totals.add(event);
                buckets.push((event.category, totals));
            }
        }
    }

    buckets
        .into_iter()
        .map(|(category, totals)| CategoryBucket {
            category,
            wasted_value: totals.wasted,
            saved_value: totals.saved,
            total_value: totals.total(),
        })
        .collect()
}

pub fn scalars<'a, I>(events: I) -> AnalyticsScalars
where
    I: IntoIterator<Item = &'a HistoryEvent>,
{
    let mut totals = Totals::default();
    for event in events {
        totals.add(event);
    }

    let denominator = totals.total();
    let waste_reduction_ratio = if denominator > 0.0 {
        totals.saved / denominator
    } else {
        0.0
    };

    AnalyticsScalars {
        total_waste: totals.wasted,
        total_saved: totals.saved,
        waste_reduction_ratio,
    }
}

/// Current value of the live pantry (not history)
pub fn inventory_value<'a, I>(items: I) -> f64
where
    I: IntoIterator<Item = &'a FoodItem>,
{
    items.into_iter().map(|item| item.price).sum()
}

/// Everything the analytics view needs, computed in one pass over a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub window_days: i64,
    pub weekly: Vec<WeeklyBucket>,
    pub categories: Vec<CategoryBucket>,
    pub scalars: AnalyticsScalars,
    pub inventory_value: f64,
}

impl AnalyticsSnapshot {
    pub fn compute(
        events: &[HistoryEvent],
        items: &[FoodItem],
        window_days: i64,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            window_days,
            weekly: weekly_buckets(events, window_days, now),
            categories: category_buckets(events),
            scalars: scalars(events),
            inventory_value: inventory_value(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn event(kind: EventKind, category: Category, value: f64, date: NaiveDateTime) -> HistoryEvent {
        HistoryEvent {
            id: 0,
            kind,
            item_id: 1,
            item_name: "x".to_string(),
            category,
            quantity: 1.0,
            unit: "pcs".to_string(),
            value,
            date,
        }
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2026-06-10 is a Wednesday
        let wed = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
        assert_eq!(week_start(wed), NaiveDate::from_ymd_opt(2026, 6, 7).unwrap());
        let sun = NaiveDate::from_ymd_opt(2026, 6, 7).unwrap();
        assert_eq!(week_start(sun), sun);
        let sat = NaiveDate::from_ymd_opt(2026, 6, 13).unwrap();
        assert_eq!(week_start(sat), sun);
    }

    #[test]
    fn test_weekly_buckets_group_and_sort() {
        let events = vec![
            event(EventKind::Used, Category::DairyEggs, 2.49, at(6, 10)),
            event(EventKind::Wasted, Category::Bakery, 3.99, at(6, 2)),
            event(EventKind::Wasted, Category::DairyEggs, 5.99, at(6, 13)),
            event(EventKind::Used, Category::Snacks, 1.00, at(6, 1)),
        ];
        let buckets = weekly_buckets(&events, 30, at(6, 14));

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].week_start, NaiveDate::from_ymd_opt(2026, 5, 31).unwrap());
        assert!((buckets[0].wasted_value - 3.99).abs() < 1e-9);
        assert!((buckets[0].saved_value - 1.00).abs() < 1e-9);
        assert_eq!(buckets[1].week_start, NaiveDate::from_ymd_opt(2026, 6, 7).unwrap());
        assert!((buckets[1].wasted_value - 5.99).abs() < 1e-9);
        assert!((buckets[1].saved_value - 2.49).abs() < 1e-9);

        for bucket in &buckets {
            assert_eq!(bucket.wasted_value + bucket.saved_value, bucket.total_value);
        }
    }

    #[test]
    fn test_weekly_buckets_respect_window_and_skip_empty_weeks() {
        let events = vec![
            event(EventKind::Used, Category::DairyEggs, 1.0, at(3, 1)),
            event(EventKind::Used, Category::DairyEggs, 2.0, at(5, 20)),
            event(EventKind::Used, Category::DairyEggs, 4.0, at(6, 10)),
        ];
        let buckets = weekly_buckets(&events, 7, at(6, 14));
        assert_eq!(buckets.len(), 1);
        assert!((buckets[0].saved_value - 4.0).abs() < 1e-9);

        let buckets = weekly_buckets(&events, 30, at(6, 14));
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn test_weekly_window_cutoff_is_inclusive() {
        let cutoff = at(6, 7);
        let events = vec![
            event(EventKind::Wasted, Category::Bakery, 8.0, cutoff - Duration::seconds(1)),
            event(EventKind::Used, Category::DairyEggs, 2.0, cutoff),
        ];
        let buckets = weekly_buckets(&events, 7, at(6, 14));

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].week_start, NaiveDate::from_ymd_opt(2026, 6, 7).unwrap());
        assert!((buckets[0].saved_value - 2.0).abs() < 1e-9);
        assert_eq!(buckets[0].wasted_value, 0.0);
    }

    #[test]
    fn test_category_buckets() {
        let events = vec![
            event(EventKind::Used, Category::DairyEggs, 2.0, at(6, 1)),
            event(EventKind::Wasted, Category::Bakery, 3.0, at(6, 2)),
            event(EventKind::Wasted, Category::DairyEggs, 1.5, at(6, 3)),
        ];
        let buckets = category_buckets(&events);
        assert_eq!(buckets.len(), 2);

        let dairy = buckets.iter().find(|b| b.category == Category::DairyEggs).unwrap();
        assert!((dairy.saved_value - 2.0).abs() < 1e-9);
        assert!((dairy.wasted_value - 1.5).abs() < 1e-9);
        assert!((dairy.total_value - 3.5).abs() < 1e-9);

        let bakery = buckets.iter().find(|b| b.category == Category::Bakery).unwrap();
        assert!((bakery.wasted_value - 3.0).abs() < 1e-9);
        assert_eq!(bakery.saved_value, 0.0);
    }

    #[test]
    fn test_scalars_empty() {
        let events: Vec<HistoryEvent> = Vec::new();
        let s = scalars(&events);
        assert_eq!(s, AnalyticsScalars { total_waste: 0.0, total_saved: 0.0, waste_reduction_ratio: 0.0 });
    }

    #[test]
    fn test_scalars_ratio() {
        let events = vec![
            event(EventKind::Used, Category::DairyEggs, 3.0, at(6, 1)),
            event(EventKind::Wasted, Category::Bakery, 1.0, at(6, 2)),
        ];
        let s = scalars(&events);
        assert!((s.total_saved - 3.0).abs() < 1e-9);
        assert!((s.total_waste - 1.0).abs() < 1e-9);
        assert!((s.waste_reduction_ratio - 0.75).abs() < 1e-9);
        assert!((s.waste_reduction_percentage() - 75.0).abs() < 1e-9);

        let only_waste = vec![event(EventKind::Wasted, Category::Bakery, 1.0, at(6, 2))];
        assert_eq!(scalars(&only_waste).waste_reduction_ratio, 0.0);
    }
}
