//! Level, streak and achievement derivation
//!
//! None of this is persisted. Everything is recomputed from the score
//! counters and the history ledger.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::analytics::AnalyticsScalars;
use crate::models::{EventKind, HistoryEvent, UserProgress};

pub const POINTS_PER_LEVEL: u64 = 1000;

pub fn level_for_score(score: u64) -> u64 {
    score / POINTS_PER_LEVEL + 1
}

pub fn next_level_score(score: u64) -> u64 {
    level_for_score(score) * POINTS_PER_LEVEL
}

/// Percent of the way through the current level, 0..100
pub fn progress_to_next_level(score: u64) -> f64 {
    (score % POINTS_PER_LEVEL) as f64 / 10.0
}

#[derive(Debug, Clone, Copy, Default)]
struct DayActivity {
    used: bool,
    wasted: bool,
}

/// Consecutive days, ending today (or yesterday if today is still empty),
/// on which food was used and nothing was wasted.
pub fn streak_days<'a, I>(events: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = &'a HistoryEvent>,
{
    let mut days: HashMap<NaiveDate, DayActivity> = HashMap::new();
    for event in events {
        let day = days.entry(event.date.date()).or_default();
        match event.kind {
            EventKind::Used => day.used = true,
            EventKind::Wasted => day.wasted = true,
        }
    }

    let mut cursor = match days.get(&today) {
        Some(activity) if activity.wasted => return 0,
        Some(_) => today,
        None => today - Duration::days(1),
    };

    let mut streak = 0;
    while let Some(activity) = days.get(&cursor) {
        if !activity.used || activity.wasted {
            break;
        }
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub name: &'static str,
    pub description: &'static str,
    pub points: u64,
    pub unlocked: bool,
}

/// Achievement list; reported only, never added to the score
pub fn achievements(
    progress: &UserProgress,
    streak_days: u32,
    scalars: &AnalyticsScalars,
) -> Vec<Achievement> {
    vec![
        Achievement {
            name: "First Steps",
            description: "Add your first item",
            points: 50,
            unlocked: progress.items_added >= 1,
        },
        Achievement {
            name: "Week Warrior",
            description: "Maintain a 7-day streak",
            points: 100,
            unlocked: streak_days >= 7,
        },
        Achievement {
            name: "Money Saver",
            description: "Save $100 worth of food",
            points: 150,
            unlocked: scalars.total_saved >= 100.0,
        },
        Achievement {
            name: "Eco Champion",
            description: "Reduce waste by 80%",
            points: 200,
            unlocked: scalars.waste_reduction_percentage() >= 80.0,
        },
    ]
}

/// Profile view of the pantry owner's progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    #[serde(flatten)]
    pub counters: UserProgress,
    pub level: u64,
    pub next_level_score: u64,
    pub progress_to_next_level: f64,
    pub streak_days: u32,
    pub achievements: Vec<Achievement>,
}

impl ProgressSummary {
    pub fn compute(progress: &UserProgress, events: &[HistoryEvent], today: NaiveDate) -> Self {
        let streak = streak_days(events, today);
        let scalars = super::analytics::scalars(events);
        Self {
            counters: progress.clone(),
            level: level_for_score(progress.score),
            next_level_score: next_level_score(progress.score),
            progress_to_next_level: progress_to_next_level(progress.score),
            streak_days: streak,
            achievements: achievements(progress, streak, &scalars),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 20).unwrap()
    }

    fn event(kind: EventKind, days_ago: i64, value: f64) -> HistoryEvent {
        HistoryEvent {
            id: 0,
            kind,
            item_id: 1,
            item_name: "Yogurt".to_string(),
            category: Category::DairyEggs,
            quantity: 1.0,
            unit: "cup".to_string(),
            value,
            date: (today() - Duration::days(days_ago)).and_hms_opt(10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(next_level_score(0), 1000);
        assert_eq!(level_for_score(999), 1);
        assert_eq!(level_for_score(1000), 2);
        assert_eq!(next_level_score(1250), 2000);
        assert!((progress_to_next_level(1250) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_streak_counts_from_today() {
        let events = vec![
            event(EventKind::Used, 0, 1.0),
            event(EventKind::Used, 1, 1.0),
            event(EventKind::Used, 2, 1.0),
            event(EventKind::Used, 4, 1.0),
        ];
        assert_eq!(streak_days(&events, today()), 3);
    }

    #[test]
    fn test_streak_starts_yesterday_when_today_is_empty() {
        let events = vec![event(EventKind::Used, 1, 1.0), event(EventKind::Used, 2, 1.0)];
        assert_eq!(streak_days(&events, today()), 2);
    }

    #[test]
    fn test_streak_broken_by_waste() {
        let events = vec![event(EventKind::Used, 0, 1.0), event(EventKind::Wasted, 0, 1.0)];
        assert_eq!(streak_days(&events, today()), 0);

        let events = vec![
            event(EventKind::Used, 0, 1.0),
            event(EventKind::Used, 1, 1.0),
            event(EventKind::Wasted, 1, 1.0),
            event(EventKind::Used, 2, 1.0),
        ];
        assert_eq!(streak_days(&events, today()), 1);
    }

    #[test]
    fn test_streak_empty_history() {
        let events: Vec<HistoryEvent> = Vec::new();
        assert_eq!(streak_days(&events, today()), 0);
    }

    #[test]
    fn test_achievements_unlock() {
        let progress = UserProgress {
            score: 400,
            items_added: 3,
            items_used: 8,
            ..UserProgress::default()
        };
        let events: Vec<HistoryEvent> = (0..8).map(|d| event(EventKind::Used, d, 15.0)).collect();
        let summary = ProgressSummary::compute(&progress, &events, today());

        assert_eq!(summary.streak_days, 8);
        assert_eq!(summary.level, 1);
        assert!(summary.achievements.iter().all(|a| a.unlocked));
        // achievements never feed back into the score
        assert_eq!(summary.counters.score, 400);
    }

    #[test]
    fn test_achievements_locked_on_fresh_pantry() {
        let summary = ProgressSummary::compute(&UserProgress::default(), &[], today());
        assert!(summary.achievements.iter().all(|a| !a.unlocked));
        assert_eq!(summary.level, 1);
    }
}
