//! Expiry calculation
//!
//! Turns expiration dates into whole "days left" and urgency classes.
//! All functions work on calendar dates; time of day never enters the math.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::FoodItem;

/// Days left at which an item stops being "expiring soon"
pub const SOON_DAYS: i64 = 3;
/// Days left at which an item stops being "expiring this week"
pub const WEEK_DAYS: i64 = 7;

/// Urgency class of an item, derived solely from days left
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Expired,
    ExpiresToday,
    ExpiringSoon,
    ExpiringThisWeek,
    Fresh,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Expired => "expired",
            Urgency::ExpiresToday => "expires_today",
            Urgency::ExpiringSoon => "expiring_soon",
            Urgency::ExpiringThisWeek => "expiring_this_week",
            Urgency::Fresh => "fresh",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "expired" => Some(Urgency::Expired),
            "expires_today" | "today" => Some(Urgency::ExpiresToday),
            "expiring_soon" | "soon" => Some(Urgency::ExpiringSoon),
            "expiring_this_week" | "this_week" | "week" => Some(Urgency::ExpiringThisWeek),
            "fresh" => Some(Urgency::Fresh),
            _ => None,
        }
    }
}

/// Whole days from `as_of` until `expiration_date`; negative once expired
pub fn days_left(expiration_date: NaiveDate, as_of: NaiveDate) -> i64 {
    (expiration_date - as_of).num_days()
}

/// Classify days left into an urgency class
pub fn classify(days_left: i64) -> Urgency {
    if days_left < 0 {
        Urgency::Expired
    } else if days_left == 0 {
        Urgency::ExpiresToday
    } else if days_left <= SOON_DAYS {
        Urgency::ExpiringSoon
    } else if days_left <= WEEK_DAYS {
        Urgency::ExpiringThisWeek
    } else {
        Urgency::Fresh
    }
}

/// Short human label for a days-left value
pub fn expiration_label(days_left: i64) -> String {
    match days_left {
        d if d < 0 => "Expired".to_string(),
        0 => "Today".to_string(),
        1 => "1 day".to_string(),
        d => format!("{} days", d),
    }
}

/// Items that should be surfaced to the user right away
pub fn needs_attention(days_left: i64) -> bool {
    matches!(
        classify(days_left),
        Urgency::Expired | Urgency::ExpiresToday | Urgency::ExpiringSoon
    )
}

/// Not yet expired, but within the week window
fn within_week(days_left: i64) -> bool {
    (0..=WEEK_DAYS).contains(&days_left)
}

/// Dashboard counters over the live inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpirySummary {
    pub total_items: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub needs_attention: usize,
    /// Value at risk if everything expiring within a week goes to waste
    pub potential_loss: f64,
}

impl ExpirySummary {
    pub fn compute<'a, I>(items: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a FoodItem>,
    {
        let mut summary = ExpirySummary::default();
        for item in items {
            let days = days_left(item.expiration_date, today);
            summary.total_items += 1;
            if within_week(days) {
                summary.expiring_soon += 1;
                summary.potential_loss += item.price;
            }
            if days < 0 {
                summary.expired += 1;
            }
            if needs_attention(days) {
                summary.needs_attention += 1;
            }
        }
        summary
    }
}

/// Sort items by expiration date, soonest first; ties keep id order
pub fn sort_by_expiration(items: &mut [FoodItem]) {
    items.sort_by(|a, b| {
        a.expiration_date
            .cmp(&b.expiration_date)
            .then(a.id.cmp(&b.id))
    });
}
