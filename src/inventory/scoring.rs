//! Point awards
//!
//! Pure functions mapping pantry events to points. Awards are never negative,
//! so a score can only grow.

use serde::{Deserialize, Serialize};

pub const ADDITION_POINTS: u64 = 10;
pub const CUSTOM_RECIPE_POINTS: u64 = 25;

const LAST_MINUTE_POINTS: u64 = 50;
const SOON_POINTS: u64 = 30;
const REGULAR_POINTS: u64 = 20;

/// How consumption is rewarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Tiered by urgency at the moment of consumption
    #[default]
    Tiered,
    /// Whole currency units of the consumed value
    ValueAsPoints,
}

impl ScoringPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicy::Tiered => "tiered",
            ScoringPolicy::ValueAsPoints => "value",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tiered" | "tier" => Some(ScoringPolicy::Tiered),
            "value" | "value_as_points" | "dollars" => Some(ScoringPolicy::ValueAsPoints),
            _ => None,
        }
    }

    pub fn score_for_addition(&self) -> u64 {
        score_for_addition()
    }

    pub fn score_for_consumption(&self, days_left: i64, proportional_value: f64) -> u64 {
        match self {
            ScoringPolicy::Tiered => score_for_consumption(days_left),
            ScoringPolicy::ValueAsPoints => score_for_value(proportional_value),
        }
    }

    pub fn score_for_custom_recipe(&self) -> u64 {
        score_for_custom_recipe()
    }
}

pub fn score_for_addition() -> u64 {
    ADDITION_POINTS
}

/// Tiered award: the closer to expiry, the bigger the reward
pub fn score_for_consumption(days_left_at_consumption: i64) -> u64 {
    if days_left_at_consumption <= 1 {
        LAST_MINUTE_POINTS
    } else if days_left_at_consumption <= 3 {
        SOON_POINTS
    } else {
        REGULAR_POINTS
    }
}

/// `floor(value)`, clamped at zero for non-finite or negative input
pub fn score_for_value(proportional_value: f64) -> u64 {
    if proportional_value.is_finite() && proportional_value > 0.0 {
        proportional_value.floor() as u64
    } else {
        0
    }
}

pub fn score_for_custom_recipe() -> u64 {
    CUSTOM_RECIPE_POINTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_awards() {
        assert_eq!(score_for_addition(), 10);
        assert_eq!(score_for_custom_recipe(), 25);
    }

    #[test]
    fn test_consumption_tiers() {
        assert_eq!(score_for_consumption(-2), 50);
        assert_eq!(score_for_consumption(0), 50);
        assert_eq!(score_for_consumption(1), 50);
        assert_eq!(score_for_consumption(2), 30);
        assert_eq!(score_for_consumption(3), 30);
        assert_eq!(score_for_consumption(4), 20);
        assert_eq!(score_for_consumption(60), 20);
    }

    #[test]
    fn test_value_policy() {
        let policy = ScoringPolicy::ValueAsPoints;
        assert_eq!(policy.score_for_consumption(0, 8.99), 8);
        assert_eq!(policy.score_for_consumption(30, 0.49), 0);
        assert_eq!(score_for_value(f64::NAN), 0);
        assert_eq!(policy.score_for_addition(), 10);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(ScoringPolicy::from_str("Tiered"), Some(ScoringPolicy::Tiered));
        assert_eq!(ScoringPolicy::from_str("value"), Some(ScoringPolicy::ValueAsPoints));
        assert_eq!(ScoringPolicy::from_str("random"), None);
    }
}
