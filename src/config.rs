//! Runtime configuration
//!
//! Read once at startup from `FOODSAVER_*` environment variables.

use std::path::PathBuf;

use thiserror::Error;

use crate::inventory::ScoringPolicy;
use crate::recipes::mealdb::DEFAULT_BASE_URL;

pub const DEFAULT_ANALYTICS_WINDOW_DAYS: i64 = 30;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub recipe_api_url: String,
    pub analytics_window_days: i64,
    pub scoring_policy: ScoringPolicy,
}

/// `<project root>/data/foodsaver.db`, where the project root is found by
/// stepping out of `target/{debug,release}` when running from a build tree
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("foodsaver.db");
    path
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_path = get("FOODSAVER_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let recipe_api_url =
            get("FOODSAVER_RECIPE_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let analytics_window_days = match get("FOODSAVER_ANALYTICS_WINDOW_DAYS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if days > 0 => days,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        key: "FOODSAVER_ANALYTICS_WINDOW_DAYS",
                        value: raw,
                        reason: "must be positive".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "FOODSAVER_ANALYTICS_WINDOW_DAYS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_ANALYTICS_WINDOW_DAYS,
        };

        let scoring_policy = match get("FOODSAVER_SCORING") {
            Some(raw) => ScoringPolicy::from_str(&raw).ok_or_else(|| ConfigError::Invalid {
                key: "FOODSAVER_SCORING",
                value: raw.clone(),
                reason: "expected 'tiered' or 'value'".to_string(),
            })?,
            None => ScoringPolicy::default(),
        };

        Ok(Self {
            database_path,
            recipe_api_url,
            analytics_window_days,
            scoring_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.recipe_api_url, DEFAULT_BASE_URL);
        assert_eq!(config.analytics_window_days, 30);
        assert_eq!(config.scoring_policy, ScoringPolicy::Tiered);
        assert!(config.database_path.ends_with("data/foodsaver.db"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FOODSAVER_DATABASE_PATH", "/tmp/pantry.db"),
            ("FOODSAVER_RECIPE_API_URL", "http://localhost:8080"),
            ("FOODSAVER_ANALYTICS_WINDOW_DAYS", "14"),
            ("FOODSAVER_SCORING", "value"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/pantry.db"));
        assert_eq!(config.recipe_api_url, "http://localhost:8080");
        assert_eq!(config.analytics_window_days, 14);
        assert_eq!(config.scoring_policy, ScoringPolicy::ValueAsPoints);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("FOODSAVER_ANALYTICS_WINDOW_DAYS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FOODSAVER_ANALYTICS_WINDOW_DAYS", "abc")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FOODSAVER_SCORING", "random")])).is_err());
        // blank counts as unset
        let config = Config::from_lookup(lookup(&[("FOODSAVER_SCORING", " ")])).unwrap();
        assert_eq!(config.scoring_policy, ScoringPolicy::Tiered);
    }
}
