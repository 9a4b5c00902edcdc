//! Inventory lifecycle core
//!
//! Pure, synchronous components: expiry math, the inventory store with its
//! history ledger, scoring, analytics and recipe matching. Persistence and
//! network access live in the tools layer that wraps these.

pub mod analytics;
pub mod error;
pub mod expiry;
pub mod ledger;
pub mod matcher;
pub mod progress;
pub mod scoring;
pub mod store;

pub use analytics::{
    category_buckets, inventory_value, scalars, weekly_buckets, AnalyticsScalars,
    AnalyticsSnapshot, CategoryBucket, WeeklyBucket,
};
pub use error::{InventoryError, InventoryResult};
pub use expiry::{classify, days_left, expiration_label, needs_attention, ExpirySummary, Urgency};
pub use ledger::{EventQuery, HistoryLedger};
pub use matcher::{expiring_ingredient_queries, matching_ingredients, rank_by_overlap, RecipeMatch};
pub use progress::{Achievement, ProgressSummary};
pub use scoring::ScoringPolicy;
pub use store::{ConsumptionResult, InventoryStore};
