//! FoodSaver MCP Server Implementation
//!
//! Implements the MCP server with all pantry tools.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::inventory::Urgency;
use crate::models::{
    Category, CustomRecipeCreate, EventKind, FoodItem, FoodItemCreate, FoodItemUpdate,
    RecipeIngredient,
};
use crate::recipes::RecipeSource;
use crate::tools::analytics::{self, StoreSnapshot};
use crate::tools::pantry::FoodItemView;
use crate::tools::recipes;
use crate::tools::status::StatusTracker;
use crate::tools::{Pantry, PantryError, PantryResult};

/// FoodSaver MCP Service
#[derive(Clone)]
pub struct FoodSaverService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    /// Single writer; never held across an await
    pantry: Arc<std::sync::Mutex<Pantry>>,
    recipe_source: Arc<dyn RecipeSource>,
    analytics_window_days: i64,
    tool_router: ToolRouter<FoodSaverService>,
}

impl FoodSaverService {
    pub fn new(config: &Config, pantry: Pantry, recipe_source: Arc<dyn RecipeSource>) -> Self {
        let tracker = StatusTracker::new(
            config.database_path.clone(),
            pantry.store().policy(),
            config.recipe_api_url.clone(),
        );
        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            pantry: Arc::new(std::sync::Mutex::new(pantry)),
            recipe_source,
            analytics_window_days: config.analytics_window_days,
            tool_router: Self::tool_router(),
        }
    }

    fn with_pantry<T, F>(&self, f: F) -> Result<T, McpError>
    where
        F: FnOnce(&mut Pantry) -> PantryResult<T>,
    {
        let mut pantry = self
            .pantry
            .lock()
            .map_err(|e| pantry_error(PantryError::Lock(e.to_string())))?;
        f(&mut pantry).map_err(pantry_error)
    }

    /// Read-only access after reloading from disk, so writes made by other
    /// processes (the sweep job) are visible
    fn with_fresh_pantry<T, F>(&self, f: F) -> Result<T, McpError>
    where
        F: FnOnce(&Pantry) -> PantryResult<T>,
    {
        self.with_pantry(|pantry| {
            pantry.refresh()?;
            f(pantry)
        })
    }

    /// Copy of the live items so network calls run without the lock
    fn snapshot_items(&self) -> Result<Vec<FoodItem>, McpError> {
        self.with_fresh_pantry(|pantry| Ok(pantry.store().items().cloned().collect()))
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn pantry_error(e: PantryError) -> McpError {
    if e.is_invalid_request() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn parse_date(s: &str) -> Result<NaiveDate, McpError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        McpError::invalid_params(format!("Invalid date '{}', expected YYYY-MM-DD", s), None)
    })
}

fn parse_category(s: &str) -> Result<Category, McpError> {
    Category::from_str(s)
        .ok_or_else(|| McpError::invalid_params(format!("Unknown category: {}", s), None))
}

fn parse_optional<T>(
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    what: &str,
) -> Result<Option<T>, McpError> {
    match value {
        Some(s) => parse(s)
            .map(Some)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown {}: {}", what, s), None)),
        None => Ok(None),
    }
}

// ============================================================================
// Food Item Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodItemParams {
    pub name: String,
    /// Category key or display name, e.g. "dairy_eggs" or "Dairy & Eggs"
    pub category: Option<String>,
    pub quantity: f64,
    pub unit: String,
    /// YYYY-MM-DD
    pub expiration_date: String,
    /// Value of the whole quantity
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodItemsParams {
    pub category: Option<String>,
    /// expired, expires_today, expiring_soon, expiring_this_week or fresh
    pub urgency: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodItemIdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFoodItemParams {
    pub id: i64,
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub expiration_date: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConsumeFoodItemParams {
    pub id: i64,
    /// Amount used; omit to use the whole remaining quantity
    pub quantity: Option<f64>,
}

// ============================================================================
// Analytics Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetAnalyticsParams {
    /// Days of history for the weekly chart (default from configuration)
    pub window_days: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListHistoryParams {
    /// used or wasted
    pub kind: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize { 20 }

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRecipesParams {
    pub query: String,
    /// Search by main ingredient instead of recipe name
    #[serde(default)]
    pub by_ingredient: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MatchIngredientsParams {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParam {
    pub name: String,
    pub measure: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveCustomRecipeParams {
    pub name: String,
    pub ingredients: Vec<IngredientParam>,
    #[serde(default)]
    pub instructions: String,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl FoodSaverService {
    // --- Status ---

    #[tool(description = "Get the current status of the FoodSaver service including build info, database status, and process information")]
    async fn foodsaver_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get instructions for tracking pantry items, consumption and waste. Call this when starting a pantry session or when unsure how to use the tools.")]
    fn pantry_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PANTRY_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PANTRY_INSTRUCTIONS)]))
    }

    // --- Food Items ---

    #[tool(description = "Add a food item to the pantry. Price is the value of the whole quantity. Awards 10 points.")]
    fn add_food_item(&self, Parameters(p): Parameters<AddFoodItemParams>) -> Result<CallToolResult, McpError> {
        let data = FoodItemCreate {
            name: p.name,
            category: p.category.as_deref().map(parse_category).transpose()?,
            quantity: p.quantity,
            unit: p.unit,
            expiration_date: parse_date(&p.expiration_date)?,
            price: p.price,
        };
        let result = self.with_pantry(|pantry| pantry.add_item(data, now()))?;
        json_result(&result)
    }

    #[tool(description = "List pantry items sorted by expiration date, with optional category, urgency and name filters")]
    fn list_food_items(&self, Parameters(p): Parameters<ListFoodItemsParams>) -> Result<CallToolResult, McpError> {
        let category = parse_optional(p.category.as_deref(), Category::from_str, "category")?;
        let urgency = parse_optional(p.urgency.as_deref(), Urgency::from_str, "urgency")?;
        let today = now().date();
        let result = self.with_fresh_pantry(|pantry| {
            Ok(analytics::list_food_items(pantry.store(), category, urgency, p.search.as_deref(), today))
        })?;
        json_result(&result)
    }

    #[tool(description = "Get a pantry item with days left and urgency")]
    fn get_food_item(&self, Parameters(p): Parameters<FoodItemIdParams>) -> Result<CallToolResult, McpError> {
        let today = now().date();
        let result = self.with_fresh_pantry(|pantry| {
            let item = pantry.store().get(p.id)?.clone();
            Ok(FoodItemView::new(item, today))
        })?;
        json_result(&result)
    }

    #[tool(description = "Update any fields of a pantry item. Does not record history or award points.")]
    fn update_food_item(&self, Parameters(p): Parameters<UpdateFoodItemParams>) -> Result<CallToolResult, McpError> {
        let patch = FoodItemUpdate {
            name: p.name,
            category: p.category.as_deref().map(parse_category).transpose()?,
            quantity: p.quantity,
            unit: p.unit,
            expiration_date: p.expiration_date.as_deref().map(parse_date).transpose()?,
            price: p.price,
        };
        if patch.is_empty() {
            return Err(McpError::invalid_params("No fields to update", None));
        }
        let result = self.with_pantry(|pantry| pantry.edit_item(p.id, &patch, now()))?;
        json_result(&result)
    }

    #[tool(description = "Delete a pantry item without recording it as used or wasted (for entry mistakes)")]
    fn remove_food_item(&self, Parameters(p): Parameters<FoodItemIdParams>) -> Result<CallToolResult, McpError> {
        let removed = self.with_pantry(|pantry| pantry.remove_item(p.id))?;
        json_result(&serde_json::json!({ "success": true, "removed": removed }))
    }

    // --- Lifecycle ---

    #[tool(description = "Use some or all of a pantry item. Records a 'used' history event with the proportional value and awards points based on how close the item was to expiring.")]
    fn consume_food_item(&self, Parameters(p): Parameters<ConsumeFoodItemParams>) -> Result<CallToolResult, McpError> {
        let result = self.with_pantry(|pantry| pantry.consume_item(p.id, p.quantity, now()))?;
        json_result(&result)
    }

    #[tool(description = "Record an expired pantry item as waste (full remaining value) and remove it. Fails for items that have not expired.")]
    fn mark_expired_as_waste(&self, Parameters(p): Parameters<FoodItemIdParams>) -> Result<CallToolResult, McpError> {
        let result = self.with_pantry(|pantry| pantry.mark_expired(p.id, now()))?;
        json_result(&result)
    }

    #[tool(description = "Record every expired pantry item as waste and remove them")]
    fn sweep_expired_items(&self) -> Result<CallToolResult, McpError> {
        let result = self.with_pantry(|pantry| pantry.sweep_expired(now()))?;
        json_result(&result)
    }

    // --- Analytics ---

    #[tool(description = "Dashboard: item counts, expiring and expired items, potential loss, inventory value, score, and the most urgent items")]
    fn get_dashboard(&self) -> Result<CallToolResult, McpError> {
        let today = now().date();
        let result = self.with_fresh_pantry(|pantry| Ok(analytics::dashboard(pantry.store(), today)))?;
        json_result(&result)
    }

    #[tool(description = "Waste analytics: weekly and per-category wasted/saved value, totals and waste reduction ratio")]
    fn get_analytics(&self, Parameters(p): Parameters<GetAnalyticsParams>) -> Result<CallToolResult, McpError> {
        let window_days = p.window_days.unwrap_or(self.analytics_window_days);
        if window_days <= 0 {
            return Err(McpError::invalid_params("window_days must be positive", None));
        }
        let snapshot = self.with_fresh_pantry(|pantry| Ok(StoreSnapshot::take(pantry.store())))?;
        json_result(&analytics::analytics(&snapshot, window_days, now()))
    }

    #[tool(description = "List used/wasted history, newest first, with relative times")]
    fn list_history(&self, Parameters(p): Parameters<ListHistoryParams>) -> Result<CallToolResult, McpError> {
        let kind = parse_optional(p.kind.as_deref(), EventKind::from_str, "event kind")?;
        let category = parse_optional(p.category.as_deref(), Category::from_str, "category")?;
        let at = now();
        let result = self.with_fresh_pantry(|pantry| {
            Ok(analytics::list_history(pantry.store(), kind, category, p.limit, at))
        })?;
        json_result(&result)
    }

    #[tool(description = "Score, level, streak and achievements")]
    fn get_progress(&self) -> Result<CallToolResult, McpError> {
        let today = now().date();
        let result = self.with_fresh_pantry(|pantry| Ok(analytics::progress(pantry.store(), today)))?;
        json_result(&result)
    }

    // --- Recipes ---

    #[tool(description = "Suggest recipes that use items expiring within a week (or anything in the pantry if nothing is expiring), ranked by how many pantry items they use")]
    async fn suggest_recipes(&self) -> Result<CallToolResult, McpError> {
        let items = self.snapshot_items()?;
        let result = recipes::suggest_recipes(self.recipe_source.as_ref(), &items, now().date()).await;
        json_result(&result)
    }

    #[tool(description = "Search recipes by name or by main ingredient, badged with matching pantry items")]
    async fn search_recipes(&self, Parameters(p): Parameters<SearchRecipesParams>) -> Result<CallToolResult, McpError> {
        let items = self.snapshot_items()?;
        let result = recipes::search_recipes(self.recipe_source.as_ref(), &p.query, p.by_ingredient, &items)
            .await
            .map_err(|e| pantry_error(e.into()))?;
        json_result(&result)
    }

    #[tool(description = "Check which of a recipe's ingredients are in the pantry (case-insensitive, partial names match)")]
    fn match_recipe_ingredients(&self, Parameters(p): Parameters<MatchIngredientsParams>) -> Result<CallToolResult, McpError> {
        let items = self.snapshot_items()?;
        json_result(&recipes::match_ingredients(&items, &p.ingredients))
    }

    #[tool(description = "Save a user-authored recipe. Awards 25 points.")]
    fn save_custom_recipe(&self, Parameters(p): Parameters<SaveCustomRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = CustomRecipeCreate {
            name: p.name,
            ingredients: p
                .ingredients
                .into_iter()
                .map(|i| RecipeIngredient {
                    name: i.name.trim().to_string(),
                    measure: i.measure.unwrap_or_default().trim().to_string(),
                })
                .collect(),
            instructions: p.instructions,
        };
        let result = self.with_pantry(|pantry| pantry.save_custom_recipe(&data, now()))?;
        json_result(&result)
    }

    #[tool(description = "List saved custom recipes, newest first, badged with matching pantry items")]
    fn list_custom_recipes(&self) -> Result<CallToolResult, McpError> {
        let result = self.with_fresh_pantry(|pantry| {
            let items: Vec<FoodItem> = pantry.store().items().cloned().collect();
            let custom = pantry.list_custom_recipes()?;
            Ok(recipes::list_custom_recipes(custom, &items))
        })?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for FoodSaverService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "foodsaver".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FoodSaver".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FoodSaver - pantry inventory, expiry tracking and food waste analytics. \
                 IMPORTANT: Call pantry_instructions before the first pantry session. \
                 Items: add/list/get/update/remove_food_item. \
                 Lifecycle: consume_food_item (used), mark_expired_as_waste, sweep_expired_items (wasted). \
                 Insights: get_dashboard, get_analytics, list_history, get_progress. \
                 Recipes: suggest_recipes, search_recipes, match_recipe_ingredients, save_custom_recipe, list_custom_recipes."
                    .into(),
            ),
        }
    }
}
