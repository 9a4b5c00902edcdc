//! FoodSaver
//!
//! An MCP server for pantry inventory, expiry tracking and food waste analytics.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use foodsaver::build_info;
use foodsaver::config::Config;
use foodsaver::db::Database;
use foodsaver::mcp::FoodSaverService;
use foodsaver::recipes::{MealDbClient, RecipeSource};
use foodsaver::tools::Pantry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("foodsaver=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    eprintln!("Database path: {}", config.database_path.display());

    eprintln!("Initializing database...");
    let database = Database::open(&config.database_path)?;

    let pantry = Pantry::load(database, config.scoring_policy)?;
    let recipe_source: Arc<dyn RecipeSource> = Arc::new(MealDbClient::new(config.recipe_api_url.clone())?);

    let service = FoodSaverService::new(&config, pantry, recipe_source);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
