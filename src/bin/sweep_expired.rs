//! Utility to record every expired pantry item as waste
//!
//! Meant for a daily cron job so waste shows up in analytics even when
//! nobody marks expired items by hand.

use chrono::Local;
use tracing_subscriber::EnvFilter;

use foodsaver::config::Config;
use foodsaver::db::Database;
use foodsaver::tools::Pantry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("foodsaver=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    println!("Database path: {}", config.database_path.display());

    let database = Database::open(&config.database_path)?;
    let mut pantry = Pantry::load(database, config.scoring_policy)?;
    let result = pantry.sweep_expired(Local::now().naive_local())?;

    if result.events.is_empty() {
        println!("No expired items.");
        return Ok(());
    }

    for event in &result.events {
        println!(
            "  Wasted: {} ({} {}) - ${:.2}",
            event.item_name, event.quantity, event.unit, event.value
        );
    }
    println!(
        "Recorded {} expired item(s) as waste, ${:.2} total",
        result.items_wasted, result.total_value
    );

    Ok(())
}
