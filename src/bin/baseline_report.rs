use chrono::{NaiveDate, Utc};
use dotenvy::dotenv;
use eyre::{Result, WrapErr};
use std::env;
use tracing::info;

use growth_model::baseline::estimate_baseline;
use growth_model::config;
use growth_model::db::db_manager::DbManager;
use growth_model::growth_model::compute;
use growth_model::logging;

/// Usage: baseline_report [YYYY-MM-DD]
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv()?;

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e.into());
    }

    let cfg = config::Config::load()?;
    let db_manager = DbManager::init(&cfg).await?;
    info!("Database manager initialized");

    let as_of = match env::args().nth(1) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .wrap_err_with(|| format!("invalid as-of date {raw:?}, expected YYYY-MM-DD"))?,
        None => Utc::now().date_naive(),
    };

    let input = estimate_baseline(&db_manager, as_of).await?;
    info!(
        monthly_budget = input.monthly_budget,
        target_cac = input.target_cac,
        expected_cvr = input.expected_cvr,
        avg_order_value = input.avg_order_value,
        cogs_percent = input.cogs_percent,
        return_rate = input.return_rate,
        avg_orders_per_customer = input.avg_orders_per_customer,
        monthly_traffic = ?input.monthly_traffic,
        "Baseline assumptions"
    );

    let output = compute(&input);
    output.log_summary();

    tokio::time::sleep(std::time::Duration::from_secs(1)).await; // Allow time for logging to flush
    Ok(())
}
