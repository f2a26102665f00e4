use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use crate::{EnergyConfig, EnergyService};

/// Number of trailing days to total
const DAYS_VAR: &str = "BLOCK_ENERGY_DAYS";
/// Optional block to report individually
const BLOCK_HASH_VAR: &str = "BLOCK_ENERGY_BLOCK_HASH";

/// Main entry point for the application.
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = EnergyConfig::from_env().context("invalid configuration")?;

    let days = dotenvy::var(DAYS_VAR)
        .unwrap_or_else(|_| "1".to_string())
        .trim()
        .parse::<i64>()
        .with_context(|| format!("{DAYS_VAR} must be an integer"))?;

    let service = EnergyService::connect(config)
        .await
        .context("failed to initialize energy service")?;

    if let Ok(block_hash) = dotenvy::var(BLOCK_HASH_VAR) {
        let energy = service.block_energy(block_hash.trim()).await;
        info!(block_hash = block_hash.trim(), energy = %energy, "Block energy");
    }

    let report = service.total_energy_report(days).await?;
    info!(
        days,
        total = %report.total,
        blocks = report.blocks,
        failed_days = report.failed_days,
        degraded_blocks = report.degraded_blocks,
        "Total energy"
    );

    let cache_stats = service.loader().cache_stats().await;
    info!(
        loader = %service.loader().stats(),
        cache = %cache_stats,
        "Run statistics"
    );

    Ok(())
}
