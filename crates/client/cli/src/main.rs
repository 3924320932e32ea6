//! Headless simulator entry point.
//!
//! Boots the runtime from a config directory, walks a few demo actors through
//! contaminated ground and saves state on exit.
mod config;
mod demo;
mod event_log;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::SimConfig;
use rad_content::ContentFactory;
use rad_runtime::{FileStateRepository, RosterOracle, Runtime, StorageFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimConfig::from_env();

    setup_logging(&config.log_dir)?;

    run(config).await
}

async fn run(config: SimConfig) -> Result<()> {
    let content = ContentFactory::new(&config.config_dir);
    content.ensure_default_config()?;
    let exposure = content.load_config()?.config;

    let data_dir = config.resolve_data_dir(&exposure.storage);
    let format = StorageFormat::from_config(&exposure.storage.format);
    let repository = FileStateRepository::new(&data_dir, format)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    tracing::info!(
        dir = %repository.base_dir().display(),
        format = %repository.format(),
        "Using state directory"
    );

    let check_period = Duration::from_millis(exposure.general.check_period_millis());
    let damage_threshold = exposure.damage.threshold;

    let oracle = RosterOracle::new();
    let mut walkers = demo::spawn_walkers(&oracle);

    let runtime = Runtime::builder()
        .exposure_config(exposure)
        .periodic_ticks(config.realtime)
        .repository(repository)
        .actors(oracle.clone())
        .build()
        .await?;
    let handle = runtime.handle();
    let loggers = event_log::spawn(&handle);

    demo::seed_sources(&handle).await?;
    for walker in &walkers {
        handle.refresh(walker.id).await?;
    }
    demo::pre_dose(&handle).await?;

    tracing::info!(ticks = config.ticks, realtime = config.realtime, "Simulation started");
    for tick in 1..=config.ticks {
        demo::step_walkers(&oracle, &mut walkers);

        if config.realtime {
            tokio::time::sleep(check_period).await;
        } else {
            let summary = handle.tick().await?;
            tracing::debug!(tick, ?summary, "tick");
        }

        if tick % 50 == 0 {
            demo::treat(&handle, &walkers, damage_threshold).await?;
        }
    }

    for walker in &walkers {
        let level = handle.exposure(walker.id).await?;
        tracing::info!(actor = %walker.id, level, "Final exposure");
        handle.release(walker.id).await?;
    }

    drop(handle);
    runtime.shutdown().await?;
    for logger in loggers {
        logger.await?;
    }

    Ok(())
}

/// Setup logging to both stderr and file
fn setup_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    // Setup file appender
    let file_appender = tracing_appender::rolling::never(log_dir, "rad-sim.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // Create env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(guard);

    tracing::info!("Log file: {}/rad-sim.log", log_dir.display());

    Ok(())
}
