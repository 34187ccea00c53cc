use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use caffeine_pk::config::ScenarioConfig;
use caffeine_pk::output;
use caffeine_pk::session::run_session;

#[derive(Parser)]
#[command(name = "caffeine_pk")]
#[command(about = "Caffeine concentration simulation with threshold and bedtime analysis")]
struct Cli {
    /// Scenario file (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = ScenarioConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load scenario {:?}", cli.config))?;
    info!("Loaded scenario from {:?}", cli.config);

    let origin = config.origin()?;
    let schedule = config.build_schedule()?;
    let bedtime = config.bedtime_offset()?;

    let report = run_session(&config.profile, &schedule, &config.grid, bedtime)?;

    if let Some(verdict) = &report.bedtime {
        if verdict.exceeds_sleep_threshold {
            warn!(
                "Caffeine at bedtime is {:.2} mg/L, above the sleep disruption threshold",
                verdict.concentration
            );
        }
    }

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create output directory {:?}", cli.output))?;

    output::save_results(&report, origin, &cli.output)?;
    info!("Results saved to {:?}", cli.output);

    Ok(())
}
