use cycle_engine::config::Configuration;
use cycle_engine::engine::CycleEngineBuilder;
use cycle_engine::error::AppError;
use cycle_engine::pipeline::types::{Cycle, FrameRecord, StatisticsSummary};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;

#[derive(Serialize)]
struct Report<'a> {
    cycles: &'a [Cycle],
    summary: StatisticsSummary,
}

fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn usage() -> AppError {
    AppError::MissingInput("usage: cycle-engine <frames.json> [config.toml]".to_string())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let mut args = std::env::args_os().skip(1);
    let frames_path = args.next().map(PathBuf::from).ok_or_else(usage)?;
    let config_path = args.next().map(PathBuf::from);

    let configuration = Configuration::load(config_path.as_deref())?;
    init_logging(&configuration.log_level);

    let content = tokio::fs::read_to_string(&frames_path).await?;
    let frames: Vec<FrameRecord> = serde_json::from_str(&content)?;
    tracing::info!("Loaded {} frames from {}", frames.len(), frames_path.display());

    let options = configuration.segmentation;
    let mut engine = CycleEngineBuilder::new(configuration).build()?;
    let mut cycles = engine.detect_cycles(&frames, options)?;

    // first repetition becomes the reference for the rest
    if options.use_golden_cycle {
        if let Some(first) = cycles.first().cloned() {
            engine.set_golden_cycle(first);
            cycles = engine.detect_cycles(&frames, options)?;
        }
    }

    let summary = engine.calculate_statistics(&cycles);
    let report = Report {
        cycles: &cycles,
        summary,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
