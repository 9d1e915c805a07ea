//! Command-line arguments for `site-planner`.

use std::path::PathBuf;

use bevy::log::Level;
use clap::Parser;

/// Run the planning pipeline on one scenario file and print its KPIs as JSON.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "site-planner", version, long_about = None)]
pub struct CliArgs {
    /// Scenario JSON file
    pub scenario: PathBuf,

    /// Planning config JSON (defaults apply to anything left out)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Replace the scenario's parcels by subdividing its boundary first
    #[arg(long)]
    pub subdivide: bool,

    /// Run the optimizer after scoring
    #[arg(long)]
    pub optimize: bool,

    /// Write a binary KPI snapshot to this path
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Log level on stderr: error, warn, info, debug or trace
    #[arg(long, default_value = "warn", value_parser = parse_level)]
    pub log_level: Level,
}

pub fn parse_level(value: &str) -> Result<Level, String> {
    match value.to_ascii_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(format!("unknown log level '{value}'")),
    }
}
