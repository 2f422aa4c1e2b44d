//! Flood Triage - batch classifier
//!
//! Reads an hourly weather export and reports:
//! 1. Rescue-skill advisories per location and hour
//! 2. Locations flooded by 24h rainfall
//! 3. Locations flooded by a river, downstream of a rain flood on it
//!
//! Usage:
//!   cargo run --release -- weather.csv
//!   cargo run --release -- weather.csv -c flood.toml -t 40 -r 750
//!   cargo run --release -- weather.csv --json > report.json
//!
//! Status goes to stderr; the report goes to stdout.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

use flood_triage::analysis::classifier::classify;
use flood_triage::config::{DEFAULT_CONFIG_PATH, FloodConfig};
use flood_triage::ingest::observations::load_observations;
use flood_triage::ingest::overpass::load_river;
use flood_triage::logging::{init_logger, level_for_verbosity};
use flood_triage::report::{render_json, render_text};
use flood_triage::river::RiverModel;
use flood_triage::rules::SkillRuleTable;

#[derive(Parser, Debug)]
#[command(
    name = "flood_triage",
    version,
    about = "Classify rain and river floods from hourly weather observations"
)]
struct Cli {
    /// Hourly weather export (CSV)
    file: PathBuf,

    /// Configuration file; defaults apply if the default path is absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 24h rainfall at or above which a location is flooded
    #[arg(short = 't', long)]
    rain_threshold: Option<f64>,

    /// Maximum distance (projected units) for a location to count as near a river
    #[arg(short = 'r', long)]
    river_margin: Option<f64>,

    /// Rain-to-skill table, overriding the configured one
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// Append log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Timestamped console log lines
    #[arg(long)]
    timestamps: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(cli: &Cli) -> Result<FloodConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => FloodConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => FloodConfig::load(DEFAULT_CONFIG_PATH)?,
        None => {
            log::warn!("No {} found; using defaults with no rivers", DEFAULT_CONFIG_PATH);
            FloodConfig::default()
        }
    };

    if let Some(t) = cli.rain_threshold {
        config.rain_threshold = t;
    }
    if let Some(r) = cli.river_margin {
        config.river_margin = r;
    }
    if let Some(rules) = &cli.rules {
        config.skill_table = Some(rules.clone());
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    let utm = config.utm();

    let rivers = config
        .rivers
        .iter()
        .map(|source| load_river(&source.name, &source.geometry, &utm))
        .collect::<Result<Vec<RiverModel>, _>>()?;

    let rules = match &config.skill_table {
        Some(path) => SkillRuleTable::load(path)?,
        None => {
            log::warn!("No rain-to-skill table configured; no advisories will be produced");
            SkillRuleTable::default()
        }
    };

    let observations = load_observations(&cli.file)?;
    let report = classify(observations, config.classifier(), &rivers, &rules, &utm)?;

    if cli.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logger(
        level_for_verbosity(cli.verbose),
        cli.log_file.as_deref(),
        cli.timestamps,
    ) {
        eprintln!("❌ Logger setup failed: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        log::logger().flush();
        process::exit(1);
    }
}
