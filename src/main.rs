//! ecoform - acoustic comfort decisions from the command line
//!
//! # Usage
//!
//! ```bash
//! # One dwelling, JSON in, JSON out
//! ecoform evaluate --input dwelling.json --dataset acoustic_data.csv
//!
//! # Read the request from stdin and try a direct dataset hit first
//! echo '{"zone": "Roadside-V1", "apartment_type": "2Bed"}' | ecoform evaluate --input - --dataset-first
//!
//! # Many dwellings, one JSON object per line
//! ecoform batch --input dwellings.jsonl
//!
//! # Configuration
//! ecoform check-config --config ecoform.toml
//! ecoform dump-config > ecoform.toml
//! ```
//!
//! # Environment Variables
//!
//! - `ECOFORM_CONFIG`: Path to the engine configuration TOML
//! - `ECOFORM_DATASET`: Path to the historical dataset CSV
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ecoform_engine::config::validation::{validate_physical_ranges, validate_unknown_keys};
use ecoform_engine::config::defaults::{CONFIG_ENV_VAR, LOCAL_CONFIG_FILE};
use ecoform_engine::{
    CsvDataset, DatasetFirstEngine, DecisionEngine, DecisionResult, DwellingContext, EngineConfig,
    EngineError, HistoricalDataset, LinearComfortModel, UnavailableDataset,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "ecoform")]
#[command(about = "Ecoform Residential Acoustic Comfort Decision Engine")]
#[command(version)]
struct CliArgs {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Args, Debug)]
struct EngineArgs {
    /// Historical dataset CSV (overrides [dataset].path)
    #[arg(long, env = "ECOFORM_DATASET")]
    dataset: Option<PathBuf>,

    /// Engine configuration TOML (default: $ECOFORM_CONFIG, ./ecoform.toml, built-in)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Score a direct exact dataset match before running full inference
    #[arg(long)]
    dataset_first: bool,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Decide on one dwelling described by a JSON object
    Evaluate {
        /// JSON file, or "-" for stdin
        #[arg(long)]
        input: String,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Decide on many dwellings, one JSON object per line
    Batch {
        /// JSONL file, or "-" for stdin
        #[arg(long)]
        input: String,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Report unknown keys and range problems in a configuration file
    CheckConfig {
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the built-in configuration as TOML
    DumpConfig,
}

// ============================================================================
// Engine Setup
// ============================================================================

enum Runner {
    Full(DecisionEngine),
    DatasetFirst(DatasetFirstEngine),
}

impl Runner {
    fn decide(&self, ctx: &DwellingContext) -> Result<DecisionResult, EngineError> {
        match self {
            Runner::Full(engine) => engine.decide(ctx),
            Runner::DatasetFirst(engine) => engine.decide(ctx),
        }
    }

    fn decide_batch(&self, contexts: &[DwellingContext]) -> Vec<Result<DecisionResult, EngineError>> {
        match self {
            Runner::Full(engine) => engine.decide_batch(contexts),
            Runner::DatasetFirst(engine) => engine.decide_batch(contexts),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load_from_file(p)
            .with_context(|| format!("Failed to load configuration from {}", p.display())),
        None => Ok(EngineConfig::load()),
    }
}

fn build_runner(args: &EngineArgs) -> Result<Runner> {
    let config = Arc::new(load_config(args.config.as_deref())?);

    let dataset_path = args.dataset.clone().or_else(|| config.dataset.path.clone());
    let dataset: Arc<dyn HistoricalDataset> = match dataset_path {
        Some(path) => match CsvDataset::open(&path) {
            Ok(csv) => Arc::new(csv),
            Err(e) => {
                warn!(
                    dataset = %path.display(),
                    error = %e,
                    "Dataset unavailable, every decision will use the physics fallback"
                );
                Arc::new(UnavailableDataset::new(e.to_string()))
            }
        },
        None => {
            warn!("No dataset configured, every decision will use the physics fallback");
            Arc::new(UnavailableDataset::default())
        }
    };

    let predictor = Arc::new(LinearComfortModel::from_config(&config.predictor));

    Ok(if args.dataset_first {
        Runner::DatasetFirst(DatasetFirstEngine::new(config, dataset, predictor))
    } else {
        Runner::Full(DecisionEngine::new(config, dataset, predictor))
    })
}

// ============================================================================
// Input
// ============================================================================

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

fn parse_context(text: &str) -> Result<DwellingContext> {
    let value: Value = serde_json::from_str(text).context("Input is not valid JSON")?;
    let Value::Object(map) = value else {
        bail!("Input must be a JSON object");
    };
    Ok(DwellingContext::from_raw(&map)?)
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_evaluate(input: &str, args: &EngineArgs) -> Result<()> {
    let runner = build_runner(args)?;
    let ctx = parse_context(&read_input(input)?)?;
    let result = runner.decide(&ctx)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_batch(input: &str, args: &EngineArgs) -> Result<()> {
    let runner = build_runner(args)?;
    let text = read_input(input)?;

    // Parse errors keep their line slot so output lines up with input
    let mut parsed: Vec<(usize, Result<DwellingContext, String>)> = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        parsed.push((idx + 1, parse_context(line).map_err(|e| format!("{e:#}"))));
    }

    let contexts: Vec<DwellingContext> = parsed
        .iter()
        .filter_map(|(_, r)| r.as_ref().ok().cloned())
        .collect();
    let mut decisions = runner.decide_batch(&contexts).into_iter();

    let mut failed = 0usize;
    for (line, entry) in parsed {
        let output = match entry {
            Ok(_) => match decisions.next() {
                Some(Ok(result)) => serde_json::to_value(&result)?,
                Some(Err(e)) => {
                    failed += 1;
                    json!({ "line": line, "error": e.to_string() })
                }
                None => bail!("Batch produced fewer results than inputs"),
            },
            Err(e) => {
                failed += 1;
                json!({ "line": line, "error": e })
            }
        };
        println!("{}", serde_json::to_string(&output)?);
    }

    info!(decided = contexts.len(), failed, "Batch finished");
    Ok(())
}

fn run_check_config(path: Option<PathBuf>) -> Result<()> {
    let path = path
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let unknown = validate_unknown_keys(&raw);
    for w in &unknown {
        println!("warning: {w}");
    }

    let config: EngineConfig =
        toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))?;
    let (_, range_warnings) = validate_physical_ranges(&config);
    for w in &range_warnings {
        println!("warning: {w}");
    }

    config
        .validate()
        .with_context(|| format!("{} is not a usable configuration", path.display()))?;

    println!(
        "{}: OK ({} warning{})",
        path.display(),
        unknown.len() + range_warnings.len(),
        if unknown.len() + range_warnings.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

fn run_dump_config() -> Result<()> {
    print!("{}", EngineConfig::default().to_toml()?);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    match args.command {
        SubCommand::Evaluate { input, engine } => run_evaluate(&input, &engine),
        SubCommand::Batch { input, engine } => run_batch(&input, &engine),
        SubCommand::CheckConfig { config } => run_check_config(config),
        SubCommand::DumpConfig => run_dump_config(),
    }
}
