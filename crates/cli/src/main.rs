use std::path::PathBuf;
use std::process;

use clap::Parser;

use facemerge_core::faces::infrastructure::json_face_store::JsonFaceStore;
use facemerge_core::faces::infrastructure::radius_matcher::RadiusMatcher;
use facemerge_core::optimize::optimize_observer::LogOptimizeObserver;
use facemerge_core::optimize::pair_merge_optimizer::PairMergeOptimizer;
use facemerge_core::optimize::pairing::PairingStrategy;
use facemerge_core::optimize::subject_groups::PairOrder;
use facemerge_core::shared::settings::OptimizerSettings;

/// Merge duplicate face records that belong to the same subject.
#[derive(Parser)]
#[command(name = "facemerge")]
struct Cli {
    /// JSON file holding the face records.
    #[arg(long)]
    store: PathBuf,

    /// Settings file (defaults to the user config directory).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Pairing strategy: greedy or maximum.
    #[arg(long)]
    strategy: Option<String>,

    /// Pair order inside a subject: id or fetched.
    #[arg(long)]
    order: Option<String>,

    /// Distance added to each face's sample radius when matching.
    #[arg(long)]
    match_dist: Option<f64>,

    /// Treat facial recognition as disabled.
    #[arg(long)]
    disabled: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;
    let settings = resolve_settings(&cli)?;

    log::info!(
        "Optimizing faces in {} (strategy {}, order {}, match dist {})",
        cli.store.display(),
        settings.strategy,
        settings.order,
        settings.match_dist
    );

    let store = JsonFaceStore::open(&cli.store)?;
    let matcher = RadiusMatcher::new(settings.match_dist);
    let strategy = settings.strategy;
    let order = settings.order;

    let mut optimizer = PairMergeOptimizer::new(
        Box::new(store),
        Box::new(matcher),
        Box::new(settings),
        Box::new(LogOptimizeObserver::new()),
    )
    .with_strategy(strategy)
    .with_order(order);

    // The observer logs the summary.
    optimizer.optimize()?;
    Ok(())
}

/// Settings file values, overridden by command-line flags.
fn resolve_settings(cli: &Cli) -> Result<OptimizerSettings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.settings {
        Some(path) => OptimizerSettings::load_from(path)?,
        None => OptimizerSettings::load(),
    };

    if let Some(strategy) = &cli.strategy {
        settings.strategy = strategy.parse::<PairingStrategy>()?;
    }
    if let Some(order) = &cli.order {
        settings.order = order.parse::<PairOrder>()?;
    }
    if let Some(match_dist) = cli.match_dist {
        settings.match_dist = match_dist;
    }
    if cli.disabled {
        settings.enabled = false;
    }

    if !settings.match_dist.is_finite() || settings.match_dist < 0.0 {
        return Err(format!(
            "Match distance must be a non-negative number, got {}",
            settings.match_dist
        )
        .into());
    }
    Ok(settings)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.store.exists() {
        return Err(format!("Face store not found: {}", cli.store.display()).into());
    }
    if let Some(path) = &cli.settings {
        if !path.exists() {
            return Err(format!("Settings file not found: {}", path.display()).into());
        }
    }
    Ok(())
}
