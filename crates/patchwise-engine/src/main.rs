//! Batch binary for the Patchwise farming planner.
//!
//! Loads configuration and crop data, runs the configured calculation, and
//! prints the result as pretty JSON on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the first argument, or `patchwise.yaml`
//! 3. Load the crop registry from `registry_path`, or the bundled data
//! 4. Run the configured job (progression, quantity, or level)
//! 5. Print the plan

mod error;

use std::path::{Path, PathBuf};

use patchwise_core::{Planner, PlannerConfig};
use patchwise_crops::{CropRegistry, default_registry};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Config file read when no path is given.
const DEFAULT_CONFIG: &str = "patchwise.yaml";

/// Application entry point for the planner.
///
/// # Errors
///
/// Returns an error if configuration, crop data, or the calculation fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("patchwise-engine starting");

    // 2. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let config = load_config(&config_path)?;
    info!(
        skill_level = config.planner.skill_level,
        compost = ?config.planner.compost,
        strategy = ?config.planner.strategy,
        search_mode = ?config.planner.search_mode,
        "Configuration loaded"
    );

    // 3. Load crop data.
    let registry = load_registry(&config)?;
    info!(
        crops = registry.crop_count(),
        purchasables = registry.purchasable_count(),
        "Crop registry loaded"
    );

    // 4. Run the job.
    let mut planner = Planner::new(&registry).with_solver(config.planner.solver());
    let output = run_job(&mut planner, &config)?;

    // 5. Print the plan.
    println!("{output}");
    info!(
        cache_entries = planner.cache().len(),
        cache_hits = planner.cache().hits(),
        cache_misses = planner.cache().misses(),
        "patchwise-engine finished"
    );

    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<PlannerConfig, EngineError> {
    if path.exists() {
        let config = PlannerConfig::from_file(path)?;
        Ok(config)
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = PlannerConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Load the crop registry named by the config, or the bundled data.
fn load_registry(config: &PlannerConfig) -> Result<CropRegistry, EngineError> {
    match &config.registry_path {
        Some(path) => {
            info!(path = %path.display(), "Loading crop registry");
            Ok(CropRegistry::from_file(path)?)
        }
        None => Ok(default_registry()?),
    }
}

/// Run the configured job and render its result.
fn run_job(planner: &mut Planner<'_>, config: &PlannerConfig) -> Result<String, EngineError> {
    if let Some(request) = config.job.resolve_request(&config.planner) {
        info!(crop = %request.target, quantity = request.quantity, "Resolving quantity");
        let plan = planner.resolve(&request)?;
        return Ok(serde_json::to_string_pretty(&plan)?);
    }
    if let Some(request) = config.job.level_request(&config.planner) {
        info!(
            crop = %request.target,
            start = request.starting_level,
            target = request.target_level,
            "Solving level target"
        );
        let plan = planner.solve_for_level(&request)?;
        return Ok(serde_json::to_string_pretty(&plan)?);
    }

    let options = config.progression_options();
    info!(
        start = options.start_level,
        target = options.target_level,
        excluded = options.excluded_categories.len(),
        "Planning progression"
    );
    let plan = planner.plan_progression(&options)?;
    Ok(serde_json::to_string_pretty(&plan)?)
}
