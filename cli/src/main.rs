//! `kitctl`: the binary that wires `RunConfig`, the static catalog, the
//! HTTP `EvaluationClient` and the round orchestrator together and runs
//! the 720-hour session (§4.8 `[FULL]`). Grounded on the pack's
//! `gat-cli` split between a `clap`-derived `Cli`/`Commands` pair and a
//! thin `main` that converts everything to `anyhow::Result`.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::RunConfig;
use kitctl_core::catalog::{self, CatalogPaths};
use kitctl_core::orchestrator::{OrchestratorConfig, RoundOrchestrator};
use kitctl_core::transport::http::HttpEvaluationClient;
use kitctl_core::StaticCatalog;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kitctl", author, version, about = "Rotable kit logistics decision engine", long_about = None)]
struct Cli {
    /// Path to the TOML run configuration. Defaults to the OS config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the 720-hour session to completion against the evaluation server.
    Run,
    /// Load the static catalog only and report defaults/warnings, without starting a session.
    ValidateCatalog,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_catalog(run_config: &RunConfig) -> Result<StaticCatalog> {
    let paths = CatalogPaths {
        airports: &run_config.catalog.airports,
        aircraft_types: &run_config.catalog.aircraft_types,
        flight_plan: &run_config.catalog.flight_plan,
        kit_classes: &run_config.catalog.kit_classes,
    };
    catalog::load_from_csv(paths).context("loading static catalog")
}

fn validate_catalog(run_config: &RunConfig) -> Result<()> {
    let catalog = load_catalog(run_config)?;
    let airports = catalog.all_airports().count();
    let flights = catalog.all_flights().count();
    tracing::info!(airports, flights, hub = catalog.hub_code(), "catalog loaded successfully");
    println!("catalog OK: {airports} airports, {flights} flights, hub={}", catalog.hub_code());
    Ok(())
}

fn run(run_config: &RunConfig) -> Result<()> {
    let catalog = load_catalog(run_config)?;
    let api_key = run_config.resolved_api_key()?;
    let client = HttpEvaluationClient::new(run_config.server_base_url.clone());
    let orchestrator_config = OrchestratorConfig {
        api_key,
        rng_seed: run_config.rng_seed,
        round_budget: Duration::from_millis(run_config.round_budget_ms),
        optimizer_deadline: Duration::from_millis(run_config.optimizer_deadline_ms),
        penalty_rates: run_config.penalty_rates,
        horizon: run_config.horizon,
    };
    let mut orchestrator = RoundOrchestrator::new(client, catalog, orchestrator_config);
    orchestrator.start().context("starting session")?;
    orchestrator.run_to_completion().context("running session to completion")?;
    tracing::info!(state = ?orchestrator.state(), "session finished");
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let run_config =
        RunConfig::load(&config_path).with_context(|| format!("loading run config from {}", config_path.display()))?;

    match cli.command {
        Commands::Run => run(&run_config),
        Commands::ValidateCatalog => validate_catalog(&run_config),
    }
}
