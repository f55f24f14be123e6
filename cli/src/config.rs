//! `RunConfig` (C0): the TOML-loaded process configuration tying the
//! catalog paths, the evaluation server's API key and base URL, and the
//! engine's tunables together (§4.8 `[FULL]`). Grounded on the pack's
//! `gat-tui` config-loader convention: a plain `serde`-derived struct,
//! `#[serde(default)]` fields backed by the engine's own `Default`
//! impls, with an environment-variable override for the one secret.

use anyhow::{Context, Result};
use kitctl_core::costs::PenaltyRates;
use kitctl_core::horizon::HorizonConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const API_KEY_ENV_VAR: &str = "ROTABLE_API_KEY";

fn default_round_budget_ms() -> u64 {
    5_000
}

fn default_optimizer_deadline_ms() -> u64 {
    2_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPathsConfig {
    pub airports: PathBuf,
    pub aircraft_types: PathBuf,
    pub flight_plan: PathBuf,
    pub kit_classes: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Left unset in checked-in config; normally supplied via
    /// `ROTABLE_API_KEY` so the key never lands in a committed file.
    #[serde(default)]
    pub api_key: Option<String>,
    pub server_base_url: String,
    pub catalog: CatalogPathsConfig,
    #[serde(default = "default_round_budget_ms")]
    pub round_budget_ms: u64,
    #[serde(default = "default_optimizer_deadline_ms")]
    pub optimizer_deadline_ms: u64,
    #[serde(default)]
    pub rng_seed: u64,
    #[serde(default)]
    pub penalty_rates: PenaltyRates,
    #[serde(default)]
    pub horizon: HorizonConfig,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading run config from {}", path.display()))?;
        let mut config: RunConfig =
            toml::from_str(&raw).with_context(|| format!("parsing run config at {}", path.display()))?;
        if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
            config.api_key = Some(key);
        }
        Ok(config)
    }

    /// The API key to present to the evaluation server, preferring a
    /// config-file value that `ROTABLE_API_KEY` has already overridden.
    pub fn resolved_api_key(&self) -> Result<String> {
        self.api_key.clone().ok_or_else(|| {
            anyhow::anyhow!("no api_key in the run config and {API_KEY_ENV_VAR} is not set")
        })
    }
}

/// `$XDG_CONFIG_HOME/kitctl/config.toml` (or the platform equivalent),
/// matching the pack's `dirs`-resolved config path convention.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("kitctl").join("config.toml")
}
