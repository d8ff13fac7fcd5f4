//! CLI configuration management
//!
//! Settings are layered, highest priority first:
//! 1. Command-line flags
//! 2. Environment variables (`PRICER_*`)
//! 3. TOML config file
//! 4. Default values

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::PricingError;
use pricer_pricing::greeks::GreeksConfig;
use pricer_pricing::mc::{MonteCarloConfig, DEFAULT_DAYS_PER_YEAR, DEFAULT_PATHS, MAX_PATHS};
use pricer_risk::sensitivity::SensitivityConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file read when `--config` is not given, if present
pub const DEFAULT_CONFIG_FILE: &str = "structured-pricer.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable {var}={value}: {reason}")]
    EnvError {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// `[market]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSection {
    pub spot: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub volatility: f64,
}

impl Default for MarketSection {
    fn default() -> Self {
        let market = MarketEnvironment::default();
        Self {
            spot: market.spot(),
            risk_free_rate: market.risk_free_rate(),
            dividend_yield: market.dividend_yield(),
            volatility: market.volatility(),
        }
    }
}

impl MarketSection {
    /// Build the validated market snapshot
    pub fn environment(&self) -> Result<MarketEnvironment, PricingError> {
        MarketEnvironment::new(
            self.spot,
            self.risk_free_rate,
            self.dividend_yield,
            self.volatility,
        )
    }
}

/// `[simulation]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    pub n_paths: usize,
    pub days_per_year: u32,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            n_paths: DEFAULT_PATHS,
            days_per_year: DEFAULT_DAYS_PER_YEAR,
            seed: None,
            parallel: true,
        }
    }
}

/// Full CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub log_level: LogLevel,
    /// Product catalog file; the embedded standard catalog when absent
    pub catalog: Option<PathBuf>,
    pub market: MarketSection,
    pub simulation: SimulationSection,
    pub greeks: GreeksConfig,
    pub sensitivity: SensitivityConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            catalog: None,
            market: MarketSection::default(),
            simulation: SimulationSection::default(),
            greeks: GreeksConfig::default(),
            sensitivity: SensitivityConfig::default(),
        }
    }
}

/// Overrides collected from the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_file: Option<PathBuf>,
    pub verbose: bool,
    pub n_paths: Option<usize>,
    pub seed: Option<u64>,
    pub spot: Option<f64>,
    pub volatility: Option<f64>,
    pub risk_free_rate: Option<f64>,
    pub dividend_yield: Option<f64>,
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `PRICER_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|var| std::env::var(var).ok())
    }

    /// Apply `PRICER_*` overrides read through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PRICER_N_PATHS") {
            self.simulation.n_paths = parse_env("PRICER_N_PATHS", &value)?;
        }
        if let Some(value) = lookup("PRICER_SEED") {
            self.simulation.seed = Some(parse_env("PRICER_SEED", &value)?);
        }
        if let Some(value) = lookup("PRICER_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&value)?;
        }
        if let Some(value) = lookup("PRICER_CATALOG") {
            self.catalog = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("PRICER_PARALLEL") {
            self.simulation.parallel = parse_env("PRICER_PARALLEL", &value.to_lowercase())?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) {
        if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
        if let Some(n_paths) = cli.n_paths {
            self.simulation.n_paths = n_paths;
        }
        if let Some(seed) = cli.seed {
            self.simulation.seed = Some(seed);
        }
        if let Some(spot) = cli.spot {
            self.market.spot = spot;
        }
        if let Some(volatility) = cli.volatility {
            self.market.volatility = volatility;
        }
        if let Some(rate) = cli.risk_free_rate {
            self.market.risk_free_rate = rate;
        }
        if let Some(dividend_yield) = cli.dividend_yield {
            self.market.dividend_yield = dividend_yield;
        }
    }

    /// Validate every section, reporting all problems at once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if let Err(e) = self.market.environment() {
            problems.push(format!("[market] {}", e));
        }
        if self.simulation.n_paths == 0 || self.simulation.n_paths > MAX_PATHS {
            problems.push(format!(
                "[simulation] n_paths must be in 1..={}, got {}",
                MAX_PATHS, self.simulation.n_paths
            ));
        }
        if self.simulation.days_per_year == 0 {
            problems.push("[simulation] days_per_year must be positive".to_string());
        }
        if let Err(e) = self.greeks.validate() {
            problems.push(format!("[greeks] {}", e));
        }
        if let Err(e) = self.sensitivity.validate() {
            problems.push(format!("[sensitivity] {}", e));
        }
        if self.sensitivity.n_paths == 0 || self.sensitivity.n_paths > MAX_PATHS {
            problems.push(format!(
                "[sensitivity] n_paths must be in 1..={}, got {}",
                MAX_PATHS, self.sensitivity.n_paths
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Market snapshot
    pub fn market_environment(&self) -> Result<MarketEnvironment, PricingError> {
        self.market.environment()
    }

    /// Monte Carlo settings for pricing and risk runs
    pub fn monte_carlo(&self) -> Result<MonteCarloConfig, PricingError> {
        Ok(MonteCarloConfig::builder()
            .n_paths(self.simulation.n_paths)
            .days_per_year(self.simulation.days_per_year)
            .maybe_seed(self.simulation.seed)
            .parallel(self.simulation.parallel)
            .build()?)
    }

    /// Greeks settings; bump-and-reprice runs use the `[simulation]` settings
    pub fn greeks_config(&self) -> Result<GreeksConfig, PricingError> {
        Ok(GreeksConfig {
            simulation: self.monte_carlo()?,
            ..self.greeks.clone()
        })
    }

    /// Sweep settings; the `[simulation]` seed, day count and threading
    /// apply unless the section sets its own seed
    pub fn sensitivity_config(&self) -> SensitivityConfig {
        SensitivityConfig {
            seed: self.sensitivity.seed.or(self.simulation.seed),
            days_per_year: self.simulation.days_per_year,
            parallel: self.simulation.parallel,
            ..self.sensitivity.clone()
        }
    }
}

fn parse_env<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvError {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Build configuration from all sources
///
/// An explicit `--config` file must exist; otherwise [`DEFAULT_CONFIG_FILE`]
/// is read when present and the defaults apply when it is not.
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    build_config_with_env(cli, |var| std::env::var(var).ok())
}

/// [`build_config`] with an explicit environment lookup
pub fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<CliConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                CliConfig::from_file(default_path)?
            } else {
                CliConfig::default()
            }
        }
    };

    config.apply_env_from(lookup)?;
    config.merge_with_cli(cli);
    config.validate()?;

    Ok(config)
}
