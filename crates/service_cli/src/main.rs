//! Structured Pricer CLI - Command Line Pricing and Risk
//!
//! This is the operational entry point for the structured product pricer.
//!
//! # Commands
//!
//! - `structured-pricer catalog` - List the available products
//! - `structured-pricer price --product <id>` - Full Monte Carlo report
//! - `structured-pricer greeks --product <id>` - Greeks only
//! - `structured-pricer risk --product <id>` - Risk metrics and fair value
//! - `structured-pricer closed-form --product <id>` - Closed-form valuation
//! - `structured-pricer sweep --product <id> --parameter <name>` - Sensitivity curve
//!
//! # Architecture
//!
//! As part of the **S**ervice layer in the A-I-P-S architecture, this crate
//! orchestrates all other layers to provide a unified command-line interface.
//! Results are written to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::catalog::OutputFormat;
use commands::Session;
use config::{build_config, CliArgs};

/// Structured product pricing and risk CLI
#[derive(Parser)]
#[command(name = "structured-pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Product selection and run overrides shared by the product commands
#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Product id from the catalog
    #[arg(short, long)]
    product: String,

    /// Number of Monte Carlo paths
    #[arg(long)]
    paths: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Underlying spot
    #[arg(long)]
    spot: Option<f64>,

    /// Volatility
    #[arg(long)]
    vol: Option<f64>,

    /// Risk-free rate
    #[arg(long)]
    rate: Option<f64>,

    /// Dividend yield
    #[arg(long)]
    div: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog {
        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Price a product by Monte Carlo
    Price {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Compute Greeks
    Greeks {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Compute risk metrics
    Risk {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Closed-form valuation (vanillas and classic autocalls)
    ClosedForm {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Sweep one market parameter
    Sweep {
        #[command(flatten)]
        run: RunArgs,

        /// Parameter to sweep (volatility, rate, dividend_yield, spot)
        #[arg(long)]
        parameter: String,

        /// Half-width of the multiplier range
        #[arg(long)]
        range: Option<f64>,

        /// Number of sweep points
        #[arg(long)]
        steps: Option<usize>,
    },
}

impl Commands {
    fn run_args(&self) -> Option<&RunArgs> {
        match self {
            Commands::Catalog { .. } => None,
            Commands::Price { run }
            | Commands::Greeks { run }
            | Commands::Risk { run }
            | Commands::ClosedForm { run }
            | Commands::Sweep { run, .. } => Some(run),
        }
    }
}

fn cli_args(cli: &Cli) -> CliArgs {
    let mut args = CliArgs {
        config_file: cli.config.clone(),
        verbose: cli.verbose,
        ..Default::default()
    };
    if let Some(run) = cli.command.run_args() {
        args.n_paths = run.paths;
        args.seed = run.seed;
        args.spot = run.spot;
        args.volatility = run.vol;
        args.risk_free_rate = run.rate;
        args.dividend_yield = run.div;
    }
    args
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli_args(&cli))?;

    init_tracing(config.log_level.as_filter_str());
    info!(version = env!("CARGO_PKG_VERSION"), "structured-pricer");
    debug!(
        n_paths = config.simulation.n_paths,
        seed = ?config.simulation.seed,
        parallel = config.simulation.parallel,
        catalog = ?config.catalog,
        "configuration loaded"
    );

    let session = Session::new(config)?;

    match cli.command {
        Commands::Catalog { format } => commands::catalog::run(&session, format)?,
        Commands::Price { run } => commands::price::run(&session, &run.product)?,
        Commands::Greeks { run } => commands::greeks::run(&session, &run.product)?,
        Commands::Risk { run } => commands::risk::run(&session, &run.product)?,
        Commands::ClosedForm { run } => commands::closed_form::run(&session, &run.product)?,
        Commands::Sweep {
            run,
            parameter,
            range,
            steps,
        } => commands::sweep::run(&session, &run.product, &parameter, range, steps)?,
    }

    Ok(())
}
