//! Posyandu engine CLI
//!
//! Evaluates JSON exports from the posyandu database: either a coverage
//! report for a set of children or the summary of one session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use posyandu::config::{self, Config, LoggingConfig};
use posyandu::models::{DoseRecord, Patient, Session, VaccineDefinition};
use posyandu::report::{immunization_matrix, CoverageReport, SessionSummary};
use posyandu::{Calculator, Catalog};

#[derive(Parser)]
#[command(name = "posyandu", about = "Immunization eligibility and coverage engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Configuration file; defaults to config/default plus POSYANDU_ENV overrides
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Vaccine status and coverage for every child in the export
    Status {
        #[arg(long)]
        input: PathBuf,
        /// Evaluation date, defaults to today (UTC)
        #[arg(long)]
        on: Option<NaiveDate>,
        /// Print the per-child matrix instead of the aggregate report
        #[arg(long)]
        matrix: bool,
    },
    /// Summary and lifecycle verdict for one session
    Session {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Deserialize)]
struct StatusInput {
    catalog: Vec<VaccineDefinition>,
    patients: Vec<Patient>,
    #[serde(default)]
    doses: Vec<DoseRecord>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .context("Failed to load configuration")?;

    init_tracing(&config.logging)?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Status { input, on, matrix } => run_status(&config, &input, on, matrix),
        Commands::Session { input } => run_session(&input),
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!(e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn run_status(config: &Config, input: &Path, on: Option<NaiveDate>, matrix: bool) -> Result<()> {
    let StatusInput {
        catalog,
        patients,
        doses,
    } = read_json(input)?;
    let catalog = Catalog::new(catalog).context("Vaccine catalog failed validation")?;
    let calculator = Calculator::new(config.engine.clone());
    let on = on.unwrap_or_else(|| Utc::now().date_naive());

    info!(patients = patients.len(), doses = doses.len(), %on, "evaluating immunization status");

    let output = if matrix {
        serde_json::to_string_pretty(&immunization_matrix(&calculator, &patients, &doses, &catalog, on))?
    } else {
        serde_json::to_string_pretty(&CoverageReport::build(&calculator, &patients, &doses, &catalog, on))?
    };
    println!("{}", output);
    Ok(())
}

fn run_session(input: &Path) -> Result<()> {
    let session: Session = read_json(input)?;
    let summary = SessionSummary::from_session(&session);
    info!(
        session_id = %summary.session_id,
        can_complete = summary.verdict.can_complete,
        locked = summary.verdict.is_locked,
        "session evaluated"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
