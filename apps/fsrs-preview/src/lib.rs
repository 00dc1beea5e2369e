//! Command-line preview of FSRS scheduling decisions.
//!
//! Reads card and parameter documents as JSON and prints the scheduler's
//! answer as pretty JSON on stdout. Logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use fastrand::Rng;
use fsrs_core::{
    CardState, Fsrs, ParamsOverride, Rating, SchedulerParams, SpacedRepetitionAlgorithm,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Preview FSRS review schedules for vocabulary cards
#[derive(Debug, Parser)]
#[command(name = "fsrs-preview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Scheduler parameter document (JSON); built-in defaults when absent
    #[arg(long, env = "FSRS_PARAMS", global = true)]
    pub params: Option<PathBuf>,

    /// Disable interval fuzzing
    #[arg(long, global = true)]
    pub no_fuzz: bool,

    /// Seed for the fuzz random source
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a fresh card due now
    Init,

    /// Apply one rating to a card
    Review {
        /// Card state document (JSON)
        card: PathBuf,
        /// again, hard, good, easy or 1-4
        rating: Rating,
    },

    /// Show the outcome of every rating
    Preview {
        /// Card state document (JSON)
        card: PathBuf,
    },

    /// Show difficulty band, recall probability and per-rating forecast
    Advice {
        /// Card state document (JSON)
        card: PathBuf,
    },

    /// Print the resolved scheduler parameters
    Params,
}

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let output = execute(&cli, Utc::now())?;
    println!("{output}");
    Ok(())
}

/// Run a parsed command at `now` and render its JSON output.
pub fn execute(cli: &Cli, now: DateTime<Utc>) -> anyhow::Result<String> {
    let params = load_params(cli.params.as_deref(), cli.no_fuzz)?;
    let fsrs = Fsrs::new(params);
    let mut rng = match cli.seed {
        Some(seed) => Rng::with_seed(seed),
        None => Rng::new(),
    };

    let json = match &cli.command {
        Command::Init => serde_json::to_string_pretty(&fsrs.init_card(now))?,
        Command::Review { card, rating } => {
            let card = load_card(card)?;
            let next = fsrs.schedule(&card, *rating, now, &mut rng);
            tracing::info!(
                rating = %rating,
                status = %next.status,
                scheduled_days = next.scheduled_days,
                "reviewed card"
            );
            serde_json::to_string_pretty(&next)?
        }
        Command::Preview { card } => {
            let card = load_card(card)?;
            serde_json::to_string_pretty(&fsrs.next_states(&card, now, &mut rng))?
        }
        Command::Advice { card } => {
            let card = load_card(card)?;
            serde_json::to_string_pretty(&fsrs.study_advice(&card, now, &mut rng))?
        }
        Command::Params => serde_json::to_string_pretty(fsrs.params())?,
    };
    Ok(json)
}

/// Resolve parameters from an optional document, then apply command-line overrides.
pub fn load_params(path: Option<&Path>, no_fuzz: bool) -> anyhow::Result<SchedulerParams> {
    let base = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let params: SchedulerParams = serde_json::from_str(&content)
                .with_context(|| format!("invalid scheduler parameters in {}", path.display()))?;
            tracing::info!("Loaded scheduler parameters from {}", path.display());
            params
        }
        None => SchedulerParams::default(),
    };

    let overrides = no_fuzz.then(|| ParamsOverride {
        enable_fuzz: Some(false),
        ..Default::default()
    });
    Ok(SchedulerParams::resolve(&base, overrides.as_ref())?)
}

/// Read and validate a card state document.
pub fn load_card(path: &Path) -> anyhow::Result<CardState> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let card: CardState = serde_json::from_str(&content)
        .with_context(|| format!("invalid card state in {}", path.display()))?;
    card.validate()
        .with_context(|| format!("card state out of range in {}", path.display()))?;
    Ok(card)
}
