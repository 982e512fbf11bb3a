use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{run_competency, run_stability, CompetencyArgs, StabilityArgs};
use crate::error::AppError;
use crew_trust::config::{AppConfig, ScoringSource};
use crew_trust::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "crew-trust",
    about = "Explainable competency and stability scoring for crew candidates",
    version
)]
struct Cli {
    /// Scoring document (JSON). Overrides CREW_TRUST_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a completed interview document
    Competency(CompetencyArgs),
    /// Score a contract history CSV for stability and risk
    Stability(StabilityArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let source = ScoringSource {
        document: cli.config.or(config.scoring.document),
        default_fleet: config.scoring.default_fleet,
        require_document: config.scoring.require_document,
    };
    let scoring = source.load()?;

    match cli.command {
        Command::Competency(args) => run_competency(args, scoring, source.default_fleet),
        Command::Stability(args) => run_stability(args, scoring, source.default_fleet),
    }
}
