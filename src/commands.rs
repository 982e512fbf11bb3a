use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::infra::{
    candidate_from_contracts, generic_questions, load_contracts, load_interview, parse_date,
    InputError,
};
use crew_trust::config::ScoringConfig;
use crew_trust::workflows::competency::{CompetencyEngine, CompetencySinks, CompetencySources};
use crew_trust::workflows::stability::{
    PromotionGap, StabilityRiskEngine, StabilitySinks, StabilitySources,
};
use crew_trust::workflows::trust::memory::{
    InMemoryAssessmentLog, InMemoryCandidates, InMemoryContracts, InMemoryInterviews,
    InMemoryPromotionGaps, InMemoryQuestionBank, InMemoryTrustEvents, InMemoryTrustProfiles,
};
use crew_trust::workflows::trust::{
    CandidateId, Clock, FixedClock, SystemClock, TrustEvent, TrustProfile, TrustProfileStore,
};

#[derive(Args, Debug)]
pub(crate) struct CompetencyArgs {
    /// Interview document: candidate, interview answers and an optional question bank
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Fleet profile to apply when the candidate has none
    #[arg(long)]
    pub(crate) fleet: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct StabilityArgs {
    /// Contract history CSV (start_date,end_date,vessel_type,rank,company)
    #[arg(long)]
    pub(crate) contracts: PathBuf,
    /// Candidate identifier recorded on the result
    #[arg(long)]
    pub(crate) candidate: String,
    /// Fleet profile used to resolve stability settings
    #[arg(long)]
    pub(crate) fleet: Option<String>,
    /// Months past (positive) or before (negative) the expected promotion
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) promotion_gap: Option<f64>,
    /// Candidate already holds the top rank on their ladder
    #[arg(long)]
    pub(crate) top_rank: bool,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// JSON document printed for every run.
#[derive(Debug, Serialize)]
struct RunReport<T: Serialize> {
    candidate_id: CandidateId,
    result: Option<T>,
    profile: Option<TrustProfile>,
    events: Vec<TrustEvent>,
}

pub(crate) fn run_competency(
    args: CompetencyArgs,
    scoring: ScoringConfig,
    default_fleet: Option<String>,
) -> Result<(), AppError> {
    let mut document = load_interview(&args.input)?;
    if document.candidate.fleet_type.is_none() {
        document.candidate.fleet_type = args.fleet.or(default_fleet);
    }
    let questions = if document.questions.is_empty() {
        generic_questions()
    } else {
        std::mem::take(&mut document.questions)
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let candidate_id = document.candidate.id.clone();
    let candidates = InMemoryCandidates::default();
    let interviews = InMemoryInterviews::default();
    interviews
        .insert(document.interview_record(clock.now()))
        .map_err(InputError::from)?;
    candidates
        .insert(document.candidate)
        .map_err(InputError::from)?;

    let profiles = InMemoryTrustProfiles::default();
    let events = InMemoryTrustEvents::default();
    let engine = CompetencyEngine::new(
        Arc::new(scoring),
        CompetencySources {
            candidates: Arc::new(candidates),
            interviews: Arc::new(interviews),
            questions: Arc::new(InMemoryQuestionBank::with_questions(questions)),
        },
        CompetencySinks {
            assessments: Arc::new(InMemoryAssessmentLog::default()),
            profiles: Arc::new(profiles.clone()),
            events: Arc::new(events.clone()),
        },
    )
    .with_clock(clock);

    let result = engine.compute(&candidate_id);
    if result.is_none() {
        warn!(candidate_id = %candidate_id, "no competency result produced");
    }
    render(RunReport {
        profile: profiles.fetch(&candidate_id).map_err(InputError::from)?,
        events: events.events(),
        candidate_id,
        result,
    })
}

pub(crate) fn run_stability(
    args: StabilityArgs,
    scoring: ScoringConfig,
    default_fleet: Option<String>,
) -> Result<(), AppError> {
    let history = load_contracts(&args.contracts)?;
    info!(contracts = history.len(), path = %args.contracts.display(), "contract history loaded");

    let candidate_id = CandidateId::new(args.candidate.trim());
    let fleet_type = args.fleet.or(default_fleet);
    let candidates = InMemoryCandidates::default();
    candidates
        .insert(candidate_from_contracts(&candidate_id, &history, fleet_type))
        .map_err(InputError::from)?;
    let contracts = InMemoryContracts::default();
    contracts
        .insert(candidate_id.clone(), history)
        .map_err(InputError::from)?;

    let gaps = InMemoryPromotionGaps::default();
    if args.promotion_gap.is_some() || args.top_rank {
        gaps.insert(
            candidate_id.clone(),
            PromotionGap {
                gap_months: args.promotion_gap,
                at_top_rank: args.top_rank,
            },
        )
        .map_err(InputError::from)?;
    }

    let clock: Arc<dyn Clock> = match args.today {
        Some(today) => Arc::new(FixedClock::on(today)),
        None => Arc::new(SystemClock),
    };
    let profiles = InMemoryTrustProfiles::default();
    let events = InMemoryTrustEvents::default();
    let engine = StabilityRiskEngine::new(
        Arc::new(scoring),
        StabilitySources {
            candidates: Arc::new(candidates),
            contracts: Arc::new(contracts),
            promotion_gaps: Arc::new(gaps),
        },
        StabilitySinks {
            profiles: Arc::new(profiles.clone()),
            events: Arc::new(events.clone()),
        },
    )
    .with_clock(clock);

    let result = engine.compute(&candidate_id);
    if result.is_none() {
        warn!(candidate_id = %candidate_id, "no stability result produced");
    }
    render(RunReport {
        profile: profiles.fetch(&candidate_id).map_err(InputError::from)?,
        events: events.events(),
        candidate_id,
        result,
    })
}

fn render<T: Serialize>(report: RunReport<T>) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(&report).map_err(AppError::Render)?;
    println!("{json}");
    Ok(())
}
