use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::config::ScoringConfig;
use crate::workflows::stability::{
    CandidateContract, PromotionGap, StabilityRiskEngine, StabilitySinks, StabilitySources,
};
use crate::workflows::trust::memory::{
    InMemoryCandidates, InMemoryContracts, InMemoryPromotionGaps, InMemoryTrustEvents,
    InMemoryTrustProfiles,
};
use crate::workflows::trust::{
    CandidateId, CandidateProfile, FixedClock, PromotionGapSource, RepositoryError,
};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2026, 6, 1)
}

pub(super) fn contract(
    start: NaiveDate,
    end: Option<NaiveDate>,
    vessel_type: &str,
    rank: &str,
    company: &str,
) -> CandidateContract {
    CandidateContract {
        start_date: start,
        end_date: end,
        vessel_type: vessel_type.to_string(),
        rank: rank.to_string(),
        company: company.to_string(),
    }
}

/// Three bulk-carrier contracts of roughly 4, 5 and 4.5 months with one company.
pub(super) fn short_consistent_history() -> Vec<CandidateContract> {
    [(date(2023, 1, 1), 120), (date(2023, 8, 1), 150), (date(2024, 4, 1), 135)]
        .into_iter()
        .map(|(start, days)| {
            contract(
                start,
                Some(start + Duration::days(days)),
                "Bulk",
                "AB",
                "Blue Anchor",
            )
        })
        .collect()
}

/// Long, steady tanker and container service climbing the deck ladder.
pub(super) fn steady_history() -> Vec<CandidateContract> {
    vec![
        contract(date(2016, 1, 10), Some(date(2016, 10, 10)), "Tanker", "Third Officer", "Blue Anchor"),
        contract(date(2016, 12, 1), Some(date(2017, 9, 1)), "Tanker", "Third Officer", "Blue Anchor"),
        contract(date(2017, 11, 1), Some(date(2018, 8, 1)), "Container", "Second Officer", "Blue Anchor"),
        contract(date(2018, 10, 1), Some(date(2019, 7, 1)), "Container", "Second Officer", "Blue Anchor"),
        contract(date(2019, 9, 1), Some(date(2020, 6, 1)), "Tanker", "Chief Officer", "Blue Anchor"),
    ]
}

pub(super) fn candidate(id: &str, fleet_type: Option<&str>) -> CandidateProfile {
    CandidateProfile {
        id: CandidateId::new(id),
        full_name: "Ivan Petrov".to_string(),
        rank: Some("AB".to_string()),
        fleet_type: fleet_type.map(str::to_string),
    }
}

pub(super) struct Harness {
    pub(super) candidates: InMemoryCandidates,
    pub(super) contracts: InMemoryContracts,
    pub(super) gaps: InMemoryPromotionGaps,
    pub(super) profiles: InMemoryTrustProfiles,
    pub(super) events: InMemoryTrustEvents,
    pub(super) engine: StabilityRiskEngine,
}

impl Harness {
    pub(super) fn new(scoring: ScoringConfig) -> Self {
        let gaps = InMemoryPromotionGaps::default();
        Self::with_gap_source(scoring, gaps.clone(), Arc::new(gaps))
    }

    pub(super) fn with_gap_source(
        scoring: ScoringConfig,
        gaps: InMemoryPromotionGaps,
        source: Arc<dyn PromotionGapSource>,
    ) -> Self {
        let candidates = InMemoryCandidates::default();
        let contracts = InMemoryContracts::default();
        let profiles = InMemoryTrustProfiles::default();
        let events = InMemoryTrustEvents::default();

        let engine = StabilityRiskEngine::new(
            Arc::new(scoring),
            StabilitySources {
                candidates: Arc::new(candidates.clone()),
                contracts: Arc::new(contracts.clone()),
                promotion_gaps: source,
            },
            StabilitySinks {
                profiles: Arc::new(profiles.clone()),
                events: Arc::new(events.clone()),
            },
        )
        .with_clock(Arc::new(FixedClock::on(today())));

        Self {
            candidates,
            contracts,
            gaps,
            profiles,
            events,
            engine,
        }
    }

    pub(super) fn seed(&self, profile: CandidateProfile, history: Vec<CandidateContract>) {
        let id = profile.id.clone();
        self.candidates.insert(profile).expect("seed candidate");
        self.contracts.insert(id, history).expect("seed contracts");
    }

    pub(super) fn promotion_gap(&self, id: &str, gap_months: f64) {
        self.gaps
            .insert(
                CandidateId::new(id),
                PromotionGap {
                    gap_months: Some(gap_months),
                    at_top_rank: false,
                },
            )
            .expect("seed promotion gap");
    }
}

pub(super) struct BrokenPromotionCalculator;

impl PromotionGapSource for BrokenPromotionCalculator {
    fn promotion_gap(&self, _id: &CandidateId) -> Result<Option<PromotionGap>, RepositoryError> {
        Err(RepositoryError::Unavailable("promotion service timeout".to_string()))
    }
}
