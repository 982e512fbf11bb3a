use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::decay::{TemporalDecay, TemporalDecayCalculator};
use super::diversity::{VesselDiversity, VesselDiversityCalculator};
use super::domain::{ContractPatternSignals, RankProgressionSignals};
use super::index::{StabilityIndex, StabilityIndexCalculator};
use super::patterns::{
    ContractPatternAnalyzer, LadderRankAnalyzer, RankProgressionAnalyzer, TimelinePatternAnalyzer,
};
use super::promotion::{PromotionContext, PromotionContextAnalyzer};
use super::risk::{FactorBreakdown, RiskFactor, RiskInputs, RiskScoreCalculator, RiskTier, RiskTierResolver};
use crate::config::ScoringConfig;
use crate::workflows::fault::{fail_open, ComputationError};
use crate::workflows::trust::{
    CandidateDirectory, CandidateId, Clock, ContractHistory, PromotionGapSource, SystemClock,
    TrustEvent, TrustEventKind, TrustEventLog, TrustProfilePatch, TrustProfileStore,
};

#[derive(Clone)]
pub struct StabilitySources {
    pub candidates: Arc<dyn CandidateDirectory>,
    pub contracts: Arc<dyn ContractHistory>,
    pub promotion_gaps: Arc<dyn PromotionGapSource>,
}

#[derive(Clone)]
pub struct StabilitySinks {
    pub profiles: Arc<dyn TrustProfileStore>,
    pub events: Arc<dyn TrustEventLog>,
}

/// Full, auditable result of one stability computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityOutcome {
    pub candidate_id: CandidateId,
    pub fleet_type: Option<String>,
    pub contract_count: usize,
    pub stability_index: StabilityIndex,
    pub contract_patterns: ContractPatternSignals,
    pub rank_progression: RankProgressionSignals,
    pub promotion: PromotionContext,
    pub temporal_decay: TemporalDecay,
    pub vessel_diversity: VesselDiversity,
    pub inputs: RiskInputs,
    pub risk_score: f64,
    pub risk_tier: RiskTier,
    pub breakdown: BTreeMap<RiskFactor, FactorBreakdown>,
    pub computed_at: DateTime<Utc>,
}

/// Orchestrates one stability/risk computation per call. Fail-open: faults yield `None`.
pub struct StabilityRiskEngine {
    scoring: Arc<ScoringConfig>,
    sources: StabilitySources,
    sinks: StabilitySinks,
    patterns: Arc<dyn ContractPatternAnalyzer>,
    ranks: Arc<dyn RankProgressionAnalyzer>,
    clock: Arc<dyn Clock>,
}

impl StabilityRiskEngine {
    pub fn new(scoring: Arc<ScoringConfig>, sources: StabilitySources, sinks: StabilitySinks) -> Self {
        Self {
            scoring,
            sources,
            sinks,
            patterns: Arc::new(TimelinePatternAnalyzer),
            ranks: Arc::new(LadderRankAnalyzer),
            clock: Arc::new(SystemClock),
        }
    }

    /// Swap the contract-pattern and rank-progression analyzers.
    pub fn with_analyzers(
        mut self,
        patterns: Arc<dyn ContractPatternAnalyzer>,
        ranks: Arc<dyn RankProgressionAnalyzer>,
    ) -> Self {
        self.patterns = patterns;
        self.ranks = ranks;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Compute, persist and audit a risk assessment from the candidate's contract history.
    ///
    /// Returns `None` for an unknown candidate, an empty history or an internal fault (logged).
    pub fn compute(&self, candidate_id: &CandidateId) -> Option<StabilityOutcome> {
        fail_open("stability", candidate_id, || self.try_compute(candidate_id))
    }

    fn try_compute(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<StabilityOutcome>, ComputationError> {
        let Some(candidate) = self.sources.candidates.candidate(candidate_id)? else {
            debug!(candidate_id = %candidate_id, "candidate not found");
            return Ok(None);
        };

        let mut contracts = self.sources.contracts.contracts(candidate_id)?;
        if contracts.is_empty() {
            debug!(candidate_id = %candidate_id, "no contract history");
            return Ok(None);
        }
        contracts.sort_by_key(|contract| contract.start_date);

        let fleet_type = candidate.fleet_type.clone();
        let config = self.scoring.stability_config(fleet_type.as_deref());
        let now = self.clock.now();
        let today = self.clock.today();

        let contract_patterns = self.patterns.analyze(&contracts, &config, today);
        let rank_progression = self.ranks.analyze(&contracts);
        let stability_index = StabilityIndexCalculator::calculate(&contracts, &config.index_params());
        let promotion = PromotionContextAnalyzer::new(Arc::clone(&self.sources.promotion_gaps))
            .analyze(candidate_id, &config.promotion());
        let temporal_decay = TemporalDecayCalculator::calculate(&contracts, &config, today);
        let vessel_diversity =
            VesselDiversityCalculator::calculate(&contracts, &config.vessel_diversity(), today);

        let inputs = RiskInputs {
            short_contract_ratio: contract_patterns.short_contract_ratio,
            total_gap_months: contract_patterns.total_gap_months,
            overlap_count: contract_patterns.overlap_count,
            rank_anomaly: rank_progression.rank_anomaly,
            recent_unique_companies: contract_patterns.recent_unique_companies,
            stability_index: stability_index.index,
            temporal_recency_score: temporal_decay.temporal_recency_score,
            vessel_diversity_score: vessel_diversity.score,
            promotion_modifier: promotion.modifier,
        };
        let risk = RiskScoreCalculator::new(config.factor_weights(), config.normalization())
            .calculate(&inputs)?;
        let risk_tier = RiskTierResolver::resolve(risk.score, &config.risk_tiers());

        let outcome = StabilityOutcome {
            candidate_id: candidate_id.clone(),
            fleet_type,
            contract_count: contracts.len(),
            stability_index,
            contract_patterns,
            rank_progression,
            promotion,
            temporal_decay,
            vessel_diversity,
            inputs,
            risk_score: risk.score,
            risk_tier,
            breakdown: risk.factors,
            computed_at: now,
        };

        self.sinks.profiles.upsert(
            candidate_id,
            TrustProfilePatch::Stability {
                stability_index: outcome.stability_index.index,
                risk_score: outcome.risk_score,
                risk_tier: outcome.risk_tier,
                computed_at: outcome.computed_at,
                detail: serde_json::to_value(&outcome)?,
            },
        )?;

        let mut flags = outcome.contract_patterns.flags.clone();
        flags.extend(outcome.rank_progression.flags.iter().cloned());
        self.sinks.events.append(TrustEvent {
            candidate_id: candidate_id.clone(),
            kind: TrustEventKind::StabilityComputed,
            payload: json!({
                "stability_index": outcome.stability_index.index,
                "risk_score": outcome.risk_score,
                "risk_tier": outcome.risk_tier.label(),
                "contract_count": outcome.contract_count,
                "in_promotion_window": outcome.promotion.in_promotion_window,
                "fleet_type": outcome.fleet_type,
                "flags": flags,
            }),
            created_at: outcome.computed_at,
        })?;

        info!(
            candidate_id = %candidate_id,
            risk_score = outcome.risk_score,
            risk_tier = outcome.risk_tier.label(),
            contracts = outcome.contract_count,
            "stability computed"
        );

        Ok(Some(outcome))
    }
}
