//! Stability and risk scoring over a candidate's contract timeline.
//!
//! Every weight, cap and threshold comes from [`StabilityConfig`], resolved per run from the base
//! document and the candidate's fleet profile.

mod config;
mod decay;
mod diversity;
mod domain;
mod engine;
mod index;
mod patterns;
mod promotion;
mod risk;

#[cfg(test)]
mod tests;

pub use config::{
    FactorWeights, NormalizationCaps, PromotionWindowParams, RiskTierThresholds, StabilityConfig,
    StabilityIndexParams, TemporalDecayParams, VesselDiversityParams,
};
pub use decay::{TemporalDecay, TemporalDecayCalculator};
pub use diversity::{VesselDiversity, VesselDiversityCalculator};
pub use domain::{
    months_between, CandidateContract, ContractPatternSignals, PromotionGap,
    RankProgressionSignals, DAYS_PER_MONTH,
};
pub use engine::{StabilityOutcome, StabilityRiskEngine, StabilitySinks, StabilitySources};
pub use index::{StabilityIndex, StabilityIndexCalculator};
pub use patterns::{
    ContractPatternAnalyzer, LadderRankAnalyzer, RankProgressionAnalyzer, TimelinePatternAnalyzer,
};
pub use promotion::{promotion_context, PromotionContext, PromotionContextAnalyzer};
pub use risk::{
    FactorBreakdown, RiskFactor, RiskInputs, RiskScore, RiskScoreCalculator, RiskTier,
    RiskTierResolver,
};

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
