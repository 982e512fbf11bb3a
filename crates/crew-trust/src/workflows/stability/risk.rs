use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::{FactorWeights, NormalizationCaps, RiskTierThresholds};
use super::round4;
use crate::workflows::ComputationError;

/// Raw and derived inputs to the weighted risk sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskInputs {
    pub short_contract_ratio: f64,
    pub total_gap_months: f64,
    pub overlap_count: usize,
    pub rank_anomaly: bool,
    pub recent_unique_companies: usize,
    pub stability_index: Option<f64>,
    pub temporal_recency_score: f64,
    pub vessel_diversity_score: f64,
    pub promotion_modifier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    ShortRatio,
    GapMonths,
    Overlap,
    RankAnomaly,
    FrequentSwitch,
    StabilityIndex,
    TemporalRecency,
    VesselDiversity,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 8] = [
        RiskFactor::ShortRatio,
        RiskFactor::GapMonths,
        RiskFactor::Overlap,
        RiskFactor::RankAnomaly,
        RiskFactor::FrequentSwitch,
        RiskFactor::StabilityIndex,
        RiskFactor::TemporalRecency,
        RiskFactor::VesselDiversity,
    ];

    fn weight(self, weights: &FactorWeights) -> f64 {
        match self {
            RiskFactor::ShortRatio => weights.short_ratio,
            RiskFactor::GapMonths => weights.gap_months,
            RiskFactor::Overlap => weights.overlap,
            RiskFactor::RankAnomaly => weights.rank_anomaly,
            RiskFactor::FrequentSwitch => weights.frequent_switch,
            RiskFactor::StabilityIndex => weights.stability_index,
            RiskFactor::TemporalRecency => weights.temporal_recency,
            RiskFactor::VesselDiversity => weights.vessel_diversity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    /// `None` for an unknown stability index.
    pub raw: Option<f64>,
    pub normalized: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub score: f64,
    pub factors: BTreeMap<RiskFactor, FactorBreakdown>,
}

pub struct RiskScoreCalculator {
    weights: FactorWeights,
    caps: NormalizationCaps,
}

impl RiskScoreCalculator {
    pub fn new(weights: FactorWeights, caps: NormalizationCaps) -> Self {
        Self { weights, caps }
    }

    pub fn calculate(&self, inputs: &RiskInputs) -> Result<RiskScore, ComputationError> {
        let modifier = if inputs.promotion_modifier.is_finite() {
            inputs.promotion_modifier.clamp(0.0, 1.0)
        } else {
            1.0
        };

        let mut factors = BTreeMap::new();
        let mut total = 0.0;
        for factor in RiskFactor::ALL {
            let (raw, normalized) = self.normalize(factor, inputs, modifier);
            let weight = factor.weight(&self.weights);
            let contribution = normalized * weight;
            total += contribution;
            factors.insert(
                factor,
                FactorBreakdown {
                    raw,
                    normalized: round4(normalized),
                    weight,
                    contribution: round4(contribution),
                },
            );
        }

        if !total.is_finite() {
            return Err(ComputationError::NonFinite { stage: "risk_score" });
        }

        Ok(RiskScore {
            score: round4(total.clamp(0.0, 1.0)),
            factors,
        })
    }

    fn normalize(&self, factor: RiskFactor, inputs: &RiskInputs, modifier: f64) -> (Option<f64>, f64) {
        match factor {
            RiskFactor::ShortRatio => {
                let raw = inputs.short_contract_ratio;
                (Some(raw), unit(raw) * modifier)
            }
            RiskFactor::GapMonths => {
                let raw = inputs.total_gap_months;
                (Some(raw), against_cap(raw, self.caps.gap_months))
            }
            RiskFactor::Overlap => {
                let raw = inputs.overlap_count as f64;
                (Some(raw), against_cap(raw, self.caps.overlap_count))
            }
            RiskFactor::RankAnomaly => {
                let raw = if inputs.rank_anomaly { 1.0 } else { 0.0 };
                (Some(raw), raw)
            }
            RiskFactor::FrequentSwitch => {
                let raw = inputs.recent_unique_companies as f64;
                (Some(raw), against_cap(raw, self.caps.frequent_switch) * modifier)
            }
            RiskFactor::StabilityIndex => match inputs.stability_index {
                Some(index) => (
                    Some(index),
                    1.0 - against_cap(index, self.caps.stability_index),
                ),
                None => (None, unit(self.caps.unknown_stability)),
            },
            RiskFactor::TemporalRecency => {
                let raw = inputs.temporal_recency_score;
                (Some(raw), unit(raw))
            }
            RiskFactor::VesselDiversity => {
                let raw = inputs.vessel_diversity_score;
                (Some(raw), 1.0 - unit(raw))
            }
        }
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn against_cap(value: f64, cap: f64) -> f64 {
    if cap <= 0.0 {
        return if value > 0.0 { 1.0 } else { 0.0 };
    }
    unit(value / cap)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }
}

pub struct RiskTierResolver;

impl RiskTierResolver {
    /// Highest tier whose threshold the score meets; `Low` when none do.
    pub fn resolve(score: f64, thresholds: &RiskTierThresholds) -> RiskTier {
        [
            (RiskTier::Critical, thresholds.critical),
            (RiskTier::High, thresholds.high),
            (RiskTier::Medium, thresholds.medium),
            (RiskTier::Low, thresholds.low),
        ]
        .into_iter()
        .find(|(_, threshold)| score >= *threshold)
        .map(|(tier, _)| tier)
        .unwrap_or(RiskTier::Low)
    }
}
