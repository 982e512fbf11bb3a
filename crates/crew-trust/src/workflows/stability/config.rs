//! Layered resolver for every stability threshold, weight and cap.
//!
//! Lookup order for any key: fleet-profile override, then base configuration, then the in-code
//! default supplied by the accessor. Sections merge per field, never wholesale.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::workflows::competency::canonical_rank_code;

const RANK_SHORT_CONTRACT_DEFAULTS: &[(&str, f64)] = &[
    ("MASTER", 3.0),
    ("CHIEF_ENGINEER", 3.0),
    ("CHIEF_OFFICER", 4.0),
    ("SECOND_ENGINEER", 4.0),
];

/// Per-call snapshot of the stability configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StabilityConfig {
    base: Map<String, Value>,
    fleet: Option<Map<String, Value>>,
    fleet_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorWeights {
    pub short_ratio: f64,
    pub gap_months: f64,
    pub overlap: f64,
    pub rank_anomaly: f64,
    pub frequent_switch: f64,
    pub stability_index: f64,
    pub temporal_recency: f64,
    pub vessel_diversity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizationCaps {
    pub gap_months: f64,
    pub overlap_count: f64,
    pub frequent_switch: f64,
    pub stability_index: f64,
    /// Normalized value used when no stability index could be computed.
    pub unknown_stability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskTierThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityIndexParams {
    pub min_contracts: usize,
    pub max_index: f64,
    pub zero_std_epsilon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PromotionWindowParams {
    pub window_months: f64,
    pub modifier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemporalDecayParams {
    pub recent_months: f64,
    pub old_months: f64,
    pub recent_weight: f64,
    pub middle_weight: f64,
    pub old_weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VesselDiversityParams {
    pub min_tenure_months: f64,
    pub min_types: usize,
    pub max_types: usize,
    pub max_score: f64,
    pub base_bonus_ratio: f64,
}

impl StabilityConfig {
    pub fn layered(
        base: Map<String, Value>,
        fleet: Option<Map<String, Value>>,
        fleet_type: Option<String>,
    ) -> Self {
        Self {
            base,
            fleet,
            fleet_type,
        }
    }

    pub fn fleet_type(&self) -> Option<&str> {
        self.fleet_type.as_deref()
    }

    fn layered_value<T>(&self, path: &str, read: impl Fn(&Value) -> Option<T>) -> Option<T> {
        self.fleet
            .as_ref()
            .and_then(|fleet| walk(fleet, path))
            .and_then(&read)
            .or_else(|| walk(&self.base, path).and_then(&read))
    }

    /// Numeric value at a dotted path; non-numeric or non-finite entries fall through.
    pub fn number(&self, path: &str, default: f64) -> f64 {
        self.layered_value(path, |value| value.as_f64().filter(|number| number.is_finite()))
            .unwrap_or(default)
    }

    /// Non-negative integer at a dotted path. Integral floats such as `2.0` are accepted.
    pub fn count(&self, path: &str, default: usize) -> usize {
        self.layered_value(path, |value| {
            let count = value.as_u64().or_else(|| {
                value
                    .as_f64()
                    .filter(|number| number.is_finite() && *number >= 0.0 && number.fract() == 0.0)
                    .map(|number| number as u64)
            });
            if count.is_none() {
                debug!(path, %value, "ignoring non-integral count");
            }
            count.map(|number| number as usize)
        })
        .unwrap_or(default)
    }

    pub fn factor_weights(&self) -> FactorWeights {
        FactorWeights {
            short_ratio: self.number("factor_weights.short_ratio", 0.20),
            gap_months: self.number("factor_weights.gap_months", 0.15),
            overlap: self.number("factor_weights.overlap", 0.10),
            rank_anomaly: self.number("factor_weights.rank_anomaly", 0.10),
            frequent_switch: self.number("factor_weights.frequent_switch", 0.15),
            stability_index: self.number("factor_weights.stability_index", 0.10),
            temporal_recency: self.number("factor_weights.temporal_recency", 0.10),
            vessel_diversity: self.number("factor_weights.vessel_diversity", 0.10),
        }
    }

    pub fn normalization(&self) -> NormalizationCaps {
        NormalizationCaps {
            gap_months: self.number("normalization.gap_months_cap", 24.0),
            overlap_count: self.number("normalization.overlap_cap", 3.0),
            frequent_switch: self.number("normalization.frequent_switch_cap", 5.0),
            stability_index: self.number("normalization.stability_index_cap", 10.0),
            unknown_stability: self.number("normalization.unknown_stability", 0.5),
        }
    }

    pub fn risk_tiers(&self) -> RiskTierThresholds {
        RiskTierThresholds {
            low: self.number("risk_tiers.low", 0.0),
            medium: self.number("risk_tiers.medium", 0.25),
            high: self.number("risk_tiers.high", 0.50),
            critical: self.number("risk_tiers.critical", 0.75),
        }
    }

    pub fn short_contract_months(&self) -> f64 {
        self.number("short_contract_months", 6.0)
    }

    /// Rank-specific short-contract threshold, falling back to the global one.
    pub fn short_contract_months_for_rank(&self, rank: &str) -> f64 {
        let key = canonical_rank_code(rank)
            .map(str::to_string)
            .unwrap_or_else(|| rank_key(rank));
        if key.is_empty() {
            return self.short_contract_months();
        }
        let fallback = RANK_SHORT_CONTRACT_DEFAULTS
            .iter()
            .find(|(code, _)| *code == key)
            .map(|(_, months)| *months)
            .unwrap_or_else(|| self.short_contract_months());
        self.number(&format!("rank_short_contract_months.{key}"), fallback)
    }

    pub fn recent_company_window_months(&self) -> f64 {
        self.number("recent_company_window_months", 36.0)
    }

    pub fn index_params(&self) -> StabilityIndexParams {
        StabilityIndexParams {
            min_contracts: self.count("stability_index.min_contracts", 2),
            max_index: self.number("stability_index.max_index", 10.0),
            zero_std_epsilon: self.number("stability_index.zero_std_epsilon", 0.01),
        }
    }

    pub fn promotion(&self) -> PromotionWindowParams {
        PromotionWindowParams {
            window_months: self.number("promotion.window_months", 12.0),
            modifier: self.number("promotion.modifier", 0.5),
        }
    }

    pub fn temporal_decay(&self) -> TemporalDecayParams {
        TemporalDecayParams {
            recent_months: self.number("temporal_decay.recent_months", 24.0),
            old_months: self.number("temporal_decay.old_months", 60.0),
            recent_weight: self.number("temporal_decay.recent_weight", 1.5),
            middle_weight: self.number("temporal_decay.middle_weight", 1.0),
            old_weight: self.number("temporal_decay.old_weight", 0.5),
        }
    }

    pub fn vessel_diversity(&self) -> VesselDiversityParams {
        VesselDiversityParams {
            min_tenure_months: self.number("vessel_diversity.min_tenure_months", 6.0),
            min_types: self.count("vessel_diversity.min_types", 2),
            max_types: self.count("vessel_diversity.max_types", 5),
            max_score: self.number("vessel_diversity.max_score", 1.0),
            base_bonus_ratio: self.number("vessel_diversity.base_bonus_ratio", 0.1),
        }
    }
}

fn walk<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Canonical rank key: upper-case with underscores between alphanumeric runs.
pub(crate) fn rank_key(rank: &str) -> String {
    rank.split(|ch: char| !ch.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("_")
}
