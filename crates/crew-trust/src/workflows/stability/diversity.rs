//! Vessel diversity: breadth of vessel-type experience, counted only where tenure was earned.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::config::VesselDiversityParams;
use super::domain::CandidateContract;
use super::round4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselDiversity {
    pub score: f64,
    pub type_count: usize,
    pub qualifying_types: Vec<String>,
    pub tenure_by_type: BTreeMap<String, f64>,
}

pub struct VesselDiversityCalculator;

impl VesselDiversityCalculator {
    pub fn calculate(
        contracts: &[CandidateContract],
        params: &VesselDiversityParams,
        today: NaiveDate,
    ) -> VesselDiversity {
        let mut tenure_by_type: BTreeMap<String, f64> = BTreeMap::new();
        for contract in contracts {
            let vessel_type = contract.vessel_type.trim().to_lowercase();
            if vessel_type.is_empty() || vessel_type == "other" {
                continue;
            }
            *tenure_by_type.entry(vessel_type).or_default() += contract.tenure_months(today);
        }

        let qualifying_types: Vec<String> = tenure_by_type
            .iter()
            .filter(|(_, months)| **months >= params.min_tenure_months)
            .map(|(vessel_type, _)| vessel_type.clone())
            .collect();

        let score = diversity_score(qualifying_types.len(), params);
        VesselDiversity {
            score,
            type_count: tenure_by_type.len(),
            qualifying_types,
            tenure_by_type: tenure_by_type
                .into_iter()
                .map(|(vessel_type, months)| (vessel_type, round4(months)))
                .collect(),
        }
    }
}

fn diversity_score(qualifying: usize, params: &VesselDiversityParams) -> f64 {
    if qualifying < params.min_types {
        return 0.0;
    }
    let max_score = params.max_score.max(0.0);
    if qualifying >= params.max_types || params.max_types <= params.min_types {
        return round4(max_score);
    }

    let base = max_score * params.base_bonus_ratio.clamp(0.0, 1.0);
    let span = (params.max_types - params.min_types) as f64;
    let progress = (qualifying - params.min_types) as f64 / span;
    round4(base + (max_score - base) * progress)
}
