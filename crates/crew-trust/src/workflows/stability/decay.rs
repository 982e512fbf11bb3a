//! Temporal decay: short contracts weigh more the more recently they started.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::config::StabilityConfig;
use super::domain::{signed_months, CandidateContract};
use super::round4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalDecay {
    pub temporal_recency_score: f64,
    pub recent_short_ratio: f64,
    pub old_short_ratio: f64,
    pub recent_contracts: usize,
    pub middle_contracts: usize,
    pub old_contracts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Recent,
    Middle,
    Old,
}

pub struct TemporalDecayCalculator;

impl TemporalDecayCalculator {
    pub fn calculate(
        contracts: &[CandidateContract],
        config: &StabilityConfig,
        today: NaiveDate,
    ) -> TemporalDecay {
        if contracts.is_empty() {
            return TemporalDecay::default();
        }

        let params = config.temporal_decay();
        let short_threshold = config.short_contract_months();

        let mut weighted_short = 0.0;
        let mut weighted_total = 0.0;
        let mut result = TemporalDecay::default();
        let (mut recent_short, mut old_short) = (0usize, 0usize);

        for contract in contracts {
            let age = signed_months(contract.start_date, today);
            let bucket = if age <= params.recent_months {
                Bucket::Recent
            } else if age > params.old_months {
                Bucket::Old
            } else {
                Bucket::Middle
            };
            let weight = match bucket {
                Bucket::Recent => params.recent_weight,
                Bucket::Middle => params.middle_weight,
                Bucket::Old => params.old_weight,
            };
            let short = contract
                .completed_months()
                .is_some_and(|months| months < short_threshold);

            weighted_total += weight;
            if short {
                weighted_short += weight;
            }
            match bucket {
                Bucket::Recent => {
                    result.recent_contracts += 1;
                    recent_short += usize::from(short);
                }
                Bucket::Middle => result.middle_contracts += 1,
                Bucket::Old => {
                    result.old_contracts += 1;
                    old_short += usize::from(short);
                }
            }
        }

        result.temporal_recency_score = if weighted_total > 0.0 {
            round4(weighted_short / weighted_total)
        } else {
            0.0
        };
        result.recent_short_ratio = ratio(recent_short, result.recent_contracts);
        result.old_short_ratio = ratio(old_short, result.old_contracts);
        result
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round4(part as f64 / whole as f64)
    }
}
