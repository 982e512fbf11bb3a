//! Stability index: inverse coefficient of variation of completed contract durations.

use serde::{Deserialize, Serialize};

use super::config::StabilityIndexParams;
use super::domain::CandidateContract;
use super::round4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityIndex {
    /// `None` when fewer than the minimum number of completed contracts exist.
    pub index: Option<f64>,
    pub mean_months: f64,
    pub std_months: f64,
    pub contract_count: usize,
    pub capped: bool,
}

pub struct StabilityIndexCalculator;

impl StabilityIndexCalculator {
    /// Index over contracts with a known end date.
    pub fn calculate(contracts: &[CandidateContract], params: &StabilityIndexParams) -> StabilityIndex {
        let durations: Vec<f64> = contracts
            .iter()
            .filter_map(CandidateContract::completed_months)
            .collect();
        Self::from_durations(&durations, params)
    }

    /// Mean over standard deviation (n - 1 denominator); a near-zero spread yields the cap.
    pub fn from_durations(durations: &[f64], params: &StabilityIndexParams) -> StabilityIndex {
        let count = durations.len();
        if count == 0 {
            return StabilityIndex {
                index: None,
                mean_months: 0.0,
                std_months: 0.0,
                contract_count: 0,
                capped: false,
            };
        }

        let mean = durations.iter().sum::<f64>() / count as f64;
        if count < params.min_contracts.max(2) {
            return StabilityIndex {
                index: None,
                mean_months: round4(mean),
                std_months: 0.0,
                contract_count: count,
                capped: false,
            };
        }

        let variance = durations
            .iter()
            .map(|duration| (duration - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        let std = variance.sqrt();

        let (index, capped) = if std < params.zero_std_epsilon {
            (params.max_index, true)
        } else {
            (mean / std, false)
        };

        StabilityIndex {
            index: Some(round4(index)),
            mean_months: round4(mean),
            std_months: round4(std),
            contract_count: count,
            capped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StabilityIndexParams {
        StabilityIndexParams {
            min_contracts: 2,
            max_index: 10.0,
            zero_std_epsilon: 0.01,
        }
    }

    #[test]
    fn consistent_short_contracts_score_nine() {
        let result = StabilityIndexCalculator::from_durations(&[4.0, 5.0, 4.5], &params());
        assert_eq!(result.mean_months, 4.5);
        assert_eq!(result.std_months, 0.5);
        assert_eq!(result.index, Some(9.0));
        assert!(!result.capped);
    }

    #[test]
    fn identical_durations_hit_the_cap() {
        let result = StabilityIndexCalculator::from_durations(&[6.0, 6.0, 6.0], &params());
        assert_eq!(result.index, Some(10.0));
        assert!(result.capped);
    }

    #[test]
    fn single_contract_reports_partial_stats() {
        let result = StabilityIndexCalculator::from_durations(&[7.25], &params());
        assert_eq!(result.index, None);
        assert_eq!(result.mean_months, 7.25);
        assert_eq!(result.std_months, 0.0);
        assert_eq!(result.contract_count, 1);
    }

    #[test]
    fn minimum_count_is_configurable() {
        let strict = StabilityIndexParams {
            min_contracts: 4,
            ..params()
        };
        let result = StabilityIndexCalculator::from_durations(&[4.0, 5.0, 4.5], &strict);
        assert_eq!(result.index, None);
        assert_eq!(result.mean_months, 4.5);
    }
}
