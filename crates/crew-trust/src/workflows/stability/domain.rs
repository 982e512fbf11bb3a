use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Average month length used to turn day spans into months.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// One employment stint from the candidate's contract history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateContract {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub vessel_type: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub company: String,
}

impl CandidateContract {
    /// Months served, or `None` while the contract is still open.
    pub fn completed_months(&self) -> Option<f64> {
        self.end_date.map(|end| months_between(self.start_date, end))
    }

    /// Months served so far, running open contracts up to `today`.
    pub fn tenure_months(&self, today: NaiveDate) -> f64 {
        months_between(self.start_date, self.end_date.unwrap_or(today))
    }

    /// End date, or `today` for open contracts.
    pub fn effective_end(&self, today: NaiveDate) -> NaiveDate {
        self.end_date.unwrap_or(today)
    }
}

/// Non-negative span in months between two dates.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> f64 {
    let days = (end - start).num_days().max(0) as f64;
    days / DAYS_PER_MONTH
}

/// Signed span in months, negative when `end` precedes `start`.
pub fn signed_months(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days() as f64 / DAYS_PER_MONTH
}

/// Expected-promotion gap from the external promotion calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PromotionGap {
    /// Positive when the candidate is past the expected promotion point, negative when not yet.
    pub gap_months: Option<f64>,
    #[serde(default)]
    pub at_top_rank: bool,
}

/// Contract-shape signals consumed by the risk calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractPatternSignals {
    pub completed_contracts: usize,
    pub short_contracts: usize,
    pub short_contract_ratio: f64,
    pub total_gap_months: f64,
    pub overlap_count: usize,
    pub recent_unique_companies: usize,
    pub flags: Vec<String>,
}

/// Rank-ladder signals consumed by the risk calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankProgressionSignals {
    pub rank_anomaly: bool,
    pub path: Vec<String>,
    pub demotions: usize,
    pub skipped_steps: usize,
    pub flags: Vec<String>,
}
