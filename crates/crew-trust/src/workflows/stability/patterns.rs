//! Contract-shape and rank-ladder analysis feeding the raw risk inputs.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::config::StabilityConfig;
use super::domain::{signed_months, CandidateContract, ContractPatternSignals, RankProgressionSignals};
use super::round4;
use crate::workflows::competency::{role_scope_for_rank, RoleScope};

pub const FLAG_FREQUENT_SHORT_CONTRACTS: &str = "frequent_short_contracts";
pub const FLAG_EXTENDED_GAPS: &str = "extended_gaps";
pub const FLAG_OVERLAPPING_CONTRACTS: &str = "overlapping_contracts";
pub const FLAG_FREQUENT_COMPANY_SWITCHING: &str = "frequent_company_switching";
pub const FLAG_RANK_DEMOTION: &str = "rank_demotion";
pub const FLAG_RANK_SKIP: &str = "rank_skip";

const FREQUENT_SHORT_RATIO: f64 = 0.5;

/// Derives short-contract, gap, overlap and company-switch signals from a contract timeline.
pub trait ContractPatternAnalyzer: Send + Sync {
    fn analyze(
        &self,
        contracts: &[CandidateContract],
        config: &StabilityConfig,
        today: NaiveDate,
    ) -> ContractPatternSignals;
}

/// Detects demotions and skipped steps in the rank history.
pub trait RankProgressionAnalyzer: Send + Sync {
    fn analyze(&self, contracts: &[CandidateContract]) -> RankProgressionSignals;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TimelinePatternAnalyzer;

impl ContractPatternAnalyzer for TimelinePatternAnalyzer {
    fn analyze(
        &self,
        contracts: &[CandidateContract],
        config: &StabilityConfig,
        today: NaiveDate,
    ) -> ContractPatternSignals {
        let mut ordered: Vec<&CandidateContract> = contracts.iter().collect();
        ordered.sort_by_key(|contract| contract.start_date);

        let mut signals = ContractPatternSignals::default();
        for contract in &ordered {
            if let Some(months) = contract.completed_months() {
                signals.completed_contracts += 1;
                if months < config.short_contract_months_for_rank(&contract.rank) {
                    signals.short_contracts += 1;
                }
            }
        }
        if signals.completed_contracts > 0 {
            signals.short_contract_ratio =
                round4(signals.short_contracts as f64 / signals.completed_contracts as f64);
        }

        // Compare each start against the furthest end seen so far, so a long contract covers
        // every shorter one nested inside it.
        let mut total_gap = 0.0;
        let mut covered_until: Option<NaiveDate> = None;
        for contract in &ordered {
            let end = contract.effective_end(today);
            if let Some(covered) = covered_until {
                if contract.start_date < covered {
                    signals.overlap_count += 1;
                } else {
                    total_gap += signed_months(covered, contract.start_date);
                }
            }
            covered_until = Some(covered_until.map_or(end, |covered| covered.max(end)));
        }
        signals.total_gap_months = round4(total_gap);

        let window = config.recent_company_window_months();
        let recent: BTreeSet<String> = ordered
            .iter()
            .filter(|contract| signed_months(contract.effective_end(today), today) <= window)
            .map(|contract| contract.company.trim().to_lowercase())
            .filter(|company| !company.is_empty())
            .collect();
        signals.recent_unique_companies = recent.len();

        let caps = config.normalization();
        if signals.completed_contracts > 0 && signals.short_contract_ratio >= FREQUENT_SHORT_RATIO {
            signals.flags.push(FLAG_FREQUENT_SHORT_CONTRACTS.to_string());
        }
        if signals.total_gap_months >= caps.gap_months {
            signals.flags.push(FLAG_EXTENDED_GAPS.to_string());
        }
        if signals.overlap_count > 0 {
            signals.flags.push(FLAG_OVERLAPPING_CONTRACTS.to_string());
        }
        if signals.recent_unique_companies as f64 >= caps.frequent_switch {
            signals.flags.push(FLAG_FREQUENT_COMPANY_SWITCHING.to_string());
        }
        signals
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ladder {
    Deck,
    Engine,
    Shared,
}

impl Ladder {
    fn compatible(self, other: Ladder) -> bool {
        self == other || self == Ladder::Shared || other == Ladder::Shared
    }
}

fn ladder_position(scope: RoleScope) -> Option<(Ladder, u8)> {
    match scope {
        RoleScope::Rating => Some((Ladder::Shared, 0)),
        RoleScope::DeckOfficer => Some((Ladder::Deck, 1)),
        RoleScope::ChiefOfficer => Some((Ladder::Deck, 2)),
        RoleScope::Master => Some((Ladder::Deck, 3)),
        RoleScope::EngineOfficer => Some((Ladder::Engine, 1)),
        RoleScope::ChiefEngineer => Some((Ladder::Engine, 2)),
        RoleScope::Eto | RoleScope::Catering | RoleScope::All => None,
    }
}

/// Places each rank on the deck or engine ladder. Ranks off both ladders are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct LadderRankAnalyzer;

impl RankProgressionAnalyzer for LadderRankAnalyzer {
    fn analyze(&self, contracts: &[CandidateContract]) -> RankProgressionSignals {
        let mut ordered: Vec<&CandidateContract> = contracts.iter().collect();
        ordered.sort_by_key(|contract| contract.start_date);

        let mut signals = RankProgressionSignals::default();
        let mut previous: Option<(Ladder, u8)> = None;
        for contract in ordered {
            let scope = role_scope_for_rank(&contract.rank);
            if signals.path.last().map(String::as_str) != Some(scope.token()) {
                signals.path.push(scope.token().to_string());
            }

            let Some((ladder, level)) = ladder_position(scope) else {
                continue;
            };
            if let Some((last_ladder, last_level)) = previous {
                if last_ladder.compatible(ladder) {
                    if level < last_level {
                        signals.demotions += 1;
                    } else if level > last_level + 1 {
                        signals.skipped_steps += 1;
                    }
                }
            }
            previous = Some((ladder, level));
        }

        if signals.demotions > 0 {
            signals.flags.push(FLAG_RANK_DEMOTION.to_string());
        }
        if signals.skipped_steps > 0 {
            signals.flags.push(FLAG_RANK_SKIP.to_string());
        }
        signals.rank_anomaly = signals.demotions > 0 || signals.skipped_steps > 0;
        signals
    }
}
