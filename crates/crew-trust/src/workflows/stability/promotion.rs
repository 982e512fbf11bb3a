use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::PromotionWindowParams;
use super::domain::PromotionGap;
use crate::workflows::trust::{CandidateId, PromotionGapSource};

/// Whether short stints are expected because a promotion is near.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionContext {
    pub gap_months: Option<f64>,
    pub at_top_rank: bool,
    pub in_promotion_window: bool,
    pub window_months: f64,
    /// Multiplier for the short-contract and frequent-switch factors.
    pub modifier: f64,
}

pub struct PromotionContextAnalyzer {
    source: Arc<dyn PromotionGapSource>,
}

impl PromotionContextAnalyzer {
    pub fn new(source: Arc<dyn PromotionGapSource>) -> Self {
        Self { source }
    }

    /// A failing promotion-gap source degrades to "cannot compute" rather than failing the run.
    pub fn analyze(&self, candidate_id: &CandidateId, params: &PromotionWindowParams) -> PromotionContext {
        let gap = match self.source.promotion_gap(candidate_id) {
            Ok(gap) => gap,
            Err(err) => {
                warn!(candidate_id = %candidate_id, error = %err, "promotion gap unavailable");
                None
            }
        };
        promotion_context(gap.as_ref(), params)
    }
}

pub fn promotion_context(gap: Option<&PromotionGap>, params: &PromotionWindowParams) -> PromotionContext {
    let neutral = PromotionContext {
        gap_months: gap.and_then(|gap| gap.gap_months),
        at_top_rank: gap.is_some_and(|gap| gap.at_top_rank),
        in_promotion_window: false,
        window_months: params.window_months,
        modifier: 1.0,
    };

    let Some(gap) = gap else {
        return neutral;
    };
    if gap.at_top_rank {
        return neutral;
    }
    let Some(months) = gap.gap_months.filter(|months| months.is_finite()) else {
        return neutral;
    };

    if months.abs() <= params.window_months {
        PromotionContext {
            in_promotion_window: true,
            modifier: params.modifier.clamp(0.0, 1.0),
            ..neutral
        }
    } else {
        neutral
    }
}
