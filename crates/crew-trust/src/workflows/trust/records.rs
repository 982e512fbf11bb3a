use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflows::competency::CompetencyStatus;
use crate::workflows::stability::RiskTier;

/// Detail-blob key holding the latest full competency result.
pub const COMPETENCY_DETAIL_KEY: &str = "competency_engine";
/// Detail-blob key holding the latest full stability result.
pub const STABILITY_DETAIL_KEY: &str = "stability_risk_engine";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Basic candidate fields needed to resolve scopes and fleet profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: CandidateId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub fleet_type: Option<String>,
}

/// Mutable per-candidate rollup of the latest results from both engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustProfile {
    pub candidate_id: CandidateId,
    pub competency_score: Option<f64>,
    pub competency_status: Option<CompetencyStatus>,
    pub competency_computed_at: Option<DateTime<Utc>>,
    pub stability_index: Option<f64>,
    pub risk_score: Option<f64>,
    pub risk_tier: Option<RiskTier>,
    pub stability_computed_at: Option<DateTime<Utc>>,
    pub detail: BTreeMap<String, Value>,
    pub updated_at: DateTime<Utc>,
}

/// Field-level update applied to a trust profile by one engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TrustProfilePatch {
    Competency {
        score: f64,
        status: CompetencyStatus,
        computed_at: DateTime<Utc>,
        detail: Value,
    },
    Stability {
        stability_index: Option<f64>,
        risk_score: f64,
        risk_tier: RiskTier,
        computed_at: DateTime<Utc>,
        detail: Value,
    },
}

impl TrustProfilePatch {
    pub fn computed_at(&self) -> DateTime<Utc> {
        match self {
            TrustProfilePatch::Competency { computed_at, .. }
            | TrustProfilePatch::Stability { computed_at, .. } => *computed_at,
        }
    }
}

impl TrustProfile {
    pub fn new(candidate_id: CandidateId, created_at: DateTime<Utc>) -> Self {
        Self {
            candidate_id,
            competency_score: None,
            competency_status: None,
            competency_computed_at: None,
            stability_index: None,
            risk_score: None,
            risk_tier: None,
            stability_computed_at: None,
            detail: BTreeMap::new(),
            updated_at: created_at,
        }
    }

    /// Apply a patch in place; the other engine's fields and detail key are left untouched.
    pub fn apply(&mut self, patch: TrustProfilePatch) {
        self.updated_at = patch.computed_at();
        match patch {
            TrustProfilePatch::Competency {
                score,
                status,
                computed_at,
                detail,
            } => {
                self.competency_score = Some(score);
                self.competency_status = Some(status);
                self.competency_computed_at = Some(computed_at);
                self.detail.insert(COMPETENCY_DETAIL_KEY.to_string(), detail);
            }
            TrustProfilePatch::Stability {
                stability_index,
                risk_score,
                risk_tier,
                computed_at,
                detail,
            } => {
                self.stability_index = stability_index;
                self.risk_score = Some(risk_score);
                self.risk_tier = Some(risk_tier);
                self.stability_computed_at = Some(computed_at);
                self.detail.insert(STABILITY_DETAIL_KEY.to_string(), detail);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustEventKind {
    CompetencyComputed,
    StabilityComputed,
}

impl TrustEventKind {
    pub const fn label(self) -> &'static str {
        match self {
            TrustEventKind::CompetencyComputed => "competency_computed",
            TrustEventKind::StabilityComputed => "stability_computed",
        }
    }
}

/// Append-only audit entry summarizing one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEvent {
    pub candidate_id: CandidateId,
    pub kind: TrustEventKind,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}
