use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::language::Language;
use super::scorer::{QuestionScore, TechnicalDepth};
use crate::workflows::trust::CandidateId;

/// Scoring axis for competency answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetencyDimension {
    Discipline,
    Leadership,
    Stress,
    Teamwork,
    Comms,
    TechPractical,
}

/// Retired dimension codes still present in stored interviews, mapped onto the current axes.
pub const LEGACY_DIMENSION_ALIASES: &[(&str, CompetencyDimension)] = &[
    ("COMMUNICATION", CompetencyDimension::Comms),
    ("TECHNICAL", CompetencyDimension::TechPractical),
    ("TECH", CompetencyDimension::TechPractical),
    ("TECHNICAL_SKILL", CompetencyDimension::TechPractical),
    ("STRESS_MANAGEMENT", CompetencyDimension::Stress),
    ("STRESS_TOLERANCE", CompetencyDimension::Stress),
    ("TEAM_WORK", CompetencyDimension::Teamwork),
    ("COOPERATION", CompetencyDimension::Teamwork),
    ("SAFETY", CompetencyDimension::Discipline),
    ("SAFETY_DISCIPLINE", CompetencyDimension::Discipline),
    ("LEAD", CompetencyDimension::Leadership),
    ("COMMAND", CompetencyDimension::Leadership),
];

impl CompetencyDimension {
    pub const ALL: [CompetencyDimension; 6] = [
        CompetencyDimension::Discipline,
        CompetencyDimension::Leadership,
        CompetencyDimension::Stress,
        CompetencyDimension::Teamwork,
        CompetencyDimension::Comms,
        CompetencyDimension::TechPractical,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            CompetencyDimension::Discipline => "DISCIPLINE",
            CompetencyDimension::Leadership => "LEADERSHIP",
            CompetencyDimension::Stress => "STRESS",
            CompetencyDimension::Teamwork => "TEAMWORK",
            CompetencyDimension::Comms => "COMMS",
            CompetencyDimension::TechPractical => "TECH_PRACTICAL",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CompetencyDimension::Discipline => "Discipline & procedures",
            CompetencyDimension::Leadership => "Leadership",
            CompetencyDimension::Stress => "Stress handling",
            CompetencyDimension::Teamwork => "Teamwork",
            CompetencyDimension::Comms => "Communication",
            CompetencyDimension::TechPractical => "Technical practice",
        }
    }

    /// Resolve a stored dimension code, translating legacy codes at the ingestion boundary.
    pub fn from_code(raw: &str) -> Option<Self> {
        let code = raw.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|dimension| dimension.code() == code)
            .or_else(|| {
                LEGACY_DIMENSION_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == code)
                    .map(|(_, dimension)| *dimension)
            })
    }
}

impl fmt::Display for CompetencyDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Canonical rank class used to filter questions and technical keyword packs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleScope {
    Master,
    ChiefOfficer,
    DeckOfficer,
    ChiefEngineer,
    EngineOfficer,
    Eto,
    Rating,
    Catering,
    All,
}

impl RoleScope {
    pub const KNOWN: [RoleScope; 9] = [
        RoleScope::Master,
        RoleScope::ChiefOfficer,
        RoleScope::DeckOfficer,
        RoleScope::ChiefEngineer,
        RoleScope::EngineOfficer,
        RoleScope::Eto,
        RoleScope::Rating,
        RoleScope::Catering,
        RoleScope::All,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            RoleScope::Master => "MASTER",
            RoleScope::ChiefOfficer => "CHIEF_OFFICER",
            RoleScope::DeckOfficer => "DECK_OFFICER",
            RoleScope::ChiefEngineer => "CHIEF_ENGINEER",
            RoleScope::EngineOfficer => "ENGINE_OFFICER",
            RoleScope::Eto => "ETO",
            RoleScope::Rating => "RATING",
            RoleScope::Catering => "CATERING",
            RoleScope::All => "ALL",
        }
    }
}

impl fmt::Display for RoleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Operating area a question targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationScope {
    Sea,
    River,
    Both,
}

/// Vessel scope value meaning "any vessel type".
pub const ALL_VESSELS: &str = "all";

/// Role / vessel / operation triple used to select applicable questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeTriple {
    pub role: RoleScope,
    pub vessel: String,
    pub operation: OperationScope,
}

impl ScopeTriple {
    /// Role-specific scope with the generic vessel/operation defaults.
    pub fn for_role(role: RoleScope) -> Self {
        Self {
            role,
            vessel: ALL_VESSELS.to_string(),
            operation: OperationScope::Both,
        }
    }
}

/// Reference question definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyQuestion {
    pub id: String,
    pub dimension: CompetencyDimension,
    pub role_scope: RoleScope,
    #[serde(default = "all_vessels")]
    pub vessel_scope: String,
    #[serde(default = "both_operations")]
    pub operation_scope: OperationScope,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn all_vessels() -> String {
    ALL_VESSELS.to_string()
}

fn both_operations() -> OperationScope {
    OperationScope::Both
}

fn default_difficulty() -> u8 {
    1
}

fn active_by_default() -> bool {
    true
}

impl CompetencyQuestion {
    /// Generic questions apply everywhere; restricted ones only to their exact scope.
    pub fn applies_to(&self, scope: &ScopeTriple) -> bool {
        if !self.active {
            return false;
        }
        let role_ok = self.role_scope == RoleScope::All || self.role_scope == scope.role;
        let vessel_ok = self.vessel_scope.eq_ignore_ascii_case(ALL_VESSELS)
            || self.vessel_scope.eq_ignore_ascii_case(scope.vessel.trim());
        let operation_ok =
            self.operation_scope == OperationScope::Both || self.operation_scope == scope.operation;
        role_ok && vessel_ok && operation_ok
    }
}

/// Free-text answer tagged with the dimension code it was collected for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub dimension_code: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl Answer {
    pub fn new(dimension_code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            dimension_code: dimension_code.into(),
            text: Some(text.into()),
        }
    }

    pub fn dimension(&self) -> Option<CompetencyDimension> {
        CompetencyDimension::from_code(&self.dimension_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterviewId(pub String);

/// Interview as returned by the interview source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: InterviewId,
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Composite warning raised when a dimension scores under its configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetencyFlag {
    SafetyMindsetRisk,
    LeadershipGap,
    StressVulnerability,
    TeamworkFriction,
    CommunicationRisk,
    TechnicalGap,
}

impl CompetencyFlag {
    pub const fn code(self) -> &'static str {
        match self {
            CompetencyFlag::SafetyMindsetRisk => "SAFETY_MINDSET_RISK",
            CompetencyFlag::LeadershipGap => "LEADERSHIP_GAP",
            CompetencyFlag::StressVulnerability => "STRESS_VULNERABILITY",
            CompetencyFlag::TeamworkFriction => "TEAMWORK_FRICTION",
            CompetencyFlag::CommunicationRisk => "COMMUNICATION_RISK",
            CompetencyFlag::TechnicalGap => "TECHNICAL_GAP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagSeverity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetencyStatus {
    Strong,
    Moderate,
    Weak,
}

impl CompetencyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CompetencyStatus::Strong => "strong",
            CompetencyStatus::Moderate => "moderate",
            CompetencyStatus::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionNote {
    pub dimension: CompetencyDimension,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagReason {
    pub flag: CompetencyFlag,
    pub severity: FlagSeverity,
    pub reason: String,
}

/// Human-readable trail explaining a competency result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub strengths: Vec<DimensionNote>,
    pub concerns: Vec<DimensionNote>,
    pub flag_reasons: Vec<FlagReason>,
    pub bullets: Vec<String>,
}

/// Full result of one competency computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyOutcome {
    pub assessment_id: Option<AssessmentId>,
    pub candidate_id: CandidateId,
    pub interview_id: InterviewId,
    pub scope: ScopeTriple,
    pub fleet_type: Option<String>,
    pub score_total: f64,
    pub score_before_depth: f64,
    pub depth_uplift: f64,
    pub status: CompetencyStatus,
    pub dimension_scores: BTreeMap<CompetencyDimension, f64>,
    pub flags: Vec<CompetencyFlag>,
    pub evidence: Evidence,
    pub question_scores: Vec<QuestionScore>,
    pub language: Language,
    pub language_confidence: f64,
    pub coverage: f64,
    pub questions_evaluated: usize,
    pub technical_depth: Option<TechnicalDepth>,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Append-only record written once per computation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyAssessment {
    pub candidate_id: CandidateId,
    pub interview_id: InterviewId,
    pub score_total: f64,
    pub status: CompetencyStatus,
    pub dimension_scores: BTreeMap<CompetencyDimension, f64>,
    pub flags: Vec<CompetencyFlag>,
    pub evidence: Evidence,
    pub question_scores: Vec<QuestionScore>,
    pub computed_at: DateTime<Utc>,
}

impl From<&CompetencyOutcome> for CompetencyAssessment {
    fn from(outcome: &CompetencyOutcome) -> Self {
        Self {
            candidate_id: outcome.candidate_id.clone(),
            interview_id: outcome.interview_id.clone(),
            score_total: outcome.score_total,
            status: outcome.status,
            dimension_scores: outcome.dimension_scores.clone(),
            flags: outcome.flags.clone(),
            evidence: outcome.evidence.clone(),
            question_scores: outcome.question_scores.clone(),
            computed_at: outcome.computed_at,
        }
    }
}
