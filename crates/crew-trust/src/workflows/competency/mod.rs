//! Competency scoring: rank-to-scope mapping, the additive answer rubric, technical depth
//! adjustment and the orchestrating engine.

mod config;
pub mod domain;
mod engine;
mod evidence;
pub mod language;
pub mod lexicon;
pub mod rank_scope;
pub mod scorer;

#[cfg(test)]
mod tests;

pub use config::{
    CompetencyConfig, EvidenceThresholds, FlagRule, LanguageConfig, RubricConfig,
    StatusThresholds, TechnicalDepthConfig,
};
pub use domain::{
    Answer, AssessmentId, CompetencyAssessment, CompetencyDimension, CompetencyFlag,
    CompetencyOutcome, CompetencyQuestion, CompetencyStatus, DimensionNote, Evidence,
    FlagReason, FlagSeverity, InterviewId, InterviewRecord, OperationScope, RoleScope,
    ScopeTriple, ALL_VESSELS, LEGACY_DIMENSION_ALIASES,
};
pub use engine::{CompetencyEngine, CompetencySinks, CompetencySources};
pub use language::{DetectedLanguage, Language};
pub use rank_scope::{canonical_rank_code, role_scope_for_rank};
pub use scorer::{CompetencyScore, CompetencyScorer, DepthTier, QuestionScore, TechnicalDepth};
