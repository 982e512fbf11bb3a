use super::records::{CandidateId, CandidateProfile, TrustEvent, TrustProfile, TrustProfilePatch};
use crate::workflows::competency::{
    AssessmentId, CompetencyAssessment, CompetencyQuestion, InterviewRecord, ScopeTriple,
};
use crate::workflows::stability::{CandidateContract, PromotionGap};

/// Error enumeration for storage and lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub trait CandidateDirectory: Send + Sync {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError>;
}

pub trait InterviewSource: Send + Sync {
    /// Most recently completed interview, newest completion first.
    fn latest_completed(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<InterviewRecord>, RepositoryError>;
}

pub trait QuestionBank: Send + Sync {
    /// Active questions for the scope triple.
    fn applicable(&self, scope: &ScopeTriple) -> Result<Vec<CompetencyQuestion>, RepositoryError>;
}

pub trait ContractHistory: Send + Sync {
    /// Contracts ordered by start date.
    fn contracts(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<CandidateContract>, RepositoryError>;
}

pub trait PromotionGapSource: Send + Sync {
    fn promotion_gap(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<PromotionGap>, RepositoryError>;
}

/// Append-only log: every run adds a record, nothing is updated or removed.
pub trait AssessmentLog: Send + Sync {
    fn append(&self, record: CompetencyAssessment) -> Result<AssessmentId, RepositoryError>;
}

/// Last-write-wins rollup keyed by candidate, created lazily on first upsert.
pub trait TrustProfileStore: Send + Sync {
    fn upsert(
        &self,
        candidate_id: &CandidateId,
        patch: TrustProfilePatch,
    ) -> Result<TrustProfile, RepositoryError>;
    fn fetch(&self, candidate_id: &CandidateId) -> Result<Option<TrustProfile>, RepositoryError>;
}

pub trait TrustEventLog: Send + Sync {
    fn append(&self, event: TrustEvent) -> Result<(), RepositoryError>;
}
