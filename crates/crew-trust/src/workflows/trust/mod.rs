//! Shared persistence boundary: candidate lookups, the append-only assessment and event logs and
//! the per-candidate trust profile rollup both engines write to.

mod clock;
pub mod memory;
pub mod records;
pub mod repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use records::{
    CandidateId, CandidateProfile, TrustEvent, TrustEventKind, TrustProfile, TrustProfilePatch,
    COMPETENCY_DETAIL_KEY, STABILITY_DETAIL_KEY,
};
pub use repository::{
    AssessmentLog, CandidateDirectory, ContractHistory, InterviewSource, PromotionGapSource,
    QuestionBank, RepositoryError, TrustEventLog, TrustProfileStore,
};
