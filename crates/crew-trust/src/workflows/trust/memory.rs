//! In-memory implementations of the repository traits for the CLI runner and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::records::{CandidateId, CandidateProfile, TrustEvent, TrustProfile, TrustProfilePatch};
use super::repository::{
    AssessmentLog, CandidateDirectory, ContractHistory, InterviewSource, PromotionGapSource,
    QuestionBank, RepositoryError, TrustEventLog, TrustProfileStore,
};
use crate::workflows::competency::{
    AssessmentId, CompetencyAssessment, CompetencyQuestion, InterviewRecord, ScopeTriple,
};
use crate::workflows::stability::{CandidateContract, PromotionGap};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default, Clone)]
pub struct InMemoryCandidates {
    records: Arc<Mutex<HashMap<CandidateId, CandidateProfile>>>,
}

impl InMemoryCandidates {
    pub fn insert(&self, profile: CandidateProfile) -> Result<(), RepositoryError> {
        lock(&self.records)?.insert(profile.id.clone(), profile);
        Ok(())
    }
}

impl CandidateDirectory for InMemoryCandidates {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryInterviews {
    records: Arc<Mutex<Vec<InterviewRecord>>>,
}

impl InMemoryInterviews {
    pub fn insert(&self, interview: InterviewRecord) -> Result<(), RepositoryError> {
        lock(&self.records)?.push(interview);
        Ok(())
    }
}

impl InterviewSource for InMemoryInterviews {
    fn latest_completed(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<InterviewRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .iter()
            .filter(|interview| &interview.candidate_id == candidate_id)
            .filter(|interview| interview.completed_at.is_some() && !interview.answers.is_empty())
            .max_by_key(|interview| interview.completed_at)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryQuestionBank {
    questions: Arc<Mutex<Vec<CompetencyQuestion>>>,
}

impl InMemoryQuestionBank {
    pub fn with_questions(questions: Vec<CompetencyQuestion>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(questions)),
        }
    }
}

impl QuestionBank for InMemoryQuestionBank {
    fn applicable(&self, scope: &ScopeTriple) -> Result<Vec<CompetencyQuestion>, RepositoryError> {
        Ok(lock(&self.questions)?
            .iter()
            .filter(|question| question.applies_to(scope))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryContracts {
    records: Arc<Mutex<HashMap<CandidateId, Vec<CandidateContract>>>>,
}

impl InMemoryContracts {
    pub fn insert(
        &self,
        candidate_id: CandidateId,
        contracts: Vec<CandidateContract>,
    ) -> Result<(), RepositoryError> {
        lock(&self.records)?.insert(candidate_id, contracts);
        Ok(())
    }
}

impl ContractHistory for InMemoryContracts {
    fn contracts(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<CandidateContract>, RepositoryError> {
        let mut contracts = lock(&self.records)?
            .get(candidate_id)
            .cloned()
            .unwrap_or_default();
        contracts.sort_by_key(|contract| contract.start_date);
        Ok(contracts)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryPromotionGaps {
    records: Arc<Mutex<HashMap<CandidateId, PromotionGap>>>,
}

impl InMemoryPromotionGaps {
    pub fn insert(&self, candidate_id: CandidateId, gap: PromotionGap) -> Result<(), RepositoryError> {
        lock(&self.records)?.insert(candidate_id, gap);
        Ok(())
    }
}

impl PromotionGapSource for InMemoryPromotionGaps {
    fn promotion_gap(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<PromotionGap>, RepositoryError> {
        Ok(lock(&self.records)?.get(candidate_id).cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryAssessmentLog {
    records: Arc<Mutex<Vec<(AssessmentId, CompetencyAssessment)>>>,
}

impl InMemoryAssessmentLog {
    pub fn records(&self) -> Vec<(AssessmentId, CompetencyAssessment)> {
        self.records
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl AssessmentLog for InMemoryAssessmentLog {
    fn append(&self, record: CompetencyAssessment) -> Result<AssessmentId, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let id = AssessmentId(format!("assessment-{:06}", guard.len() + 1));
        guard.push((id.clone(), record));
        Ok(id)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryTrustProfiles {
    records: Arc<Mutex<HashMap<CandidateId, TrustProfile>>>,
}

impl TrustProfileStore for InMemoryTrustProfiles {
    fn upsert(
        &self,
        candidate_id: &CandidateId,
        patch: TrustProfilePatch,
    ) -> Result<TrustProfile, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let profile = guard
            .entry(candidate_id.clone())
            .or_insert_with(|| TrustProfile::new(candidate_id.clone(), patch.computed_at()));
        profile.apply(patch);
        Ok(profile.clone())
    }

    fn fetch(&self, candidate_id: &CandidateId) -> Result<Option<TrustProfile>, RepositoryError> {
        Ok(lock(&self.records)?.get(candidate_id).cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryTrustEvents {
    events: Arc<Mutex<Vec<TrustEvent>>>,
}

impl InMemoryTrustEvents {
    pub fn events(&self) -> Vec<TrustEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl TrustEventLog for InMemoryTrustEvents {
    fn append(&self, event: TrustEvent) -> Result<(), RepositoryError> {
        lock(&self.events)?.push(event);
        Ok(())
    }
}
