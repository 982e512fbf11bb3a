use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use super::domain::{CompetencyAssessment, CompetencyOutcome, ScopeTriple};
use super::evidence::{build_evidence, detect_flags, resolve_status};
use super::rank_scope::role_scope_for_rank;
use super::scorer::CompetencyScorer;
use crate::config::ScoringConfig;
use crate::workflows::fault::{fail_open, ComputationError};
use crate::workflows::trust::{
    AssessmentLog, CandidateDirectory, CandidateId, Clock, InterviewSource, QuestionBank,
    SystemClock, TrustEvent, TrustEventKind, TrustEventLog, TrustProfilePatch, TrustProfileStore,
};

/// Read-side collaborators for competency computation.
#[derive(Clone)]
pub struct CompetencySources {
    pub candidates: Arc<dyn CandidateDirectory>,
    pub interviews: Arc<dyn InterviewSource>,
    pub questions: Arc<dyn QuestionBank>,
}

/// Write-side collaborators: the append-only assessment log, the profile rollup and the audit log.
#[derive(Clone)]
pub struct CompetencySinks {
    pub assessments: Arc<dyn AssessmentLog>,
    pub profiles: Arc<dyn TrustProfileStore>,
    pub events: Arc<dyn TrustEventLog>,
}

/// Orchestrates one competency computation per call. Fail-open: faults yield `None`.
pub struct CompetencyEngine {
    scoring: Arc<ScoringConfig>,
    scorer: CompetencyScorer,
    sources: CompetencySources,
    sinks: CompetencySinks,
    clock: Arc<dyn Clock>,
}

impl CompetencyEngine {
    pub fn new(
        scoring: Arc<ScoringConfig>,
        sources: CompetencySources,
        sinks: CompetencySinks,
    ) -> Self {
        let scorer = CompetencyScorer::new(scoring.competency.clone());
        Self {
            scoring,
            scorer,
            sources,
            sinks,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Compute, persist and audit a competency result for the candidate's latest interview.
    ///
    /// `None` is a normal outcome: no candidate, no completed interview, no applicable questions
    /// or an internal fault (logged).
    pub fn compute(&self, candidate_id: &CandidateId) -> Option<CompetencyOutcome> {
        fail_open("competency", candidate_id, || self.try_compute(candidate_id))
    }

    fn try_compute(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<CompetencyOutcome>, ComputationError> {
        let Some(candidate) = self.sources.candidates.candidate(candidate_id)? else {
            debug!(candidate_id = %candidate_id, "candidate not found");
            return Ok(None);
        };

        let interview = match self.sources.interviews.latest_completed(candidate_id)? {
            Some(interview) if !interview.answers.is_empty() => interview,
            _ => {
                debug!(candidate_id = %candidate_id, "no completed interview with answers");
                return Ok(None);
            }
        };

        let role = role_scope_for_rank(candidate.rank.as_deref().unwrap_or_default());
        let scope = ScopeTriple::for_role(role);
        let questions = self.sources.questions.applicable(&scope)?;
        let fleet_type = candidate.fleet_type.clone();
        let weights = self.scoring.calibrated_weights(fleet_type.as_deref());

        let score = self
            .scorer
            .score(&interview.answers, &scope, &questions, weights.as_ref());
        if score.questions_evaluated == 0 {
            debug!(candidate_id = %candidate_id, role_scope = %role, "no questions evaluated");
            return Ok(None);
        }
        if !score.score_total.is_finite() {
            return Err(ComputationError::NonFinite {
                stage: "competency scorer",
            });
        }

        let config = self.scorer.config();
        let flags = detect_flags(&score, config);
        let evidence = build_evidence(&score, &flags, config);
        let status = resolve_status(score.score_total, &config.status);

        let mut outcome = CompetencyOutcome {
            assessment_id: None,
            candidate_id: candidate_id.clone(),
            interview_id: interview.id.clone(),
            scope,
            fleet_type,
            score_total: score.score_total,
            score_before_depth: score.score_before_depth,
            depth_uplift: score.depth_uplift,
            status,
            dimension_scores: score.dimension_scores,
            flags,
            evidence,
            question_scores: score.question_scores,
            language: score.language,
            language_confidence: score.language_confidence,
            coverage: score.coverage,
            questions_evaluated: score.questions_evaluated,
            technical_depth: score.technical_depth,
            computed_at: self.clock.now(),
        };

        let assessment_id = self
            .sinks
            .assessments
            .append(CompetencyAssessment::from(&outcome))?;
        outcome.assessment_id = Some(assessment_id.clone());

        self.sinks.profiles.upsert(
            candidate_id,
            TrustProfilePatch::Competency {
                score: outcome.score_total,
                status: outcome.status,
                computed_at: outcome.computed_at,
                detail: serde_json::to_value(&outcome)?,
            },
        )?;

        self.sinks.events.append(TrustEvent {
            candidate_id: candidate_id.clone(),
            kind: TrustEventKind::CompetencyComputed,
            payload: json!({
                "assessment_id": assessment_id.0,
                "interview_id": outcome.interview_id.0,
                "score_total": outcome.score_total,
                "status": outcome.status.label(),
                "flags": outcome.flags,
                "questions_evaluated": outcome.questions_evaluated,
                "depth_uplift": outcome.depth_uplift,
                "language": outcome.language.tag(),
            }),
            created_at: outcome.computed_at,
        })?;

        info!(
            candidate_id = %candidate_id,
            score_total = outcome.score_total,
            status = outcome.status.label(),
            flags = outcome.flags.len(),
            "competency computed"
        );

        Ok(Some(outcome))
    }
}
