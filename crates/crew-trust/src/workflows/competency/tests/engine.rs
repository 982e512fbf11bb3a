use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::config::{FleetProfile, ScoringConfig};
use crate::workflows::competency::{
    Answer, CompetencyDimension, CompetencyFlag, CompetencyStatus, RoleScope,
};
use crate::workflows::trust::{CandidateId, TrustEventKind, TrustProfileStore, COMPETENCY_DETAIL_KEY};

#[test]
fn compute_persists_assessment_profile_and_event() {
    let harness = Harness::new(ScoringConfig::default());
    harness.seed(candidate("cand-1", "Bosun"), strong_answers());

    let outcome = harness
        .engine
        .compute(&CandidateId::new("cand-1"))
        .expect("competency outcome");

    assert_eq!(outcome.scope.role, RoleScope::Rating);
    assert_eq!(outcome.questions_evaluated, 6);
    assert_eq!(outcome.status, CompetencyStatus::Strong);
    assert!(outcome.flags.is_empty());
    assert!(outcome.assessment_id.is_some());

    let records = harness.assessments.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].1.score_total, outcome.score_total);

    let profile = harness
        .profiles
        .fetch(&CandidateId::new("cand-1"))
        .expect("fetch")
        .expect("profile created");
    assert_eq!(profile.competency_score, Some(outcome.score_total));
    assert_eq!(profile.competency_status, Some(CompetencyStatus::Strong));
    let detail = &profile.detail[COMPETENCY_DETAIL_KEY];
    assert_eq!(detail["score_total"], json!(outcome.score_total));

    let events = harness.events.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, TrustEventKind::CompetencyComputed);
    assert_eq!(events[0].payload["status"], json!("strong"));
}

#[test]
fn repeated_runs_append_new_assessments_with_identical_scores() {
    let harness = Harness::new(ScoringConfig::default());
    harness.seed(candidate("cand-2", "AB"), strong_answers());
    let id = CandidateId::new("cand-2");

    let first = harness.engine.compute(&id).expect("first run");
    let second = harness.engine.compute(&id).expect("second run");

    let records = harness.assessments.records();
    assert_eq!(records.len(), 2);
    assert_ne!(records[0].0, records[1].0);
    assert_ne!(first.assessment_id, second.assessment_id);

    assert_eq!(first.score_total, second.score_total);
    assert_eq!(first.dimension_scores, second.dimension_scores);
    assert_eq!(first.question_scores, second.question_scores);
    assert_eq!(harness.events.events().len(), 2);
}

#[test]
fn unknown_rank_never_sees_master_questions() {
    let harness = Harness::new(ScoringConfig::default());
    harness.seed(candidate("cand-3", "Chief Wizard"), strong_answers());

    let outcome = harness
        .engine
        .compute(&CandidateId::new("cand-3"))
        .expect("generic questions still apply");

    assert_eq!(outcome.scope.role, RoleScope::All);
    assert!(outcome.technical_depth.is_none());
    assert!(outcome
        .question_scores
        .iter()
        .all(|score| score.question_id != "q-master-command"));
}

#[test]
fn master_rank_receives_restricted_questions() {
    let harness = Harness::new(ScoringConfig::default());
    harness.seed(candidate("cand-4", "Captain"), strong_answers());

    let outcome = harness
        .engine
        .compute(&CandidateId::new("cand-4"))
        .expect("outcome");

    assert_eq!(outcome.scope.role, RoleScope::Master);
    assert_eq!(outcome.questions_evaluated, 7);
    assert!(outcome
        .question_scores
        .iter()
        .any(|score| score.question_id == "q-master-command"));
}

#[test]
fn weak_answers_raise_flags_and_weak_status() {
    let harness = Harness::new(ScoringConfig::default());
    let answers = vec![
        Answer::new("DISCIPLINE", "ok"),
        Answer::new("TECH_PRACTICAL", "I do my work."),
    ];
    harness.seed(candidate("cand-5", "Oiler"), answers);

    let outcome = harness
        .engine
        .compute(&CandidateId::new("cand-5"))
        .expect("outcome");

    assert_eq!(outcome.status, CompetencyStatus::Weak);
    assert!(outcome.flags.contains(&CompetencyFlag::SafetyMindsetRisk));
    assert!(outcome.flags.contains(&CompetencyFlag::TechnicalGap));
    assert!(!outcome.evidence.concerns.is_empty());
    assert!(!outcome.evidence.flag_reasons.is_empty());
}

#[test]
fn missing_candidate_or_interview_returns_none() {
    let harness = Harness::new(ScoringConfig::default());
    assert!(harness.engine.compute(&CandidateId::new("ghost")).is_none());

    harness
        .candidates
        .insert(candidate("cand-6", "AB"))
        .expect("seed candidate");
    assert!(harness.engine.compute(&CandidateId::new("cand-6")).is_none());
    assert!(harness.assessments.records().is_empty());
    assert!(harness.events.events().is_empty());
}

#[test]
fn repository_failures_fail_open() {
    let harness = Harness::with_directory(ScoringConfig::default(), Some(Arc::new(OfflineDirectory)));
    assert!(harness.engine.compute(&CandidateId::new("cand-7")).is_none());

    let harness =
        Harness::with_directory(ScoringConfig::default(), Some(Arc::new(PanickingDirectory)));
    assert!(harness.engine.compute(&CandidateId::new("cand-7")).is_none());
    assert!(harness.assessments.records().is_empty());
}

#[test]
fn fleet_profile_weights_are_applied() {
    let mut scoring = ScoringConfig::default();
    scoring.fleet_profiles.insert(
        "tanker".to_string(),
        FleetProfile {
            dimension_weights: [(CompetencyDimension::Teamwork, 3.0)].into_iter().collect(),
            ..FleetProfile::default()
        },
    );
    let harness = Harness::new(scoring);

    let mut tanker = candidate("cand-8", "AB");
    tanker.fleet_type = Some("Tanker".to_string());
    harness.seed(tanker, strong_answers());
    harness.seed(candidate("cand-9", "AB"), strong_answers());

    let weighted = harness.engine.compute(&CandidateId::new("cand-8")).expect("tanker");
    let neutral = harness.engine.compute(&CandidateId::new("cand-9")).expect("default");

    assert_eq!(weighted.fleet_type.as_deref(), Some("Tanker"));
    assert!(weighted.score_total < neutral.score_total);
}
