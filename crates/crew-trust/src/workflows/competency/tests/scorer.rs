use std::collections::BTreeMap;

use super::common::*;
use crate::workflows::competency::{
    Answer, CompetencyConfig, CompetencyDimension, CompetencyScorer, Language, RoleScope,
    ScopeTriple,
};

fn scorer() -> CompetencyScorer {
    CompetencyScorer::new(CompetencyConfig::default())
}

#[test]
fn no_applicable_questions_yield_an_empty_result() {
    let questions = vec![question(
        "q-master-only",
        CompetencyDimension::Leadership,
        RoleScope::Master,
    )];
    let result = scorer().score(
        &strong_answers(),
        &ScopeTriple::for_role(RoleScope::Rating),
        &questions,
        None,
    );

    assert_eq!(result.questions_evaluated, 0);
    assert_eq!(result.score_total, 0.0);
    assert!(result.dimension_scores.is_empty());
    assert!(result.question_scores.is_empty());
}

#[test]
fn answers_below_minimum_length_score_zero() {
    let questions = vec![question("q-comms", CompetencyDimension::Comms, RoleScope::All)];
    let result = scorer().score(
        &[Answer::new("COMMS", "radio")],
        &ScopeTriple::for_role(RoleScope::Rating),
        &questions,
        None,
    );

    assert_eq!(result.questions_evaluated, 1);
    let detail = &result.question_scores[0];
    assert_eq!(detail.score, 0);
    assert_eq!(detail.keyword_hits, 0);
    assert_eq!(result.dimension_scores[&CompetencyDimension::Comms], 0.0);
}

#[test]
fn strong_structured_answers_score_high() {
    let result = scorer().score(
        &strong_answers(),
        &ScopeTriple::for_role(RoleScope::Rating),
        &question_bank(),
        None,
    );

    assert_eq!(result.questions_evaluated, 6);
    assert_eq!(result.language, Language::En);
    assert_eq!(result.dimension_scores[&CompetencyDimension::Discipline], 100.0);
    assert_eq!(result.dimension_scores[&CompetencyDimension::Teamwork], 80.0);
    assert!(result.score_total >= 90.0, "total was {}", result.score_total);
    assert!(result.score_total <= 100.0);
    assert_eq!(result.coverage, 1.0);
    for keywords in result.evidence_keywords.values() {
        assert!(!keywords.is_empty() && keywords.len() <= 3);
    }
}

#[test]
fn one_answer_serves_every_question_in_its_dimension() {
    let questions = vec![
        question("q-lead-1", CompetencyDimension::Leadership, RoleScope::All),
        question("q-lead-2", CompetencyDimension::Leadership, RoleScope::All),
    ];
    let result = scorer().score(
        &strong_answers(),
        &ScopeTriple::for_role(RoleScope::DeckOfficer),
        &questions,
        None,
    );

    let first = &result.question_scores[0];
    let second = &result.question_scores[1];
    assert_ne!(first.question_id, second.question_id);
    assert_eq!(first.score, second.score);
    assert_eq!(first.matched_keywords, second.matched_keywords);
}

#[test]
fn legacy_dimension_codes_are_scored() {
    let answers = vec![Answer::new(
        "COMMUNICATION",
        "For example I reported the fault on the radio and informed the bridge, as a result the \
         watch officer explained the plan to the crew.",
    )];
    let questions = vec![question("q-comms", CompetencyDimension::Comms, RoleScope::All)];
    let result = scorer().score(
        &answers,
        &ScopeTriple::for_role(RoleScope::Rating),
        &questions,
        None,
    );

    assert!(result.question_scores[0].score >= 3);
    assert!(result.dimension_scores[&CompetencyDimension::Comms] > 0.0);
}

#[test]
fn weight_overrides_shift_the_total() {
    let answers = vec![
        Answer::new("DISCIPLINE", strong_answers()[0].text.clone().unwrap_or_default()),
        Answer::new("TEAMWORK", "We did the job."),
    ];
    let questions = vec![
        question("q-disc", CompetencyDimension::Discipline, RoleScope::All),
        question("q-team", CompetencyDimension::Teamwork, RoleScope::All),
    ];
    let scope = ScopeTriple::for_role(RoleScope::Catering);
    let neutral = scorer().score(&answers, &scope, &questions, None);

    let overrides = BTreeMap::from([
        (CompetencyDimension::Discipline, 0.9),
        (CompetencyDimension::Teamwork, 0.1),
    ]);
    let tilted = scorer().score(&answers, &scope, &questions, Some(&overrides));

    assert!(tilted.score_total > neutral.score_total);
    assert!(tilted.technical_depth.is_none());
}

const STUFFED_TECH_ANSWER: &str = "mooring winch painting chipping lashing gangway ppe toolbox talk \
    permit to work enclosed space rescue watchkeeping lookout helm fire drill lifeboat";

#[test]
fn keyword_stuffing_cannot_exceed_the_uplift_cap() {
    let answers = vec![Answer::new("TECH_PRACTICAL", STUFFED_TECH_ANSWER)];
    let scope = ScopeTriple::for_role(RoleScope::Rating);

    // Under the default cap the same answer lifts the total by four points.
    let uncapped = scorer().score(&answers, &scope, &question_bank(), None);
    assert!((uncapped.depth_uplift - 4.0).abs() < 1e-9);
    assert!((uncapped.score_total - uncapped.score_before_depth - 4.0).abs() < 1e-9);

    let mut config = CompetencyConfig::default();
    config.technical_depth.max_total_score_uplift = 1.0;
    let result = CompetencyScorer::new(config).score(&answers, &scope, &question_bank(), None);

    let depth = result.technical_depth.as_ref().expect("rating scope measures depth");
    assert!(depth.applied);
    assert!(depth.primary_hits >= 2);
    assert_eq!(result.score_before_depth, uncapped.score_before_depth);
    assert_eq!(result.depth_uplift, 1.0);
    assert!((result.score_total - result.score_before_depth - 1.0).abs() < 1e-9);
}

#[test]
fn default_uplift_stays_within_five_points() {
    let mut answers = strong_answers();
    answers.retain(|answer| answer.dimension_code != "TECH_PRACTICAL");
    answers.push(Answer::new("TECH_PRACTICAL", STUFFED_TECH_ANSWER));
    let result = scorer().score(
        &answers,
        &ScopeTriple::for_role(RoleScope::Rating),
        &question_bank(),
        None,
    );

    assert!(result.depth_uplift >= 0.0);
    assert!(result.depth_uplift <= 5.0);
    assert!(result.score_total >= result.score_before_depth);
}
