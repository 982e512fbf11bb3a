use serde::{Deserialize, Serialize};

use super::super::config::RubricConfig;
use super::super::domain::{Answer, CompetencyDimension, CompetencyQuestion};
use super::super::lexicon::{AnalyzedText, ResolvedLexicon};

/// Per-question rubric detail, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub question_id: String,
    pub dimension: CompetencyDimension,
    pub score: u32,
    pub max_score: u32,
    pub word_count: usize,
    pub keyword_hits: usize,
    pub matched_keywords: Vec<String>,
    pub has_example: bool,
    pub has_outcome: bool,
    pub has_ownership: bool,
}

impl QuestionScore {
    fn unanswered(question: &CompetencyQuestion, max_score: u32) -> Self {
        Self {
            question_id: question.id.clone(),
            dimension: question.dimension,
            score: 0,
            max_score,
            word_count: 0,
            keyword_hits: 0,
            matched_keywords: Vec::new(),
            has_example: false,
            has_outcome: false,
            has_ownership: false,
        }
    }
}

/// Apply the additive rubric to one answer.
pub(crate) fn score_answer(
    question: &CompetencyQuestion,
    answer: Option<&Answer>,
    lexicon: &ResolvedLexicon,
    rubric: &RubricConfig,
) -> QuestionScore {
    let max_score = rubric.max_question_score;
    let text = match answer.and_then(|answer| answer.text.as_deref()) {
        Some(text) if text.trim().chars().count() >= rubric.min_answer_length => text,
        _ => return QuestionScore::unanswered(question, max_score),
    };

    let analyzed = AnalyzedText::new(text);
    let word_count = analyzed.word_count();

    let mut score: u32 = if word_count >= rubric.long_answer_words { 2 } else { 1 };

    let has_example = !lexicon
        .matches(&analyzed, lexicon.example_markers())
        .is_empty();
    let has_outcome = !lexicon
        .matches(&analyzed, lexicon.outcome_markers())
        .is_empty();
    if has_example && has_outcome {
        score += 1;
    }

    let matched_keywords = lexicon.matches(&analyzed, lexicon.keywords(question.dimension));
    let keyword_hits = matched_keywords.len();
    if keyword_hits >= rubric.keyword_hit_threshold {
        score += 1;
    }

    let has_ownership = !lexicon
        .matches(&analyzed, lexicon.ownership_markers())
        .is_empty();
    if has_ownership {
        score += 1;
    }

    QuestionScore {
        question_id: question.id.clone(),
        dimension: question.dimension,
        score: score.min(max_score),
        max_score,
        word_count,
        keyword_hits,
        matched_keywords,
        has_example,
        has_outcome,
        has_ownership,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::competency::domain::RoleScope;
    use crate::workflows::competency::language::Language;
    use crate::workflows::competency::lexicon::Lexicon;

    fn question(dimension: CompetencyDimension) -> CompetencyQuestion {
        CompetencyQuestion {
            id: format!("q-{}", dimension.code().to_lowercase()),
            dimension,
            role_scope: RoleScope::All,
            vessel_scope: "all".to_string(),
            operation_scope: crate::workflows::competency::domain::OperationScope::Both,
            difficulty: 1,
            prompt: String::new(),
            active: true,
        }
    }

    fn score(text: &str, rubric: &RubricConfig) -> QuestionScore {
        let lexicon = Lexicon::default().resolve(Language::En);
        let answer = Answer::new("DISCIPLINE", text);
        score_answer(
            &question(CompetencyDimension::Discipline),
            Some(&answer),
            &lexicon,
            rubric,
        )
    }

    #[test]
    fn short_answer_scores_zero_without_keyword_hits() {
        let outcome = score("safe.", &RubricConfig::default());
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.keyword_hits, 0);
        assert!(outcome.matched_keywords.is_empty());
    }

    #[test]
    fn missing_text_scores_zero() {
        let lexicon = Lexicon::default().resolve(Language::En);
        let answer = Answer {
            dimension_code: "DISCIPLINE".to_string(),
            text: None,
        };
        let outcome = score_answer(
            &question(CompetencyDimension::Discipline),
            Some(&answer),
            &lexicon,
            &RubricConfig::default(),
        );
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.max_score, 5);
    }

    #[test]
    fn brief_answer_without_markers_earns_base_point() {
        let outcome = score("I always try to do my best", &RubricConfig::default());
        assert_eq!(outcome.score, 1);
        assert!(!outcome.has_example);
    }

    #[test]
    fn full_answer_earns_every_rubric_point_within_cap() {
        let text = "For example on my previous vessel I decided to stop the job because the \
                    permit to work was missing and the checklist was not signed. As a result \
                    the procedure was followed and nobody was hurt during the repair.";
        let outcome = score(text, &RubricConfig::default());
        assert!(outcome.word_count >= 20);
        assert!(outcome.has_example && outcome.has_outcome && outcome.has_ownership);
        assert!(outcome.keyword_hits >= 2);
        assert_eq!(outcome.score, 5);

        let tight = RubricConfig {
            max_question_score: 3,
            ..RubricConfig::default()
        };
        assert_eq!(score(text, &tight).score, 3);
    }
}
