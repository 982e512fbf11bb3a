mod depth;
mod rubric;

pub use depth::{DepthTier, TechnicalDepth};
pub use rubric::QuestionScore;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::CompetencyConfig;
use super::domain::{Answer, CompetencyDimension, CompetencyQuestion, ScopeTriple};
use super::language::{detect_language, Language};
use super::lexicon::{AnalyzedText, ResolvedLexicon};

/// Output of one scoring pass over a set of answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub score_total: f64,
    pub score_before_depth: f64,
    pub depth_uplift: f64,
    pub dimension_scores: BTreeMap<CompetencyDimension, f64>,
    pub question_scores: Vec<QuestionScore>,
    pub language: Language,
    pub language_confidence: f64,
    pub coverage: f64,
    pub evidence_keywords: BTreeMap<CompetencyDimension, Vec<String>>,
    pub questions_evaluated: usize,
    pub technical_depth: Option<TechnicalDepth>,
}

impl CompetencyScore {
    fn empty() -> Self {
        Self {
            score_total: 0.0,
            score_before_depth: 0.0,
            depth_uplift: 0.0,
            dimension_scores: BTreeMap::new(),
            question_scores: Vec::new(),
            language: Language::Unknown,
            language_confidence: 0.0,
            coverage: 0.0,
            evidence_keywords: BTreeMap::new(),
            questions_evaluated: 0,
            technical_depth: None,
        }
    }
}

/// Stateless scorer applying the rubric configuration to interview answers.
#[derive(Debug, Clone)]
pub struct CompetencyScorer {
    config: CompetencyConfig,
}

impl CompetencyScorer {
    pub fn new(config: CompetencyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompetencyConfig {
        &self.config
    }

    /// Score answers against the questions applicable to `scope`.
    ///
    /// Every question sharing a dimension is scored against the same answer: answers are
    /// collected per dimension, not per question.
    pub fn score(
        &self,
        answers: &[Answer],
        scope: &ScopeTriple,
        questions: &[CompetencyQuestion],
        weight_overrides: Option<&BTreeMap<CompetencyDimension, f64>>,
    ) -> CompetencyScore {
        let applicable: Vec<&CompetencyQuestion> = questions
            .iter()
            .filter(|question| question.applies_to(scope))
            .collect();
        if applicable.is_empty() {
            debug!(role_scope = %scope.role, "no applicable questions");
            return CompetencyScore::empty();
        }

        let combined = answers
            .iter()
            .filter_map(|answer| answer.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ");
        let detected = detect_language(&combined, &self.config.language);
        let lexicon = self.config.lexicon.resolve(detected.language);

        let mut by_dimension: BTreeMap<CompetencyDimension, &Answer> = BTreeMap::new();
        for answer in answers {
            if let Some(dimension) = answer.dimension() {
                by_dimension.entry(dimension).or_insert(answer);
            }
        }

        let question_scores: Vec<QuestionScore> = applicable
            .iter()
            .map(|question| {
                rubric::score_answer(
                    question,
                    by_dimension.get(&question.dimension).copied(),
                    &lexicon,
                    &self.config.rubric,
                )
            })
            .collect();

        let mut dimension_scores = aggregate_dimensions(&question_scores);
        let score_before_depth = self.weighted_total(&dimension_scores, weight_overrides);
        let mut score_total = score_before_depth;
        let mut depth_uplift = 0.0;

        let mut technical_depth = self.technical_depth(scope, &combined, &lexicon);
        if let (Some(measured), Some(tech)) = (
            technical_depth.as_mut(),
            dimension_scores
                .get(&CompetencyDimension::TechPractical)
                .copied(),
        ) {
            let adjusted =
                depth::adjust_tech_score(tech, measured, &self.config.technical_depth);
            if adjusted > tech {
                dimension_scores.insert(CompetencyDimension::TechPractical, adjusted);
                let naive = self.weighted_total(&dimension_scores, weight_overrides);
                let cap = self.config.technical_depth.max_total_score_uplift.max(0.0);
                let uplift = (naive - score_before_depth).clamp(0.0, cap);
                score_total = round1((score_before_depth + uplift).min(100.0));
                depth_uplift = round1(score_total - score_before_depth).min(cap);
                debug!(
                    depth_index = measured.index,
                    naive_total = naive,
                    depth_uplift,
                    "technical depth uplift applied"
                );
            }
        }

        let threshold = self.config.rubric.keyword_hit_threshold.max(1);
        let expected = (question_scores.len() * threshold) as f64;
        let hits: usize = question_scores.iter().map(|score| score.keyword_hits).sum();
        let coverage = round2((hits as f64 / expected).min(1.0));

        let evidence_keywords = collect_evidence(
            &question_scores,
            self.config.rubric.evidence_keywords_per_dimension,
        );

        CompetencyScore {
            score_total,
            score_before_depth,
            depth_uplift,
            dimension_scores,
            questions_evaluated: question_scores.len(),
            question_scores,
            language: detected.language,
            language_confidence: detected.confidence,
            coverage,
            evidence_keywords,
            technical_depth,
        }
    }

    fn weighted_total(
        &self,
        dimension_scores: &BTreeMap<CompetencyDimension, f64>,
        overrides: Option<&BTreeMap<CompetencyDimension, f64>>,
    ) -> f64 {
        let mut weighted = 0.0;
        let mut weights = 0.0;
        for (dimension, score) in dimension_scores {
            let weight = self.config.weight_for(*dimension, overrides);
            weighted += score * weight;
            weights += weight;
        }
        if weights <= 0.0 {
            return 0.0;
        }
        round1((weighted / weights).clamp(0.0, 100.0))
    }

    fn technical_depth(
        &self,
        scope: &ScopeTriple,
        combined: &str,
        lexicon: &ResolvedLexicon,
    ) -> Option<TechnicalDepth> {
        let config = &self.config.technical_depth;
        if !config.enabled || config.excluded_scopes.contains(&scope.role) {
            return None;
        }
        let pack = config.packs.get(&scope.role)?;
        if pack.term_count() == 0 {
            return None;
        }
        Some(depth::measure(
            &AnalyzedText::new(combined),
            pack,
            lexicon,
            config,
        ))
    }
}

fn aggregate_dimensions(scores: &[QuestionScore]) -> BTreeMap<CompetencyDimension, f64> {
    let mut sums: BTreeMap<CompetencyDimension, (u32, u32)> = BTreeMap::new();
    for score in scores {
        let entry = sums.entry(score.dimension).or_insert((0, 0));
        entry.0 += score.score;
        entry.1 += score.max_score;
    }
    sums.into_iter()
        .map(|(dimension, (earned, possible))| {
            let percent = if possible == 0 {
                0.0
            } else {
                round1(earned as f64 / possible as f64 * 100.0)
            };
            (dimension, percent)
        })
        .collect()
}

fn collect_evidence(
    scores: &[QuestionScore],
    per_dimension: usize,
) -> BTreeMap<CompetencyDimension, Vec<String>> {
    let mut evidence: BTreeMap<CompetencyDimension, Vec<String>> = BTreeMap::new();
    for score in scores {
        let keywords = evidence.entry(score.dimension).or_default();
        for keyword in &score.matched_keywords {
            if keywords.len() >= per_dimension {
                break;
            }
            if !keywords.contains(keyword) {
                keywords.push(keyword.clone());
            }
        }
    }
    evidence.retain(|_, keywords| !keywords.is_empty());
    evidence
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
