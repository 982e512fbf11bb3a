//! Technical depth layer: rank-specific vocabulary lifts TECH_PRACTICAL within hard caps.

use serde::{Deserialize, Serialize};

use super::super::config::TechnicalDepthConfig;
use super::super::lexicon::{is_phrase, AnalyzedText, DepthPack, ResolvedLexicon};
use super::round1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthTier {
    Shallow,
    Moderate,
    Deep,
}

/// Audit record for the depth layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalDepth {
    pub index: f64,
    pub tier: DepthTier,
    pub primary_hits: usize,
    pub secondary_hits: usize,
    pub tertiary_hits: usize,
    pub phrase_hits: usize,
    pub matched_terms: Vec<String>,
    pub applied: bool,
    pub floor_applied: bool,
    pub bonus_applied: bool,
    pub cap: f64,
    pub tech_before: Option<f64>,
    pub tech_after: Option<f64>,
}

impl TechnicalDepth {
    fn total_hits(&self) -> usize {
        self.primary_hits + self.secondary_hits + self.tertiary_hits
    }
}

/// Measure keyword density, category diversity and phrase specificity against a pack.
pub(crate) fn measure(
    text: &AnalyzedText,
    pack: &DepthPack,
    lexicon: &ResolvedLexicon,
    config: &TechnicalDepthConfig,
) -> TechnicalDepth {
    let primary = lexicon.matches(text, &pack.primary);
    let secondary = lexicon.matches(text, &pack.secondary);
    let tertiary = lexicon.matches(text, &pack.tertiary);

    let mut matched_terms: Vec<String> = Vec::new();
    for term in primary.iter().chain(&secondary).chain(&tertiary) {
        if !matched_terms.contains(term) {
            matched_terms.push(term.clone());
        }
    }
    let phrase_hits = matched_terms.iter().filter(|term| is_phrase(term)).count();

    let mut depth = TechnicalDepth {
        index: 0.0,
        tier: DepthTier::Shallow,
        primary_hits: primary.len(),
        secondary_hits: secondary.len(),
        tertiary_hits: tertiary.len(),
        phrase_hits,
        matched_terms,
        applied: false,
        floor_applied: false,
        bonus_applied: false,
        cap: config.shallow_cap,
        tech_before: None,
        tech_after: None,
    };

    let total_hits = depth.total_hits();
    let words = text.word_count();
    let density = if words == 0 || config.target_hits_per_100_words <= 0.0 {
        0.0
    } else {
        let per_100 = total_hits as f64 / words as f64 * 100.0;
        (per_100 / config.target_hits_per_100_words).min(1.0)
    };
    let categories_hit = [depth.primary_hits, depth.secondary_hits, depth.tertiary_hits]
        .into_iter()
        .filter(|hits| *hits > 0)
        .count();
    let diversity = categories_hit as f64 / 3.0;
    let specificity = if total_hits == 0 {
        0.0
    } else {
        phrase_hits as f64 / total_hits as f64
    };

    let weight_sum = config.density_weight + config.diversity_weight + config.specificity_weight;
    let blended = if weight_sum > 0.0 {
        (config.density_weight * density
            + config.diversity_weight * diversity
            + config.specificity_weight * specificity)
            / weight_sum
    } else {
        0.0
    };
    depth.index = round1((blended * 100.0).clamp(0.0, 100.0));

    depth.tier = if depth.index >= config.deep_index {
        DepthTier::Deep
    } else if depth.index >= config.moderate_index {
        DepthTier::Moderate
    } else {
        DepthTier::Shallow
    };
    depth.cap = match depth.tier {
        DepthTier::Deep => config.deep_cap,
        DepthTier::Moderate => config.moderate_cap,
        DepthTier::Shallow => config.shallow_cap,
    };

    depth
}

/// Floor, bonus and tier cap for TECH_PRACTICAL. The cap never pushes below the rubric score.
pub(crate) fn adjust_tech_score(
    tech_score: f64,
    depth: &mut TechnicalDepth,
    config: &TechnicalDepthConfig,
) -> f64 {
    depth.tech_before = Some(tech_score);
    if depth.index < config.min_index {
        depth.tech_after = Some(tech_score);
        return tech_score;
    }
    depth.applied = true;

    let mut adjusted = tech_score;
    if depth.primary_hits >= config.min_primary_hits && adjusted < config.floor_score {
        adjusted = config.floor_score;
        depth.floor_applied = true;
    }
    if depth.secondary_hits >= config.min_secondary_hits
        && depth.tertiary_hits >= config.min_tertiary_hits
    {
        adjusted += config.bonus_points;
        depth.bonus_applied = true;
    }

    let ceiling = depth.cap.max(tech_score);
    let adjusted = round1(adjusted.min(ceiling).clamp(0.0, 100.0));
    depth.tech_after = Some(adjusted);
    adjusted
}
