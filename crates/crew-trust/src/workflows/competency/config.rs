use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{CompetencyDimension, CompetencyFlag, RoleScope};
use super::lexicon::{DepthPack, Lexicon};

/// Rubric configuration for competency scoring. Every field has an in-code default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetencyConfig {
    pub rubric: RubricConfig,
    pub dimension_weights: BTreeMap<CompetencyDimension, f64>,
    pub default_dimension_weight: f64,
    pub flags: BTreeMap<CompetencyFlag, FlagRule>,
    pub critical_flags: Vec<CompetencyFlag>,
    pub status: StatusThresholds,
    pub evidence: EvidenceThresholds,
    pub language: LanguageConfig,
    pub lexicon: Lexicon,
    pub technical_depth: TechnicalDepthConfig,
}

impl Default for CompetencyConfig {
    fn default() -> Self {
        let dimension_weights = BTreeMap::from([
            (CompetencyDimension::Discipline, 0.20),
            (CompetencyDimension::Leadership, 0.15),
            (CompetencyDimension::Stress, 0.15),
            (CompetencyDimension::Teamwork, 0.15),
            (CompetencyDimension::Comms, 0.15),
            (CompetencyDimension::TechPractical, 0.20),
        ]);

        let flags = [
            (CompetencyFlag::SafetyMindsetRisk, CompetencyDimension::Discipline),
            (CompetencyFlag::LeadershipGap, CompetencyDimension::Leadership),
            (CompetencyFlag::StressVulnerability, CompetencyDimension::Stress),
            (CompetencyFlag::TeamworkFriction, CompetencyDimension::Teamwork),
            (CompetencyFlag::CommunicationRisk, CompetencyDimension::Comms),
            (CompetencyFlag::TechnicalGap, CompetencyDimension::TechPractical),
        ]
        .into_iter()
        .map(|(flag, dimension)| {
            (
                flag,
                FlagRule {
                    dimension,
                    threshold: 40.0,
                },
            )
        })
        .collect();

        Self {
            rubric: RubricConfig::default(),
            dimension_weights,
            default_dimension_weight: 0.15,
            flags,
            critical_flags: vec![CompetencyFlag::SafetyMindsetRisk, CompetencyFlag::TechnicalGap],
            status: StatusThresholds::default(),
            evidence: EvidenceThresholds::default(),
            language: LanguageConfig::default(),
            lexicon: Lexicon::default(),
            technical_depth: TechnicalDepthConfig::default(),
        }
    }
}

impl CompetencyConfig {
    /// Weight for a dimension, preferring a caller override, then configured weights.
    pub fn weight_for(
        &self,
        dimension: CompetencyDimension,
        overrides: Option<&BTreeMap<CompetencyDimension, f64>>,
    ) -> f64 {
        overrides
            .and_then(|weights| weights.get(&dimension))
            .or_else(|| self.dimension_weights.get(&dimension))
            .copied()
            .filter(|weight| weight.is_finite() && *weight >= 0.0)
            .unwrap_or(self.default_dimension_weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricConfig {
    /// Answers shorter than this many characters score zero.
    pub min_answer_length: usize,
    pub long_answer_words: usize,
    pub max_question_score: u32,
    pub keyword_hit_threshold: usize,
    pub evidence_keywords_per_dimension: usize,
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self {
            min_answer_length: 10,
            long_answer_words: 20,
            max_question_score: 5,
            keyword_hit_threshold: 2,
            evidence_keywords_per_dimension: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlagRule {
    pub dimension: CompetencyDimension,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    pub strong: f64,
    pub moderate: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            strong: 70.0,
            moderate: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceThresholds {
    pub strength_min: f64,
    pub concern_below: f64,
    pub max_items: usize,
}

impl Default for EvidenceThresholds {
    fn default() -> Self {
        Self {
            strength_min: 60.0,
            concern_below: 50.0,
            max_items: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub min_text_length: usize,
    pub cyrillic_ratio: f64,
    pub turkish_diacritic_ratio: f64,
    pub min_turkish_hits: usize,
    pub min_english_hits: usize,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            min_text_length: 20,
            cyrillic_ratio: 0.3,
            turkish_diacritic_ratio: 0.02,
            min_turkish_hits: 3,
            min_english_hits: 2,
        }
    }
}

/// Tuning for the technical depth layer applied to TECH_PRACTICAL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalDepthConfig {
    pub enabled: bool,
    pub excluded_scopes: Vec<RoleScope>,
    pub packs: BTreeMap<RoleScope, DepthPack>,
    pub target_hits_per_100_words: f64,
    pub density_weight: f64,
    pub diversity_weight: f64,
    pub specificity_weight: f64,
    pub min_index: f64,
    pub moderate_index: f64,
    pub deep_index: f64,
    pub min_primary_hits: usize,
    pub floor_score: f64,
    pub min_secondary_hits: usize,
    pub min_tertiary_hits: usize,
    pub bonus_points: f64,
    pub shallow_cap: f64,
    pub moderate_cap: f64,
    pub deep_cap: f64,
    pub max_total_score_uplift: f64,
}

impl Default for TechnicalDepthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            excluded_scopes: vec![RoleScope::All, RoleScope::Catering],
            packs: DepthPack::defaults(),
            target_hits_per_100_words: 5.0,
            density_weight: 0.40,
            diversity_weight: 0.35,
            specificity_weight: 0.25,
            min_index: 25.0,
            moderate_index: 40.0,
            deep_index: 70.0,
            min_primary_hits: 2,
            floor_score: 50.0,
            min_secondary_hits: 1,
            min_tertiary_hits: 1,
            bonus_points: 10.0,
            shallow_cap: 60.0,
            moderate_cap: 80.0,
            deep_cap: 95.0,
            max_total_score_uplift: 5.0,
        }
    }
}
