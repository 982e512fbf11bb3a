use super::config::{CompetencyConfig, StatusThresholds};
use super::domain::{
    CompetencyFlag, CompetencyStatus, DimensionNote, Evidence, FlagReason, FlagSeverity,
};
use super::scorer::CompetencyScore;

/// Flags whose mapped dimension was evaluated and scored under its threshold.
pub(crate) fn detect_flags(score: &CompetencyScore, config: &CompetencyConfig) -> Vec<CompetencyFlag> {
    config
        .flags
        .iter()
        .filter(|(_, rule)| {
            score
                .dimension_scores
                .get(&rule.dimension)
                .is_some_and(|value| *value < rule.threshold)
        })
        .map(|(flag, _)| *flag)
        .collect()
}

pub(crate) fn resolve_status(total: f64, thresholds: &StatusThresholds) -> CompetencyStatus {
    if total >= thresholds.strong {
        CompetencyStatus::Strong
    } else if total >= thresholds.moderate {
        CompetencyStatus::Moderate
    } else {
        CompetencyStatus::Weak
    }
}

pub(crate) fn build_evidence(
    score: &CompetencyScore,
    flags: &[CompetencyFlag],
    config: &CompetencyConfig,
) -> Evidence {
    let limits = &config.evidence;
    let notes: Vec<DimensionNote> = score
        .dimension_scores
        .iter()
        .map(|(dimension, value)| DimensionNote {
            dimension: *dimension,
            score: *value,
        })
        .collect();

    let mut strengths: Vec<DimensionNote> = notes
        .iter()
        .filter(|note| note.score >= limits.strength_min)
        .cloned()
        .collect();
    strengths.sort_by(|a, b| b.score.total_cmp(&a.score));
    strengths.truncate(limits.max_items);

    let mut concerns: Vec<DimensionNote> = notes
        .iter()
        .filter(|note| note.score < limits.concern_below)
        .cloned()
        .collect();
    concerns.sort_by(|a, b| a.score.total_cmp(&b.score));
    concerns.truncate(limits.max_items);

    let flag_reasons = flags
        .iter()
        .filter_map(|flag| {
            let rule = config.flags.get(flag)?;
            let value = score.dimension_scores.get(&rule.dimension)?;
            let severity = if config.critical_flags.contains(flag) {
                FlagSeverity::Critical
            } else {
                FlagSeverity::Warning
            };
            Some(FlagReason {
                flag: *flag,
                severity,
                reason: format!(
                    "{} scored {:.1}, below the {:.1} threshold",
                    rule.dimension.label(),
                    value,
                    rule.threshold
                ),
            })
        })
        .collect();

    let mut ranked = notes;
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    let bullets = ranked
        .iter()
        .filter_map(|note| {
            let keywords = score.evidence_keywords.get(&note.dimension)?;
            if keywords.is_empty() {
                return None;
            }
            Some(format!(
                "{}: mentions {}",
                note.dimension.label(),
                keywords.join(", ")
            ))
        })
        .take(limits.max_items)
        .collect();

    Evidence {
        strengths,
        concerns,
        flag_reasons,
        bullets,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::workflows::competency::domain::CompetencyDimension;
    use crate::workflows::competency::language::Language;

    fn score_with(dimensions: &[(CompetencyDimension, f64)]) -> CompetencyScore {
        CompetencyScore {
            score_total: 0.0,
            score_before_depth: 0.0,
            depth_uplift: 0.0,
            dimension_scores: dimensions.iter().copied().collect(),
            question_scores: Vec::new(),
            language: Language::En,
            language_confidence: 0.8,
            coverage: 0.0,
            evidence_keywords: BTreeMap::from([
                (CompetencyDimension::Comms, vec!["radio".to_string()]),
                (
                    CompetencyDimension::Discipline,
                    vec!["checklist".to_string(), "permit".to_string()],
                ),
            ]),
            questions_evaluated: dimensions.len(),
            technical_depth: None,
        }
    }

    #[test]
    fn flags_fire_only_below_threshold_for_evaluated_dimensions() {
        let config = CompetencyConfig::default();
        let score = score_with(&[
            (CompetencyDimension::Discipline, 20.0),
            (CompetencyDimension::Comms, 40.0),
        ]);
        let flags = detect_flags(&score, &config);
        assert_eq!(flags, vec![CompetencyFlag::SafetyMindsetRisk]);
    }

    #[test]
    fn status_uses_configured_thresholds() {
        let thresholds = StatusThresholds::default();
        assert_eq!(resolve_status(70.0, &thresholds), CompetencyStatus::Strong);
        assert_eq!(resolve_status(69.9, &thresholds), CompetencyStatus::Moderate);
        assert_eq!(resolve_status(45.0, &thresholds), CompetencyStatus::Moderate);
        assert_eq!(resolve_status(44.9, &thresholds), CompetencyStatus::Weak);
    }

    #[test]
    fn evidence_orders_strengths_and_concerns() {
        let config = CompetencyConfig::default();
        let score = score_with(&[
            (CompetencyDimension::Discipline, 90.0),
            (CompetencyDimension::Leadership, 60.0),
            (CompetencyDimension::Stress, 75.0),
            (CompetencyDimension::Teamwork, 80.0),
            (CompetencyDimension::Comms, 30.0),
            (CompetencyDimension::TechPractical, 10.0),
        ]);
        let flags = detect_flags(&score, &config);
        let evidence = build_evidence(&score, &flags, &config);

        let strengths: Vec<_> = evidence.strengths.iter().map(|n| n.dimension).collect();
        assert_eq!(
            strengths,
            vec![
                CompetencyDimension::Discipline,
                CompetencyDimension::Teamwork,
                CompetencyDimension::Stress
            ]
        );
        let concerns: Vec<_> = evidence.concerns.iter().map(|n| n.dimension).collect();
        assert_eq!(
            concerns,
            vec![CompetencyDimension::TechPractical, CompetencyDimension::Comms]
        );

        let technical = evidence
            .flag_reasons
            .iter()
            .find(|reason| reason.flag == CompetencyFlag::TechnicalGap)
            .expect("technical gap flagged");
        assert_eq!(technical.severity, FlagSeverity::Critical);
        let comms = evidence
            .flag_reasons
            .iter()
            .find(|reason| reason.flag == CompetencyFlag::CommunicationRisk)
            .expect("communication flagged");
        assert_eq!(comms.severity, FlagSeverity::Warning);

        assert_eq!(evidence.bullets.len(), 2);
        assert!(evidence.bullets[0].starts_with("Discipline"));
        assert!(evidence.bullets[1].contains("radio"));
    }
}
