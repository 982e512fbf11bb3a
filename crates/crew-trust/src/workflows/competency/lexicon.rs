//! Keyword, marker and stopword sets plus the term matching rules shared by the rubric and the
//! technical depth layer.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::{CompetencyDimension, RoleScope};
use super::language::Language;

type LanguageTerms = BTreeMap<Language, Vec<String>>;

/// Language-aware vocabulary used by the rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub stopwords: LanguageTerms,
    pub dimension_keywords: BTreeMap<CompetencyDimension, LanguageTerms>,
    pub example_markers: LanguageTerms,
    pub outcome_markers: LanguageTerms,
    pub ownership_markers: LanguageTerms,
}

/// Lexicon flattened for one detected language. English terms are always included.
#[derive(Debug, Clone)]
pub struct ResolvedLexicon {
    stopwords: BTreeSet<String>,
    keywords: BTreeMap<CompetencyDimension, Vec<String>>,
    example_markers: Vec<String>,
    outcome_markers: Vec<String>,
    ownership_markers: Vec<String>,
}

impl Lexicon {
    pub fn resolve(&self, language: Language) -> ResolvedLexicon {
        let stopwords = merged(&self.stopwords, language)
            .into_iter()
            .map(|word| normalize_text(&word))
            .filter(|word| !word.is_empty())
            .collect();

        let keywords = self
            .dimension_keywords
            .iter()
            .map(|(dimension, terms)| (*dimension, merged(terms, language)))
            .collect();

        ResolvedLexicon {
            stopwords,
            keywords,
            example_markers: merged(&self.example_markers, language),
            outcome_markers: merged(&self.outcome_markers, language),
            ownership_markers: merged(&self.ownership_markers, language),
        }
    }
}

fn merged(terms: &LanguageTerms, language: Language) -> Vec<String> {
    let mut out: Vec<String> = terms.get(&Language::En).cloned().unwrap_or_default();
    if language != Language::En {
        if let Some(extra) = terms.get(&language) {
            for term in extra {
                if !out.contains(term) {
                    out.push(term.clone());
                }
            }
        }
    }
    out
}

impl ResolvedLexicon {
    pub fn keywords(&self, dimension: CompetencyDimension) -> &[String] {
        self.keywords
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn example_markers(&self) -> &[String] {
        &self.example_markers
    }

    pub fn outcome_markers(&self) -> &[String] {
        &self.outcome_markers
    }

    pub fn ownership_markers(&self) -> &[String] {
        &self.ownership_markers
    }

    /// Distinct terms found in the text. Single-word stopwords never count; phrases always do.
    pub fn matches(&self, text: &AnalyzedText, terms: &[String]) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for term in terms {
            let normalized = normalize_text(term);
            if normalized.is_empty() || found.contains(&normalized) {
                continue;
            }
            let hit = if is_phrase(&normalized) {
                text.contains_phrase(&normalized)
            } else {
                !self.stopwords.contains(&normalized) && text.contains_word(&normalized)
            };
            if hit {
                found.push(normalized);
            }
        }
        found
    }
}

/// Pre-tokenized answer text.
#[derive(Debug, Clone)]
pub struct AnalyzedText {
    padded: String,
    tokens: BTreeSet<String>,
    word_count: usize,
}

impl AnalyzedText {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize_text(raw);
        let tokens = normalized.split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect();
        Self {
            padded: format!(" {normalized} "),
            tokens,
            word_count: raw.split_whitespace().count(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    fn contains_word(&self, word: &str) -> bool {
        self.tokens.contains(word)
    }

    fn contains_phrase(&self, phrase: &str) -> bool {
        self.padded.contains(&format!(" {phrase} "))
    }
}

/// Whether a normalized term is a multi-word phrase.
pub fn is_phrase(normalized: &str) -> bool {
    normalized.contains(' ')
}

/// Lower-case, replace punctuation with spaces and collapse whitespace.
pub fn normalize_text(raw: &str) -> String {
    let lowered: String = raw
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| if ch.is_alphanumeric() || ch == '\'' { ch } else { ' ' })
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rank-specific technical vocabulary in ordered categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthPack {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub tertiary: Vec<String>,
}

impl DepthPack {
    fn from_static(primary: &[&str], secondary: &[&str], tertiary: &[&str]) -> Self {
        Self {
            primary: owned(primary),
            secondary: owned(secondary),
            tertiary: owned(tertiary),
        }
    }

    pub fn term_count(&self) -> usize {
        self.primary.len() + self.secondary.len() + self.tertiary.len()
    }

    pub fn defaults() -> BTreeMap<RoleScope, DepthPack> {
        BTreeMap::from([
            (
                RoleScope::Master,
                Self::from_static(
                    &["passage plan", "colreg", "bridge resource management", "ism", "port state control", "ecdis"],
                    &["voyage plan", "weather routing", "cargo plan", "stability", "standing orders", "emergency response"],
                    &["charter party", "bill of lading", "marpol", "solas", "vetting", "flag state"],
                ),
            ),
            (
                RoleScope::ChiefOfficer,
                Self::from_static(
                    &["cargo plan", "ballast plan", "stability", "loading computer", "mooring", "hatch cover"],
                    &["planned maintenance", "enclosed space", "risk assessment", "permit to work", "stress calculation"],
                    &["vetting", "sire", "cargo securing manual", "marpol", "solas"],
                ),
            ),
            (
                RoleScope::DeckOfficer,
                Self::from_static(
                    &["ecdis", "radar", "arpa", "passage plan", "colreg", "gmdss"],
                    &["bridge watch", "position fixing", "anchor watch", "chart correction", "navigation audit"],
                    &["solas", "marpol", "lsa", "ffa", "ism"],
                ),
            ),
            (
                RoleScope::ChiefEngineer,
                Self::from_static(
                    &["main engine", "fuel oil", "lube oil", "overhaul", "planned maintenance", "bunkering"],
                    &["purifier", "turbocharger", "boiler", "fuel consumption", "engine performance"],
                    &["marpol annex vi", "oily water separator", "class survey", "ism", "spare parts"],
                ),
            ),
            (
                RoleScope::EngineOfficer,
                Self::from_static(
                    &["main engine", "auxiliary engine", "purifier", "fuel oil", "lube oil", "pump"],
                    &["overhaul", "pms", "turbocharger", "boiler", "compressor"],
                    &["oily water separator", "marpol", "sounding", "bunkering", "class survey"],
                ),
            ),
            (
                RoleScope::Eto,
                Self::from_static(
                    &["plc", "switchboard", "megger", "insulation resistance", "circuit breaker", "alarm system"],
                    &["automation", "sensor", "ups", "frequency converter", "wiring diagram"],
                    &["ecdis", "gmdss", "high voltage", "lockout tagout", "class survey"],
                ),
            ),
            (
                RoleScope::Rating,
                Self::from_static(
                    &["mooring", "winch", "painting", "chipping", "lashing", "gangway"],
                    &["ppe", "toolbox talk", "permit to work", "enclosed space", "rescue"],
                    &["watchkeeping", "lookout", "helm", "fire drill", "lifeboat"],
                ),
            ),
        ])
    }
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|term| term.to_string()).collect()
}

fn by_language(en: &[&str], tr: &[&str], ru: &[&str]) -> LanguageTerms {
    BTreeMap::from([
        (Language::En, owned(en)),
        (Language::Tr, owned(tr)),
        (Language::Ru, owned(ru)),
    ])
}

impl Default for Lexicon {
    fn default() -> Self {
        let stopwords = by_language(
            &[
                "the", "a", "an", "and", "or", "but", "i", "we", "it", "to", "of", "in", "on",
                "at", "for", "with", "was", "is", "that", "this", "my", "our", "they", "he",
                "she", "be", "have", "had", "so", "as", "by", "from", "then", "when", "all",
                "not", "were", "me", "us", "there",
            ],
            &[
                "ve", "bir", "bu", "için", "ile", "çok", "da", "de", "ama", "gibi", "sonra",
                "ben", "biz", "o", "ne", "daha", "olarak", "kadar",
            ],
            &[
                "и", "в", "не", "на", "я", "что", "с", "мы", "это", "как", "по", "но", "из",
                "у", "к", "был", "была",
            ],
        );

        let dimension_keywords = BTreeMap::from([
            (
                CompetencyDimension::Discipline,
                by_language(
                    &[
                        "procedure", "checklist", "safety", "ppe", "permit", "sms", "rules",
                        "compliance", "instruction", "regulation", "risk assessment",
                        "permit to work", "toolbox talk", "lockout",
                    ],
                    &["prosedür", "kontrol listesi", "güvenlik", "kural", "talimat", "iş izni", "risk değerlendirmesi"],
                    &["процедура", "чек лист", "безопасность", "правила", "инструкция", "допуск", "оценка рисков"],
                ),
            ),
            (
                CompetencyDimension::Leadership,
                by_language(
                    &[
                        "team", "delegate", "delegated", "motivate", "decision", "responsibility",
                        "mentor", "briefing", "supervise", "supervised", "took charge",
                        "led the",
                    ],
                    &["ekip", "liderlik", "karar", "sorumluluk", "yönetim", "görevlendirdim"],
                    &["команда", "решение", "ответственность", "руководил", "инструктаж", "экипаж"],
                ),
            ),
            (
                CompetencyDimension::Stress,
                by_language(
                    &[
                        "calm", "pressure", "emergency", "stress", "focus", "priority",
                        "prioritize", "fatigue", "rest", "drill", "under pressure", "stayed calm",
                    ],
                    &["sakin", "baskı", "acil", "stres", "öncelik", "yorgunluk"],
                    &["спокойно", "давление", "аварийная", "стресс", "приоритет", "усталость"],
                ),
            ),
            (
                CompetencyDimension::Teamwork,
                by_language(
                    &[
                        "together", "colleague", "colleagues", "support", "help", "cooperation",
                        "crew", "shift", "handover", "trust", "respect", "worked together",
                    ],
                    &["birlikte", "yardım", "destek", "işbirliği", "arkadaş", "vardiya"],
                    &["вместе", "помощь", "поддержка", "коллега", "сотрудничество", "вахта"],
                ),
            ),
            (
                CompetencyDimension::Comms,
                by_language(
                    &[
                        "report", "reported", "communicate", "radio", "vhf", "informed",
                        "explained", "briefing", "language", "logbook", "closed loop",
                        "repeat back",
                    ],
                    &["rapor", "bildirdim", "iletişim", "telsiz", "açıkladım", "bilgilendirdim"],
                    &["доложил", "сообщил", "связь", "рация", "объяснил", "отчет"],
                ),
            ),
            (
                CompetencyDimension::TechPractical,
                by_language(
                    &[
                        "engine", "pump", "valve", "maintenance", "repair", "troubleshoot",
                        "generator", "pms", "overhaul", "ecdis", "radar", "ballast",
                        "planned maintenance", "inspection",
                    ],
                    &["makine", "pompa", "vana", "bakım", "onarım", "arıza", "jeneratör"],
                    &["двигатель", "насос", "клапан", "обслуживание", "ремонт", "неисправность", "генератор"],
                ),
            ),
        ]);

        let example_markers = by_language(
            &[
                "for example", "for instance", "once", "one time", "i remember", "last year",
                "last contract", "on my previous vessel", "situation", "when i was",
            ],
            &["örneğin", "bir keresinde", "geçen yıl", "önceki gemide", "hatırlıyorum"],
            &["например", "однажды", "в прошлом году", "на предыдущем судне", "помню"],
        );
        let outcome_markers = by_language(
            &[
                "result", "as a result", "resolved", "solved", "fixed", "prevented", "outcome",
                "successfully", "finally", "learned", "lesson",
            ],
            &["sonuç", "sonuçta", "çözdüm", "çözüldü", "önledik", "başarıyla", "öğrendim"],
            &["в результате", "результат", "решили", "устранили", "предотвратили", "успешно", "научился"],
        );
        let ownership_markers = by_language(
            &[
                "i decided", "i took", "i ensured", "i was responsible", "my responsibility",
                "i reported", "i led", "i organized", "i initiated", "i checked",
                "i instructed",
            ],
            &["karar verdim", "sorumluluk aldım", "ben yaptım", "kontrol ettim", "bildirdim"],
            &["я решил", "я взял", "я отвечал", "я проверил", "я доложил"],
        );

        Self {
            stopwords,
            dimension_keywords,
            example_markers,
            outcome_markers,
            ownership_markers,
        }
    }
}
