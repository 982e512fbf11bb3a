//! Heuristic language detection over concatenated answer text.

use serde::{Deserialize, Serialize};

use super::config::LanguageConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Tr,
    Ru,
    Unknown,
}

impl Language {
    pub const fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
            Language::Ru => "ru",
            Language::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    pub language: Language,
    pub confidence: f64,
}

impl DetectedLanguage {
    const fn unknown() -> Self {
        Self {
            language: Language::Unknown,
            confidence: 0.0,
        }
    }
}

const EN_STOPWORDS: &[&str] = &[
    "the", "and", "was", "to", "of", "we", "it", "with", "for", "that", "on", "my", "is", "in",
];
const TR_STOPWORDS: &[&str] = &[
    "ve", "bir", "bu", "için", "ile", "çok", "da", "de", "ama", "gibi", "sonra", "ben", "biz",
];
const TR_DIACRITICS: &[char] = &['ç', 'ğ', 'ı', 'ö', 'ş', 'ü', 'Ç', 'Ğ', 'İ', 'Ö', 'Ş', 'Ü'];

/// Detect the dominant language. Below the minimum length the language is unknown.
pub fn detect_language(text: &str, config: &LanguageConfig) -> DetectedLanguage {
    let trimmed = text.trim();
    if trimmed.chars().count() < config.min_text_length {
        return DetectedLanguage::unknown();
    }

    let letters: Vec<char> = trimmed.chars().filter(|ch| ch.is_alphabetic()).collect();
    if letters.is_empty() {
        return DetectedLanguage::unknown();
    }
    let letter_count = letters.len() as f64;

    let cyrillic = letters.iter().filter(|ch| is_cyrillic(**ch)).count() as f64;
    let cyrillic_ratio = cyrillic / letter_count;
    if cyrillic_ratio >= config.cyrillic_ratio {
        return DetectedLanguage {
            language: Language::Ru,
            confidence: round2(cyrillic_ratio.min(1.0)),
        };
    }

    let words: Vec<String> = trimmed
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect();
    let en_hits = stopword_hits(&words, EN_STOPWORDS);
    let tr_hits = stopword_hits(&words, TR_STOPWORDS);

    let diacritics = letters
        .iter()
        .filter(|ch| TR_DIACRITICS.contains(ch))
        .count() as f64;
    let diacritic_ratio = diacritics / letter_count;

    if diacritic_ratio >= config.turkish_diacritic_ratio
        || (tr_hits >= config.min_turkish_hits && tr_hits > en_hits)
    {
        let confidence = 0.5 + diacritic_ratio * 5.0 + tr_hits as f64 * 0.05;
        return DetectedLanguage {
            language: Language::Tr,
            confidence: round2(confidence.min(1.0)),
        };
    }

    if en_hits >= config.min_english_hits {
        let confidence = 0.5 + en_hits as f64 * 0.05;
        return DetectedLanguage {
            language: Language::En,
            confidence: round2(confidence.min(1.0)),
        };
    }

    DetectedLanguage {
        language: Language::Unknown,
        confidence: 0.2,
    }
}

fn is_cyrillic(ch: char) -> bool {
    matches!(ch, '\u{0400}'..='\u{04FF}')
}

fn stopword_hits(words: &[String], stopwords: &[&str]) -> usize {
    words
        .iter()
        .filter(|word| stopwords.contains(&word.as_str()))
        .count()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
