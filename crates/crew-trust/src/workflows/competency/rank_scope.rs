//! Rank string to role scope resolution.
//!
//! Unknown ranks resolve to [`RoleScope::All`] so they only ever see generic questions.

use super::domain::RoleScope;

/// Canonical rank codes as stored by crewing systems.
const CANONICAL_RANKS: &[(&str, RoleScope)] = &[
    ("MASTER", RoleScope::Master),
    ("CHIEF_OFFICER", RoleScope::ChiefOfficer),
    ("SECOND_OFFICER", RoleScope::DeckOfficer),
    ("THIRD_OFFICER", RoleScope::DeckOfficer),
    ("OOW", RoleScope::DeckOfficer),
    ("DECK_CADET", RoleScope::DeckOfficer),
    ("CHIEF_ENGINEER", RoleScope::ChiefEngineer),
    ("SECOND_ENGINEER", RoleScope::EngineOfficer),
    ("THIRD_ENGINEER", RoleScope::EngineOfficer),
    ("FOURTH_ENGINEER", RoleScope::EngineOfficer),
    ("ENGINE_CADET", RoleScope::EngineOfficer),
    ("ETO", RoleScope::Eto),
    ("BOSUN", RoleScope::Rating),
    ("AB", RoleScope::Rating),
    ("OS", RoleScope::Rating),
    ("PUMPMAN", RoleScope::Rating),
    ("FITTER", RoleScope::Rating),
    ("MOTORMAN", RoleScope::Rating),
    ("OILER", RoleScope::Rating),
    ("WIPER", RoleScope::Rating),
    ("CHIEF_COOK", RoleScope::Catering),
    ("COOK", RoleScope::Catering),
    ("STEWARD", RoleScope::Catering),
    ("MESSMAN", RoleScope::Catering),
    ("GALLEY_HAND", RoleScope::Catering),
];

/// Free-form spellings seen on CVs and crew lists, with the canonical code they stand for.
const RANK_ALIASES: &[(&str, &str)] = &[
    ("captain", "MASTER"),
    ("capt", "MASTER"),
    ("capt.", "MASTER"),
    ("master mariner", "MASTER"),
    ("c/o", "CHIEF_OFFICER"),
    ("chief mate", "CHIEF_OFFICER"),
    ("first officer", "CHIEF_OFFICER"),
    ("1st officer", "CHIEF_OFFICER"),
    ("2/o", "SECOND_OFFICER"),
    ("2nd officer", "SECOND_OFFICER"),
    ("second mate", "SECOND_OFFICER"),
    ("3/o", "THIRD_OFFICER"),
    ("3rd officer", "THIRD_OFFICER"),
    ("third mate", "THIRD_OFFICER"),
    ("officer of the watch", "OOW"),
    ("c/e", "CHIEF_ENGINEER"),
    ("chief eng", "CHIEF_ENGINEER"),
    ("2/e", "SECOND_ENGINEER"),
    ("2nd engineer", "SECOND_ENGINEER"),
    ("3/e", "THIRD_ENGINEER"),
    ("3rd engineer", "THIRD_ENGINEER"),
    ("4/e", "FOURTH_ENGINEER"),
    ("4th engineer", "FOURTH_ENGINEER"),
    ("electro technical officer", "ETO"),
    ("electro-technical officer", "ETO"),
    ("electrician", "ETO"),
    ("boatswain", "BOSUN"),
    ("able seaman", "AB"),
    ("able bodied seaman", "AB"),
    ("ordinary seaman", "OS"),
    ("galley", "GALLEY_HAND"),
];

/// Resolve a raw rank to its canonical code (`"Capt."` and `"Master"` both give `MASTER`).
/// `None` when the rank matches neither a canonical code nor a known alias.
pub fn canonical_rank_code(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some((code, _)) = CANONICAL_RANKS.iter().find(|(code, _)| *code == trimmed) {
        return Some(*code);
    }

    let lowered = trimmed.to_lowercase();
    if let Some((_, code)) = RANK_ALIASES.iter().find(|(alias, _)| *alias == lowered) {
        return Some(*code);
    }

    let normalized = underscore_normalize(trimmed);
    RANK_ALIASES
        .iter()
        .find(|(alias, _)| underscore_normalize(alias) == normalized)
        .map(|(_, code)| *code)
        .or_else(|| {
            CANONICAL_RANKS
                .iter()
                .find(|(code, _)| code.to_ascii_lowercase() == normalized)
                .map(|(code, _)| *code)
        })
}

fn scope_for_code(code: &str) -> Option<RoleScope> {
    CANONICAL_RANKS
        .iter()
        .find(|(canonical, _)| *canonical == code)
        .map(|(_, scope)| *scope)
}

/// Map a raw rank string to its role scope. Total: every input yields a scope.
pub fn role_scope_for_rank(raw: &str) -> RoleScope {
    if let Some(scope) = canonical_rank_code(raw).and_then(scope_for_code) {
        return scope;
    }

    let normalized = underscore_normalize(raw.trim());
    if normalized.is_empty() {
        return RoleScope::All;
    }
    RoleScope::KNOWN
        .into_iter()
        .find(|scope| scope.token().to_ascii_lowercase() == normalized)
        .unwrap_or(RoleScope::All)
}

/// Lower-case and collapse every run of non-alphanumeric characters into one underscore.
fn underscore_normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }
    out
}
