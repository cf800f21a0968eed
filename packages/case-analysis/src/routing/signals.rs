//! Text heuristics that feed complexity scoring.
//!
//! Everything here is derived from the document text plus the router's
//! classification; the router model's own complexity guess is not used.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::routing::complexity::ComplexityInput;
use crate::types::state::LegalMatter;

/// Enumerated request lines: "1.", "2)", "a)", "iv." at the start of a line.
static CLAIM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:\d{1,2}|[a-z]|[ivx]{1,4})[.)]\s+\S").expect("claim pattern is valid")
});

/// Two or more consecutive capitalized words ("Banco Central", "Maria da Silva").
static NAMED_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{Lu}\p{Ll}+(?:\s+(?:d[aeo]s?\s+)?\p{Lu}\p{Ll}+)+")
        .expect("entity pattern is valid")
});

/// Markers of more parties than a single plaintiff and defendant.
const MULTI_PARTY_MARKERS: &[&str] = &[
    "litisconsorte",
    "litisconsórcio",
    "litisconsorcio",
    "terceiro interessado",
    "assistente",
    "co-defendant",
    "co-plaintiff",
    "codefendant",
    "coplaintiff",
    "intervenor",
    "third party",
    "third-party",
];

/// Count of `?` in the text, at least 1.
pub fn count_questions(text: &str) -> usize {
    text.matches('?').count().max(1)
}

/// Count of enumerated request lines, at least 1.
pub fn count_claims(text: &str) -> usize {
    CLAIM_LINE.find_iter(text).count().max(1)
}

/// Distinct multi-word capitalized names.
pub fn count_entities(text: &str) -> usize {
    NAMED_ENTITY
        .find_iter(text)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<HashSet<_>>()
        .len()
}

pub fn is_multi_party(text: &str) -> bool {
    let lower = text.to_lowercase();
    MULTI_PARTY_MARKERS.iter().any(|m| lower.contains(m))
}

/// Build the complexity input for a document.
pub fn extract_signals(text: &str, legal_matter: LegalMatter, confidence: f64) -> ComplexityInput {
    ComplexityInput {
        fact_length: text.chars().count(),
        question_count: count_questions(text),
        claim_count: count_claims(text),
        domain_specialization: legal_matter.specialization(),
        entity_count: count_entities(text),
        multi_party: is_multi_party(text),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_have_floor_of_one() {
        assert_eq!(count_questions("no questions here"), 1);
        assert_eq!(count_questions("Is it due? Was it paid? When?"), 3);
    }

    #[test]
    fn test_claims_count_enumerated_lines() {
        let text = "The plaintiff requests:\n\
                    1. annulment of the contract;\n\
                    2) refund of fees;\n \
                    a) moral damages;\n\
                    iv. legal costs.\n\
                    Nothing else.";
        assert_eq!(count_claims(text), 4);
        assert_eq!(count_claims("a single paragraph"), 1);
    }

    #[test]
    fn test_entities_are_distinct_multiword_names() {
        let text = "Maria da Silva sued Banco Central. \
                    Later Banco Central replied to Maria da Silva and to Joao Souza.";
        // A sentence-initial capital merges into the following name.
        assert_eq!(count_entities(text), 4);

        assert_eq!(count_entities("all lowercase text"), 0);
        assert_eq!(count_entities("Single Capitalized words"), 1);
    }

    #[test]
    fn test_multi_party_markers() {
        assert!(is_multi_party("O LITISCONSORTE passivo foi citado"));
        assert!(is_multi_party("the intervenor filed a brief"));
        assert!(!is_multi_party("plaintiff against defendant"));
    }

    #[test]
    fn test_extract_signals_uses_char_count_and_domain() {
        let input = extract_signals("ação", LegalMatter::Tax, 0.7);
        assert_eq!(input.fact_length, 4);
        assert_eq!(input.domain_specialization, 0.8);
        assert_eq!(input.confidence, 0.7);
        assert!(!input.multi_party);
    }
}
