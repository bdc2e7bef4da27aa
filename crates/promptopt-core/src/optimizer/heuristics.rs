//! String heuristics used around the rewrite step

use std::collections::HashSet;

/// Minimum share of original words a rewrite must keep
pub const INTENT_THRESHOLD: f64 = 0.3;

/// Minimum length, in characters, of a well-formed query
pub const MIN_WELL_FORMED_CHARS: usize = 20;

/// Minimum number of whitespace-separated words in a well-formed query
pub const MIN_WELL_FORMED_WORDS: usize = 5;

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Share of the original's distinct words that also appear in the rewrite
///
/// `None` when the original has no words.
pub fn word_overlap_ratio(original: &str, rewritten: &str) -> Option<f64> {
    let original_words = word_set(original);
    if original_words.is_empty() {
        return None;
    }
    let rewritten_words = word_set(rewritten);
    let common = original_words.intersection(&rewritten_words).count();
    Some(common as f64 / original_words.len() as f64)
}

/// Whether a rewrite kept enough of the original wording
///
/// An original without words is never considered preserved.
pub fn intent_preserved(original: &str, rewritten: &str) -> bool {
    word_overlap_ratio(original, rewritten)
        .map(|ratio| ratio >= INTENT_THRESHOLD)
        .unwrap_or(false)
}

/// Whether a query looks like a complete sentence
pub fn is_well_formed(query: &str) -> bool {
    if query.chars().count() < MIN_WELL_FORMED_CHARS {
        return false;
    }

    match query.trim_end().chars().last() {
        Some('.') | Some('?') | Some('!') => {}
        _ => return false,
    }

    query.split_whitespace().count() >= MIN_WELL_FORMED_WORDS
}

/// Whether the text contains a precomposed Hangul syllable
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| ('\u{AC00}'..='\u{D7A3}').contains(&c))
}

/// Normalize user text before embedding it in a prompt
///
/// Single quotes become double quotes and whitespace runs collapse to one
/// space.
pub fn sanitize_prompt_text(text: &str) -> String {
    text.replace('\'', "\"")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_intent_preserved_identical() {
        assert!(intent_preserved("how do I sort a vec", "how do I sort a vec"));
    }

    #[test]
    fn test_intent_preserved_empty_rewrite() {
        assert!(!intent_preserved("machine learning basics", ""));
    }

    #[test]
    fn test_intent_preserved_empty_original() {
        assert!(!intent_preserved("", "anything at all"));
        assert!(!intent_preserved("   ", "anything at all"));
        assert!(!intent_preserved("", ""));
    }

    #[test]
    fn test_intent_preserved_threshold() {
        // 3 of 10 words kept: exactly at the threshold
        let original = "a b c d e f g h i j";
        assert!(intent_preserved(original, "a b c x y z"));
        // 2 of 10: below
        assert!(!intent_preserved(original, "a b x y z"));
    }

    #[test]
    fn test_intent_preserved_is_case_insensitive() {
        assert!(intent_preserved("Rust Ownership", "explain rust ownership rules"));
    }

    #[test]
    fn test_word_overlap_ratio() {
        assert_eq!(word_overlap_ratio("one two", "two three"), Some(0.5));
        assert_eq!(word_overlap_ratio("", "two"), None);
    }

    #[test]
    fn test_is_well_formed_examples() {
        assert!(is_well_formed("Explain cloud computing basics now."));
        assert!(!is_well_formed("Python"));
        assert!(!is_well_formed("Explain cloud computing basics"));
    }

    #[test]
    fn test_is_well_formed_needs_five_words() {
        // Long enough and punctuated, but only four words
        assert!(!is_well_formed("Internationalization localization globalization tests?"));
    }

    #[test]
    fn test_is_well_formed_ignores_trailing_whitespace() {
        assert!(is_well_formed("What are the main Rust error types?   \n"));
    }

    #[test]
    fn test_is_well_formed_exclamation() {
        assert!(is_well_formed("Tell me all about the borrow checker!"));
    }

    #[test]
    fn test_contains_hangul() {
        assert!(contains_hangul("파이썬으로 웹 스크래핑하는 방법"));
        assert!(contains_hangul("Rust 소유권"));
        assert!(!contains_hangul("web scraping with python"));
        // Hangul Jamo are outside the syllable block
        assert!(!contains_hangul("\u{1100}"));
    }

    #[test]
    fn test_sanitize_prompt_text() {
        assert_eq!(
            sanitize_prompt_text("  what's   the\n\tdifference ?"),
            "what\"s the difference ?"
        );
    }

    proptest! {
        #[test]
        fn prop_self_overlap_is_preserved(q in "[a-z]{1,8}( [a-z]{1,8}){0,8}") {
            prop_assert!(intent_preserved(&q, &q));
        }

        #[test]
        fn prop_empty_rewrite_is_not_preserved(q in "[a-zA-Z0-9]{1,12}( [a-zA-Z0-9]{1,12}){0,6}") {
            prop_assert!(!intent_preserved(&q, ""));
        }

        #[test]
        fn prop_short_queries_are_not_well_formed(q in ".{0,19}") {
            prop_assume!(q.chars().count() < MIN_WELL_FORMED_CHARS);
            prop_assert!(!is_well_formed(&q));
        }

        #[test]
        fn prop_unpunctuated_queries_are_not_well_formed(q in "[a-z ]{20,80}[a-z]") {
            prop_assert!(!is_well_formed(&q));
        }
    }
}
