//! Property-based invariant tests for the Kotha tokenizer.
//!
//! Verifies:
//! 1. Coverage: tokens exactly partition any input string.
//! 2. Determinism: tokenizing the same text twice yields identical tokens.
//! 3. Keyword tokens are whole reserved words bounded by non-word bytes.
//! 4. Number tokens match `digits[.digits]`.
//! 5. String tokens open with a quote; comment tokens open with a marker.
//! 6. Nothing inside a string literal is re-classified.
//! 7. Plain tokens are never adjacent to each other.

use kotha_syntax::{
    KOTHA_KEYWORDS, KothaTokenizer, OPERATOR_BYTES, TokenKind, Tokenizer, is_word_byte,
    validate_coverage,
};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(KOTHA_KEYWORDS).prop_map(str::to_string),
        "[a-z_][a-z0-9_]{0,6}",
        "[0-9]{1,4}(\\.[0-9]{1,3})?",
        "[+\\-*/%=<>!&|]{1,3}",
        "\"[^\"\\\\]{0,8}\"",
        "// [a-z ]{0,10}\n",
        "/\\* [a-z\n]{0,10} \\*/",
        prop::sample::select(vec![" ", "\n", "\t", ";", "(", ")", "{", "}", ",", "\\", "\"", "é", "ক"])
            .prop_map(str::to_string),
    ]
}

/// Fragments that never leave a string or comment open.
fn arb_closed_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(KOTHA_KEYWORDS).prop_map(str::to_string),
        "[a-z_][a-z0-9_]{0,6}",
        "[0-9]{1,4}(\\.[0-9]{1,3})?",
        "[+\\-*%=<>!&|]{1,3}",
        "\"[a-z ]{0,8}\"",
        "// [a-z ]{0,10}\n",
        "/\\* [a-z\n]{0,10} \\*/",
        prop::sample::select(vec![" ", "\n", ";", "(", ")", "{", "}", ","]).prop_map(str::to_string),
    ]
}

fn arb_closed_source() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_closed_fragment(), 0..20).prop_map(|parts| parts.concat())
}

/// Kotha-like source assembled from fragments, so every rule is exercised.
fn arb_source() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_fragment(), 0..40).prop_map(|parts| parts.concat())
}

fn tokenizer() -> KothaTokenizer {
    KothaTokenizer::default()
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn coverage_holds_for_arbitrary_text(text in any::<String>()) {
        let tokens = tokenizer().tokenize(&text);
        prop_assert!(validate_coverage(&text, &tokens));
        let rebuilt: String = tokens.iter().map(|t| t.text(&text)).collect();
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn coverage_holds_for_kotha_like_text(text in arb_source()) {
        let tokens = tokenizer().tokenize(&text);
        prop_assert!(validate_coverage(&text, &tokens));
    }

    #[test]
    fn tokenization_is_deterministic(text in arb_source()) {
        prop_assert_eq!(tokenizer().tokenize(&text), tokenizer().tokenize(&text));
    }

    #[test]
    fn keywords_are_whole_words(text in arb_source()) {
        let bytes = text.as_bytes();
        for token in tokenizer().tokenize(&text) {
            if token.kind != TokenKind::Keyword {
                continue;
            }
            prop_assert!(KOTHA_KEYWORDS.contains(&token.text(&text)));
            if token.range.start > 0 {
                prop_assert!(!is_word_byte(bytes[token.range.start - 1]));
            }
            if token.range.end < bytes.len() {
                prop_assert!(!is_word_byte(bytes[token.range.end]));
            }
        }
    }

    #[test]
    fn numbers_are_digits_with_optional_fraction(text in arb_source()) {
        for token in tokenizer().tokenize(&text) {
            if token.kind != TokenKind::Number {
                continue;
            }
            let number = token.text(&text);
            let mut parts = number.splitn(2, '.');
            let whole = parts.next().unwrap_or("");
            prop_assert!(!whole.is_empty() && whole.bytes().all(|b| b.is_ascii_digit()));
            if let Some(frac) = parts.next() {
                prop_assert!(!frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()));
            }
        }
    }

    #[test]
    fn operators_only_contain_operator_bytes(text in arb_source()) {
        for token in tokenizer().tokenize(&text) {
            if token.kind == TokenKind::Operator {
                prop_assert!(token.text(&text).bytes().all(|b| OPERATOR_BYTES.contains(&b)));
            }
        }
    }

    #[test]
    fn strings_and_comments_open_with_markers(text in arb_source()) {
        for token in tokenizer().tokenize(&text) {
            let s = token.text(&text);
            match token.kind {
                TokenKind::String => prop_assert!(s.starts_with('"')),
                TokenKind::Comment => prop_assert!(s.starts_with("//") || s.starts_with("/*")),
                _ => {}
            }
        }
    }

    #[test]
    fn quoted_keyword_is_a_single_string(
        keyword in prop::sample::select(KOTHA_KEYWORDS),
        prefix in arb_closed_source(),
    ) {
        let literal = format!("\"{keyword}\"");
        let text = format!("{prefix}{literal}");
        let literal_start = prefix.len();
        let tokens = tokenizer().tokenize(&text);
        let last = tokens.last().expect("non-empty");
        prop_assert_eq!(last.kind, TokenKind::String);
        prop_assert_eq!(last.range.clone(), literal_start..text.len());
        prop_assert!(
            tokens
                .iter()
                .filter(|t| t.kind == TokenKind::Keyword)
                .all(|t| t.range.end <= literal_start)
        );
    }

    #[test]
    fn plain_tokens_are_merged(text in arb_source()) {
        let tokens = tokenizer().tokenize(&text);
        for pair in tokens.windows(2) {
            prop_assert!(!(pair[0].kind == TokenKind::Plain && pair[1].kind == TokenKind::Plain));
        }
    }
}
