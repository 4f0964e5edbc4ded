//! Proptest strategies for protocol subjects and patterns.
//!
//! The codec and trie property suites both draw their generated subjects
//! from here, so the two cannot drift apart on what counts as a valid
//! token or pattern. Every rendered value is pushed back through the
//! validators in [`herald_core::subject`]: a generator bug fails the
//! suite immediately instead of silently narrowing coverage.

use herald_core::subject::{valid_lookup, valid_sub};
use proptest::prelude::*;

/// One literal subject token, drawn from the wire charset.
pub fn token() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}"
}

/// One token of a generated SUB pattern: a literal or the `*` wildcard.
#[derive(Debug, Clone)]
pub enum PatternToken {
    /// A token that must match exactly.
    Literal(String),
    /// The single-token wildcard.
    Star,
}

/// A pattern body of one to four literal or `*` tokens.
///
/// The terminal `>` is not part of the body; [`render`] and
/// [`sub_pattern`] append it separately so callers control the suffix.
pub fn pattern_tokens() -> impl Strategy<Value = Vec<PatternToken>> {
    prop::collection::vec(
        prop_oneof![
            3 => token().prop_map(PatternToken::Literal),
            1 => Just(PatternToken::Star),
        ],
        1..5,
    )
}

/// Render the pattern string and one subject that matches it.
///
/// `fills` supplies the token behind each `*`, indexed by position;
/// `tail` supplies the suffix behind a trailing `>`, with an empty tail
/// meaning no `>`.
///
/// # Panics
///
/// Panics if either rendered string fails its validator, which would
/// mean the generator and the subject rules have drifted apart.
pub fn render(
    tokens: &[PatternToken],
    fills: &[String],
    tail: &[String],
) -> (String, String) {
    let mut pattern: Vec<String> = Vec::new();
    let mut subject: Vec<String> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token {
            PatternToken::Literal(t) => {
                pattern.push(t.clone());
                subject.push(t.clone());
            },
            PatternToken::Star => {
                pattern.push("*".to_string());
                subject.push(fills[i].clone());
            },
        }
    }

    if !tail.is_empty() {
        pattern.push(">".to_string());
        subject.extend(tail.iter().cloned());
    }

    let pattern = pattern.join(".");
    let subject = subject.join(".");
    assert!(
        valid_sub(&pattern).is_ok(),
        "generated pattern {:?} fails validation",
        pattern
    );
    assert!(
        valid_lookup(&subject).is_ok(),
        "generated subject {:?} fails validation",
        subject
    );

    (pattern, subject)
}

/// A literal PUB / lookup subject of one to four tokens.
pub fn lookup_subject() -> impl Strategy<Value = String> {
    prop::collection::vec(token(), 1..5).prop_map(|tokens| {
        let subject = tokens.join(".");
        assert!(
            valid_lookup(&subject).is_ok(),
            "generated subject {:?} fails validation",
            subject
        );
        subject
    })
}

/// A SUB pattern: literal and `*` tokens with an optional terminal `>`,
/// or a bare `>`.
pub fn sub_pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (pattern_tokens(), any::<bool>()).prop_map(|(tokens, gt)| {
            let mut parts: Vec<String> = tokens
                .iter()
                .map(|token| match token {
                    PatternToken::Literal(t) => t.clone(),
                    PatternToken::Star => "*".to_string(),
                })
                .collect();
            if gt {
                parts.push(">".to_string());
            }

            let pattern = parts.join(".");
            assert!(
                valid_sub(&pattern).is_ok(),
                "generated pattern {:?} fails validation",
                pattern
            );
            pattern
        }),
        1 => Just(">".to_string()),
    ]
}
