//! Subject token and wildcard validation.
//!
//! A subject is a non-empty dot-delimited sequence of non-empty tokens.
//! The register path (SUB patterns) additionally permits the standalone
//! wildcard tokens `*` (matches one token) and `>` (matches the remaining
//! suffix; must be last). The lookup path (PUB subjects) permits no
//! wildcards at all. Both paths share the tokenizer so the two rule sets
//! cannot drift apart.
//!
//! Tokenization splits on the single byte `.`; no escaping or quoting is
//! defined.

use std::fmt;

/// A SUB pattern was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubError {
    /// The rejected pattern, possibly empty.
    pub pattern: String,
    /// Why the pattern was rejected.
    pub reason: &'static str,
}

impl fmt::Display for SubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pattern.is_empty() {
            write!(f, "invalid sub: {}", self.reason)
        } else {
            write!(f, "invalid sub \"{}\": {}", self.pattern, self.reason)
        }
    }
}

impl std::error::Error for SubError {}

/// A PUB / lookup subject was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    /// The rejected subject, possibly empty.
    pub subject: String,
    /// Why the subject was rejected.
    pub reason: &'static str,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subject.is_empty() {
            write!(f, "invalid lookup: {}", self.reason)
        } else {
            write!(f, "invalid lookup \"{}\": {}", self.subject, self.reason)
        }
    }
}

impl std::error::Error for LookupError {}

fn sub_err(pattern: &str, reason: &'static str) -> SubError {
    SubError { pattern: pattern.to_string(), reason }
}

fn lookup_err(subject: &str, reason: &'static str) -> LookupError {
    LookupError { subject: subject.to_string(), reason }
}

/// Validate a SUB pattern and return its tokens.
///
/// Accepts standalone `*` tokens anywhere and a standalone `>` token in
/// the final position only.
///
/// # Errors
///
/// Rejects the empty string, empty tokens (leading, trailing, or double
/// dots), tokens that contain a wildcard without being exactly that
/// wildcard, and a `>` that is not the last token.
pub fn valid_sub(pattern: &str) -> Result<Vec<&str>, SubError> {
    if pattern.is_empty() {
        return Err(sub_err(pattern, "must not be empty"));
    }

    let tokens: Vec<&str> = pattern.split('.').collect();

    for (i, token) in tokens.iter().enumerate() {
        match *token {
            "" => return Err(sub_err(pattern, "empty token")),
            "*" => {},
            ">" => {
                if i != tokens.len() - 1 {
                    return Err(sub_err(pattern, "'>' must be the last token"));
                }
            },
            t if t.contains(['*', '>']) => {
                return Err(sub_err(pattern, "wildcards must be standalone tokens"));
            },
            _ => {},
        }
    }

    Ok(tokens)
}

/// Validate a PUB / lookup subject and return its tokens.
///
/// # Errors
///
/// Rejects the empty string, empty tokens, and any occurrence of `*` or
/// `>` anywhere in the subject.
pub fn valid_lookup(subject: &str) -> Result<Vec<&str>, LookupError> {
    if subject.is_empty() {
        return Err(lookup_err(subject, "must not be empty"));
    }

    let tokens: Vec<&str> = subject.split('.').collect();

    for token in &tokens {
        if token.is_empty() {
            return Err(lookup_err(subject, "empty token"));
        }
        if token.contains(['*', '>']) {
            return Err(lookup_err(subject, "wildcards not allowed in lookup"));
        }
    }

    Ok(tokens)
}
