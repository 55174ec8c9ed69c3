//! Glob to URL matcher compilation
//!
//! Translation rules, applied in a single left-to-right pass:
//!
//! | Glob | Regex | Meaning |
//! |------|-------|---------|
//! | `{a,b}` | `(a\|b)` | alternation |
//! | `**/` | `(?:.*/)?` | zero or more leading path segments, including a bare `/` |
//! | `**` | `.+` | one or more characters, crossing `/` |
//! | `*` | `[^/]*` | zero or more characters within a segment |
//! | `?` | `.` | exactly one character |
//!
//! Every other regex metacharacter is escaped and the result is anchored.
//! A pattern that does not produce a valid regex (e.g. unbalanced braces)
//! falls back to an exact literal match, so `compile` never fails.

use regex::Regex;
use tracing::debug;

/// Characters that make a glob match more than one literal string
const WILDCARDS: &[char] = &['*', '?', '{', '}'];

/// Whether a glob contains wildcard characters
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(WILDCARDS)
}

/// A compiled glob
#[derive(Debug, Clone)]
pub struct Matcher {
    kind: MatcherKind,
}

#[derive(Debug, Clone)]
enum MatcherKind {
    Regex(Regex),
    Literal(String),
}

impl Matcher {
    pub(crate) fn from_regex(regex: Regex) -> Self {
        Self {
            kind: MatcherKind::Regex(regex),
        }
    }

    /// Test a normalized URL (or relative path) against this matcher
    pub fn test(&self, url: &str) -> bool {
        match &self.kind {
            MatcherKind::Regex(regex) => regex.is_match(url),
            MatcherKind::Literal(literal) => literal == url,
        }
    }

    /// Whether this matcher fell back to literal comparison
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, MatcherKind::Literal(_))
    }
}

/// Translate a glob into an anchored regex source string
pub fn to_regex_source(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    let mut chars = glob.chars().peekable();
    let mut brace_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("(?:.*/)?");
                } else {
                    out.push_str(".+");
                }
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push('.'),
            '{' => {
                brace_depth += 1;
                out.push('(');
            }
            '}' => {
                brace_depth = brace_depth.saturating_sub(1);
                out.push(')');
            }
            ',' if brace_depth > 0 => out.push('|'),
            other => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }

    format!("^{}$", out)
}

/// Compile a glob into a matcher. Total: malformed globs match literally.
pub fn compile(glob: &str) -> Matcher {
    let source = to_regex_source(glob);
    match Regex::new(&source) {
        Ok(regex) => Matcher::from_regex(regex),
        Err(e) => {
            debug!("Glob '{}' is not a valid pattern ({}), matching literally", glob, e);
            Matcher {
                kind: MatcherKind::Literal(glob.to_string()),
            }
        }
    }
}
