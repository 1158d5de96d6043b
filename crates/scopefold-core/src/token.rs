//! Token types
//!
//! Offsets are byte offsets relative to the start of the token's line.

use serde::{Deserialize, Serialize};

/// A token as returned by the lexer, before leveling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToken {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Scope list, outer to inner
    pub scopes: Vec<String>,
}

impl RawToken {
    /// Create a raw token
    pub fn new<I, S>(start: usize, end: usize, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start,
            end,
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }
}

/// A merged, level-annotated token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Scope list, outer to inner
    pub scopes: Vec<String>,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Zero-based line number
    pub line: usize,
    /// Source text covered by the token
    pub text: String,
    /// Nesting level
    pub level: i32,
}

impl Token {
    /// Attach line and text to a raw token; the level starts at zero
    pub fn from_raw(raw: RawToken, line: usize, text: impl Into<String>) -> Self {
        Self {
            scopes: raw.scopes,
            start: raw.start,
            end: raw.end,
            line,
            text: text.into(),
            level: 0,
        }
    }

    /// The innermost scope, or `""` for a token without scopes
    pub fn terminal_scope(&self) -> &str {
        self.scopes.last().map_or("", String::as_str)
    }

    /// Extend this token over the following one
    pub(crate) fn absorb(&mut self, next: Token) {
        debug_assert_eq!(self.line, next.line, "merged tokens must share a line");
        self.end = next.end;
        self.text.push_str(&next.text);
    }
}
