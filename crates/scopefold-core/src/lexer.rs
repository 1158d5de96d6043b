//! Lexer contract and a pattern-based stand-in lexer
//!
//! The leveling engine drives any [`LineTokenizer`] one line at a time and
//! threads its opaque state from line to line. [`PatternLexer`] is a small
//! regex-rule tokenizer for the CLI and tests; real deployments plug in a
//! grammar engine.
//!
//! # Pattern file
//!
//! ```toml
//! scope_name = "source.m"
//!
//! [[rule]]
//! pattern = "\\bfunction\\b"
//! scopes = ["meta.function.m", "storage.type.function.m"]
//!
//! [[rule]]
//! pattern = "\\bend\\b"
//! scopes = ["keyword.control.end.m"]
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, LexerError};
use crate::token::RawToken;

/// Tokens for one line plus the state to carry into the next line
#[derive(Debug, Clone, PartialEq)]
pub struct LineTokens<S> {
    /// Tokens in column order, offsets relative to the line start
    pub tokens: Vec<RawToken>,
    /// Lexer state after this line
    pub state: S,
}

/// A line-at-a-time tokenizer producing scope lists
pub trait LineTokenizer {
    /// Opaque state carried between lines
    type State: Clone;

    /// State before the first line of a document
    fn initial_state(&self) -> Self::State;

    /// Tokenize one line (without its line terminator)
    fn tokenize_line(
        &self,
        line: &str,
        state: &Self::State,
    ) -> Result<LineTokens<Self::State>, LexerError>;
}

/// One pattern rule: text matching `pattern` gets `scopes` under the root scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Regular expression, matched at the current column
    pub pattern: String,
    /// Scopes pushed below the root scope, outer to inner
    pub scopes: Vec<String>,
}

/// Declarative pattern lexer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternLexerConfig {
    /// Root scope given to every token
    pub scope_name: String,
    /// Rules, tried in order at each column
    #[serde(default, rename = "rule")]
    pub rules: Vec<PatternRule>,
}

/// Regex-rule line tokenizer
///
/// At each column the first rule matching there (with non-empty text) wins.
/// Runs of text no rule matches become tokens carrying only the root scope.
#[derive(Debug, Clone)]
pub struct PatternLexer {
    scope_name: String,
    rules: Vec<(Regex, Vec<String>)>,
}

impl PatternLexer {
    /// Compile a lexer from its configuration
    pub fn new(config: PatternLexerConfig) -> ConfigResult<Self> {
        let rules = config
            .rules
            .into_iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern).map_err(|error| ConfigError::Pattern {
                    pattern: rule.pattern.clone(),
                    error,
                })?;
                Ok((regex, rule.scopes))
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self {
            scope_name: config.scope_name,
            rules,
        })
    }

    /// Load a lexer from a TOML pattern file
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        Self::new(toml::from_str(toml_str)?)
    }

    /// The root scope
    pub fn scope_name(&self) -> &str {
        &self.scope_name
    }

    fn rule_at(&self, line: &str, column: usize) -> Option<(usize, &[String])> {
        self.rules.iter().find_map(|(regex, scopes)| {
            regex
                .find_at(line, column)
                .filter(|found| found.start() == column && found.end() > column)
                .map(|found| (found.end(), scopes.as_slice()))
        })
    }

    fn token(&self, start: usize, end: usize, scopes: &[String]) -> RawToken {
        let mut list = Vec::with_capacity(scopes.len() + 1);
        list.push(self.scope_name.clone());
        list.extend(scopes.iter().cloned());
        RawToken {
            start,
            end,
            scopes: list,
        }
    }

    /// Tokenize a single line
    pub fn tokenize(&self, line: &str) -> Vec<RawToken> {
        let mut tokens = Vec::new();
        let mut unmatched_start = None;
        let mut column = 0;

        while column < line.len() {
            match self.rule_at(line, column) {
                Some((end, scopes)) => {
                    if let Some(start) = unmatched_start.take() {
                        tokens.push(self.token(start, column, &[]));
                    }
                    tokens.push(self.token(column, end, scopes));
                    column = end;
                }
                None => {
                    unmatched_start.get_or_insert(column);
                    column += line[column..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }
        if let Some(start) = unmatched_start {
            tokens.push(self.token(start, line.len(), &[]));
        }

        tokens
    }
}

impl LineTokenizer for PatternLexer {
    type State = ();

    fn initial_state(&self) -> Self::State {}

    fn tokenize_line(&self, line: &str, _state: &()) -> Result<LineTokens<()>, LexerError> {
        Ok(LineTokens {
            tokens: self.tokenize(line),
            state: (),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERNS: &str = r#"
scope_name = "source.m"

[[rule]]
pattern = "\\bif\\b"
scopes = ["keyword.control.if.m"]

[[rule]]
pattern = "\\bend\\b"
scopes = ["keyword.control.end.m"]

[[rule]]
pattern = "[A-Za-z_][A-Za-z0-9_]*"
scopes = ["variable.other.m"]
"#;

    #[test]
    fn test_tokenize_line() {
        let lexer = PatternLexer::from_toml_str(PATTERNS).unwrap();
        let tokens = lexer.tokenize("if x");

        assert_eq!(
            tokens,
            vec![
                RawToken::new(0, 2, ["source.m", "keyword.control.if.m"]),
                RawToken::new(2, 3, ["source.m"]),
                RawToken::new(3, 4, ["source.m", "variable.other.m"]),
            ]
        );
    }

    #[test]
    fn test_word_boundaries_use_line_context() {
        let lexer = PatternLexer::from_toml_str(PATTERNS).unwrap();
        let tokens = lexer.tokenize("endif");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].scopes, vec!["source.m", "variable.other.m"]);
    }

    #[test]
    fn test_unmatched_runs_use_root_scope() {
        let lexer = PatternLexer::from_toml_str(PATTERNS).unwrap();
        let tokens = lexer.tokenize("  = é;");
        assert_eq!(tokens, vec![RawToken::new(0, "  = é;".len(), ["source.m"])]);
        assert!(lexer.tokenize("").is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternLexer::from_toml_str(
            "scope_name = \"source.x\"\n[[rule]]\npattern = \"(\"\nscopes = []\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }
}
