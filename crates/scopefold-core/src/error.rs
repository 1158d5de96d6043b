//! Error types for configuration and leveling

use thiserror::Error;

use scopefold_selector::SelectorError;

/// Opaque error raised by an upstream lexer
pub type LexerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while loading or compiling rule configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A selector in the named section failed to parse
    #[error("invalid selector in `{section}`: {error}")]
    Selector {
        section: String,
        #[source]
        error: SelectorError,
    },

    /// A rule-file section is present but has the wrong shape
    #[error("malformed `{section}` section: {message}")]
    Section { section: String, message: String },

    /// TOML rule file is malformed
    #[error("TOML rules error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON rule file is malformed
    #[error("JSON rules error: {0}")]
    Json(#[from] serde_json::Error),

    /// A lexer pattern is not a valid regular expression
    #[error("invalid lexer pattern `{pattern}`: {error}")]
    Pattern {
        pattern: String,
        #[source]
        error: regex::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while leveling a document
#[derive(Error, Debug)]
pub enum LevelError {
    /// The upstream lexer failed on a line; the error is passed through untouched
    #[error("lexer failed on line {line}: {source}")]
    Lexer {
        line: usize,
        #[source]
        source: LexerError,
    },

    /// The lexer returned offsets that do not slice the line
    #[error("token range {start}..{end} is not valid on line {line}")]
    TokenRange {
        line: usize,
        start: usize,
        end: usize,
    },

    /// The background leveling task did not complete
    #[error("leveling task failed: {0}")]
    Task(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type for leveling operations
pub type Result<T> = std::result::Result<T, LevelError>;
