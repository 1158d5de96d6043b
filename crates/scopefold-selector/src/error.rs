//! Error types for selector construction

use thiserror::Error;

/// Errors that can occur while building a selector
///
/// Matching never fails; a selector that was built successfully answers
/// `true` or `false` for every scope list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector source is not valid selector syntax
    #[error("invalid selector `{selector}`: {expected}")]
    Syntax {
        /// The offending selector source
        selector: String,
        /// The parser's expected-token diagnostic
        expected: String,
    },
}

impl SelectorError {
    /// The selector source that failed to parse
    pub fn selector(&self) -> &str {
        match self {
            SelectorError::Syntax { selector, .. } => selector,
        }
    }
}

/// Result type for selector operations
pub type Result<T> = std::result::Result<T, SelectorError>;
