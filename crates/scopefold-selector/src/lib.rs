//! scopefold-selector - Scope selectors for lexer scope lists
//!
//! A grammar-based lexer labels each token with a scope list, outer to
//! inner (`["source.matlab", "meta.function", "entity.name.function"]`).
//! This crate parses selector expressions over such lists and evaluates
//! them.
//!
//! # Example
//!
//! ```
//! use scopefold_selector::{Selector, SelectorMap};
//!
//! let selector = Selector::new("text.html meta.tag")?;
//! assert!(selector.matches(&["text.html", "meta.tag.inline", "entity.name.tag"]));
//!
//! let indentation = SelectorMap::from_entries([
//!     ("keyword.control.end", -1),
//!     ("keyword.control", 1),
//! ])?;
//! assert_eq!(indentation.value(&["source.m", "keyword.control.if"]), Some(&1));
//! # Ok::<(), scopefold_selector::SelectorError>(())
//! ```

pub mod error;
pub mod fast_path;
pub mod map;
pub mod matcher;
pub mod parser;
pub mod selector;

// Re-export main types and functions
pub use error::{Result, SelectorError};
pub use map::{SelectorEntry, SelectorMap};
pub use matcher::{Atom, Matcher, Operator, Priority, ScopeMatcher};
pub use parser::{parse, parse_uncached};
pub use selector::{MemoizedSelector, Selector, SelectorSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
