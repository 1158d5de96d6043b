//! Selector facade
//!
//! A [`Selector`] wraps the matchers parsed from one source string or from a
//! list of alternative sources. It matches when any alternative matches.
//! Selectors are immutable; memoization lives in a caller-owned
//! [`MemoizedSelector`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectorError};
use crate::fast_path;
use crate::matcher::{Matcher, Priority};
use crate::parser;

/// Selector source as written in a rule file: a string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorSource {
    /// A single selector expression
    One(String),
    /// Alternatives, matched as if joined by `,`
    Many(Vec<String>),
}

impl SelectorSource {
    /// The individual source strings
    pub fn alternatives(&self) -> &[String] {
        match self {
            SelectorSource::One(source) => std::slice::from_ref(source),
            SelectorSource::Many(sources) => sources,
        }
    }
}

impl From<&str> for SelectorSource {
    fn from(source: &str) -> Self {
        SelectorSource::One(source.to_string())
    }
}

impl From<String> for SelectorSource {
    fn from(source: String) -> Self {
        SelectorSource::One(source)
    }
}

impl From<Vec<String>> for SelectorSource {
    fn from(sources: Vec<String>) -> Self {
        SelectorSource::Many(sources)
    }
}

impl From<&[&str]> for SelectorSource {
    fn from(sources: &[&str]) -> Self {
        SelectorSource::Many(sources.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SelectorSource {
    fn from(sources: [&str; N]) -> Self {
        SelectorSource::Many(sources.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for SelectorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.alternatives().join(", "))
    }
}

/// One compiled alternative
#[derive(Debug, Clone)]
struct Alternative {
    matcher: Arc<Matcher>,
    /// Set when the source is a flat literal eligible for the fast path
    literal: Option<String>,
}

impl Alternative {
    fn compile(source: &str) -> Result<Self> {
        let matcher = parser::parse(source)?;
        let literal = fast_path::is_literal(source).then(|| source.to_string());
        Ok(Self { matcher, literal })
    }

    fn matches<S: AsRef<str>>(&self, scopes: &[S], key: Option<&str>) -> bool {
        match (&self.literal, key) {
            (Some(literal), Some(key)) => fast_path::matches_key(literal, key),
            _ => self.matcher.matches(scopes),
        }
    }
}

/// A compiled scope selector
///
/// # Example
///
/// ```
/// use scopefold_selector::Selector;
///
/// let selector = Selector::new("string - string.quoted")?;
/// assert!(selector.matches(&["source.x", "string.unquoted"]));
/// assert!(!selector.matches(&["source.x", "string.quoted.double"]));
/// # Ok::<(), scopefold_selector::SelectorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Selector {
    source: Option<SelectorSource>,
    alternatives: Vec<Alternative>,
}

impl Selector {
    /// Compile a selector from a source string or list of alternatives
    pub fn new(source: impl Into<SelectorSource>) -> Result<Self> {
        let source = source.into();
        let alternatives = source
            .alternatives()
            .iter()
            .map(|alternative| Alternative::compile(alternative))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            source: Some(source),
            alternatives,
        })
    }

    /// A selector that matches nothing
    pub fn never() -> Self {
        Self {
            source: None,
            alternatives: Vec::new(),
        }
    }

    /// The source this selector was compiled from (`None` for [`Selector::never`])
    pub fn source(&self) -> Option<&SelectorSource> {
        self.source.as_ref()
    }

    /// Whether this selector can never match
    pub fn is_never(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// The parsed matchers, one per alternative
    pub fn matchers(&self) -> impl Iterator<Item = &Matcher> {
        self.alternatives.iter().map(|alt| alt.matcher.as_ref())
    }

    /// Check whether any alternative matches the scope list
    pub fn matches<S: AsRef<str>>(&self, scopes: &[S]) -> bool {
        let key = self
            .alternatives
            .iter()
            .any(|alt| alt.literal.is_some())
            .then(|| fast_path::scope_key(scopes))
            .flatten();
        self.matches_with_key(scopes, key.as_deref())
    }

    fn matches_with_key<S: AsRef<str>>(&self, scopes: &[S], key: Option<&str>) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(scopes, key))
    }

    /// Check whether the selector matches any of several scope lists
    pub fn includes<L, S>(&self, lists: &[L]) -> bool
    where
        L: AsRef<[S]>,
        S: AsRef<str>,
    {
        lists.iter().any(|scopes| self.matches(scopes.as_ref()))
    }

    /// Priority tag of the first matching alternative that carries one
    pub fn priority<S: AsRef<str>>(&self, scopes: &[S]) -> Option<Priority> {
        self.alternatives
            .iter()
            .find_map(|alt| alt.matcher.priority(scopes))
    }

    /// Numeric priority rank (`L` = -1, `R` = 1, otherwise 0)
    pub fn rank<S: AsRef<str>>(&self, scopes: &[S]) -> i32 {
        self.priority(scopes).map_or(0, Priority::rank)
    }

    /// Borrow this selector with a match-result memo
    pub fn memoized(&self) -> MemoizedSelector<'_> {
        MemoizedSelector {
            selector: self,
            results: HashMap::new(),
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::never()
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(source: &str) -> Result<Self> {
        Selector::new(source)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, matcher) in self.matchers().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{matcher}")?;
        }
        Ok(())
    }
}

/// A selector paired with a memo of results keyed by the space-joined scope list
///
/// Entries are never invalidated: the selector is immutable for the memo's
/// lifetime. Scope lists containing a space bypass the memo.
#[derive(Debug)]
pub struct MemoizedSelector<'a> {
    selector: &'a Selector,
    results: HashMap<String, bool>,
}

impl MemoizedSelector<'_> {
    /// Match, reusing a previous result for the same scope list
    pub fn matches<S: AsRef<str>>(&mut self, scopes: &[S]) -> bool {
        let Some(key) = fast_path::scope_key(scopes) else {
            return self.selector.matches(scopes);
        };
        if let Some(&hit) = self.results.get(&key) {
            return hit;
        }
        let result = self.selector.matches_with_key(scopes, Some(&key));
        self.results.insert(key, result);
        result
    }

    /// Number of memoized scope lists
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing has been memoized yet
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
