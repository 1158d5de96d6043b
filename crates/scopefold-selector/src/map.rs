//! Ordered selector-to-value maps
//!
//! A [`SelectorMap`] resolves a scope list to the value of the *first*
//! declared entry whose selector matches. Declaration order is part of the
//! meaning of a map and is preserved exactly.

use crate::error::Result;
use crate::selector::Selector;

/// One `(source, selector, value)` entry of a [`SelectorMap`]
#[derive(Debug, Clone)]
pub struct SelectorEntry<V> {
    key: String,
    selector: Selector,
    value: V,
}

impl<V> SelectorEntry<V> {
    /// The selector source this entry was declared with
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The compiled selector
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The associated value
    pub fn value(&self) -> &V {
        &self.value
    }
}

/// Immutable, ordered list of selector entries
#[derive(Debug, Clone)]
pub struct SelectorMap<V> {
    entries: Vec<SelectorEntry<V>>,
}

impl<V> Default for SelectorMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> SelectorMap<V> {
    /// An empty map, which resolves nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a map from `(selector source, value)` pairs, in order
    ///
    /// Fails on the first source that is not a valid selector.
    pub fn from_entries<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| {
                let key = key.into();
                let selector = Selector::new(key.as_str())?;
                Ok(SelectorEntry {
                    key,
                    selector,
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Build a map from already compiled selectors, in order
    pub fn from_selectors<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Selector, V)>,
        K: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, selector, value)| SelectorEntry {
                    key: key.into(),
                    selector,
                    value,
                })
                .collect(),
        }
    }

    /// First entry whose selector matches
    pub fn entry<S: AsRef<str>>(&self, scopes: &[S]) -> Option<&SelectorEntry<V>> {
        self.entries
            .iter()
            .find(|entry| entry.selector.matches(scopes))
    }

    /// Source of the first matching entry
    pub fn key<S: AsRef<str>>(&self, scopes: &[S]) -> Option<&str> {
        self.entry(scopes).map(SelectorEntry::key)
    }

    /// Value of the first matching entry
    pub fn value<S: AsRef<str>>(&self, scopes: &[S]) -> Option<&V> {
        self.entry(scopes).map(SelectorEntry::value)
    }

    /// Whether any entry matches
    pub fn has<S: AsRef<str>>(&self, scopes: &[S]) -> bool {
        self.entry(scopes).is_some()
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &SelectorEntry<V>> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
