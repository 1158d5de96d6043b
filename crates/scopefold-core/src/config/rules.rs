//! Declarative rule file structures

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

use scopefold_selector::SelectorSource;

use crate::error::ConfigResult;

/// Symbol kind tag attached to scopes by the `symbols` map
///
/// Names follow the LSP symbol kinds, written in kebab-case in rule files
/// (`function`, `enum-member`, `type-parameter`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    File,
    Module,
    Namespace,
    Package,
    Class,
    Method,
    Property,
    Field,
    Constructor,
    Enum,
    Interface,
    Function,
    Variable,
    Constant,
    String,
    Number,
    Boolean,
    Array,
    Object,
    Key,
    Null,
    EnumMember,
    Struct,
    Event,
    Operator,
    TypeParameter,
}

impl SymbolKind {
    /// Numeric value of this kind in the Language Server Protocol
    pub fn lsp_value(self) -> u32 {
        self as u32 + 1
    }
}

/// Selector-keyed entries in declaration order
///
/// Built from the rule file's tables as they are read, so the order written
/// in the file is the order of resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, value)))
    }
}

/// A rule-file section or entry whose value had the wrong shape
///
/// The section is left unset, so its selector never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSection {
    /// Dotted section name, like `dedentation` or `assignment.single`
    pub section: String,
    /// What was wrong with the value
    pub message: String,
}

/// Selectors classifying split assignment tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentRules {
    /// Adjacent tokens both matching this merge into one
    pub single: Option<SelectorSource>,
    /// Adjacent tokens both matching this merge unless the second is a separator
    pub multiple: Option<SelectorSource>,
    /// Separator inside a multiple assignment
    pub separator: Option<SelectorSource>,
}

/// Punctuation selectors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PunctuationRules {
    /// Token that lets a declaration continue onto the next line
    pub continuation: Option<SelectorSource>,
}

/// Top-level rule set for one language
///
/// Every section is optional; a missing selector never matches. Sections
/// with the wrong shape are recorded in `malformed` instead of failing the
/// whole file, and compilation decides whether they are fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rules {
    /// Split-assignment merging
    pub assignment: AssignmentRules,
    /// Tokens naming a declaration (read by downstream consumers)
    pub declarations: Option<SelectorSource>,
    /// Tokens that redent, like `else`
    pub dedentation: Option<SelectorSource>,
    /// Punctuation classes
    pub punctuation: PunctuationRules,
    /// Selector to signed nesting delta, first match wins
    pub indentation: OrderedMap<i32>,
    /// Selector to symbol kind, first match wins
    pub symbols: OrderedMap<SymbolKind>,
    /// Sections that were present but could not be read
    #[serde(skip)]
    pub malformed: Vec<MalformedSection>,
}

impl Rules {
    /// Parse rules from a TOML string
    ///
    /// Only TOML syntax errors fail here; see [`Rules::malformed`].
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        let sections: toml::Table = toml::from_str(toml_str)?;
        Ok(SectionReader::default().read(sections))
    }

    /// Parse rules from a JSON string
    ///
    /// Only JSON syntax errors and a non-object document fail here.
    pub fn from_json_str(json_str: &str) -> ConfigResult<Self> {
        let sections: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json_str)?;
        Ok(SectionReader::default().read(sections))
    }

    /// Load rules from a file; `.json` files are JSON, anything else TOML
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }
}

/// A parsed document value that rule sections are decoded from
trait SectionValue: Sized {
    fn decode<T: DeserializeOwned>(self) -> Result<T, String>;

    /// Table entries in document order, or `None` if this is not a table
    fn into_entries(self) -> Option<Vec<(String, Self)>>;
}

impl SectionValue for toml::Value {
    fn decode<T: DeserializeOwned>(self) -> Result<T, String> {
        self.try_into().map_err(|error: toml::de::Error| error.to_string())
    }

    fn into_entries(self) -> Option<Vec<(String, Self)>> {
        match self {
            toml::Value::Table(table) => Some(table.into_iter().collect()),
            _ => None,
        }
    }
}

impl SectionValue for serde_json::Value {
    fn decode<T: DeserializeOwned>(self) -> Result<T, String> {
        serde_json::from_value(self).map_err(|error| error.to_string())
    }

    fn into_entries(self) -> Option<Vec<(String, Self)>> {
        match self {
            serde_json::Value::Object(map) => Some(map.into_iter().collect()),
            _ => None,
        }
    }
}

/// Reads sections one at a time so a bad section only loses itself
#[derive(Default)]
struct SectionReader {
    rules: Rules,
}

impl SectionReader {
    fn read<V, I>(mut self, sections: I) -> Rules
    where
        V: SectionValue,
        I: IntoIterator<Item = (String, V)>,
    {
        for (name, value) in sections {
            match name.as_str() {
                "assignment" => {
                    for (key, value) in self.table(&name, value) {
                        let section = format!("assignment.{key}");
                        match key.as_str() {
                            "single" => self.rules.assignment.single = self.decode(&section, value),
                            "multiple" => {
                                self.rules.assignment.multiple = self.decode(&section, value)
                            }
                            "separator" => {
                                self.rules.assignment.separator = self.decode(&section, value)
                            }
                            _ => {}
                        }
                    }
                }
                "punctuation" => {
                    for (key, value) in self.table(&name, value) {
                        if key == "continuation" {
                            self.rules.punctuation.continuation =
                                self.decode("punctuation.continuation", value);
                        }
                    }
                }
                "declarations" => self.rules.declarations = self.decode(&name, value),
                "dedentation" => self.rules.dedentation = self.decode(&name, value),
                "indentation" => self.rules.indentation = self.entries(&name, value),
                "symbols" => self.rules.symbols = self.entries(&name, value),
                _ => {}
            }
        }
        self.rules
    }

    fn decode<V: SectionValue, T: DeserializeOwned>(
        &mut self,
        section: &str,
        value: V,
    ) -> Option<T> {
        match value.decode() {
            Ok(decoded) => Some(decoded),
            Err(message) => {
                self.reject(section, message);
                None
            }
        }
    }

    fn table<V: SectionValue>(&mut self, section: &str, value: V) -> Vec<(String, V)> {
        value.into_entries().unwrap_or_else(|| {
            self.reject(section, "expected a table".to_string());
            Vec::new()
        })
    }

    /// Map section; a bad entry is dropped without losing its neighbours
    fn entries<V: SectionValue, T: DeserializeOwned>(
        &mut self,
        section: &str,
        value: V,
    ) -> OrderedMap<T> {
        let mut entries = Vec::new();
        for (key, value) in self.table(section, value) {
            match value.decode() {
                Ok(decoded) => entries.push((key, decoded)),
                Err(message) => self.reject(section, format!("entry `{key}`: {message}")),
            }
        }
        OrderedMap(entries)
    }

    fn reject(&mut self, section: &str, message: String) {
        self.rules.malformed.push(MalformedSection {
            section: section.to_string(),
            message,
        });
    }
}
