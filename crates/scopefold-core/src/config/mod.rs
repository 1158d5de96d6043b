//! Rule configuration
//!
//! Rules are loaded from a TOML (or JSON) file per language:
//!
//! ```toml
//! declarations = ["entity.name.function", "entity.name.type.class"]
//! dedentation = ["keyword.control.else", "keyword.control.elseif"]
//!
//! [assignment]
//! single = "meta.assignment.variable.single"
//! multiple = "meta.assignment.variable.group"
//! separator = "punctuation.separator.comma"
//!
//! [punctuation]
//! continuation = "punctuation.separator.continuation"
//!
//! [indentation]
//! "keyword.control.end" = -1
//! "keyword.control.else" = -1
//! "keyword.control" = 1
//!
//! [symbols]
//! "entity.name.function" = "function"
//! ```
//!
//! Selector keys in map sections must be quoted, otherwise TOML reads the
//! dots as nested tables.

mod classifiers;
mod rules;


pub use classifiers::{Classifiers, CompileMode};
pub use rules::{
    AssignmentRules, MalformedSection, OrderedMap, PunctuationRules, Rules, SymbolKind,
};
