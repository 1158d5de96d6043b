//! Compiled rule selectors
//!
//! [`Classifiers`] is built once from [`Rules`] and then shared read-only by
//! every leveling pass.

use tracing::{debug, warn};

use scopefold_selector::{Selector, SelectorError, SelectorMap, SelectorSource};

use super::rules::{OrderedMap, Rules, SymbolKind};
use crate::error::{ConfigError, ConfigResult};

/// How invalid selectors are handled when compiling rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompileMode {
    /// Fail on the first invalid selector (development and tests)
    #[default]
    Strict,
    /// Log the invalid selector or malformed section and treat it as never
    /// matching
    Lenient,
}

/// Selectors and selector maps compiled from a rule set
#[derive(Debug, Clone, Default)]
pub struct Classifiers {
    pub assignment_single: Selector,
    pub assignment_multiple: Selector,
    pub assignment_separator: Selector,
    pub declarations: Selector,
    pub dedentation: Selector,
    pub continuation: Selector,
    pub indentation: SelectorMap<i32>,
    pub symbols: SelectorMap<SymbolKind>,
}

impl Classifiers {
    /// Compile rules, handling invalid selectors according to `mode`
    pub fn compile(rules: &Rules, mode: CompileMode) -> ConfigResult<Self> {
        Compiler::new(mode).compile(rules)
    }

    /// Compile leniently and also return every selector or section that was
    /// degraded
    pub fn compile_with_report(rules: &Rules) -> (Self, Vec<ConfigError>) {
        let mut compiler = Compiler::new(CompileMode::Lenient);
        // Lenient compilation records problems instead of failing
        let classifiers = compiler.compile(rules).unwrap_or_default();
        (classifiers, compiler.problems)
    }

    /// Signed nesting delta of the first matching `indentation` entry, or 0
    pub fn indentation_delta<S: AsRef<str>>(&self, scopes: &[S]) -> i32 {
        self.indentation.value(scopes).copied().unwrap_or(0)
    }

    /// Symbol kind of the first matching `symbols` entry
    pub fn symbol_kind<S: AsRef<str>>(&self, scopes: &[S]) -> Option<SymbolKind> {
        self.symbols.value(scopes).copied()
    }

    /// Whether the scope list names a declaration
    pub fn is_declaration<S: AsRef<str>>(&self, scopes: &[S]) -> bool {
        self.declarations.matches(scopes)
    }
}

struct Compiler {
    mode: CompileMode,
    problems: Vec<ConfigError>,
}

impl Compiler {
    fn new(mode: CompileMode) -> Self {
        Self {
            mode,
            problems: Vec::new(),
        }
    }

    fn compile(&mut self, rules: &Rules) -> ConfigResult<Classifiers> {
        for malformed in &rules.malformed {
            self.degrade(ConfigError::Section {
                section: malformed.section.clone(),
                message: malformed.message.clone(),
            })?;
        }

        let classifiers = Classifiers {
            assignment_single: self.selector("assignment.single", &rules.assignment.single)?,
            assignment_multiple: self
                .selector("assignment.multiple", &rules.assignment.multiple)?,
            assignment_separator: self
                .selector("assignment.separator", &rules.assignment.separator)?,
            declarations: self.selector("declarations", &rules.declarations)?,
            dedentation: self.selector("dedentation", &rules.dedentation)?,
            continuation: self
                .selector("punctuation.continuation", &rules.punctuation.continuation)?,
            indentation: self.map("indentation", &rules.indentation)?,
            symbols: self.map("symbols", &rules.symbols)?,
        };

        debug!(
            indentation = classifiers.indentation.len(),
            symbols = classifiers.symbols.len(),
            degraded = self.problems.len(),
            "compiled rule classifiers"
        );
        Ok(classifiers)
    }

    fn selector(
        &mut self,
        section: &str,
        source: &Option<SelectorSource>,
    ) -> ConfigResult<Selector> {
        let Some(source) = source else {
            return Ok(Selector::never());
        };
        match Selector::new(source.clone()) {
            Ok(selector) => Ok(selector),
            Err(error) => {
                self.reject_selector(section, error)?;
                Ok(Selector::never())
            }
        }
    }

    fn map<V: Copy>(
        &mut self,
        section: &str,
        entries: &OrderedMap<V>,
    ) -> ConfigResult<SelectorMap<V>> {
        let mut compiled = Vec::with_capacity(entries.len());
        for (key, value) in entries.iter() {
            match Selector::new(key) {
                Ok(selector) => compiled.push((key, selector, *value)),
                Err(error) => self.reject_selector(section, error)?,
            }
        }
        Ok(SelectorMap::from_selectors(compiled))
    }

    fn reject_selector(&mut self, section: &str, error: SelectorError) -> ConfigResult<()> {
        self.degrade(ConfigError::Selector {
            section: section.to_string(),
            error,
        })
    }

    fn degrade(&mut self, error: ConfigError) -> ConfigResult<()> {
        match self.mode {
            CompileMode::Strict => Err(error),
            CompileMode::Lenient => {
                warn!(%error, "treated as never matching");
                self.problems.push(error);
                Ok(())
            }
        }
    }
}
