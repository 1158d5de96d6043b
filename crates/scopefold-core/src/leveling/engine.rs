//! Per-document leveling pass
//!
//! The engine drives a [`LineTokenizer`] over the document, merges split
//! assignment tokens on each line and folds [`LevelState::advance`] over the
//! merged tokens.

use std::collections::HashMap;

use tracing::{debug, trace};

use scopefold_selector::MemoizedSelector;

use super::state::{LevelState, TokenClass};
use crate::config::Classifiers;
use crate::error::{LevelError, Result};
use crate::lexer::LineTokenizer;
use crate::token::Token;

/// Leveling engine over compiled classifiers and a line tokenizer
///
/// The engine itself holds no per-document state; every call to
/// [`LevelingEngine::level_document`] starts from a fresh [`LevelState`].
#[derive(Debug)]
pub struct LevelingEngine<'a, L> {
    classifiers: &'a Classifiers,
    lexer: &'a L,
}

impl<'a, L: LineTokenizer> LevelingEngine<'a, L> {
    /// Create an engine
    pub fn new(classifiers: &'a Classifiers, lexer: &'a L) -> Self {
        Self { classifiers, lexer }
    }

    /// Level a whole document, splitting it into lines
    pub fn level_document(&self, text: &str) -> Result<Vec<Token>> {
        self.level_lines(text.lines())
    }

    /// Level an ordered sequence of lines (without line terminators)
    pub fn level_lines<'t, I>(&self, lines: I) -> Result<Vec<Token>>
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut pass = Pass::new(self.classifiers);
        let mut lexer_state = self.lexer.initial_state();
        let mut line_count = 0;

        for (number, line) in lines.into_iter().enumerate() {
            let output = self
                .lexer
                .tokenize_line(line, &lexer_state)
                .map_err(|source| LevelError::Lexer {
                    line: number,
                    source,
                })?;
            lexer_state = output.state;

            let mut tokens = output
                .tokens
                .into_iter()
                .map(|raw| {
                    let text = line.get(raw.start..raw.end).ok_or(LevelError::TokenRange {
                        line: number,
                        start: raw.start,
                        end: raw.end,
                    })?;
                    Ok(Token::from_raw(raw, number, text))
                })
                .collect::<Result<Vec<_>>>()?;

            pass.merge(&mut tokens);
            pass.level(tokens);
            line_count += 1;
        }

        let tokens = pass.finish();
        debug!(lines = line_count, tokens = tokens.len(), "leveled document");
        Ok(tokens)
    }
}

/// State owned by a single leveling pass
struct Pass<'a> {
    classifiers: &'a Classifiers,
    single: MemoizedSelector<'a>,
    multiple: MemoizedSelector<'a>,
    separator: MemoizedSelector<'a>,
    classes: HashMap<Vec<String>, TokenClass>,
    state: LevelState,
    tokens: Vec<Token>,
}

impl<'a> Pass<'a> {
    fn new(classifiers: &'a Classifiers) -> Self {
        Self {
            classifiers,
            single: classifiers.assignment_single.memoized(),
            multiple: classifiers.assignment_multiple.memoized(),
            separator: classifiers.assignment_separator.memoized(),
            classes: HashMap::new(),
            state: LevelState::default(),
            tokens: Vec::new(),
        }
    }

    /// Coalesce adjacent split-assignment tokens on one line
    fn merge(&mut self, tokens: &mut Vec<Token>) {
        let mut i = 0;
        while i + 1 < tokens.len() {
            if self.should_merge(&tokens[i], &tokens[i + 1]) {
                let next = tokens.remove(i + 1);
                trace!(line = next.line, start = tokens[i].start, end = next.end, "merged tokens");
                tokens[i].absorb(next);
                continue;
            }
            i += 1;
        }
    }

    fn should_merge(&mut self, first: &Token, second: &Token) -> bool {
        if self.single.matches(&first.scopes) && self.single.matches(&second.scopes) {
            return true;
        }
        self.multiple.matches(&first.scopes)
            && self.multiple.matches(&second.scopes)
            && !self.separator.matches(&second.scopes)
    }

    /// Assign levels to one line's merged tokens and append them to the output
    fn level(&mut self, tokens: Vec<Token>) {
        let line_start = self.tokens.len();

        for mut token in tokens {
            let class = self.classify(&token.scopes);
            if self.state.closes_at(token.line) {
                trace!(
                    line = token.line,
                    delta = self.state.pending_delta,
                    "declaration closed"
                );
            }
            let (state, step) = self.state.advance(token.line, class);
            self.state = state;

            if step.retroactive != 0 {
                for earlier in &mut self.tokens[line_start..] {
                    earlier.level += step.retroactive;
                }
            }
            token.level = step.level;
            self.tokens.push(token);
        }
    }

    fn classify(&mut self, scopes: &[String]) -> TokenClass {
        if let Some(class) = self.classes.get(scopes) {
            return *class;
        }
        let class = TokenClass {
            delta: self.classifiers.indentation_delta(scopes),
            redent: self.classifiers.dedentation.matches(scopes),
            continuation: self.classifiers.continuation.matches(scopes),
        };
        self.classes.insert(scopes.to_vec(), class);
        class
    }

    fn finish(self) -> Vec<Token> {
        self.tokens
    }
}
