//! Leveling state machine
//!
//! [`LevelState::advance`] is one step of the fold over a document's tokens.
//! It only sees the token's line number and its [`TokenClass`], so the state
//! machine can be exercised without a lexer or any selectors.

/// What the classifiers say about one token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TokenClass {
    /// Signed delta from the first matching `indentation` entry (0 if none)
    pub delta: i32,
    /// The token matches the dedentation selector (an `else`-style redent)
    pub redent: bool,
    /// The token matches the continuation selector
    pub continuation: bool,
}

impl TokenClass {
    /// A token that matched nothing
    pub const PLAIN: TokenClass = TokenClass {
        delta: 0,
        redent: false,
        continuation: false,
    };

    /// A token carrying only an indentation delta
    pub fn delta(delta: i32) -> Self {
        Self {
            delta,
            ..Self::PLAIN
        }
    }
}

/// Result of advancing over one token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Level assigned to the token
    pub level: i32,
    /// Adjustment to apply to every token already emitted on the same line
    pub retroactive: i32,
}

/// Per-document leveling state
///
/// A declaration opens on the token carrying a positive delta (or a redent)
/// and stays open until the first token of a later line, one line longer
/// for every line ending in continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelState {
    /// Committed nesting level
    pub stack: i32,
    /// Delta waiting for the open declaration to close
    pub pending_delta: i32,
    /// A declaration is open
    pub in_declaration: bool,
    /// The open declaration continues onto the next line
    pub in_continuation: bool,
    /// Line of the previously visited token
    pub last_line: Option<usize>,
}

impl LevelState {
    /// Visit one token on `line`, returning the next state and the token's level
    #[must_use]
    pub fn advance(self, line: usize, class: TokenClass) -> (LevelState, Step) {
        debug_assert!(
            !matches!(self.last_line, Some(last) if line < last),
            "tokens must be visited in line order"
        );
        let mut next = self;

        if next.in_declaration && next.last_line.is_some_and(|last| line > last) {
            if next.in_continuation {
                next.in_continuation = false;
            } else {
                next.stack += next.pending_delta;
                next.pending_delta = 0;
                next.in_declaration = false;
            }
        }

        let mut retroactive = 0;
        if next.in_declaration {
            next.pending_delta += class.delta;
        } else {
            if class.delta < 0 {
                next.stack += class.delta;
                retroactive = class.delta;
            }
            if class.delta > 0 || class.redent {
                next.pending_delta += class.delta.abs();
                next.in_declaration = true;
            }
        }
        if next.in_declaration && class.continuation {
            next.in_continuation = true;
        }

        next.last_line = Some(line);
        let step = Step {
            level: next.stack,
            retroactive,
        };
        (next, step)
    }

    /// Whether `advance` would close the open declaration before visiting `line`
    pub fn closes_at(&self, line: usize) -> bool {
        self.in_declaration
            && !self.in_continuation
            && self.last_line.is_some_and(|last| line > last)
    }
}
