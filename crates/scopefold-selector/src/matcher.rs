//! Matcher AST and evaluation
//!
//! A parsed selector is a tree of [`Matcher`] nodes. Scope-level matching
//! (one dotted scope string) is handled by [`ScopeMatcher`] and [`Atom`];
//! everything above that works on a whole scope list, outer to inner.
//!
//! Evaluation is a single function, [`Matcher::matches`], dispatched on the
//! variant tag. Priority retrieval never changes the boolean answer.

use std::fmt;

/// Priority tag of a path or group (`L:`, `R:`, `B:`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// `L:` ranks below unprefixed selectors
    Left,
    /// `R:` ranks above unprefixed selectors
    Right,
    /// `B:` ranks the same as unprefixed selectors
    Both,
}

impl Priority {
    /// Parse a prefix tag character
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'L' => Some(Priority::Left),
            'R' => Some(Priority::Right),
            'B' => Some(Priority::Both),
            _ => None,
        }
    }

    /// The tag character as written in selector source
    pub fn tag(self) -> char {
        match self {
            Priority::Left => 'L',
            Priority::Right => 'R',
            Priority::Both => 'B',
        }
    }

    /// Numeric rank used to order simultaneously matching selectors
    pub fn rank(self) -> i32 {
        match self {
            Priority::Left => -1,
            Priority::Right => 1,
            Priority::Both => 0,
        }
    }
}

/// One dotted part of a scope matcher
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    /// Literal segment, compared exactly
    Segment(String),
    /// `*`, matches any single segment
    Wildcard,
}

impl Atom {
    /// Check this atom against one dotted part of a scope
    pub fn matches(&self, part: &str) -> bool {
        match self {
            Atom::Segment(segment) => segment == part,
            Atom::Wildcard => true,
        }
    }
}

/// Dotted atom sequence matched against a single scope as a prefix
///
/// `entity.name` matches `entity.name.class` but not `entity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeMatcher {
    atoms: Vec<Atom>,
}

impl ScopeMatcher {
    /// Create a scope matcher from its atoms
    pub fn new(atoms: Vec<Atom>) -> Self {
        assert!(!atoms.is_empty(), "scope matcher requires at least one atom");
        Self { atoms }
    }

    /// The atoms of this matcher, general to specific
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Check whether `scope` starts with this matcher's segments
    pub fn matches(&self, scope: &str) -> bool {
        let mut parts = scope.split('.');
        self.atoms
            .iter()
            .all(|atom| parts.next().is_some_and(|part| atom.matches(part)))
    }
}

/// Textual operator joining two composite operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `|`
    Or,
    /// `&`
    And,
    /// `-`, left and not right
    Subtract,
}

impl Operator {
    /// Parse an operator symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "|" => Some(Operator::Or),
            "&" => Some(Operator::And),
            "-" => Some(Operator::Subtract),
            _ => None,
        }
    }

    /// The symbol as written in selector source
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Or => "|",
            Operator::And => "&",
            Operator::Subtract => "-",
        }
    }
}

/// A node of a parsed selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// Scope matchers located in order as a subsequence of the scope list
    Path {
        prefix: Option<Priority>,
        scopes: Vec<ScopeMatcher>,
    },
    /// Parenthesized selector
    Group {
        prefix: Option<Priority>,
        selector: Box<Matcher>,
    },
    /// Either operand matches (top-level `,` or resolved `|`)
    Or(Box<Matcher>, Box<Matcher>),
    /// Both operands match
    And(Box<Matcher>, Box<Matcher>),
    /// The operand does not match
    Negate(Box<Matcher>),
    /// Operator expression, resolved to `Or`/`And` when parsed
    Composite {
        operator: Operator,
        matcher: Box<Matcher>,
    },
}

impl Matcher {
    /// Build a path matcher
    pub fn path(prefix: Option<Priority>, scopes: Vec<ScopeMatcher>) -> Self {
        assert!(!scopes.is_empty(), "path matcher requires at least one scope");
        Matcher::Path { prefix, scopes }
    }

    /// Build a group matcher
    pub fn group(prefix: Option<Priority>, selector: Matcher) -> Self {
        Matcher::Group {
            prefix,
            selector: Box::new(selector),
        }
    }

    /// Build a negation
    pub fn negate(matcher: Matcher) -> Self {
        Matcher::Negate(Box::new(matcher))
    }

    /// Build an alternation of two selectors
    pub fn or(left: Matcher, right: Matcher) -> Self {
        Matcher::Or(Box::new(left), Box::new(right))
    }

    /// Resolve `left <operator> right` into its boolean form
    pub fn composite(left: Matcher, operator: Operator, right: Matcher) -> Self {
        let (left, right) = (Box::new(left), Box::new(right));
        let resolved = match operator {
            Operator::Or => Matcher::Or(left, right),
            Operator::And => Matcher::And(left, right),
            Operator::Subtract => Matcher::And(left, Box::new(Matcher::Negate(right))),
        };
        Matcher::Composite {
            operator,
            matcher: Box::new(resolved),
        }
    }

    /// Evaluate this matcher against a scope list (outer to inner)
    pub fn matches<S: AsRef<str>>(&self, scopes: &[S]) -> bool {
        match self {
            Matcher::Path { scopes: path, .. } => path_matches(path, scopes),
            Matcher::Group { selector, .. } => selector.matches(scopes),
            Matcher::Or(left, right) => left.matches(scopes) || right.matches(scopes),
            Matcher::And(left, right) => left.matches(scopes) && right.matches(scopes),
            Matcher::Negate(inner) => !inner.matches(scopes),
            Matcher::Composite { matcher, .. } => matcher.matches(scopes),
        }
    }

    /// Priority tag of the matching branch, if it carries one
    pub fn priority<S: AsRef<str>>(&self, scopes: &[S]) -> Option<Priority> {
        match self {
            Matcher::Path { prefix, .. } | Matcher::Group { prefix, .. } => {
                prefix.filter(|_| self.matches(scopes))
            }
            Matcher::Or(left, right) => left
                .priority(scopes)
                .or_else(|| right.priority(scopes)),
            Matcher::And(left, _) => {
                if self.matches(scopes) {
                    left.priority(scopes)
                } else {
                    None
                }
            }
            Matcher::Negate(_) => None,
            Matcher::Composite { matcher, .. } => matcher.priority(scopes),
        }
    }
}

fn path_matches<S: AsRef<str>>(path: &[ScopeMatcher], scopes: &[S]) -> bool {
    let mut cursor = 0;
    for scope in scopes {
        debug_assert!(cursor < path.len(), "path cursor overran its matchers");
        if path[cursor].matches(scope.as_ref()) {
            cursor += 1;
            if cursor == path.len() {
                return true;
            }
        }
    }
    false
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Segment(segment) => f.write_str(segment),
            Atom::Wildcard => f.write_str("*"),
        }
    }
}

impl fmt::Display for ScopeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{atom}")?;
        }
        Ok(())
    }
}

fn write_prefix(f: &mut fmt::Formatter<'_>, prefix: Option<Priority>) -> fmt::Result {
    match prefix {
        Some(priority) => write!(f, "{}:", priority.tag()),
        None => Ok(()),
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Path { prefix, scopes } => {
                write_prefix(f, *prefix)?;
                for (i, scope) in scopes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{scope}")?;
                }
                Ok(())
            }
            Matcher::Group { prefix, selector } => {
                write_prefix(f, *prefix)?;
                write!(f, "({selector})")
            }
            Matcher::Or(left, right) => write!(f, "{left}, {right}"),
            Matcher::And(left, right) => write!(f, "{left} & {right}"),
            Matcher::Negate(inner) => write!(f, "-{inner}"),
            Matcher::Composite { operator, matcher } => match (operator, matcher.as_ref()) {
                (Operator::Subtract, Matcher::And(left, right)) => match right.as_ref() {
                    Matcher::Negate(right) => write!(f, "{left} - {right}"),
                    other => write!(f, "{left} - {other}"),
                },
                (_, Matcher::Or(left, right) | Matcher::And(left, right)) => {
                    write!(f, "{left} {} {right}", operator.symbol())
                }
                (_, other) => write!(f, "{other}"),
            },
        }
    }
}
