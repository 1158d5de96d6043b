//! Selector parser
//!
//! Turns selector source text into a [`Matcher`] tree using the pest grammar
//! in `grammar.pest`.
//!
//! # Syntax
//!
//! - Scope: `entity.name.function`, `*` matches any one segment
//! - Path: `text.html meta.tag` (ancestor, then descendant)
//! - Group: `(a, b)`
//! - Priority prefix: `L:`, `R:`, `B:` on a path or group
//! - Operators: `|` (or), `&` (and), `-` (and not), leading `-` negates
//! - Top-level `,` separates alternatives
//!
//! Parsing is a pure function of the source text, so [`parse`] memoizes
//! matchers process-wide by source string.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use pest::error::{ErrorVariant, LineColLocation};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use tracing::trace;

use crate::error::{Result, SelectorError};
use crate::matcher::{Atom, Matcher, Operator, Priority, ScopeMatcher};

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct SelectorGrammar;

type Cache = RwLock<HashMap<String, Arc<Matcher>>>;

fn cache() -> &'static Cache {
    static CACHE: OnceLock<Cache> = OnceLock::new();
    CACHE.get_or_init(Default::default)
}

/// Parse a selector, reusing a previously parsed matcher for the same source
///
/// Failed parses are not cached.
pub fn parse(source: &str) -> Result<Arc<Matcher>> {
    let hit = cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(source)
        .cloned();
    if let Some(matcher) = hit {
        return Ok(matcher);
    }

    let matcher = Arc::new(parse_uncached(source)?);
    trace!(source, "parsed selector");
    let mut cache = cache().write().unwrap_or_else(PoisonError::into_inner);
    Ok(cache
        .entry(source.to_string())
        .or_insert(matcher)
        .clone())
}

/// Parse a selector without consulting the global cache
pub fn parse_uncached(source: &str) -> Result<Matcher> {
    let mut pairs = SelectorGrammar::parse(Rule::root, source)
        .map_err(|err| syntax_error(source, &err))?;
    Ok(build_selector(next_pair(&mut pairs, "selector")))
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, expected: &str) -> Pair<'i, Rule> {
    pairs
        .next()
        .unwrap_or_else(|| unreachable!("grammar guarantees a {expected}"))
}

/// `selector = composite ("," composite)*`
fn build_selector(pair: Pair<Rule>) -> Matcher {
    let mut composites = pair.into_inner().map(build_composite);
    let first = composites
        .next()
        .unwrap_or_else(|| unreachable!("grammar guarantees a composite"));
    composites.fold(first, Matcher::or)
}

/// `composite = expression (operator composite)?`
fn build_composite(pair: Pair<Rule>) -> Matcher {
    let mut inner = pair.into_inner();
    let left = build_expression(next_pair(&mut inner, "composite operand"));

    match inner.next() {
        None => left,
        Some(symbol) => {
            let operator = Operator::from_symbol(symbol.as_str())
                .unwrap_or_else(|| unreachable!("unknown operator {:?}", symbol.as_str()));
            let right = build_composite(next_pair(&mut inner, "right operand"));
            Matcher::composite(left, operator, right)
        }
    }
}

fn build_expression(pair: Pair<Rule>) -> Matcher {
    match pair.as_rule() {
        Rule::negation => {
            let operand = next_pair(&mut pair.into_inner(), "negated operand");
            Matcher::negate(build_expression(operand))
        }
        Rule::group => build_group(pair),
        Rule::path => build_path(pair),
        other => unreachable!("unexpected expression rule {other:?}"),
    }
}

fn build_group(pair: Pair<Rule>) -> Matcher {
    let mut prefix = None;
    let mut selector = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::prefix => prefix = build_prefix(&inner),
            Rule::selector => selector = Some(build_selector(inner)),
            other => unreachable!("unexpected group rule {other:?}"),
        }
    }
    let selector = selector.unwrap_or_else(|| unreachable!("grammar guarantees a group body"));
    Matcher::group(prefix, selector)
}

fn build_path(pair: Pair<Rule>) -> Matcher {
    let mut prefix = None;
    let mut scopes = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::prefix => prefix = build_prefix(&inner),
            Rule::scope => scopes.push(build_scope(inner)),
            other => unreachable!("unexpected path rule {other:?}"),
        }
    }
    Matcher::path(prefix, scopes)
}

fn build_scope(pair: Pair<Rule>) -> ScopeMatcher {
    let atoms = pair
        .into_inner()
        .map(|atom| match atom.as_rule() {
            Rule::wildcard => Atom::Wildcard,
            _ => Atom::Segment(atom.as_str().to_string()),
        })
        .collect();
    ScopeMatcher::new(atoms)
}

fn build_prefix(pair: &Pair<Rule>) -> Option<Priority> {
    pair.as_str().chars().next().and_then(Priority::from_tag)
}

fn syntax_error(source: &str, err: &pest::error::Error<Rule>) -> SelectorError {
    let column = match err.line_col {
        LineColLocation::Pos((_, column)) | LineColLocation::Span((_, column), _) => column,
    };

    let expected = match &err.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            let mut names: Vec<&str> = positives.iter().map(rule_name).collect();
            names.dedup();
            format!("expected {} at column {column}", names.join(" or "))
        }
        ErrorVariant::ParsingError { .. } => format!("unexpected input at column {column}"),
        ErrorVariant::CustomError { message } => format!("{message} at column {column}"),
    };

    SelectorError::Syntax {
        selector: source.to_string(),
        expected,
    }
}

fn rule_name(rule: &Rule) -> &'static str {
    match rule {
        Rule::segment | Rule::scope | Rule::path => "scope",
        Rule::wildcard => "`*`",
        Rule::prefix => "priority prefix",
        Rule::group => "group",
        Rule::negation => "negation",
        Rule::operator => "operator",
        Rule::composite | Rule::selector => "selector",
        Rule::EOI => "end of selector",
        _ => "token",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_scope() {
        let matcher = parse_uncached("entity.name.function").unwrap();
        assert_eq!(
            matcher,
            Matcher::path(
                None,
                vec![ScopeMatcher::new(vec![
                    Atom::Segment("entity".into()),
                    Atom::Segment("name".into()),
                    Atom::Segment("function".into()),
                ])]
            )
        );
    }

    #[test]
    fn test_parse_path_and_wildcard() {
        let matcher = parse_uncached("source.* meta.tag").unwrap();
        match matcher {
            Matcher::Path { prefix, scopes } => {
                assert_eq!(prefix, None);
                assert_eq!(scopes.len(), 2);
                assert_eq!(scopes[0].atoms()[1], Atom::Wildcard);
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_prefixes() {
        match parse_uncached("R:comment.line").unwrap() {
            Matcher::Path { prefix, .. } => assert_eq!(prefix, Some(Priority::Right)),
            other => panic!("expected path, got {other:?}"),
        }
        match parse_uncached("L:(string, comment)").unwrap() {
            Matcher::Group { prefix, .. } => assert_eq!(prefix, Some(Priority::Left)),
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_segment_named_like_prefix() {
        // `L` without a colon is a plain segment
        let matcher = parse_uncached("L").unwrap();
        assert!(matcher.matches(&["L.x"]));
    }

    #[test]
    fn test_hyphen_inside_segment() {
        let matcher = parse_uncached("meta.embedded-block").unwrap();
        assert!(matcher.matches(&["meta.embedded-block.js"]));
        assert!(!matcher.matches(&["meta.embedded"]));
    }

    #[test]
    fn test_composite_is_right_recursive() {
        // a - b | c  ==  a & !(b | c)
        let matcher = parse_uncached("a - b | c").unwrap();
        assert!(matcher.matches(&["a"]));
        assert!(!matcher.matches(&["a", "b"]));
        assert!(!matcher.matches(&["a", "c"]));
    }

    #[test]
    fn test_display_normalizes_spacing() {
        let matcher = parse_uncached("  a.b   c|-d ,  R:(e&f)").unwrap();
        assert_eq!(matcher.to_string(), "a.b c | -d, R:(e & f)");
        assert_eq!(parse_uncached(&matcher.to_string()).unwrap(), matcher);
    }

    #[test]
    fn test_syntax_errors() {
        for source in ["", "a..b", "a.", "(a", "a,", "a |", "L:", ".a", "a b)"] {
            let err = parse_uncached(source).unwrap_err();
            assert_eq!(err.selector(), source);
            assert!(err.to_string().contains("column"), "{err}");
        }
    }

    #[test]
    fn test_cache_returns_shared_matcher() {
        let first = parse("keyword.control.cache-test").unwrap();
        let second = parse("keyword.control.cache-test").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
