//! Behavioral tests for scope selector matching
//!
//! Each test pins one documented matching rule against realistic scope
//! lists as produced by a TextMate-style lexer.

use scopefold_selector::{Selector, SelectorMap};

fn matches(selector: &str, scopes: &[&str]) -> bool {
    Selector::new(selector).unwrap().matches(scopes)
}

// ============================================================================
// SCOPE AND PATH MATCHING
// ============================================================================

/// A selector scope matches an entry that has more segments
#[test]
fn test_prefix_match() {
    assert!(matches(
        "entity.name.class",
        &["source.x", "entity.name.class.foo"]
    ));
    assert!(!matches("entity.name.class.foo.bar", &["entity.name.class.foo"]));
}

/// Ancestor scopes need not be adjacent
#[test]
fn test_ancestor_path() {
    assert!(matches(
        "text.html meta.tag",
        &["text.html", "meta.tag.inline", "entity.name.tag"]
    ));
    assert!(matches(
        "text.html entity.name",
        &["text.html", "meta.tag.inline", "entity.name.tag"]
    ));
    assert!(!matches(
        "meta.tag text.html",
        &["text.html", "meta.tag.inline", "entity.name.tag"]
    ));
}

/// One scope list entry can satisfy only one path element
#[test]
fn test_path_consumes_entries() {
    assert!(!matches("meta meta", &["source.x", "meta.block"]));
    assert!(matches("meta meta", &["meta.function", "meta.block"]));
}

#[test]
fn test_wildcard_segment() {
    assert!(matches("keyword.*.end", &["keyword.control.end.m"]));
    assert!(!matches("keyword.*.end", &["keyword.control"]));
    assert!(matches("*", &["anything"]));
    assert!(!matches("*", &[]));
}

// ============================================================================
// BOOLEAN OPERATORS
// ============================================================================

#[test]
fn test_subtraction() {
    assert!(!matches(
        "string - string.quoted",
        &["source.x", "string.quoted.double"]
    ));
    assert!(matches(
        "string - string.quoted",
        &["source.x", "string.unquoted.heredoc"]
    ));
}

#[test]
fn test_negation() {
    assert!(matches("-comment", &["source.x", "keyword"]));
    assert!(!matches("-comment", &["source.x", "comment.line"]));
    assert!(matches("-comment", &[]));
}

#[test]
fn test_conjunction_and_disjunction() {
    let scopes = ["source.x", "meta.function", "keyword.control"];
    assert!(matches("meta.function & keyword", &scopes));
    assert!(!matches("meta.class & keyword", &scopes));
    assert!(matches("meta.class | keyword", &scopes));
    assert!(matches("meta.class, keyword", &scopes));
}

/// Groups nest selectors and may be negated
#[test]
fn test_groups() {
    let scopes = ["source.x", "string.quoted.double"];
    assert!(matches("source.x & (string, comment)", &scopes));
    assert!(!matches("source.x & -(string, comment)", &scopes));
    assert!(matches("(comment | string) - string.quoted.single", &scopes));
}

// ============================================================================
// PRIORITY
// ============================================================================

/// Priority prefixes never change the boolean result
#[test]
fn test_priority_does_not_affect_matching() {
    let scopes = ["source.x", "comment.block"];
    for source in ["comment", "L:comment", "R:comment", "B:comment", "R:(comment)"] {
        assert!(matches(source, &scopes), "{source}");
    }
    assert_eq!(Selector::new("L:comment").unwrap().rank(&scopes), -1);
    assert_eq!(Selector::new("R:(comment)").unwrap().rank(&scopes), 1);
    assert_eq!(Selector::new("B:comment").unwrap().rank(&scopes), 0);
    assert_eq!(Selector::new("comment").unwrap().rank(&scopes), 0);
}

#[test]
fn test_priority_of_alternation_takes_first_tagged_match() {
    let selector = Selector::new("L:string, R:comment").unwrap();
    assert_eq!(selector.rank(&["comment.line"]), 1);
    assert_eq!(selector.rank(&["string", "comment"]), -1);
}

// ============================================================================
// SELECTOR MAPS
// ============================================================================

/// A configuration-style indentation map resolves by declaration order
#[test]
fn test_indentation_map() {
    let map = SelectorMap::from_entries([
        ("keyword.control.end", -1),
        ("keyword.control.conditional", 1),
        ("keyword.control.repeat", 1),
        ("storage.type.function", 1),
    ])
    .unwrap();

    assert_eq!(map.value(&["source.m", "keyword.control.end.m"]), Some(&-1));
    assert_eq!(
        map.value(&["source.m", "meta.function", "storage.type.function.m"]),
        Some(&1)
    );
    assert_eq!(map.value(&["source.m", "variable.other"]), None);
}
