//! Literal fast path
//!
//! A selector that is a single flat dotted literal (`entity.name.function`)
//! matches exactly when one scope in the list starts with it. That can be
//! answered by a substring search over the space-joined scope list instead
//! of walking the matcher tree.
//!
//! An occurrence counts only when it starts a scope (string start or after a
//! space) and ends on a segment boundary (string end, `.`, or space). The
//! search is only valid when no scope contains a space; [`scope_key`] returns
//! `None` in that case and callers fall back to the general evaluator.

/// Check whether `source` is a flat literal selector
///
/// Each dotted part must be a valid segment: non-empty, first character in
/// `[A-Za-z0-9+_]`, the rest in `[A-Za-z0-9+_-]`.
pub fn is_literal(source: &str) -> bool {
    !source.is_empty() && source.split('.').all(is_segment)
}

fn is_segment(part: &str) -> bool {
    let mut bytes = part.bytes();
    match bytes.next() {
        Some(first) if is_segment_start(first) => {
            bytes.all(|byte| is_segment_start(byte) || byte == b'-')
        }
        _ => false,
    }
}

fn is_segment_start(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'_'
}

/// Join a scope list with spaces, or `None` if a scope contains a space
pub fn scope_key<S: AsRef<str>>(scopes: &[S]) -> Option<String> {
    let mut key = String::new();
    for (i, scope) in scopes.iter().enumerate() {
        let scope = scope.as_ref();
        if scope.contains(' ') {
            return None;
        }
        if i > 0 {
            key.push(' ');
        }
        key.push_str(scope);
    }
    Some(key)
}

/// Match a literal against a space-joined scope list
pub fn matches_key(literal: &str, key: &str) -> bool {
    let bytes = key.as_bytes();
    key.match_indices(literal).any(|(start, _)| {
        let end = start + literal.len();
        let starts_scope = start == 0 || bytes[start - 1] == b' ';
        let ends_segment = end == bytes.len() || matches!(bytes[end], b'.' | b' ');
        starts_scope && ends_segment
    })
}
