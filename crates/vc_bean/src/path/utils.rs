//! String-level path helpers.
//!
//! Converter registrations are keyed by canonical path strings, and the
//! lookups here operate on those strings directly.

use crate::path::tokenize;
use crate::path::tokenizer::matching_bracket;

/// Renders `path` in canonical form: key quotes removed.
///
/// ```
/// use vc_bean::path::canonical_name;
///
/// assert_eq!(canonical_name("map['key'].items[\"0\"]"), "map[key].items[0]");
/// ```
pub fn canonical_name(path: &str) -> String {
    tokenize(path).to_string()
}

/// Whether `path` has a nested or keyed part.
#[inline]
pub fn is_nested_or_indexed(path: &str) -> bool {
    path.contains(['.', '['])
}

/// The byte offset of the first `.` outside brackets.
pub fn first_nested_separator(path: &str) -> Option<usize> {
    let mut depth = 0_usize;
    for (i, c) in path.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// The byte offset of the last `.` outside brackets.
pub fn last_nested_separator(path: &str) -> Option<usize> {
    let mut depth = 0_usize;
    for (i, c) in path.char_indices().rev() {
        match c {
            ']' => depth += 1,
            '[' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// The property name of a keyed path, e.g. `items` for `items[0]`.
pub fn property_name(path: &str) -> &str {
    if path.ends_with(']')
        && let Some(open) = path.find('[')
    {
        return &path[..open];
    }
    path
}

/// Removes every key from a path.
///
/// ```
/// use vc_bean::path::strip_keys;
///
/// assert_eq!(strip_keys("a[0].b[k][1].c"), "a.b.c");
/// ```
pub fn strip_keys(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(start) = rest.find('[') {
        let Some(len) = matching_bracket(&rest[start..]) else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

/// Every variant of `path` with one or more keys removed.
///
/// The order is the lookup order for path-specific converters: the first
/// key stripped, then combinations further right.
///
/// ```
/// use vc_bean::path::stripped_variants;
///
/// assert_eq!(stripped_variants("a[0].b[1]"), ["a.b[1]", "a.b", "a[0].b"]);
/// assert!(stripped_variants("a.b").is_empty());
/// ```
pub fn stripped_variants(path: &str) -> Vec<String> {
    let mut variants = Vec::new();
    collect_stripped(&mut variants, "", path);
    variants
}

fn collect_stripped(variants: &mut Vec<String>, nested: &str, path: &str) {
    let Some(start) = path.find('[') else {
        return;
    };
    let Some(len) = matching_bracket(&path[start..]) else {
        return;
    };
    let end = start + len;
    let prefix = &path[..start];
    let key = &path[start..=end];
    let suffix = &path[end + 1..];

    variants.push(format!("{nested}{prefix}{suffix}"));
    collect_stripped(variants, &format!("{nested}{prefix}"), suffix);
    collect_stripped(variants, &format!("{nested}{prefix}{key}"), suffix);
}

/// Whether a converter registered for `registered` applies to `property`.
///
/// True when both are equal, or when `registered` is `property`
/// followed by exactly one key.
pub fn matches_property(registered: &str, property: &str) -> bool {
    let Some(rest) = registered.strip_prefix(property) else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    rest.starts_with('[') && matching_bracket(rest) == Some(rest.len() - 1)
}

// -----------------------------------------------------------------------------
// Tests
