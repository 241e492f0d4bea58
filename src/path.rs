//! Field path arithmetic and rule resolution.
//!
//! Paths are dotted strings: `user.name`, `tags.0`, `orders.3.lines.1.sku`.
//! The root path is the empty string. A wildcard key `parent.*` governs every
//! direct child of `parent` that has no exact entry of its own; `*` is the
//! wildcard for top-level children.

use crate::Rules;

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Key that governs direct children of the root.
pub const ROOT_WILDCARD: &str = "*";

/// Appends `segment` to `parent`.
pub fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", parent, SEPARATOR, segment)
    }
}

/// Strips the final segment. Single-segment paths have the root as parent.
pub fn parent(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// The wildcard key that would govern `path` if it had no exact entry.
pub fn wildcard_key(path: &str) -> String {
    let parent = parent(path);
    if parent.is_empty() {
        ROOT_WILDCARD.to_string()
    } else {
        format!("{}{}*", parent, SEPARATOR)
    }
}

pub fn is_wildcard(key: &str) -> bool {
    key == ROOT_WILDCARD || key.ends_with(".*")
}

/// True if `path` lies strictly below `ancestor`.
pub fn is_descendant(path: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return !path.is_empty();
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path[ancestor.len()..].starts_with(SEPARATOR)
}

/// Finds the rule spec governing `path`.
///
/// An exact entry always wins. Otherwise a non-root path falls back to the
/// wildcard entry of its parent. Only one level is consulted: `a.*.*` is not
/// a recognised pattern. The root can only be governed by an explicit `""`
/// entry.
pub fn resolve<'r>(rules: &'r Rules, path: &str) -> &'r [String] {
    if let Some(spec) = rules.get(path) {
        return spec;
    }
    if path.is_empty() {
        return &[];
    }
    rules
        .get(&wildcard_key(path))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
