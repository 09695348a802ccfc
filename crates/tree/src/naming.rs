//! Name projection: fully-qualified dotted names and flattened external keys
//!
//! Canonical key rule: strip `_` and `-` inside every path segment, join the
//! segments with `_`, upper-case the result. `env.python.version_minor`
//! becomes `ENV_PYTHON_VERSIONMINOR`.
//!
//! Raw overrides short-circuit the rule at the level that declares them:
//!
//! - a leaf with a literal override projects exactly that literal, upper-cased
//! - a leaf with a bare override projects its local name as-is, upper-cased
//!   (`test_var` -> `TEST_VAR`)
//! - a group with a bare override drops every segment above it, so its
//!   descendants project as if the group were the root
//! - a group with a literal override replaces the path above and including it
//!   with the literal
//!
//! A leaf's own override always wins over any ancestor's.

use envium_core::{RawOverride, KEY_SEPARATOR, PATH_SEPARATOR, STRIPPED_NAME_CHARS};

/// Fully-qualified dotted name of a node.
///
/// `parent` is the parent's fullname; `None` for the root, whose fullname is
/// its own name.
#[must_use]
pub fn fullname(name: &str, raw: &RawOverride, parent: Option<&str>) -> String {
    match (raw, parent) {
        (RawOverride::Name(literal), _) => literal.clone(),
        (RawOverride::Bare, _) | (RawOverride::Off, None) => name.to_string(),
        (RawOverride::Off, Some(parent)) => format!("{parent}{PATH_SEPARATOR}{name}"),
    }
}

/// A single path segment with separator characters removed
#[must_use]
pub fn strip_segment(segment: &str) -> String {
    segment.replace(STRIPPED_NAME_CHARS, "")
}

/// Key prefix a group hands down to its children, before upper-casing.
///
/// `parent` is the parent's prefix; `None` for the root.
#[must_use]
pub fn group_key_prefix(name: &str, raw: &RawOverride, parent: Option<&str>) -> String {
    match (raw, parent) {
        (RawOverride::Name(literal), _) => literal.clone(),
        (RawOverride::Bare, _) | (RawOverride::Off, None) => strip_segment(name),
        (RawOverride::Off, Some(parent)) => join_key(parent, &strip_segment(name)),
    }
}

/// External key of a leaf under a group with key prefix `parent_prefix`
#[must_use]
pub fn external_key(name: &str, raw: &RawOverride, parent_prefix: &str) -> String {
    match raw {
        RawOverride::Name(literal) => literal.to_uppercase(),
        RawOverride::Bare => name.to_uppercase(),
        RawOverride::Off => join_key(parent_prefix, &strip_segment(name)).to_uppercase(),
    }
}

/// Project a plain dotted name with the canonical rule and no overrides
#[must_use]
pub fn key_from_fullname(fullname: &str) -> String {
    fullname
        .split(PATH_SEPARATOR)
        .map(strip_segment)
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
        .to_uppercase()
}

fn join_key(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}{KEY_SEPARATOR}{segment}")
    }
}
