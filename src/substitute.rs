//! `${NAME}` expansion on raw command lines.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ShellError;
use crate::vars::VarStore;

/// `${` up to the first following `}`. The name may be empty or contain any other character.
static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").expect("reference pattern is valid"));

/// Replace every `${NAME}` in `line` with its value from `store`.
///
/// A single left-to-right pass: values are inserted verbatim and never rescanned, so a value
/// that itself contains `${...}` stays literal. References to unbound names are deleted. A `${`
/// with no closing brace is left as ordinary text; [`check_references`] finds it.
pub fn substitute(line: &str, store: &VarStore) -> String {
    REFERENCE
        .replace_all(line, |caps: &Captures| {
            store.get(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}

/// Report the first `${` that has no closing brace.
pub fn check_references(line: &str) -> Result<(), ShellError> {
    // Any `${` before the last complete reference would have matched, so only the tail can hold
    // an unterminated one.
    let tail_start = REFERENCE.find_iter(line).last().map_or(0, |m| m.end());
    match line[tail_start..].find("${") {
        Some(pos) => Err(ShellError::MalformedReference {
            offset: tail_start + pos,
        }),
        None => Ok(()),
    }
}
