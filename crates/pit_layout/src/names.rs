//! Display names for the layout codes used in results file names.
use std::borrow::Cow;

use tracing::warn;

const NAMES: &[(&str, &str)] = &[
    ("hexlike", "hexagonal-like"),
    ("hex", "hexagonal"),
    ("random", "random"),
    ("halton", "halton"),
    ("staggerXY", "staggerXY"),
    ("randomisedStaggerXY sd8", "randomisedStaggerXY"),
    ("randomisedStaggerXY8", "randomisedStaggerXY"),
    ("randomisedStaggerXY", "randomisedStaggerXY"),
    ("rSXY6", "rSXY6"),
    ("rSXY4", "rSXY4"),
];

/// Display name for a layout code, or `None` if the code is unknown.
pub fn lookup(code: &str) -> Option<&'static str> {
    NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Display name for a layout code, optionally with its first letter uppercased.
///
/// Unknown codes are returned unchanged, with a warning.
pub fn display_name(code: &str, capitalise: bool) -> Cow<'_, str> {
    let name = match lookup(code) {
        Some(name) => name,
        None => {
            warn!(code, "unknown layout code");
            code
        }
    };
    if !capitalise {
        return Cow::Borrowed(name);
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => {
            Cow::Owned(first.to_uppercase().chain(chars).collect())
        }
        _ => Cow::Borrowed(name),
    }
}
