//! Symbol names from undefined-symbol diagnostics
//!
//! Linters and type checkers word the same problem differently:
//! `'Foo' is not defined.` (eslint no-undef), `Cannot find name 'Foo'.`
//! (tsc). Both are reduced to the bare identifier so it can be looked up.

use lazy_static::lazy_static;
use regex::Regex;

const NAME_PREFIXES: [&str; 3] = [
    "JavaScript/TypeScript cant find name",
    "Cannot find name",
    "Cant find name",
];

lazy_static! {
    static ref QUOTED: Regex = Regex::new(r"'([^']+)'").expect("quoted name pattern is valid");
    static ref IDENTIFIER: Regex =
        Regex::new(r"[A-Za-z_$][\w$]*").expect("identifier pattern is valid");
}

/// Name of the undefined symbol a diagnostic complains about, if the message
/// is one of the recognized shapes
pub fn undefined_symbol(message: &str) -> Option<String> {
    let message = message.trim();

    if message.contains("is not defined") {
        return quoted(message);
    }

    let rest = NAME_PREFIXES
        .iter()
        .find_map(|prefix| message.strip_prefix(prefix))?;

    quoted(rest).or_else(|| {
        IDENTIFIER
            .find(rest)
            .map(|name| name.as_str().to_string())
    })
}

fn quoted(text: &str) -> Option<String> {
    QUOTED
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}
