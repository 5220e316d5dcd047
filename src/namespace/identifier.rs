//! Identifier syntax for namespace bindings.

use regex_lite::Regex;
use std::sync::OnceLock;

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("valid identifier regex"))
}

/// An identifier starts with a letter or underscore and continues with
/// letters, digits, hyphens or underscores.
pub fn is_valid_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}
