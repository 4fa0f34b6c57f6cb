//! Parsing of the Chilean national identification number (RUT).
//!
//! A RUT is a numeric body followed by one check character (a digit or the
//! letter K). Operators type it in many shapes: with thousand dots, with or
//! without the hyphen before the check digit, with stray whitespace.

use std::sync::OnceLock;

use regex::Regex;

/// The accepted shape of a raw RUT string: a run of digits and dots, an
/// optional hyphen, and exactly one trailing check character.
///
/// The hyphen is optional. As a consequence a fully unseparated input such
/// as `123456789` is accepted and its last digit is taken as the check
/// digit (body `12345678`, check digit `9`). This matches the behavior of
/// every deployed revision of the form and is pinned by a test below; do
/// not tighten the grammar without revisiting those revisions.
const RUT_PATTERN: &str = r"^\s*([\d.]+)-?([\dkK])\s*$";

fn rut_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RUT_PATTERN).expect("invalid RUT pattern"))
}

/// A decomposed RUT.
///
/// Derived fresh from each raw input string, never persisted.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedRut {
    /// The digits of the body, with every separator removed.
    pub body: String,
    /// The check character, kept verbatim (a lowercase `k` stays lowercase).
    pub check_digit: char,
}

/// Parses a raw RUT string.
///
/// Returns `None` when the input does not match the grammar. This is the
/// "no RUT provided" state, not an error: callers block dependent actions
/// and report it as a validation failure.
///
/// A body made only of separators (ex: `".-9"`) matches the grammar and
/// parses with an empty `body`; callers that require digits must reject
/// the empty body themselves.
pub fn parse_rut(raw: &str) -> Option<ParsedRut> {
    let caps = rut_regex().captures(raw)?;
    let body: String = caps
        .get(1)
        .map(|m| m.as_str())
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let check_digit = caps.get(2).and_then(|m| m.as_str().chars().next())?;
    Some(ParsedRut { body, check_digit })
}
