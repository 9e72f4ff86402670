use regex::Regex;
use std::sync::LazyLock;

pub(crate) static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9]{10,15}$").expect("phone regex should compile"));

pub(crate) static LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-']+$").expect("location regex should compile"));

pub(crate) static AREA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-']+$").expect("area regex should compile"));

pub(crate) static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_@.+-]+$").expect("username regex should compile"));

pub(crate) static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email regex should compile"));

/// Browser-side check: every whitespace character is removed before matching.
pub(crate) fn is_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE.is_match(&compact)
}

/// Server-side check: only U+0020 is removed, so tabs and other whitespace
/// still fail the match.
pub(crate) fn is_phone_spaced(value: &str) -> bool {
    PHONE.is_match(&value.replace(' ', ""))
}
