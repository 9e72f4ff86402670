//! Server-side field cleaners. Each trims its input and returns `None` when a
//! non-empty value has the wrong shape; blank input cleans to `""`.

use crate::patterns;

pub const TEXT_MAX: usize = 255;

fn truncate(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((at, _)) => &value[..at],
        None => value,
    }
}

/// Letters, whitespace, hyphens and apostrophes, capped at `max` characters.
pub fn clean_text(value: &str, max: usize) -> Option<&str> {
    let value = value.trim();
    if !value.is_empty() && !patterns::LOCATION.is_match(value) {
        return None;
    }
    Some(truncate(value, max))
}

pub fn clean_username(value: &str) -> Option<&str> {
    let value = value.trim();
    (value.is_empty() || patterns::USERNAME.is_match(value)).then_some(value)
}

/// The trimmed value is returned as typed; plain spaces are ignored only for
/// the format check.
pub fn clean_phone(value: &str) -> Option<&str> {
    let value = value.trim();
    (value.is_empty() || patterns::is_phone_spaced(value)).then_some(value)
}

pub fn clean_email(value: &str) -> Option<&str> {
    let value = value.trim();
    (value.is_empty() || patterns::EMAIL.is_match(value)).then_some(value)
}

/// Never rejects; the bio is trimmed and cut to `max` characters.
pub fn clean_bio(value: &str, max: usize) -> &str {
    truncate(value.trim(), max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_and_capped() {
        assert_eq!(clean_text("  Kisumu ", TEXT_MAX), Some("Kisumu"));
        assert_eq!(clean_text("Kisumu 2", TEXT_MAX), None);
        assert_eq!(clean_text("   ", TEXT_MAX), Some(""));
        assert_eq!(clean_text("abcdef", 3), Some("abc"));
    }

    #[test]
    fn username_phone_email() {
        assert_eq!(clean_username(" jo.k+1@x "), Some("jo.k+1@x"));
        assert_eq!(clean_username("jo k"), None);
        assert_eq!(clean_phone(" +254 712 345 678"), Some("+254 712 345 678"));
        assert_eq!(clean_phone("12345"), None);
        assert_eq!(clean_email("me@host.org"), Some("me@host.org"));
        assert_eq!(clean_email("me@host"), None);
        assert_eq!(clean_email(""), Some(""));
    }

    #[test]
    fn phone_ignores_only_plain_spaces() {
        assert_eq!(clean_phone("0712 345 678"), Some("0712 345 678"));
        assert_eq!(clean_phone("0712\t345678"), None);
        assert_eq!(clean_phone("0712\u{a0}345678"), None);
    }

    #[test]
    fn bio_is_cut_on_char_boundary() {
        assert_eq!(clean_bio("  héllo  ", 2), "hé");
        assert_eq!(clean_bio("short", 500), "short");
    }
}
