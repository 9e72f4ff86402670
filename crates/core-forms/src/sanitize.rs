//! HTML escaping and the bio character counter.

use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;

/// Characters rejected in free-text fields.
pub const DANGEROUS_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Remaining-character count below which the counter is flagged as low.
pub const LOW_REMAINING: usize = 50;

fn escape(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        '&' => Some("&amp;"),
        _ => None,
    }
}

/// Escape the dangerous characters as HTML entities. Borrows when nothing
/// needs escaping.
pub fn sanitize_input(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find(DANGEROUS_CHARS) else {
        return Cow::Borrowed(input);
    };
    let mut out = String::with_capacity(input.len() + 16);
    out.push_str(&input[..first]);
    for c in input[first..].chars() {
        match escape(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

pub fn contains_dangerous_chars(input: &str) -> bool {
    input.contains(DANGEROUS_CHARS)
}

/// Length in user-perceived characters.
pub fn char_len(text: &str) -> usize {
    text.graphemes(true).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCount {
    Remaining { remaining: usize, low: bool },
    Over { by: usize },
}

impl CharCount {
    pub fn is_over(self) -> bool {
        matches!(self, Self::Over { .. })
    }

    pub fn label(self) -> String {
        match self {
            Self::Remaining { remaining, .. } => format!("{remaining} characters remaining"),
            Self::Over { by } => format!("{by} characters over limit"),
        }
    }
}

pub fn char_count(text: &str, max: usize) -> CharCount {
    let len = char_len(text);
    if len > max {
        CharCount::Over { by: len - max }
    } else {
        let remaining = max - len;
        CharCount::Remaining {
            remaining,
            low: remaining < LOW_REMAINING,
        }
    }
}
