// src/extract/utils.rs

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use std::borrow::Cow;

/// `[a]`, `[12]`, `[note 3]` style reference markers.
static FOOTNOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("footnote regex should compile"));

/// Concatenated text of an element, trimmed.
pub fn element_text(el: ElementRef<'_>) -> String {
    clean_str(&el.text().collect::<String>())
}

/// Trim whitespace, including the non-breaking spaces Wikipedia sprinkles in.
pub fn clean_str(raw: &str) -> String {
    raw.trim().to_string()
}

pub fn strip_footnotes(s: &str) -> Cow<'_, str> {
    FOOTNOTE.replace_all(s, "")
}

/// Coerce locale-formatted integer text ("1,234,567") to a count.
///
/// Only thousands separators are removed. Anything else left over, including
/// footnote markers unless `strip_markers` is set, makes this return `None`.
pub fn parse_count(raw: &str, strip_markers: bool) -> Option<u64> {
    let text = clean_str(raw);
    let text = if strip_markers {
        strip_footnotes(&text)
    } else {
        Cow::Borrowed(text.as_str())
    };
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
