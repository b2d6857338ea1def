//! Transcript text cleanup.
//!
//! SenseVoice-style back-ends prefix their output with tag tokens such as
//! `<|zh|><|NEUTRAL|><|Speech|>`. They carry language/emotion/event labels,
//! not words, and are stripped before segments are joined.

use regex::Regex;
use std::sync::LazyLock;

static TAG_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"<\|[^|]+\|>").unwrap()
});

/// Remove every `<|...|>` tag token and trim surrounding whitespace.
///
/// The tag body must be non-empty and may not contain `|`. Removal repeats
/// until no tag is left, so a tag spliced together by an inner removal
/// (`<|a<|b|>|>`) is stripped as well.
pub fn clean_text(text: &str) -> String {
    let mut cleaned = text.to_string();
    while TAG_TOKEN.is_match(&cleaned) {
        cleaned = TAG_TOKEN.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// Clean each text and join them with single spaces.
pub fn join_segments<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .map(clean_text)
        .collect::<Vec<_>>()
        .join(" ")
}
