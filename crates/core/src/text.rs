//! Character-aware string helpers shared by search and previews.
//!
//! All limits count `char`s, never bytes.

use std::ops::Range;

pub const ELLIPSIS: &str = "...";

/// The first `max_chars` characters of `text`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// `text` cut to `max_chars`, with `...` appended only when something was cut.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    let cut = truncate_chars(text, max_chars);
    if cut.len() < text.len() {
        format!("{cut}{ELLIPSIS}")
    } else {
        cut.to_string()
    }
}

/// Lowercased needle, ready for the `*_ignore_case` matchers.
#[must_use]
pub fn fold(needle: &str) -> Vec<char> {
    needle.chars().flat_map(char::to_lowercase).collect()
}

/// Byte range of the first case-insensitive occurrence of `needle` in `haystack`.
#[must_use]
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    let folded = fold(needle);
    if folded.is_empty() {
        return None;
    }
    find_folded(haystack, &folded, 0)
}

#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle).is_some()
}

/// Byte ranges of all non-overlapping case-insensitive occurrences.
#[must_use]
pub fn find_all_ignore_case(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let folded = fold(needle);
    let mut found = Vec::new();
    if folded.is_empty() {
        return found;
    }
    let mut from = 0;
    while let Some(range) = find_folded(haystack, &folded, from) {
        from = range.end;
        found.push(range);
    }
    found
}

/// Number of characters in `text[..byte]`.
#[must_use]
pub fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// Byte offset of the `chars`-th character, or `text.len()` past the end.
#[must_use]
pub fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}

fn find_folded(haystack: &str, folded: &[char], from: usize) -> Option<Range<usize>> {
    haystack[from..]
        .char_indices()
        .find_map(|(offset, _)| {
            let start = from + offset;
            match_at(haystack, start, folded).map(|end| start..end)
        })
}

/// End byte of a match of `folded` starting at `start`, if there is one.
///
/// A haystack character whose lowercase form only partially overlaps the end
/// of the needle does not match.
fn match_at(haystack: &str, start: usize, folded: &[char]) -> Option<usize> {
    let mut matched = 0usize;
    for (offset, ch) in haystack[start..].char_indices() {
        if matched == folded.len() {
            return Some(start + offset);
        }
        for lower in ch.to_lowercase() {
            if folded.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
    }
    (matched == folded.len()).then_some(haystack.len())
}
