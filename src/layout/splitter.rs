//! Splitting a document buffer into fixed-capacity pages

use crate::document::{Page, PageId};
use crate::layout::CapacityModel;
use unicode_segmentation::GraphemeCursor;

/// How far back (in chars) from a cut point we look for a newline or space
pub const BOUNDARY_WINDOW: usize = 100;

/// Split `text` into pages sized by `capacity`.
///
/// Ids are positional (`1..=n`) and re-derived on every call; the page store
/// is what gives pages a stable identity across re-splits.
pub fn split_into_pages(text: &str, capacity: &CapacityModel) -> Vec<Page> {
    split_chunks(text, capacity.chars_per_page())
        .into_iter()
        .enumerate()
        .map(|(i, content)| Page::new(PageId(i as u64 + 1), content))
        .collect()
}

/// Cut `text` into chunks of at most `chars_per_page` characters.
///
/// Always returns at least one chunk. Cuts prefer the last newline, then the
/// last space, inside the trailing [`BOUNDARY_WINDOW`] before the cut point,
/// and fall back to a hard cut otherwise. Chunks produced by a cut are
/// trimmed, so whitespace runs at page boundaries collapse. The final chunk
/// keeps its trailing whitespace so typing a space at the end survives a
/// reflow.
///
/// Splitting the joined output again is stable for single-char separators.
/// When a cut removed a whitespace run, the rejoined buffer is shorter there
/// and a later boundary may fall inside the window, so callers should not
/// re-split a buffer that has not changed.
pub fn split_chunks(text: &str, chars_per_page: usize) -> Vec<String> {
    let chars_per_page = chars_per_page.max(1);

    if text.trim().is_empty() {
        return vec![String::new()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        // Byte offset of the first char that does not fit
        let Some((cut, _)) = remaining.char_indices().nth(chars_per_page) else {
            chunks.push(remaining.to_string());
            break;
        };

        let split = find_boundary(remaining, cut, chars_per_page)
            .unwrap_or_else(|| snap_to_grapheme(remaining, cut));

        let chunk = remaining[..split].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        remaining = remaining[split..].trim_start();
    }

    if chunks.is_empty() {
        chunks.push(String::new());
    }
    chunks
}

/// Last newline, else last space, at char positions `(cut - window, cut]`.
///
/// `cut` is the byte offset of char index `chars_per_page`, which is inside
/// the window. Position 0 never counts since it would make no progress.
fn find_boundary(text: &str, cut: usize, chars_per_page: usize) -> Option<usize> {
    let first = (chars_per_page.saturating_sub(BOUNDARY_WINDOW) + 1).min(chars_per_page);
    let start = text
        .char_indices()
        .nth(first.max(1))
        .map(|(i, _)| i)
        .unwrap_or(cut);

    // Include the char at `cut` itself
    let end = text[cut..]
        .chars()
        .next()
        .map(|c| cut + c.len_utf8())
        .unwrap_or(cut);
    if start >= end {
        return None;
    }

    let window = &text[start..end];
    window
        .rfind('\n')
        .or_else(|| window.rfind(' '))
        .map(|pos| start + pos)
}

/// Move a hard cut back onto a grapheme cluster boundary, unless that would
/// leave nothing on the page.
fn snap_to_grapheme(text: &str, cut: usize) -> usize {
    let mut cursor = GraphemeCursor::new(cut, text.len(), true);
    match cursor.is_boundary(text, 0) {
        Ok(true) => cut,
        Ok(false) => match cursor.prev_boundary(text, 0) {
            Ok(Some(prev)) if prev > 0 => prev,
            _ => cut,
        },
        Err(_) => cut,
    }
}
