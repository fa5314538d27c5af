// Inline checkbox markers
// A marker is the literal 9-character text `$check[ ]` or `$check[x]`,
// embedded directly in the document. Identity is positional (line index +
// byte offset within the line); any edit earlier in the line shifts it.

use crate::document::{LineIndex, line_text};
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

pub const MARKER_UNCHECKED: &str = "$check[ ]";
pub const MARKER_CHECKED: &str = "$check[x]";
pub const MARKER_LEN: usize = 9;

const MARKER_PREFIX: &str = "$check";

/// One marker found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Byte offset of `$` within the line.
    pub offset: usize,
    pub checked: bool,
}

/// A checkbox widget to be rendered in place of a marker, carrying the
/// positional metadata needed to route a click back into a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxWidget {
    pub line: usize,
    pub offset: usize,
    pub checked: bool,
}

/// A highlighted line after marker resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    pub markup: String,
    pub widgets: Vec<CheckboxWidget>,
}

/// Find all markers in one line of raw text.
pub fn find_markers(line: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    for (offset, _) in line.match_indices(MARKER_PREFIX) {
        match marker_at(line, offset) {
            Some(checked) => markers.push(Marker { offset, checked }),
            None => {}
        }
    }
    markers
}

/// Checked state of a complete marker starting at `offset`, if one is there.
fn marker_at(text: &str, offset: usize) -> Option<bool> {
    match text.get(offset..offset + MARKER_LEN) {
        Some(MARKER_UNCHECKED) => Some(false),
        Some(MARKER_CHECKED) => Some(true),
        _ => None,
    }
}

/// Decide how the markers of one highlighted line are rendered.
///
/// On the cursor's own line the raw literal stays visible so the user can
/// edit the marker text directly. On every other line each marker is
/// swapped for interactive checkbox markup tagged with its position.
pub fn resolve_line(
    markup: &str,
    raw_line: &str,
    line_index: usize,
    cursor_line: usize,
) -> ResolvedLine {
    let markers = find_markers(raw_line);
    if line_index == cursor_line || markers.is_empty() {
        return ResolvedLine {
            markup: markup.to_string(),
            widgets: Vec::new(),
        };
    }

    // The marker literal contains nothing the escaping pass rewrites, so it
    // appears verbatim in the markup. Substitute occurrences left to right;
    // a marker torn apart by an overlapping inline rule is simply skipped.
    let mut resolved = String::with_capacity(markup.len());
    let mut widgets = Vec::with_capacity(markers.len());
    let mut search_from = 0usize;
    let mut tail = 0usize;
    for marker in markers {
        let literal = if marker.checked {
            MARKER_CHECKED
        } else {
            MARKER_UNCHECKED
        };
        let Some(found) = markup[search_from..].find(literal) else {
            continue;
        };
        let at = search_from + found;
        resolved.push_str(&markup[tail..at]);
        resolved.push_str(&widget_markup(line_index, marker));
        widgets.push(CheckboxWidget {
            line: line_index,
            offset: marker.offset,
            checked: marker.checked,
        });
        tail = at + MARKER_LEN;
        search_from = tail;
    }
    resolved.push_str(&markup[tail..]);

    ResolvedLine {
        markup: resolved,
        widgets,
    }
}

fn widget_markup(line: usize, marker: Marker) -> String {
    format!(
        r#"<input type="checkbox" class="md-check" data-line="{}" data-offset="{}"{}/>"#,
        line,
        marker.offset,
        if marker.checked { " checked" } else { "" }
    )
}

/// Flip the marker at `(line_index, char_offset)` and return the new text.
///
/// The recorded position is verified against the current document first; a
/// mismatch means the metadata went stale behind an intervening edit, and
/// the request is dropped instead of corrupting nearby text.
pub fn toggle_checkbox(text: &str, line_index: usize, char_offset: usize) -> Option<String> {
    let index = LineIndex::new(text);
    let line = match line_text(text, &index, line_index) {
        Some(line) => line,
        None => {
            warn!(line_index, "checkbox toggle ignored: line out of range");
            return None;
        }
    };

    let Some(checked) = marker_at(line, char_offset) else {
        warn!(
            line_index,
            char_offset, "checkbox toggle ignored: stale marker position"
        );
        return None;
    };

    let start = index.line_start(line_index)? + char_offset;
    let replacement = if checked {
        MARKER_UNCHECKED
    } else {
        MARKER_CHECKED
    };

    let mut new_text = String::with_capacity(text.len());
    new_text.push_str(&text[..start]);
    new_text.push_str(replacement);
    new_text.push_str(&text[start + MARKER_LEN..]);
    Some(new_text)
}

/// Complete every bare `$check` into an unchecked marker.
///
/// Typing convenience: the content-change path appends `[ ]` to any literal
/// `$check` not already followed by `[`. Returns `None` when the text is
/// already well-formed.
pub fn complete_markers(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0usize;
    let mut changed = false;
    for (offset, _) in text.match_indices(MARKER_PREFIX) {
        let after = offset + MARKER_PREFIX.len();
        if text[after..].starts_with('[') {
            continue;
        }
        out.push_str(&text[last..after]);
        out.push_str("[ ]");
        last = after;
        changed = true;
    }
    if !changed {
        return None;
    }
    out.push_str(&text[last..]);
    Some(out)
}

/// Delete one unit before `cursor`: a whole marker ending there, or one
/// grapheme. Returns the new text and cursor, or `None` at offset zero.
pub fn backspace(text: &str, cursor: usize) -> Option<(String, usize)> {
    if cursor == 0 || cursor > text.len() {
        return None;
    }
    let from = match cursor.checked_sub(MARKER_LEN) {
        Some(start) if marker_at(text, start).is_some() => start,
        _ => previous_grapheme_start(text, cursor)?,
    };
    let mut new_text = String::with_capacity(text.len());
    new_text.push_str(&text[..from]);
    new_text.push_str(&text[cursor..]);
    Some((new_text, from))
}

/// Delete one unit after `cursor`: a whole marker starting there, or one
/// grapheme. Returns the new text and (unchanged) cursor, or `None` at the
/// end of the text.
pub fn delete_forward(text: &str, cursor: usize) -> Option<(String, usize)> {
    if cursor >= text.len() {
        return None;
    }
    let to = if marker_at(text, cursor).is_some() {
        cursor + MARKER_LEN
    } else {
        next_grapheme_end(text, cursor)?
    };
    let mut new_text = String::with_capacity(text.len());
    new_text.push_str(&text[..cursor]);
    new_text.push_str(&text[to..]);
    Some((new_text, cursor))
}

fn previous_grapheme_start(text: &str, cursor: usize) -> Option<usize> {
    text[..cursor]
        .grapheme_indices(true)
        .last()
        .map(|(start, _)| start)
}

fn next_grapheme_end(text: &str, cursor: usize) -> Option<usize> {
    text[cursor..]
        .graphemes(true)
        .next()
        .map(|g| cursor + g.len())
}
