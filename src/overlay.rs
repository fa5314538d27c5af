// Overlay alignment controller
// Keeps the invisible editable surface and the painted read-only overlay
// geometrically identical: one shared style contract, scrollbar gutter
// compensation on the overlay side, and same-tick scroll mirroring. Also
// owns the Tab/Shift-Tab indentation edits and the deferred selection
// reapply that follows them.

use crate::document::LineIndex;
use crate::geometry::ViewportGeometry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The one set of text metrics both surfaces must share.
///
/// Any divergence between the two surfaces in font, line height, wrapping
/// or padding makes wrapped line layouts drift apart, which breaks scroll
/// sync. There is deliberately no second copy of these values anywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleContract {
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Line height in pixels.
    pub line_height: f64,
    pub tab_size: u8,
    /// Vertical padding above the first line.
    pub padding_top: f64,
    /// Oversized bottom padding so the last line can scroll to the top.
    pub padding_bottom: f64,
    /// Horizontal padding between gutter and text, and on the right edge.
    pub content_padding: f64,
    /// Reserved width of the line number column.
    pub gutter_width: f64,
}

impl Default for StyleContract {
    fn default() -> Self {
        StyleContract {
            font_family: "monospace".to_string(),
            font_size: 14.0,
            line_height: 21.0,
            tab_size: 2,
            padding_top: 16.0,
            padding_bottom: 360.0,
            content_padding: 16.0,
            gutter_width: 56.0,
        }
    }
}

/// A selection as byte offsets into the document, `start <= end` after
/// normalization; a caret is a collapsed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(offset: usize) -> Self {
        Selection {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    fn normalized(self) -> Self {
        Selection {
            start: self.start.min(self.end),
            end: self.start.max(self.end),
        }
    }
}

/// Result of an indentation edit: the replacement text plus where the
/// selection must be restored so it tracks the edited region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub text: String,
    pub selection: Selection,
}

/// Keeps the overlay glued to the input surface.
pub struct OverlayController {
    style: StyleContract,
    scrollbar_gutter: f64,
    scroll_top: f64,
}

impl OverlayController {
    pub fn new(style: StyleContract) -> Self {
        OverlayController {
            style,
            scrollbar_gutter: 0.0,
            scroll_top: 0.0,
        }
    }

    pub fn style(&self) -> &StyleContract {
        &self.style
    }

    /// Remeasure the scrollbar gutter after a resize of the input surface.
    ///
    /// The input surface's native scrollbar consumes horizontal space the
    /// overlay does not have; the difference becomes extra right padding on
    /// the overlay so both surfaces wrap lines at the same column.
    pub fn observe_resize(&mut self, geometry: &ViewportGeometry) -> f64 {
        let gutter = geometry.scrollbar_gutter();
        if gutter != self.scrollbar_gutter {
            debug!(gutter, "scrollbar gutter changed");
            self.scrollbar_gutter = gutter;
        }
        gutter
    }

    pub fn scrollbar_gutter(&self) -> f64 {
        self.scrollbar_gutter
    }

    /// Mirror the input surface's scroll position, same tick, no easing.
    /// The overlay holds no scroll state of its own.
    pub fn sync_scroll(&mut self, scroll_top: f64) -> f64 {
        self.scroll_top = scroll_top;
        scroll_top
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Right padding of the overlay: the shared content padding plus the
    /// measured scrollbar gutter.
    pub fn overlay_padding_right(&self) -> f64 {
        self.style.content_padding + self.scrollbar_gutter
    }

    /// Wrap markup lines into the overlay document.
    ///
    /// One element per line entry; the line number gutter is driven purely
    /// by a CSS counter, so it increments exactly once per entry.
    pub fn overlay_document(&self, lines: &[String]) -> String {
        let mut out = String::with_capacity(lines.len() * 48);
        out.push_str("<pre class=\"code-view\"><code>\n");
        for line in lines {
            out.push_str("<div class=\"code-line\">");
            if line.is_empty() {
                out.push(' ');
            } else {
                out.push_str(line);
            }
            out.push_str("</div>\n");
        }
        out.push_str("</code></pre>");
        out
    }

    /// Stylesheet for the overlay document and its gutter counter.
    pub fn stylesheet(&self) -> String {
        let s = &self.style;
        format!(
            r#".code-view {{
  counter-reset: line;
  font-family: {font_family};
  font-size: {font_size}px;
  line-height: {line_height}px;
  tab-size: {tab_size};
  white-space: pre-wrap;
  word-break: break-word;
  padding-top: {padding_top}px;
  padding-bottom: {padding_bottom}px;
  padding-right: {padding_right}px;
}}
.code-line {{
  counter-increment: line;
  position: relative;
  padding-left: {text_left}px;
}}
.code-line::before {{
  content: counter(line);
  position: absolute;
  left: 0;
  width: {gutter_width}px;
  padding-right: 16px;
  text-align: right;
  color: rgba(192, 202, 245, 0.3);
  user-select: none;
}}"#,
            font_family = s.font_family,
            font_size = s.font_size,
            line_height = s.line_height,
            tab_size = s.tab_size,
            padding_top = s.padding_top,
            padding_bottom = s.padding_bottom,
            padding_right = self.overlay_padding_right(),
            text_left = s.gutter_width + s.content_padding,
            gutter_width = s.gutter_width,
        )
    }
}

/// Apply a Tab keystroke.
///
/// A caret or single-line selection becomes a literal tab (replacing the
/// selection). A multi-line selection indents every touched line by one
/// tab, and the returned selection keeps covering the same region.
pub fn indent_selection(text: &str, selection: Selection) -> EditOutcome {
    let selection = selection.normalized();
    let index = LineIndex::new(text);
    let first_line = index.line_of_offset(selection.start);
    let last_line = index.line_of_offset(selection.end);

    if first_line == last_line {
        let mut new_text = String::with_capacity(text.len() + 1);
        new_text.push_str(&text[..selection.start]);
        new_text.push('\t');
        new_text.push_str(&text[selection.end..]);
        return EditOutcome {
            text: new_text,
            selection: Selection::caret(selection.start + 1),
        };
    }

    let mut new_text = String::with_capacity(text.len() + last_line - first_line + 1);
    let mut consumed = 0usize;
    for line in first_line..=last_line {
        let start = index.line_start(line).unwrap_or(text.len());
        new_text.push_str(&text[consumed..start]);
        new_text.push('\t');
        consumed = start;
    }
    new_text.push_str(&text[consumed..]);

    let indented_lines = last_line - first_line + 1;
    EditOutcome {
        text: new_text,
        selection: Selection {
            start: selection.start + 1,
            end: selection.end + indented_lines,
        },
    }
}

/// Apply a Shift-Tab keystroke.
///
/// Every touched line loses one leading tab, or up to two leading spaces
/// when no tab is there. The selection is pulled back by what was removed
/// ahead of each endpoint.
pub fn outdent_selection(text: &str, selection: Selection) -> EditOutcome {
    let selection = selection.normalized();
    let index = LineIndex::new(text);
    let first_line = index.line_of_offset(selection.start);
    let last_line = index.line_of_offset(selection.end);

    let mut new_text = String::with_capacity(text.len());
    let mut consumed = 0usize;
    let mut removed_before_start = 0usize;
    let mut removed_total = 0usize;

    for line in first_line..=last_line {
        let start = index.line_start(line).unwrap_or(text.len());
        new_text.push_str(&text[consumed..start]);
        let rest = &text[start..];
        let removed = if rest.starts_with('\t') {
            1
        } else if rest.starts_with("  ") {
            2
        } else if rest.starts_with(' ') {
            1
        } else {
            0
        };
        consumed = start + removed;
        removed_total += removed;
        if line == first_line {
            // The selection start can only move left by characters that
            // actually sat before it on its own line.
            removed_before_start = removed.min(selection.start.saturating_sub(start));
        }
    }
    new_text.push_str(&text[consumed..]);

    let new_start = selection.start - removed_before_start;
    let new_end = selection.end.saturating_sub(removed_total).max(new_start);
    EditOutcome {
        text: new_text,
        selection: Selection {
            start: new_start,
            end: new_end,
        },
    }
}

/// One-shot slot for the selection reapply that follows an indentation
/// edit.
///
/// The text mutation lands asynchronously relative to the native caret, so
/// the new selection is parked here and taken exactly once on the next
/// paint tick. Taking from an empty slot is a safe no-op, which covers the
/// surface having lost focus or been unmounted in between.
#[derive(Debug, Default)]
pub struct PendingSelection {
    slot: Option<Selection>,
}

impl PendingSelection {
    pub fn new() -> Self {
        PendingSelection { slot: None }
    }

    pub fn schedule(&mut self, selection: Selection) {
        self.slot = Some(selection);
    }

    /// Fires at most once per scheduled edit.
    pub fn take(&mut self) -> Option<Selection> {
        self.slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(outer: f64, client: f64) -> ViewportGeometry {
        ViewportGeometry {
            scroll_top: 0.0,
            client_height: 500.0,
            scroll_height: 2000.0,
            client_width: client,
            outer_width: outer,
        }
    }

    #[test]
    fn test_gutter_compensation_tracks_resize() {
        let mut overlay = OverlayController::new(StyleContract::default());
        assert_eq!(overlay.overlay_padding_right(), 16.0);

        overlay.observe_resize(&geometry(815.0, 800.0));
        assert_eq!(overlay.scrollbar_gutter(), 15.0);
        assert_eq!(overlay.overlay_padding_right(), 31.0);

        overlay.observe_resize(&geometry(800.0, 800.0));
        assert_eq!(overlay.overlay_padding_right(), 16.0);
    }

    #[test]
    fn test_scroll_sync_has_no_independent_state() {
        let mut overlay = OverlayController::new(StyleContract::default());
        assert_eq!(overlay.sync_scroll(123.5), 123.5);
        assert_eq!(overlay.scroll_top(), 123.5);
        assert_eq!(overlay.sync_scroll(0.0), 0.0);
        assert_eq!(overlay.scroll_top(), 0.0);
    }

    #[test]
    fn test_overlay_document_one_element_per_line() {
        let overlay = OverlayController::new(StyleContract::default());
        let lines = vec!["a".to_string(), String::new(), "c".to_string()];
        let doc = overlay.overlay_document(&lines);
        assert_eq!(doc.matches("<div class=\"code-line\">").count(), 3);
        // Empty lines keep their height.
        assert!(doc.contains("<div class=\"code-line\"> </div>"));
    }

    #[test]
    fn test_stylesheet_carries_shared_metrics() {
        let overlay = OverlayController::new(StyleContract::default());
        let css = overlay.stylesheet();
        assert!(css.contains("counter-reset: line"));
        assert!(css.contains("counter-increment: line"));
        assert!(css.contains("line-height: 21px"));
        assert!(css.contains("tab-size: 2"));
        assert!(css.contains("white-space: pre-wrap"));
    }

    #[test]
    fn test_tab_at_caret_inserts_literal_tab() {
        let outcome = indent_selection("hello", Selection::caret(2));
        assert_eq!(outcome.text, "he\tllo");
        assert_eq!(outcome.selection, Selection::caret(3));
    }

    #[test]
    fn test_tab_replaces_single_line_selection() {
        let outcome = indent_selection("hello", Selection { start: 1, end: 4 });
        assert_eq!(outcome.text, "h\to");
        assert_eq!(outcome.selection, Selection::caret(2));
    }

    #[test]
    fn test_tab_indents_every_selected_line() {
        let text = "one\ntwo\nthree";
        let outcome = indent_selection(text, Selection { start: 1, end: 10 });
        assert_eq!(outcome.text, "\tone\n\ttwo\n\tthree");
        // Start shifted by the tab on its own line, end by one per line.
        assert_eq!(outcome.selection, Selection { start: 2, end: 13 });
    }

    #[test]
    fn test_tab_selection_keeps_relative_span() {
        let text = "one\ntwo\nthree";
        let before = Selection { start: 1, end: 10 };
        let outcome = indent_selection(text, before);
        let selected_before = &text[before.start..before.end];
        let selected_after = &outcome.text[outcome.selection.start..outcome.selection.end];
        assert_eq!(selected_before, "ne\ntwo\nth");
        assert_eq!(selected_after, "ne\n\ttwo\n\tth");
    }

    #[test]
    fn test_shift_tab_removes_leading_tab() {
        let text = "\tone\n\ttwo";
        let outcome = outdent_selection(text, Selection { start: 2, end: 8 });
        assert_eq!(outcome.text, "one\ntwo");
        assert_eq!(outcome.selection, Selection { start: 1, end: 6 });
    }

    #[test]
    fn test_shift_tab_removes_up_to_two_spaces() {
        let outcome = outdent_selection("   one", Selection::caret(4));
        assert_eq!(outcome.text, " one");
        assert_eq!(outcome.selection, Selection::caret(2));

        let outcome = outdent_selection(" one", Selection::caret(2));
        assert_eq!(outcome.text, "one");
        assert_eq!(outcome.selection, Selection::caret(1));
    }

    #[test]
    fn test_shift_tab_without_indentation_is_identity() {
        let outcome = outdent_selection("one", Selection::caret(1));
        assert_eq!(outcome.text, "one");
        assert_eq!(outcome.selection, Selection::caret(1));
    }

    #[test]
    fn test_shift_tab_start_never_crosses_line_start() {
        // Caret at column 0 of an indented line stays at column 0.
        let outcome = outdent_selection("\tone", Selection::caret(0));
        assert_eq!(outcome.text, "one");
        assert_eq!(outcome.selection, Selection::caret(0));
    }

    #[test]
    fn test_pending_selection_fires_once() {
        let mut pending = PendingSelection::new();
        assert_eq!(pending.take(), None);

        pending.schedule(Selection::caret(7));
        assert_eq!(pending.take(), Some(Selection::caret(7)));
        assert_eq!(pending.take(), None);
    }
}
