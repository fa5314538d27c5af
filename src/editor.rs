// Editor engine facade
// Owns the highlighter, overlay controller and minimap, and exposes the
// in-process contract with the surrounding editor container: render in,
// complete replacement text out through a single content-change callback.
// The engine never stores the document; it receives the authoritative text
// on every call.

use crate::checkbox::{self, ResolvedLine};
use crate::config::Config;
use crate::document::{LineIndex, line_text};
use crate::geometry::ViewportGeometry;
use crate::highlight::Highlighter;
use crate::minimap::{Minimap, MinimapLayout};
use crate::overlay::{
    EditOutcome, OverlayController, PendingSelection, Selection, indent_selection,
    outdent_selection,
};
use tracing::debug;

/// The single mutation channel back to the container. Always receives a
/// complete replacement text, never a patch.
pub type ContentChangeCallback = Box<dyn FnMut(&str)>;

/// Everything the container needs to paint one frame.
#[derive(Debug)]
pub struct RenderFrame {
    /// One resolved markup entry per physical line.
    pub lines: Vec<ResolvedLine>,
    /// Line containing the cursor, derived from the cursor offset.
    pub cursor_line: usize,
    /// Scroll position mirrored onto the overlay, same tick.
    pub overlay_scroll_top: f64,
    /// Overlay right padding compensating for the input scrollbar.
    pub overlay_padding_right: f64,
    /// Minimap frame geometry, absent while the surface is unmeasurable.
    pub minimap: Option<MinimapLayout>,
}

pub struct EditorEngine {
    highlighter: Highlighter,
    overlay: OverlayController,
    minimap: Minimap,
    pending_selection: PendingSelection,
    minimap_container_height: f64,
    on_content_change: Option<ContentChangeCallback>,
}

impl EditorEngine {
    pub fn new(config: Config) -> Self {
        EditorEngine {
            highlighter: Highlighter::new(config.palette),
            overlay: OverlayController::new(config.style),
            minimap: Minimap::new(config.minimap),
            pending_selection: PendingSelection::new(),
            minimap_container_height: 0.0,
            on_content_change: None,
        }
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    pub fn minimap_mut(&mut self) -> &mut Minimap {
        &mut self.minimap
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Register the mutation channel. Replaces any earlier callback.
    pub fn set_on_content_change(&mut self, callback: ContentChangeCallback) {
        self.on_content_change = Some(callback);
    }

    /// Observed height of the minimap's visible container.
    pub fn set_minimap_container_height(&mut self, height: f64) {
        self.minimap_container_height = height;
    }

    /// Full recomputation of one frame.
    ///
    /// Pure with respect to the inputs: the same text, cursor and geometry
    /// always produce the same frame. No incremental patching.
    pub fn render(
        &mut self,
        text: &str,
        cursor_offset: usize,
        geometry: &ViewportGeometry,
    ) -> RenderFrame {
        self.overlay.observe_resize(geometry);
        let overlay_scroll_top = self.overlay.sync_scroll(geometry.scroll_top);

        let index = LineIndex::new(text);
        let cursor_line = index.line_of_offset(cursor_offset);

        let markup = self.highlighter.highlight_lines(text);
        debug!(lines = markup.len(), cursor_line, "highlighted");
        let lines = markup
            .iter()
            .enumerate()
            .map(|(i, line_markup)| {
                let raw = line_text(text, &index, i).unwrap_or("");
                checkbox::resolve_line(line_markup, raw, i, cursor_line)
            })
            .collect();

        self.minimap.scheduler().request();
        let minimap = self
            .minimap
            .layout(geometry, self.minimap_container_height);

        RenderFrame {
            lines,
            cursor_line,
            overlay_scroll_top,
            overlay_padding_right: self.overlay.overlay_padding_right(),
            minimap,
        }
    }

    /// Typed input from the editable surface.
    ///
    /// Marker auto-completion runs here: any bare `$check` gains `[ ]`
    /// before the text is handed back to the container.
    pub fn notify_input(&mut self, new_text: &str) {
        match checkbox::complete_markers(new_text) {
            Some(completed) => self.emit(&completed),
            None => self.emit(new_text),
        }
    }

    /// Tab or Shift-Tab on the editable surface.
    ///
    /// The resulting selection is parked for reapply on the next tick,
    /// since the caret cannot be restored until the mutation lands.
    pub fn handle_tab(&mut self, text: &str, selection: Selection, shift: bool) -> EditOutcome {
        let outcome = if shift {
            outdent_selection(text, selection)
        } else {
            indent_selection(text, selection)
        };
        self.pending_selection.schedule(outcome.selection);
        self.emit(&outcome.text);
        outcome
    }

    /// Backspace at a caret. Deletes an adjacent marker atomically.
    pub fn handle_backspace(&mut self, text: &str, cursor: usize) -> Option<usize> {
        let (new_text, new_cursor) = checkbox::backspace(text, cursor)?;
        self.emit(&new_text);
        Some(new_cursor)
    }

    /// Delete at a caret. Deletes an adjacent marker atomically.
    pub fn handle_delete(&mut self, text: &str, cursor: usize) -> Option<usize> {
        let (new_text, new_cursor) = checkbox::delete_forward(text, cursor)?;
        self.emit(&new_text);
        Some(new_cursor)
    }

    /// A click on a rendered checkbox widget.
    ///
    /// Returns whether the toggle was applied; stale positions are dropped.
    pub fn toggle_checkbox(&mut self, text: &str, line: usize, offset: usize) -> bool {
        match checkbox::toggle_checkbox(text, line, offset) {
            Some(new_text) => {
                self.emit(&new_text);
                true
            }
            None => false,
        }
    }

    /// The selection to reapply on this paint tick, at most once per edit.
    pub fn take_pending_selection(&mut self) -> Option<Selection> {
        self.pending_selection.take()
    }

    fn emit(&mut self, text: &str) {
        if let Some(callback) = self.on_content_change.as_mut() {
            callback(text);
        }
    }
}

impl Default for EditorEngine {
    fn default() -> Self {
        EditorEngine::new(Config::default())
    }
}
