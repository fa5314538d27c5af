// Minimap renderer
// Draws a scaled rasterization of the whole document, a viewport indicator,
// and handles the click-to-seek / drag-to-scroll protocol. All drawing goes
// through DrawContext; all geometry comes in as measurements of the input
// surface, so the renderer itself holds no scroll state besides the drag
// machine.

use crate::draw_context::DrawContext;
use crate::geometry::ViewportGeometry;
use crate::overlay::StyleContract;
use crate::theme::MinimapTheme;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Horizontal inset of the indicator rectangle, left and right.
const INDICATOR_INSET: f64 = 2.0;

/// CSS transition for the canvas centering translate, suspended while
/// dragging so the indicator tracks the pointer 1:1.
pub const TRANSFORM_TRANSITION: &str = "transform 100ms ease-out";

/// Scale used before the surface has a measurable width.
const FALLBACK_SCALE: f64 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MinimapSettings {
    /// Fixed width of the minimap column.
    pub width: f64,
    /// Horizontal margin subtracted before computing the scale factor.
    pub margin: f64,
    pub theme: MinimapTheme,
}

impl Default for MinimapSettings {
    fn default() -> Self {
        MinimapSettings {
            width: 120.0,
            margin: 8.0,
            theme: MinimapTheme::default(),
        }
    }
}

/// Interaction state of the minimap.
///
/// One value drives the indicator highlight; dragging and hovering can
/// never be active at the same time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Pointer is over the indicator, not pressed.
    Hovering,
    /// Indicator is being dragged; `grab_offset` is the distance from the
    /// press point to the indicator's top edge.
    Dragging { grab_offset: f64 },
}

/// Geometry of one minimap frame, all in logical (pre-dpr) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapLayout {
    pub scale: f64,
    pub canvas_height: f64,
    pub indicator_top: f64,
    pub indicator_height: f64,
    /// Upward translate keeping the indicator centered when the canvas is
    /// taller than its visible container.
    pub scroll_offset: f64,
}

/// What a pointer-move asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerResponse {
    /// New `scroll_top` for the input surface, already clamped.
    pub scroll_to: Option<f64>,
    /// Whether the hover highlight changed and the canvas needs a repaint.
    pub needs_redraw: bool,
}

/// Coalesces any number of redraw triggers within a frame into one repaint.
///
/// Every trigger calls `request`; the frame callback calls `take` and
/// repaints only when it returns true.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    pending: bool,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        RedrawScheduler { pending: false }
    }

    /// Returns true when this call scheduled the frame, false when one was
    /// already pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Consume the pending request at the start of a frame.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

pub struct Minimap {
    settings: MinimapSettings,
    state: DragState,
    scheduler: RedrawScheduler,
    /// Canvas translate transitions are suspended while dragging so the
    /// indicator tracks the pointer 1:1.
    transitions_enabled: bool,
}

impl Minimap {
    pub fn new(settings: MinimapSettings) -> Self {
        Minimap {
            settings,
            state: DragState::Idle,
            scheduler: RedrawScheduler::new(),
            transitions_enabled: true,
        }
    }

    pub fn settings(&self) -> &MinimapSettings {
        &self.settings
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Whether the canvas translate may animate right now.
    pub fn transitions_enabled(&self) -> bool {
        self.transitions_enabled
    }

    /// The transition the host should have on the canvas right now.
    pub fn transform_transition(&self) -> Option<&'static str> {
        self.transitions_enabled.then_some(TRANSFORM_TRANSITION)
    }

    pub fn scheduler(&mut self) -> &mut RedrawScheduler {
        &mut self.scheduler
    }

    /// Uniform document-to-minimap scale factor.
    pub fn scale_factor(&self, geometry: &ViewportGeometry) -> f64 {
        if geometry.client_width <= 0.0 {
            return FALLBACK_SCALE;
        }
        (self.settings.width - self.settings.margin) / geometry.client_width
    }

    /// Frame geometry, or `None` while the surface is unmeasurable.
    pub fn layout(
        &self,
        geometry: &ViewportGeometry,
        container_height: f64,
    ) -> Option<MinimapLayout> {
        if !geometry.is_measurable() {
            return None;
        }

        let scale = self.scale_factor(geometry);
        let canvas_height = geometry.scroll_height * scale;
        let indicator_height = geometry.client_height / geometry.scroll_height * canvas_height;
        let indicator_top = geometry.scroll_top / geometry.scroll_height * canvas_height;

        let scroll_offset = if canvas_height > container_height && container_height > 0.0 {
            let indicator_center = indicator_top + indicator_height / 2.0;
            let target = indicator_center - container_height / 2.0;
            target.clamp(0.0, canvas_height - container_height)
        } else {
            0.0
        };

        Some(MinimapLayout {
            scale,
            canvas_height,
            indicator_top,
            indicator_height,
            scroll_offset,
        })
    }

    /// Repaint the minimap.
    ///
    /// Scales once by the device pixel ratio, paints background, one text
    /// run per document line until the canvas bottom, then the viewport
    /// indicator on top. Returns the layout used, or `None` when the
    /// redraw was skipped for lack of measurements.
    pub fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        text: &str,
        style: &StyleContract,
        geometry: &ViewportGeometry,
        container_height: f64,
        device_pixel_ratio: f64,
    ) -> Option<MinimapLayout> {
        let layout = self.layout(geometry, container_height)?;
        let theme = &self.settings.theme;
        let width = self.settings.width;

        ctx.scale(device_pixel_ratio.max(1.0));

        ctx.set_color(theme.background);
        ctx.draw_rect_filled(0.0, 0.0, width, layout.canvas_height);

        ctx.set_font_size(style.font_size * layout.scale);
        ctx.set_color(theme.foreground);
        let x = (style.gutter_width + style.content_padding) * layout.scale;
        let line_height = style.line_height * layout.scale;
        let mut y = style.padding_top * layout.scale;
        for line in text.split('\n') {
            ctx.draw_text(line, x, y);
            y += line_height;
            if y > layout.canvas_height {
                break;
            }
        }

        let active = matches!(
            self.state,
            DragState::Hovering | DragState::Dragging { .. }
        );
        ctx.set_color(if active {
            theme.viewport_active
        } else {
            theme.viewport
        });
        ctx.draw_rect_filled(
            INDICATOR_INSET,
            layout.indicator_top,
            width - INDICATOR_INSET * 2.0,
            layout.indicator_height,
        );
        if active {
            ctx.set_color(theme.viewport_outline);
            ctx.draw_rect_outline(
                INDICATOR_INSET,
                layout.indicator_top,
                width - INDICATOR_INSET * 2.0,
                layout.indicator_height,
            );
        }

        Some(layout)
    }

    /// Press on the minimap.
    ///
    /// On the indicator: starts a drag and suspends the translate
    /// transition. Anywhere else: seeks so the indicator centers on the
    /// press point, returning the clamped `scroll_top` to apply directly.
    pub fn on_mouse_down(
        &mut self,
        y_in_container: f64,
        geometry: &ViewportGeometry,
        container_height: f64,
    ) -> Option<f64> {
        let layout = self.layout(geometry, container_height)?;
        let y_on_canvas = y_in_container + layout.scroll_offset;

        let on_indicator = y_on_canvas >= layout.indicator_top
            && y_on_canvas <= layout.indicator_top + layout.indicator_height;
        if on_indicator {
            self.state = DragState::Dragging {
                grab_offset: y_on_canvas - layout.indicator_top,
            };
            self.transitions_enabled = false;
            debug!(grab_offset = y_on_canvas - layout.indicator_top, "drag start");
            return None;
        }

        let target_top = y_on_canvas - layout.indicator_height / 2.0;
        let scroll_top = target_top / layout.canvas_height * geometry.scroll_height;
        Some(geometry.clamp_scroll_top(scroll_top))
    }

    /// Pointer movement, listened at the document level while dragging.
    pub fn on_mouse_move(
        &mut self,
        y_in_container: f64,
        geometry: &ViewportGeometry,
        container_height: f64,
    ) -> PointerResponse {
        let Some(layout) = self.layout(geometry, container_height) else {
            return PointerResponse::default();
        };
        let y_on_canvas = y_in_container + layout.scroll_offset;

        if let DragState::Dragging { grab_offset } = self.state {
            // The drag is the sole driver of the scroll position; the value
            // is applied directly, with no smoothing pass.
            let indicator_top = y_on_canvas - grab_offset;
            let scroll_top = indicator_top / layout.canvas_height * geometry.scroll_height;
            return PointerResponse {
                scroll_to: Some(geometry.clamp_scroll_top(scroll_top)),
                needs_redraw: false,
            };
        }

        let over_indicator = y_on_canvas >= layout.indicator_top
            && y_on_canvas <= layout.indicator_top + layout.indicator_height;
        let was_hovering = self.state == DragState::Hovering;
        if over_indicator == was_hovering {
            // Repaints happen on state transitions only, not per move.
            return PointerResponse::default();
        }

        self.state = if over_indicator {
            DragState::Hovering
        } else {
            DragState::Idle
        };
        PointerResponse {
            scroll_to: None,
            needs_redraw: true,
        }
    }

    /// Any mouse-up ends a drag, wherever the pointer is.
    pub fn on_mouse_up(&mut self) -> bool {
        self.transitions_enabled = true;
        if self.is_dragging() {
            self.state = DragState::Idle;
            debug!("drag end");
            return true;
        }
        false
    }

    /// Pointer left the minimap; the hover highlight is dropped. A running
    /// drag continues, since moves are tracked at the document level.
    pub fn on_mouse_leave(&mut self) -> bool {
        if self.state == DragState::Hovering {
            self.state = DragState::Idle;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::SvgDrawContext;

    fn geometry() -> ViewportGeometry {
        ViewportGeometry {
            scroll_top: 300.0,
            client_height: 500.0,
            scroll_height: 2000.0,
            client_width: 800.0,
            outer_width: 815.0,
        }
    }

    fn minimap() -> Minimap {
        Minimap::new(MinimapSettings::default())
    }

    #[test]
    fn test_scale_factor() {
        let map = minimap();
        assert_eq!(map.scale_factor(&geometry()), 0.14);

        let unmounted = ViewportGeometry::default();
        assert_eq!(map.scale_factor(&unmounted), FALLBACK_SCALE);
    }

    #[test]
    fn test_layout_proportions() {
        let layout = minimap().layout(&geometry(), 600.0).unwrap();
        assert_eq!(layout.canvas_height, 280.0);
        // indicator_height = client/scroll * canvas, top = scroll_top/scroll * canvas
        assert_eq!(layout.indicator_height, 70.0);
        assert_eq!(layout.indicator_top, 42.0);
        // Canvas shorter than the container: no centering translate.
        assert_eq!(layout.scroll_offset, 0.0);
    }

    #[test]
    fn test_layout_centers_tall_canvas() {
        let layout = minimap().layout(&geometry(), 100.0).unwrap();
        // Indicator center 77, container center 50.
        assert_eq!(layout.scroll_offset, 27.0);

        let top = ViewportGeometry {
            scroll_top: 0.0,
            ..geometry()
        };
        let layout = minimap().layout(&top, 100.0).unwrap();
        assert_eq!(layout.scroll_offset, 0.0);

        let bottom = ViewportGeometry {
            scroll_top: 1500.0,
            ..geometry()
        };
        let layout = minimap().layout(&bottom, 100.0).unwrap();
        // Clamped to canvas_height - container_height.
        assert_eq!(layout.scroll_offset, 180.0);
    }

    #[test]
    fn test_layout_skips_unmeasurable_surface() {
        assert!(minimap().layout(&ViewportGeometry::default(), 600.0).is_none());

        let zero_height = ViewportGeometry {
            scroll_height: 0.0,
            ..geometry()
        };
        assert!(minimap().layout(&zero_height, 600.0).is_none());
    }

    #[test]
    fn test_click_seeks_and_clamps() {
        let mut map = minimap();
        let geo = geometry();

        // Click below the indicator: its center moves to the click point.
        let scroll = map.on_mouse_down(200.0, &geo, 600.0).unwrap();
        assert!((scroll - (200.0 - 35.0) / 280.0 * 2000.0).abs() < 1e-9);
        assert!(!map.is_dragging());

        // Click at the very bottom clamps to scroll_height - client_height.
        let scroll = map.on_mouse_down(280.0, &geo, 600.0).unwrap();
        assert_eq!(scroll, 1500.0);

        // Click at the very top clamps to zero.
        let scroll = map.on_mouse_down(0.0, &geo, 600.0).unwrap();
        assert_eq!(scroll, 0.0);
    }

    #[test]
    fn test_drag_moves_scroll_proportionally() {
        let mut map = minimap();
        let geo = geometry();

        // Press inside the indicator (42..112).
        assert_eq!(map.on_mouse_down(50.0, &geo, 600.0), None);
        assert!(map.is_dragging());
        assert!(!map.transitions_enabled());
        assert_eq!(map.transform_transition(), None);

        // Dragging down by d minimap pixels moves scroll_top by d / scale.
        let response = map.on_mouse_move(64.0, &geo, 600.0);
        let expected = 300.0 + 14.0 / (280.0 / 2000.0);
        assert!((response.scroll_to.unwrap() - expected).abs() < 1e-9);

        // Dragging far past the end clamps.
        let response = map.on_mouse_move(1000.0, &geo, 600.0);
        assert_eq!(response.scroll_to, Some(1500.0));

        assert!(map.on_mouse_up());
        assert!(!map.is_dragging());
        assert!(map.transitions_enabled());
        assert_eq!(map.transform_transition(), Some(TRANSFORM_TRANSITION));
    }

    #[test]
    fn test_hover_redraws_only_on_transitions() {
        let mut map = minimap();
        let geo = geometry();

        // Outside the indicator: still idle, no repaint.
        assert_eq!(map.on_mouse_move(10.0, &geo, 600.0), PointerResponse::default());

        // Entering the indicator repaints once.
        let response = map.on_mouse_move(50.0, &geo, 600.0);
        assert!(response.needs_redraw);
        assert_eq!(map.state(), DragState::Hovering);

        // Moving within it does not.
        let response = map.on_mouse_move(60.0, &geo, 600.0);
        assert!(!response.needs_redraw);

        // Leaving it repaints again.
        let response = map.on_mouse_move(200.0, &geo, 600.0);
        assert!(response.needs_redraw);
        assert_eq!(map.state(), DragState::Idle);
    }

    #[test]
    fn test_state_self_heals_without_move_events() {
        let mut map = minimap();
        let geo = geometry();

        map.on_mouse_down(50.0, &geo, 600.0);
        assert!(map.is_dragging());
        // Mouse-up far outside the minimap, with every intermediate move
        // dropped, still lands back in Idle.
        assert!(map.on_mouse_up());
        assert_eq!(map.state(), DragState::Idle);

        // Hover cleared by leave.
        map.on_mouse_move(50.0, &geo, 600.0);
        assert_eq!(map.state(), DragState::Hovering);
        assert!(map.on_mouse_leave());
        assert_eq!(map.state(), DragState::Idle);
        assert!(!map.on_mouse_leave());
    }

    #[test]
    fn test_drag_survives_mouse_leave() {
        let mut map = minimap();
        let geo = geometry();
        map.on_mouse_down(50.0, &geo, 600.0);
        assert!(!map.on_mouse_leave());
        assert!(map.is_dragging());
    }

    #[test]
    fn test_redraw_scheduler_coalesces() {
        let mut scheduler = RedrawScheduler::new();
        assert!(scheduler.request());
        assert!(!scheduler.request());
        assert!(!scheduler.request());
        assert!(scheduler.take());
        assert!(!scheduler.take());
        assert!(scheduler.request());
    }

    #[test]
    fn test_draw_emits_lines_and_indicator() {
        let map = minimap();
        let style = StyleContract::default();
        let mut ctx = SvgDrawContext::new(120.0, 280.0);
        let layout = map
            .draw(&mut ctx, "alpha\nbeta", &style, &geometry(), 600.0, 2.0)
            .unwrap();
        assert_eq!(layout.canvas_height, 280.0);
        let svg = ctx.finish();
        assert!(svg.contains("alpha"));
        assert!(svg.contains("beta"));
        assert!(svg.contains(r#"<g transform="scale(2)">"#));
        // Idle indicator: translucent fill, no outline.
        assert!(svg.contains("rgba(122, 162, 247, 0.30)"));
        assert!(!svg.contains("stroke="));
    }

    #[test]
    fn test_draw_highlights_indicator_while_hovering() {
        let mut map = minimap();
        let geo = geometry();
        map.on_mouse_move(50.0, &geo, 600.0);

        let mut ctx = SvgDrawContext::new(120.0, 280.0);
        map.draw(&mut ctx, "text", &StyleContract::default(), &geo, 600.0, 1.0);
        let svg = ctx.finish();
        assert!(svg.contains("rgba(122, 162, 247, 0.50)"));
        assert!(svg.contains("stroke=\"rgba(122, 162, 247, 0.80)\""));
    }

    #[test]
    fn test_draw_skips_unmeasurable_surface() {
        let map = minimap();
        let mut ctx = SvgDrawContext::new(120.0, 0.0);
        let layout = map.draw(
            &mut ctx,
            "",
            &StyleContract::default(),
            &ViewportGeometry::default(),
            600.0,
            1.0,
        );
        assert!(layout.is_none());
    }

    #[test]
    fn test_draw_stops_past_canvas_bottom() {
        let map = minimap();
        let geo = ViewportGeometry {
            scroll_top: 0.0,
            client_height: 50.0,
            scroll_height: 50.0,
            client_width: 800.0,
            outer_width: 800.0,
        };
        // Canvas is 7px tall; a thousand lines must not paint a thousand runs.
        let text = vec!["line"; 1000].join("\n");
        let mut ctx = SvgDrawContext::new(120.0, 7.0);
        map.draw(&mut ctx, &text, &StyleContract::default(), &geo, 600.0, 1.0);
        let svg = ctx.finish();
        assert!(svg.matches("<text").count() < 10);
    }
}
