// Viewport geometry of the editable input surface
// Ephemeral measurements, recomputed on every layout pass and never persisted.

/// Measured geometry of the input surface at one instant.
///
/// All values are CSS pixels. `outer_width` includes the native scrollbar,
/// `client_width` does not; the difference is the scrollbar gutter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportGeometry {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub outer_width: f64,
}

impl ViewportGeometry {
    /// Largest legal `scroll_top` for this geometry.
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Clamp a scroll position into `[0, scroll_height - client_height]`.
    pub fn clamp_scroll_top(&self, value: f64) -> f64 {
        value.clamp(0.0, self.max_scroll_top())
    }

    /// Whether the surface has been mounted and measured.
    ///
    /// Zero sizes mean the surface is not laid out yet; every computation
    /// driven by this geometry short-circuits instead of dividing by zero.
    pub fn is_measurable(&self) -> bool {
        self.client_width > 0.0 && self.client_height > 0.0 && self.scroll_height > 0.0
    }

    /// Width consumed by the native scrollbar, never negative.
    pub fn scrollbar_gutter(&self) -> f64 {
        (self.outer_width - self.client_width).max(0.0)
    }
}
