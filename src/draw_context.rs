// Drawing backend trait - abstracts over the host's raster surface
// The minimap renders through this seam so the same drawing code runs
// against a real canvas in the host and against the SVG backend in tests.

/// Colors are 0xRRGGBBAA. Coordinates are logical pixels; `scale` is
/// applied once per redraw to account for the device pixel ratio.
pub trait DrawContext {
    fn set_color(&mut self, color: u32);
    fn set_font_size(&mut self, size: f64);
    fn draw_text(&mut self, text: &str, x: f64, y: f64);
    fn draw_rect_filled(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn draw_rect_outline(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn scale(&mut self, factor: f64);
}
