// SVG-based DrawContext implementation for testing and visualization
// Generates SVG output from minimap rendering

use crate::draw_context::DrawContext;
use std::fmt::Write;

/// SVG-emitting drawing context.
///
/// Used by the snapshot tests and by the demo binary to rasterize the
/// minimap without a GUI toolkit.
pub struct SvgDrawContext {
    svg_content: String,
    current_color: u32,
    current_font_size: f64,
    open_groups: usize,
}

impl SvgDrawContext {
    pub fn new(width: f64, height: f64) -> Self {
        let mut ctx = SvgDrawContext {
            svg_content: String::new(),
            current_color: 0x000000FF,
            current_font_size: 14.0,
            open_groups: 0,
        };

        writeln!(
            &mut ctx.svg_content,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        )
        .unwrap();

        ctx
    }

    /// Get the generated SVG content.
    pub fn finish(mut self) -> String {
        for _ in 0..self.open_groups {
            writeln!(&mut self.svg_content, "  </g>").unwrap();
        }
        writeln!(&mut self.svg_content, "</svg>").unwrap();
        self.svg_content
    }

    /// Convert an RGBA color to an SVG color string.
    fn color_to_svg(&self, color: u32) -> String {
        let r = (color >> 24) & 0xFF;
        let g = (color >> 16) & 0xFF;
        let b = (color >> 8) & 0xFF;
        let a = color & 0xFF;

        if a == 0xFF {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("rgba({}, {}, {}, {:.2})", r, g, b, a as f32 / 255.0)
        }
    }

    /// Escape XML text.
    fn escape_xml(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }
}

impl DrawContext for SvgDrawContext {
    fn set_color(&mut self, color: u32) {
        self.current_color = color;
    }

    fn set_font_size(&mut self, size: f64) {
        self.current_font_size = size;
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64) {
        if text.is_empty() {
            return;
        }

        let color = self.color_to_svg(self.current_color);
        writeln!(
            &mut self.svg_content,
            r#"  <text x="{}" y="{}" fill="{}" font-family="monospace" font-size="{}" dominant-baseline="hanging">{}</text>"#,
            x,
            y,
            color,
            self.current_font_size,
            Self::escape_xml(text)
        )
        .unwrap();
    }

    fn draw_rect_filled(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let color = self.color_to_svg(self.current_color);
        writeln!(
            &mut self.svg_content,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            x,
            y,
            w,
            h,
            color
        )
        .unwrap();
    }

    fn draw_rect_outline(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let color = self.color_to_svg(self.current_color);
        writeln!(
            &mut self.svg_content,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="1"/>"#,
            x,
            y,
            w,
            h,
            color
        )
        .unwrap();
    }

    fn scale(&mut self, factor: f64) {
        writeln!(&mut self.svg_content, r#"  <g transform="scale({})">"#, factor).unwrap();
        self.open_groups += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_context_creation() {
        let ctx = SvgDrawContext::new(120.0, 300.0);
        let svg = ctx.finish();
        assert!(svg.contains(r#"width="120""#));
        assert!(svg.contains(r#"height="300""#));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_color_conversion() {
        let ctx = SvgDrawContext::new(100.0, 100.0);
        assert_eq!(ctx.color_to_svg(0xFF0000FF), String::from("#ff0000"));
        assert_eq!(ctx.color_to_svg(0x00FF00FF), String::from("#00ff00"));
        assert_eq!(
            ctx.color_to_svg(0x7AA2F74D),
            String::from("rgba(122, 162, 247, 0.30)")
        );
    }

    #[test]
    fn test_draw_text() {
        let mut ctx = SvgDrawContext::new(200.0, 100.0);
        ctx.set_color(0xC0CAF5FF);
        ctx.set_font_size(1.75);
        ctx.draw_text("Hello World", 2.0, 20.0);
        let svg = ctx.finish();
        assert!(svg.contains("Hello World"));
        assert!(svg.contains(r#"font-size="1.75""#));
        assert!(svg.contains(r##"fill="#c0caf5""##));
    }

    #[test]
    fn test_draw_rects() {
        let mut ctx = SvgDrawContext::new(200.0, 100.0);
        ctx.set_color(0xFF0000FF);
        ctx.draw_rect_filled(10.0, 20.0, 50.0, 30.0);
        ctx.draw_rect_outline(2.0, 4.0, 6.0, 8.0);
        let svg = ctx.finish();
        assert!(svg.contains(r##"width="50" height="30" fill="#ff0000""##));
        assert!(svg.contains(r##"fill="none" stroke="#ff0000""##));
    }

    #[test]
    fn test_scale_groups_are_closed() {
        let mut ctx = SvgDrawContext::new(100.0, 100.0);
        ctx.scale(2.0);
        ctx.draw_rect_filled(0.0, 0.0, 10.0, 10.0);
        let svg = ctx.finish();
        assert!(svg.contains(r#"<g transform="scale(2)">"#));
        assert_eq!(svg.matches("</g>").count(), 1);
    }

    #[test]
    fn test_xml_escaping() {
        let mut ctx = SvgDrawContext::new(200.0, 100.0);
        ctx.draw_text("<test> & \"quote\"", 0.0, 10.0);
        let svg = ctx.finish();
        assert!(svg.contains("&lt;test&gt; &amp; &quot;quote&quot;"));
    }
}
