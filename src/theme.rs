// Color palette for the highlighter and minimap
// Markup colors are CSS hex strings; minimap colors are 0xRRGGBBAA words
// as consumed by DrawContext.

use serde::{Deserialize, Serialize};

/// Highlight colors, one per token rule.
///
/// This is an immutable value handed to the highlighter at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Palette {
    pub headings: String,
    pub bold: String,
    pub italic: String,
    pub strikethrough: String,
    pub blockquote: String,
    pub links: String,
    pub image_alt_text: String,
    pub image_exclamation_mark: String,
    pub code: String,
    pub lists: String,
    pub horizontal_rules: String,
    pub html_tags: String,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            headings: "#f0700e".to_string(),
            bold: "#026654".to_string(),
            italic: "#ccbb02".to_string(),
            strikethrough: "#04dbd8".to_string(),
            blockquote: "#04db37".to_string(),
            links: "#047edb".to_string(),
            image_alt_text: "#047edb".to_string(),
            image_exclamation_mark: "#db1d04".to_string(),
            code: "#06d114".to_string(),
            lists: "#d67600".to_string(),
            horizontal_rules: "#d63900".to_string(),
            html_tags: "#d60068".to_string(),
        }
    }
}

/// Minimap colors, 0xRRGGBBAA.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MinimapTheme {
    pub background: u32,
    pub foreground: u32,
    pub viewport: u32,
    pub viewport_active: u32,
    pub viewport_outline: u32,
}

impl Default for MinimapTheme {
    fn default() -> Self {
        MinimapTheme {
            background: 0x1A1B26FF,
            foreground: 0xC0CAF5FF,
            viewport: 0x7AA2F74D,
            viewport_active: 0x7AA2F780,
            viewport_outline: 0x7AA2F7CC,
        }
    }
}

/// Lighten a `#rrggbb` color by moving each channel toward white.
///
/// `percent` is in the 0..=100 range; each channel becomes
/// `channel + (255 - channel) * percent / 100`, floored and capped at 255.
/// Inputs that do not parse as a hex color are returned unchanged.
pub fn lighten_color(hex: &str, percent: f32) -> String {
    let Some((r, g, b)) = parse_hex_color(hex) else {
        return hex.to_string();
    };

    let lighten = |channel: u8| -> u32 {
        let c = channel as f32;
        ((c + (255.0 - c) * (percent / 100.0)).floor() as u32).min(255)
    };

    format!("#{:02x}{:02x}{:02x}", lighten(r), lighten(g), lighten(b))
}

/// Parse a `#rrggbb` (or `rrggbb`) color into channels.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
