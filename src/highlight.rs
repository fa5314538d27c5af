// Markdown highlighter - ordered substitution over escaped lines
// Not a markdown parser: a best-effort single pass that turns each line into
// a markup string ready for the overlay. Unmatched text passes through
// unchanged, so the pass is total over arbitrary input.

use crate::theme::{Palette, lighten_color};
use regex::Regex;

/// Per-line markdown highlighter.
///
/// Compiled once from an immutable palette. `highlight_lines` yields exactly
/// one markup string per physical line of the input, which keeps the overlay
/// and its line-number gutter aligned with the editable surface.
pub struct Highlighter {
    palette: Palette,

    fence: Regex,
    heading: Regex,
    blockquote: Regex,
    list_marker: Regex,
    horizontal_rule: Regex,
    image: Regex,
    link: Regex,
    bold_stars: Regex,
    bold_underscores: Regex,
    strikethrough: Regex,
    inline_code: Regex,
    html_tag: Regex,

    // Replacement templates prebuilt from the palette.
    blockquote_repl: String,
    list_marker_repl: String,
    horizontal_rule_repl: String,
    image_repl: String,
    link_repl: String,
    bold_stars_repl: String,
    bold_underscores_repl: String,
    strikethrough_repl: String,
    inline_code_repl: String,
    html_tag_repl: String,

    // One precomputed color per heading level, lightening with depth.
    heading_colors: [String; 6],
}

/// Escape `&`, `<` and `>` for markup synthesis.
///
/// Runs exactly once, before any rule injects markup, so injected tags are
/// never re-escaped and literal text can never produce `&amp;amp;`.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Highlighter {
    pub fn new(palette: Palette) -> Self {
        let heading_colors = std::array::from_fn(|level| {
            lighten_color(&palette.headings, level as f32 * 15.0)
        });

        let span = |color: &str, inner: &str| format!(r#"<span style="color: {color};">{inner}</span>"#);

        Highlighter {
            fence: Regex::new(r"(?ms)^```.*?```").unwrap(),
            heading: Regex::new(r"^(#{1,6})\s(.*)$").unwrap(),
            blockquote: Regex::new(r"^(\s*)(&gt;.*)$").unwrap(),
            list_marker: Regex::new(r"^(\s*)(\*|-|\+|\d+\.)\s").unwrap(),
            horizontal_rule: Regex::new(r"^(---|___|\*\*\*)$").unwrap(),
            image: Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap(),
            link: Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap(),
            bold_stars: Regex::new(r"\*\*(.*?)\*\*").unwrap(),
            bold_underscores: Regex::new(r"__(.*?)__").unwrap(),
            strikethrough: Regex::new(r"~~(.*?)~~").unwrap(),
            inline_code: Regex::new(r"`(.*?)`").unwrap(),
            html_tag: Regex::new(r#"&lt;/?[\w\s="/.':;#?&-]+?&gt;"#).unwrap(),

            blockquote_repl: format!("${{1}}{}", span(&palette.blockquote, "${2}")),
            list_marker_repl: format!("${{1}}{} ", span(&palette.lists, "${2}")),
            horizontal_rule_repl: span(&palette.horizontal_rules, "${1}"),
            image_repl: format!(
                "{}{}{}{}{}",
                span(&palette.image_exclamation_mark, "!"),
                span(&palette.image_alt_text, "["),
                span(&palette.image_alt_text, "${1}"),
                span(&palette.image_alt_text, "]"),
                "<span>(${2})</span>"
            ),
            link_repl: span(&palette.links, "[${1}](${2})"),
            bold_stars_repl: format!(
                r#"<span style="color: {}; font-weight: bold;">**${{1}}**</span>"#,
                palette.bold
            ),
            bold_underscores_repl: format!(
                r#"<span style="color: {}; font-weight: bold;">__${{1}}__</span>"#,
                palette.bold
            ),
            strikethrough_repl: format!(
                r#"<span style="color: {}; text-decoration: line-through;">~~${{1}}~~</span>"#,
                palette.strikethrough
            ),
            inline_code_repl: span(&palette.code, "`${1}`"),
            html_tag_repl: span(&palette.html_tags, "${0}"),

            heading_colors,
            palette,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Highlight a whole document into one markup string per physical line.
    ///
    /// Fenced code blocks (triple-backtick, non-greedy, possibly multi-line)
    /// are located first on the escaped text; every line inside a fence is
    /// wrapped wholesale in a code-colored span and skips the inline rules.
    pub fn highlight_lines(&self, text: &str) -> Vec<String> {
        let escaped = escape_text(text);
        let fences: Vec<(usize, usize)> = self
            .fence
            .find_iter(&escaped)
            .map(|m| (m.start(), m.end()))
            .collect();

        let mut lines = Vec::with_capacity(escaped.lines().count() + 1);
        let mut pos = 0usize;
        for line in escaped.split('\n') {
            let start = pos;
            let end = pos + line.len();
            pos = end + 1;

            let in_fence = fences
                .iter()
                .any(|&(fs, fe)| (start < fe && end > fs) || (start >= fs && end <= fe));
            if in_fence {
                lines.push(format!(
                    r#"<span style="color: {};">{}</span>"#,
                    self.palette.code, line
                ));
            } else {
                lines.push(self.highlight_line(line));
            }
        }
        lines
    }

    /// Apply the ordered inline rule chain to one escaped line.
    ///
    /// The order is load-bearing: later rules run over text that already
    /// contains markup injected by earlier rules, and the guards below are
    /// tuned for exactly this sequence.
    pub fn highlight_line(&self, line: &str) -> String {
        let line = self.highlight_heading(line);
        let line = self.blockquote.replace(&line, &self.blockquote_repl);
        let line = self.list_marker.replace(&line, &self.list_marker_repl);
        let line = self.horizontal_rule.replace(&line, &self.horizontal_rule_repl);
        let line = self.image.replace_all(&line, &self.image_repl);
        let line = self.link.replace_all(&line, &self.link_repl);
        let line = self.bold_stars.replace_all(&line, &self.bold_stars_repl);
        let line = self.bold_underscores.replace_all(&line, &self.bold_underscores_repl);
        let line = self.wrap_isolated_pairs(&line, b'*');
        let line = self.wrap_isolated_pairs(&line, b'_');
        let line = self.strikethrough.replace_all(&line, &self.strikethrough_repl);
        let line = self.inline_code.replace_all(&line, &self.inline_code_repl);
        self.html_tag.replace_all(&line, &self.html_tag_repl).into_owned()
    }

    fn highlight_heading(&self, line: &str) -> String {
        match self.heading.captures(line) {
            Some(caps) => {
                let hashes = &caps[1];
                let content = &caps[2];
                let color = &self.heading_colors[hashes.len() - 1];
                format!(r#"<span style="color: {color};">{hashes}</span> {content}"#)
            }
            None => line.to_string(),
        }
    }

    /// Emphasis for a single delimiter character that is not adjacent to a
    /// second one: pairs of isolated `*` (or `_`) wrap their span in an
    /// italic-styled span, without touching the doubled delimiters the bold
    /// rule has already consumed.
    fn wrap_isolated_pairs(&self, line: &str, delim: u8) -> String {
        let bytes = line.as_bytes();
        let mut singles = Vec::new();
        for (i, &b) in bytes.iter().enumerate() {
            if b != delim {
                continue;
            }
            let prev_is_delim = i > 0 && bytes[i - 1] == delim;
            let next_is_delim = i + 1 < bytes.len() && bytes[i + 1] == delim;
            if !prev_is_delim && !next_is_delim {
                singles.push(i);
            }
        }
        if singles.len() < 2 {
            return line.to_string();
        }

        let delim_char = delim as char;
        let mut out = String::with_capacity(line.len() + 64);
        let mut last = 0usize;
        for pair in singles.chunks_exact(2) {
            let (open, close) = (pair[0], pair[1]);
            out.push_str(&line[last..open]);
            out.push_str(&format!(
                r#"<span style="color: {}; font-style: italic;">{delim_char}{}{delim_char}</span>"#,
                self.palette.italic,
                &line[open + 1..close]
            ));
            last = close + 1;
        }
        out.push_str(&line[last..]);
        out
    }
}
