// Preview renderer - full-document HTML via pulldown-cmark
// Unlike the line highlighter, this is a real markdown render of the whole
// document, used for the side-by-side preview pane.

use pulldown_cmark::{Options, Parser, html};

/// Render a whole document to HTML.
///
/// Strikethrough and tables are enabled to match the editor's dialect.
/// Total over any input; malformed markdown degrades, it never errors.
pub fn render_preview(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(text, options);

    let mut out = String::with_capacity(text.len() * 2);
    html::push_html(&mut out, parser);
    out
}
