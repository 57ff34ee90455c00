//! Markdown to HTML for model output.
//!
//! Model output is trusted: raw HTML in the markdown passes through as-is.

use pulldown_cmark::{Options, Parser, html};

/// Render markdown to an HTML fragment (tables and strikethrough enabled).
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
