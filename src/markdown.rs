//! Markdown to HTML conversion for document bodies.

use crate::config::MarkdownConfig;
use pulldown_cmark::{Options, Parser, html as md_html};

fn options(config: &MarkdownConfig) -> Options {
    let mut options = Options::empty();
    options.set(Options::ENABLE_TABLES, config.tables);
    options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
    options.set(Options::ENABLE_FOOTNOTES, config.footnotes);
    options.set(Options::ENABLE_TASKLISTS, config.tasklists);
    options.set(Options::ENABLE_SMART_PUNCTUATION, config.smart_punctuation);
    options
}

/// Convert a Markdown body to an HTML fragment.
pub fn to_html(body: &str, config: &MarkdownConfig) -> String {
    let parser = Parser::new_ext(body, options(config));
    let mut html = String::with_capacity(body.len() * 3 / 2);
    md_html::push_html(&mut html, parser);
    html
}
