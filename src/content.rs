//! Title, excerpt and body extraction for content documents.
//!
//! A heading line is any line starting with one or more `#`:
//!
//! ```text
//! # Hello          ← first heading: title = "Hello", line removed from body
//! World            ← excerpt = "World" (first paragraph after the heading)
//!
//! More
//! ```
//!
//! Title and excerpt are both read from the raw text before the heading
//! is stripped, so neither depends on the other. A document without a heading
//! has an empty title, its whole text as excerpt, and an untouched body.

use crate::types::Document;

/// Byte span of the first heading line (newline excluded) and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Heading<'a> {
    start: usize,
    end: usize,
    title: &'a str,
}

fn first_heading(content: &str) -> Option<Heading<'_>> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let text = line.strip_suffix('\n').unwrap_or(line);
        if text.starts_with('#') {
            return Some(Heading {
                start: offset,
                end: offset + text.len(),
                title: text.trim_start_matches('#').trim(),
            });
        }
        offset += line.len();
    }
    None
}

/// Text of the first heading line, or an empty string.
pub fn extract_title(content: &str) -> String {
    first_heading(content)
        .map(|heading| heading.title.to_string())
        .unwrap_or_default()
}

/// The first paragraph after the first heading.
///
/// Blank lines directly under the heading are skipped; the paragraph ends at
/// the next blank line. Without a heading the whole content is returned.
pub fn extract_excerpt(content: &str) -> String {
    let Some(heading) = first_heading(content) else {
        return content.to_string();
    };

    let rest = &content[heading.end..];
    let paragraph: Vec<&str> = rest
        .trim_start()
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .collect();
    paragraph.join("\n").trim().to_string()
}

/// Remove the first heading line's text, keeping its line break.
pub fn strip_heading(content: &str) -> String {
    match first_heading(content) {
        Some(heading) => {
            let mut body = String::with_capacity(content.len());
            body.push_str(&content[..heading.start]);
            body.push_str(&content[heading.end..]);
            body
        }
        None => content.to_string(),
    }
}

/// Build a [`Document`] from raw source text.
pub fn parse_document(raw: &str) -> Document {
    let title = extract_title(raw);
    let excerpt = extract_excerpt(raw);
    let body = strip_heading(raw);
    Document {
        source: raw.to_string(),
        title,
        excerpt,
        body,
        template_override: None,
        skip_markdown: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_excerpt_and_body_from_simple_document() {
        let doc = parse_document("# Hello\nWorld\n\nMore");
        assert_eq!(doc.title, "Hello");
        assert_eq!(doc.excerpt, "World");
        assert_eq!(doc.body, "\nWorld\n\nMore");
        assert_eq!(doc.source, "# Hello\nWorld\n\nMore");
    }

    #[test]
    fn no_heading_falls_back_to_whole_content() {
        let raw = "Just text\n\nand more text";
        let doc = parse_document(raw);
        assert_eq!(doc.title, "");
        assert_eq!(doc.excerpt, raw);
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn deeper_heading_counts() {
        assert_eq!(extract_title("intro\n### Deep Title  \nbody"), "Deep Title");
    }

    #[test]
    fn whitespace_after_hashes_is_optional() {
        assert_eq!(extract_title("#Tight"), "Tight");
        assert_eq!(extract_title("##   Loose"), "Loose");
    }

    #[test]
    fn only_first_heading_is_title_and_removed() {
        let raw = "# One\ntext\n# Two\nmore";
        assert_eq!(extract_title(raw), "One");
        assert_eq!(strip_heading(raw), "\ntext\n# Two\nmore");
    }

    #[test]
    fn heading_in_the_middle_is_removed_in_place() {
        let raw = "lead\n## Mid\ntail";
        assert_eq!(strip_heading(raw), "lead\n\ntail");
        assert_eq!(extract_excerpt(raw), "tail");
    }

    #[test]
    fn excerpt_skips_blank_lines_under_heading() {
        let raw = "# Title\n\nFirst paragraph\nstill first\n\nSecond";
        assert_eq!(extract_excerpt(raw), "First paragraph\nstill first");
    }

    #[test]
    fn any_heading_level_anchors_the_excerpt() {
        assert_eq!(extract_excerpt("## Deep\nbody"), "body");
        assert_eq!(extract_excerpt("text\n# Last"), "");
    }

    #[test]
    fn excerpt_runs_to_end_without_blank_line() {
        assert_eq!(extract_excerpt("# T\na\nb"), "a\nb");
    }

    #[test]
    fn heading_at_end_of_file() {
        let doc = parse_document("text\n# Last");
        assert_eq!(doc.title, "Last");
        assert_eq!(doc.excerpt, "");
        assert_eq!(doc.body, "text\n");
    }

    #[test]
    fn crlf_line_endings() {
        let doc = parse_document("# Title\r\nBody\r\n\r\nNext");
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.excerpt, "Body");
        assert_eq!(doc.body, "\nBody\r\n\r\nNext");
    }

    #[test]
    fn extraction_reads_the_raw_text() {
        // The excerpt must not be computed from the stripped body.
        let raw = "# Heading\nParagraph";
        let doc = parse_document(raw);
        assert_eq!(doc.excerpt, "Paragraph");
        assert!(!doc.body.contains("Heading"));
    }

    #[test]
    fn empty_document() {
        let doc = parse_document("");
        assert_eq!(doc, Document::default());
    }
}
