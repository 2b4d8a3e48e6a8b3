//! CLI output formatting for a build pass.
//!
//! ```text
//! 001 about.md → dist/about.html
//! 002 index.md → dist/index.html
//! Assets: 3 files → dist/assets/
//! Generated 2 pages
//! ```
//!
//! Documents are numbered in write order. Paths are shown relative to the
//! site's base directory.
//!
//! Each `format_*` function returns `Vec<String>` and is pure; the `print_*`
//! wrapper writes to stdout. Diagnostics go through `tracing` instead.

use crate::generate::WriteReport;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn relative<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

pub fn format_pass_summary(report: &WriteReport, base: &Path) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.pages.len() + 2);

    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            page.document,
            relative(&page.path, base).display()
        ));
    }

    if let Some(count) = report.assets {
        lines.push(format!(
            "Assets: {} \u{2192} {}/",
            plural(count, "file"),
            relative(&report.output.join("assets"), base).display()
        ));
    }

    lines.push(format!("Generated {}", plural(report.pages.len(), "page")));
    lines
}

/// Print the pass summary to stdout.
pub fn print_pass_summary(report: &WriteReport, base: &Path) {
    for line in format_pass_summary(report, base) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::WrittenPage;
    use std::path::PathBuf;

    fn report(docs: &[&str], assets: Option<usize>) -> WriteReport {
        WriteReport {
            output: PathBuf::from("/site/dist"),
            pages: docs
                .iter()
                .map(|doc| WrittenPage {
                    document: doc.to_string(),
                    path: PathBuf::from("/site/dist").join(crate::generate::output_name(doc)),
                })
                .collect(),
            assets,
        }
    }

    #[test]
    fn pages_numbered_with_relative_paths() {
        let lines = format_pass_summary(&report(&["about.md", "index.md"], None), Path::new("/site"));
        assert_eq!(
            lines,
            vec![
                "001 about.md \u{2192} dist/about.html",
                "002 index.md \u{2192} dist/index.html",
                "Generated 2 pages",
            ]
        );
    }

    #[test]
    fn assets_line_when_copied() {
        let lines = format_pass_summary(&report(&["a.md"], Some(1)), Path::new("/site"));
        assert_eq!(lines[1], "Assets: 1 file \u{2192} dist/assets/");
        assert_eq!(lines[2], "Generated 1 page");
    }

    #[test]
    fn empty_site() {
        let lines = format_pass_summary(&WriteReport::default(), Path::new("/site"));
        assert_eq!(lines, vec!["Generated 0 pages"]);
    }

    #[test]
    fn paths_outside_base_shown_in_full() {
        let lines = format_pass_summary(&report(&["a.md"], None), Path::new("/elsewhere"));
        assert_eq!(lines[0], "001 a.md \u{2192} /site/dist/a.html");
    }
}
