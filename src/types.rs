//! Shared types passed between the stores, the composer, the renderer and
//! the writer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// All loaded template fragments, keyed by file name (`index.html`, `header.html`, ...).
pub type Templates = BTreeMap<String, String>;

/// All loaded content documents, keyed by source file name (`about.md`, ...).
pub type ContentMap = BTreeMap<String, Document>;

/// Rendered artifacts keyed by the same document name as [`ContentMap`].
pub type Rendered = BTreeMap<String, String>;

/// One content source file.
///
/// `title` and `excerpt` are both derived from `source`; `body` is `source`
/// with the first heading line removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Text the other fields were derived from.
    pub source: String,
    /// Text of the first heading line, empty when there is none.
    pub title: String,
    /// First paragraph after the heading, or the whole source when there is no heading.
    pub excerpt: String,
    /// Source text with the heading line removed.
    pub body: String,
    /// Alternate single-document template name.
    pub template_override: Option<String>,
    /// Insert `body` verbatim instead of converting it from Markdown.
    pub skip_markdown: bool,
}

/// The fixed directory layout under a site's base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub base: PathBuf,
    pub content: PathBuf,
    pub templates: PathBuf,
    pub assets: PathBuf,
    pub output: PathBuf,
}

impl SitePaths {
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
            content: base.join("content"),
            templates: base.join("template"),
            assets: base.join("assets"),
            output: base.join("dist"),
        }
    }
}
