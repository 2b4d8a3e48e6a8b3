//! Template and content stores.
//!
//! Both stores read a single directory level into a name-indexed mapping:
//!
//! ```text
//! template/                content/
//! ├── index.html           ├── about.md
//! ├── page.html            ├── index.md
//! ├── header.html          ├── drafts/        ← skipped (directory)
//! └── footer.html          └── .about.md.swp  ← skipped (hidden)
//! ```
//!
//! Entries are returned sorted by file name so a pass iterates documents in a
//! stable order. Hooks are not applied here; see [`crate::site`].

use crate::content::parse_document;
use crate::types::{ContentMap, Templates};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LoadError + '_ {
    move |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read every visible regular file directly inside `dir` as `(file name, text)`.
pub fn read_flat_dir(dir: &Path) -> Result<Vec<(String, String)>, LoadError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && !p
                    .file_name()
                    .map(|n| n.to_string_lossy().starts_with('.'))
                    .unwrap_or(true)
        })
        .collect();

    files.sort();

    let mut entries = Vec::with_capacity(files.len());
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let text = fs::read_to_string(path).map_err(io_error(path))?;
        entries.push((name, text));
    }
    Ok(entries)
}

/// Load every template fragment in `dir`, keyed by file name.
pub fn load_templates(dir: &Path) -> Result<Templates, LoadError> {
    let templates: Templates = read_flat_dir(dir)?.into_iter().collect();
    tracing::debug!(count = templates.len(), dir = %dir.display(), "loaded templates");
    Ok(templates)
}

/// Load every content document in `dir`, extracting title, excerpt and body.
pub fn load_content(dir: &Path) -> Result<ContentMap, LoadError> {
    let content: ContentMap = read_flat_dir(dir)?
        .into_iter()
        .map(|(name, raw)| (name, parse_document(&raw)))
        .collect();
    tracing::debug!(count = content.len(), dir = %dir.display(), "loaded content");
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn templates_keyed_by_file_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("index.html"), "<html>{{content}}</html>").unwrap();
        fs::write(tmp.path().join("page.html"), "<main>{{content}}</main>").unwrap();

        let templates = load_templates(tmp.path()).unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates["index.html"], "<html>{{content}}</html>");
    }

    #[test]
    fn subdirectories_and_hidden_files_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "# A").unwrap();
        fs::write(tmp.path().join(".a.md.swp"), "junk").unwrap();
        fs::create_dir(tmp.path().join("drafts")).unwrap();
        fs::write(tmp.path().join("drafts/b.md"), "# B").unwrap();

        let content = load_content(tmp.path()).unwrap();
        let names: Vec<&str> = content.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a.md"]);
    }

    #[test]
    fn content_documents_are_parsed() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "# A Title\nBody text").unwrap();

        let content = load_content(tmp.path()).unwrap();
        let doc = &content["a.md"];
        assert_eq!(doc.title, "A Title");
        assert_eq!(doc.excerpt, "Body text");
        assert_eq!(doc.body, "\nBody text");
    }

    #[test]
    fn entries_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.md", "a.md", "b.md"] {
            fs::write(tmp.path().join(name), name).unwrap();
        }
        let entries = read_flat_dir(tmp.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn missing_directory_is_io_error_naming_the_path() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("template");
        let err = load_templates(&missing).unwrap_err();
        assert!(err.to_string().contains("template"));
    }
}
