//! Writing a rendered pass to disk.
//!
//! The output directory is rebuilt from scratch on every pass:
//!
//! ```text
//! dist/
//! ├── assets/          # Copy of <site>/assets/ (only when it exists)
//! │   └── ...
//! ├── index.html       # from content/index.md
//! └── about.html       # from content/about.md
//! ```
//!
//! Each page is named after its source document with the extension replaced
//! by `.html`. Leading whitespace is trimmed from every page before writing.
//! A failure part-way through leaves whatever was already written.

use crate::hooks::{HookError, Hooks, names};
use crate::render::RenderContext;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// One written page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    /// Source document name (`about.md`).
    pub document: String,
    /// Absolute or base-relative path of the written file.
    pub path: PathBuf,
}

/// What one pass left in the output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub output: PathBuf,
    pub pages: Vec<WrittenPage>,
    /// Number of asset files copied, `None` when the site has no `assets/`.
    pub assets: Option<usize>,
}

/// Output file name for a document: `about.md` → `about.html`.
pub fn output_name(document: &str) -> String {
    Path::new(document)
        .with_extension("html")
        .to_string_lossy()
        .into_owned()
}

/// Clear the output directory, copy assets, write every finished page and
/// fire `after_save_site`.
pub fn write_site(ctx: &mut RenderContext, hooks: &Hooks) -> Result<WriteReport, GenerateError> {
    let output = ctx.site.paths.output.clone();
    let assets_dir = ctx.site.paths.assets.clone();

    if output.is_dir() {
        fs::remove_dir_all(&output)?;
    }
    fs::create_dir_all(&output)?;

    let assets = if assets_dir.is_dir() {
        let target = output.join("assets");
        fs::create_dir_all(&target)?;
        Some(copy_dir_recursive(&assets_dir, &target)?)
    } else {
        tracing::debug!(dir = %assets_dir.display(), "no assets directory");
        None
    };

    let mut pages = Vec::with_capacity(ctx.final_html.len());
    for (document, html) in &ctx.final_html {
        let path = output.join(output_name(document));
        fs::write(&path, html.trim_start())?;
        tracing::debug!(document = %document, path = %path.display(), "wrote page");
        pages.push(WrittenPage {
            document: document.clone(),
            path,
        });
    }

    hooks.fire_context(names::AFTER_SAVE_SITE, ctx)?;

    Ok(WriteReport {
        output,
        pages,
        assets,
    })
}

/// Copy `src` into the existing directory `dst` recursively, returning the
/// number of files copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::hooks::{CallbackResult, DEFAULT_PRIORITY};
    use crate::site::Site;
    use crate::types::{ContentMap, Templates};
    use tempfile::TempDir;

    fn context(base: &Path, pages: &[(&str, &str)]) -> RenderContext {
        let site = Site::new(base, SiteConfig::default());
        let mut ctx = RenderContext::new(site, Templates::new(), ContentMap::new());
        ctx.final_html = pages
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ctx
    }

    #[test]
    fn output_name_replaces_extension() {
        assert_eq!(output_name("about.md"), "about.html");
        assert_eq!(output_name("notes.markdown"), "notes.html");
        assert_eq!(output_name("README"), "README.html");
        assert_eq!(output_name("v1.2.md"), "v1.2.html");
    }

    #[test]
    fn writes_trimmed_pages() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(tmp.path(), &[("a.md", "\n\n  <html>x</html>\n")]);
        let report = write_site(&mut ctx, &Hooks::new()).unwrap();

        let written = fs::read_to_string(tmp.path().join("dist/a.html")).unwrap();
        assert_eq!(written, "<html>x</html>\n");
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.pages[0].document, "a.md");
        assert_eq!(report.pages[0].path, tmp.path().join("dist/a.html"));
    }

    #[test]
    fn stale_output_is_removed() {
        let tmp = TempDir::new().unwrap();
        let dist = tmp.path().join("dist");
        fs::create_dir_all(dist.join("old")).unwrap();
        fs::write(dist.join("stale.html"), "old").unwrap();

        let mut ctx = context(tmp.path(), &[("a.md", "new")]);
        write_site(&mut ctx, &Hooks::new()).unwrap();

        assert!(!dist.join("stale.html").exists());
        assert!(!dist.join("old").exists());
        assert!(dist.join("a.html").exists());
    }

    #[test]
    fn assets_copied_recursively() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("assets");
        fs::create_dir_all(assets.join("css")).unwrap();
        fs::write(assets.join("css/site.css"), "body{}").unwrap();
        fs::write(assets.join("logo.svg"), "<svg/>").unwrap();

        let mut ctx = context(tmp.path(), &[]);
        let report = write_site(&mut ctx, &Hooks::new()).unwrap();

        assert_eq!(report.assets, Some(2));
        assert_eq!(
            fs::read_to_string(tmp.path().join("dist/assets/css/site.css")).unwrap(),
            "body{}"
        );
        assert!(tmp.path().join("dist/assets/logo.svg").exists());
    }

    #[test]
    fn missing_assets_dir_is_fine() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(tmp.path(), &[("a.md", "x")]);
        let report = write_site(&mut ctx, &Hooks::new()).unwrap();
        assert_eq!(report.assets, None);
        assert!(!tmp.path().join("dist/assets").exists());
    }

    #[test]
    fn after_save_site_sees_written_files() {
        let tmp = TempDir::new().unwrap();
        let mut hooks = Hooks::new();
        hooks.on_context(
            names::AFTER_SAVE_SITE,
            |ctx| -> CallbackResult<()> {
                let dist = &ctx.site.paths.output;
                if !dist.join("a.html").is_file() {
                    return Err("page missing".into());
                }
                fs::write(dist.join("sitemap.txt"), "a.html")?;
                Ok(())
            },
            DEFAULT_PRIORITY,
        );

        let mut ctx = context(tmp.path(), &[("a.md", "x")]);
        write_site(&mut ctx, &hooks).unwrap();
        assert!(tmp.path().join("dist/sitemap.txt").exists());
    }

    #[test]
    fn after_save_site_error_propagates() {
        let tmp = TempDir::new().unwrap();
        let mut hooks = Hooks::new();
        hooks.on_context(
            names::AFTER_SAVE_SITE,
            |_| -> CallbackResult<()> { Err("upload failed".into()) },
            DEFAULT_PRIORITY,
        );
        let mut ctx = context(tmp.path(), &[]);
        let err = write_site(&mut ctx, &hooks).unwrap_err();
        assert!(matches!(err, GenerateError::Hook(_)));
    }
}
