//! Shared test utilities for the partwork test suite.
//!
//! Two ways to get a site on disk:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! // The demo site under fixtures/site, copied to a temp dir.
//! let tmp = setup_fixtures();
//!
//! // A minimal site assembled in code.
//! let site = SiteBuilder::new()
//!     .title("Site")
//!     .template("index.html", "{{content}}")
//!     .template("page.html", "<h1>{{title}}</h1>")
//!     .content("a.md", "# A\nbody");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::{CONFIG_FILE, SiteConfig};
use crate::generate::copy_dir_recursive;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

/// Read `dist/<name>` under `base`, panicking with the path when absent.
pub fn read_output(base: &Path, name: &str) -> String {
    let path = base.join("dist").join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

// =========================================================================
// Site builder
// =========================================================================

/// A throwaway site with `content/` and `template/` directories.
///
/// Every call writes through to disk immediately, `partwork.toml` included.
pub struct SiteBuilder {
    dir: TempDir,
    config: SiteConfig,
}

impl SiteBuilder {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("content")).unwrap();
        fs::create_dir(dir.path().join("template")).unwrap();
        let builder = Self {
            dir,
            config: SiteConfig::default(),
        };
        builder.write_config();
        builder
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> SiteConfig {
        self.config.clone()
    }

    fn write_config(&self) {
        let text = toml::to_string(&self.config).unwrap();
        fs::write(self.path().join(CONFIG_FILE), text).unwrap();
    }

    pub fn title(mut self, title: &str) -> Self {
        self.config.partwork.title = title.to_string();
        self.write_config();
        self
    }

    pub fn plugin(mut self, name: &str, source: &str) -> Self {
        self.config
            .plugins
            .insert(name.to_string(), source.to_string());
        self.write_config();
        self
    }

    pub fn template(self, name: &str, text: &str) -> Self {
        fs::write(self.path().join("template").join(name), text).unwrap();
        self
    }

    pub fn content(self, name: &str, text: &str) -> Self {
        fs::write(self.path().join("content").join(name), text).unwrap();
        self
    }

    /// Write `assets/<rel>`, creating parent directories.
    pub fn asset(self, rel: &str, text: &str) -> Self {
        let path = self.path().join("assets").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
        self
    }
}
