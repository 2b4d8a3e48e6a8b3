//! Site orchestration: one [`Generator`] per base directory.
//!
//! ```text
//! Generator::new       load partwork.toml + ~/.partworkrc
//!                      activate extensions, fire plugins_loaded
//! Generator::run_pass  load   template/ ─► templates hook
//!                             content/  ─► load_content hook
//!                      render (compose, substitute, page hooks)
//!                      write  dist/     ─► after_save_site hook
//! ```
//!
//! The generator owns the hook tables and the persistent [`Site`]; every pass
//! builds a fresh [`RenderContext`] from them, so a pass never sees state left
//! behind by the previous one.

use crate::config::{self, ConfigError, SiteConfig, UserConfig};
use crate::extensions;
use crate::generate::{self, GenerateError, WriteReport};
use crate::hooks::{HookError, Hooks};
use crate::render::{self, RenderContext, RenderError};
use crate::store::{self, LoadError};
use crate::types::SitePaths;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Write error: {0}")]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Settings that outlive a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub paths: SitePaths,
    pub config: SiteConfig,
}

impl Site {
    pub fn new(base: &Path, config: SiteConfig) -> Self {
        Self {
            paths: SitePaths::new(base),
            config,
        }
    }
}

pub struct Generator {
    site: Site,
    hooks: Hooks,
    extensions: Vec<&'static str>,
}

impl Generator {
    /// Read the site and user configuration under `base` and initialize
    /// extensions.
    ///
    /// Fails with [`ConfigError::Missing`] when `base` has no `partwork.toml`.
    pub fn new(base: &Path) -> Result<Self, SiteError> {
        let site_config = config::load_config(base)?;
        let user_config = config::load_user_config(&config::rc_path())?;
        Self::with_config(base, site_config, &user_config, Hooks::new())
    }

    /// Build a generator from already-loaded configuration.
    ///
    /// `hooks` may carry callbacks registered by the caller; extensions named
    /// in the plugin registry are added after them, then `plugins_loaded`
    /// fires once.
    pub fn with_config(
        base: &Path,
        site_config: SiteConfig,
        user_config: &UserConfig,
        mut hooks: Hooks,
    ) -> Result<Self, SiteError> {
        let registry = config::plugin_registry(&site_config, user_config);
        let extensions = extensions::activate(&registry, &mut hooks);

        let mut site = Site::new(base, site_config);
        hooks.fire_plugins_loaded(&mut site)?;
        site.config.validate()?;

        Ok(Self {
            site,
            hooks,
            extensions,
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Names of the extensions that registered hooks.
    pub fn extensions(&self) -> &[&'static str] {
        &self.extensions
    }

    /// Register further callbacks. `plugins_loaded` has already fired.
    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// Read templates and content into a fresh context, running the
    /// `templates` and `load_content` hooks.
    pub fn load(&self) -> Result<RenderContext, SiteError> {
        let templates = store::load_templates(&self.site.paths.templates)?;
        let templates = self.hooks.filter_templates(templates)?;

        let content = store::load_content(&self.site.paths.content)?;
        let content = self.hooks.filter_content(content, &self.site)?;

        Ok(RenderContext::new(self.site.clone(), templates, content))
    }

    /// Load, render and write the whole site once.
    pub fn run_pass(&self) -> Result<WriteReport, SiteError> {
        let mut ctx = self.load()?;
        render::render_site(&mut ctx, &self.hooks)?;
        let report = generate::write_site(&mut ctx, &self.hooks)?;
        Ok(report)
    }
}
