//! Site configuration module.
//!
//! Two files feed the generator:
//!
//! ```text
//! <site>/partwork.toml     # Site config (required)
//! ~/.partworkrc            # User-global config (optional, plugin registry only)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [partwork]
//! title = "My Site"             # {{title}} outside the page slot
//! keywords = "notes, rust"      # {{keywords}}
//! description = "A small site"  # {{description}}
//!
//! [render]
//! base_template = "index.html"  # Page skeleton every document is slotted into
//! page_template = "page.html"   # Default single-document template
//! open_delimiter = "{{"
//! close_delimiter = "}}"
//!
//! [markdown]
//! tables = true
//! strikethrough = false
//! footnotes = false
//! tasklists = false
//! smart_punctuation = false
//!
//! [plugins]
//! front_matter = "builtin"      # name = source
//! ```
//!
//! Every key is optional; the site file only has to exist. Unknown keys are
//! rejected to catch typos early. `[plugins]` entries from `~/.partworkrc`
//! and from the site file are merged, the site file winning on a name clash.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the site config file inside the base directory.
pub const CONFIG_FILE: &str = "partwork.toml";

/// Location of the user-global config, before tilde expansion.
pub const RC_FILE: &str = "~/.partworkrc";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("No partwork.toml found in {}", .0.display())]
    Missing(PathBuf),
}

/// Site configuration loaded from `partwork.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide metadata substituted into every page.
    pub partwork: SiteMeta,
    /// Template names and placeholder delimiters.
    pub render: RenderConfig,
    /// Markdown extensions.
    pub markdown: MarkdownConfig,
    /// Plugin registry: extension name → source.
    pub plugins: BTreeMap<String, String>,
}

impl SiteConfig {
    /// Validate config values are usable by the renderer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        if render.open_delimiter.is_empty() || render.close_delimiter.is_empty() {
            return Err(ConfigError::Validation(
                "render delimiters must not be empty".into(),
            ));
        }
        if render.open_delimiter == render.close_delimiter {
            return Err(ConfigError::Validation(
                "render.open_delimiter and render.close_delimiter must differ".into(),
            ));
        }
        if render.base_template.is_empty() || render.page_template.is_empty() {
            return Err(ConfigError::Validation(
                "render.base_template and render.page_template must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// The `[partwork]` section: the three values the site-wide functions read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub keywords: String,
    pub description: String,
}

/// The `[render]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Template every document page is built from.
    pub base_template: String,
    /// Single-document template used when a document has no override.
    pub page_template: String,
    pub open_delimiter: String,
    pub close_delimiter: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_template: "index.html".to_string(),
            page_template: "page.html".to_string(),
            open_delimiter: "{{".to_string(),
            close_delimiter: "}}".to_string(),
        }
    }
}

impl RenderConfig {
    /// Wrap a placeholder name in the configured delimiters: `title` → `{{title}}`.
    pub fn token(&self, name: &str) -> String {
        format!("{}{}{}", self.open_delimiter, name, self.close_delimiter)
    }
}

/// The `[markdown]` section. Fenced code blocks are always enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: false,
            footnotes: false,
            tasklists: false,
            smart_punctuation: false,
        }
    }
}

/// User-global configuration from `~/.partworkrc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    /// Plugin registry: extension name → source.
    pub plugins: BTreeMap<String, String>,
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse site config text and validate it. Missing keys take their defaults.
pub fn parse_config(text: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load `partwork.toml` from the site's base directory.
///
/// A missing file is [`ConfigError::Missing`]: a directory without one is
/// not a site.
pub fn load_config(base: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = base.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Err(ConfigError::Missing(base.to_path_buf()));
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Expanded path of the user-global config file.
pub fn rc_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(RC_FILE).into_owned())
}

/// Load the user-global config. A missing file yields the empty default.
pub fn load_user_config(path: &Path) -> Result<UserConfig, ConfigError> {
    if !path.is_file() {
        return Ok(UserConfig::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Combined plugin registry: user entries first, site entries override.
pub fn plugin_registry(site: &SiteConfig, user: &UserConfig) -> BTreeMap<String, String> {
    let mut registry = user.plugins.clone();
    registry.extend(site.plugins.iter().map(|(k, v)| (k.clone(), v.clone())));
    registry
}

/// Returns a fully-commented stock `partwork.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# partwork site configuration
# ============================
# This file marks a directory as a site. All settings are optional;
# values shown below are the defaults. Unknown keys are an error.

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[partwork]
# Fills {{title}} everywhere outside the single-document slot
# (headers, footers, <title> in the base template).
title = ""
# Fills {{keywords}}.
keywords = ""
# Fills {{description}}.
description = ""

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Template every page is built from. Its {{content}} receives the
# single-document template of each content file.
base_template = "index.html"
# Single-document template for content files without a `template` override.
page_template = "page.html"
# Placeholder delimiters. {{part: header.html}} inlines template/header.html.
open_delimiter = "{{"
close_delimiter = "}}"

# ---------------------------------------------------------------------------
# Markdown (fenced code blocks are always on)
# ---------------------------------------------------------------------------
[markdown]
tables = true
strikethrough = false
footnotes = false
tasklists = false
smart_punctuation = false

# ---------------------------------------------------------------------------
# Plugins: name = source. Merged on top of [plugins] in ~/.partworkrc.
# Built-in: front_matter, active_menu
# ---------------------------------------------------------------------------
[plugins]
"##
}
