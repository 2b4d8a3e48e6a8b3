//! Built-in extensions and their activation from the plugin registry.
//!
//! An extension is a named bundle of hook registrations. The `[plugins]`
//! tables of `~/.partworkrc` and `partwork.toml` name the ones to activate:
//!
//! ```toml
//! [plugins]
//! front_matter = "builtin"
//! active_menu = "builtin"
//! ```
//!
//! Names not in [`catalog`] are skipped with a warning. Only compiled-in
//! extensions exist; the source value is recorded in the log but not fetched.

use crate::config::RenderConfig;
use crate::content::parse_document;
use crate::hooks::{CallbackResult, ContentCallback, DEFAULT_PRIORITY, Hooks, PageCallback, names};
use crate::types::{ContentMap, Document};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

pub trait Extension {
    /// Registry key that activates this extension.
    fn name(&self) -> &'static str;

    /// Add this extension's callbacks to `hooks`.
    fn register(&self, hooks: &mut Hooks);
}

/// Every extension this build knows about.
pub fn catalog() -> Vec<Box<dyn Extension>> {
    vec![Box::new(FrontMatter), Box::new(ActiveMenu)]
}

/// Register every known extension named in `registry`, in name order.
///
/// Returns the names that were activated.
pub fn activate(registry: &BTreeMap<String, String>, hooks: &mut Hooks) -> Vec<&'static str> {
    let catalog = catalog();
    let mut active = Vec::new();
    for (name, source) in registry {
        match catalog.iter().find(|extension| extension.name() == name) {
            Some(extension) => {
                extension.register(hooks);
                info!(plugin = %name, "using plugin");
                debug!(plugin = %name, source = %source, "plugin source");
                active.push(extension.name());
            }
            None => warn!(plugin = %name, source = %source, "plugin not available, skipped"),
        }
    }
    active
}

// ============================================================================
// front_matter
// ============================================================================

/// Reads a `+++`-fenced TOML block at the top of a document, either as the
/// very first thing in the file or directly under its first heading line:
///
/// ```text
/// # Title
/// +++
/// template = "post.html"
/// skip_markdown = true
/// +++
/// Body starts here.
/// ```
///
/// Title, excerpt and body are derived again from the text without the block,
/// so TOML comments and blank lines inside it never leak into them.
pub struct FrontMatter;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FrontMatterFields {
    template: Option<String>,
    skip_markdown: bool,
}

const FENCE: &str = "+++";

/// Split `text` into its leading front matter block and the rest.
///
/// Blank lines before the opening fence are allowed. `None` when the text
/// does not open with a fence or the block is never closed.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let rest = text.trim_start().strip_prefix(FENCE)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// The front matter block of `source` and the source text without it.
fn strip_front_matter(source: &str) -> Option<(&str, String)> {
    if let Some((block, rest)) = split_front_matter(source) {
        return Some((block, rest.to_string()));
    }
    let heading_end = source.find('\n')? + 1;
    let heading = &source[..heading_end];
    if !heading.starts_with('#') {
        return None;
    }
    let (block, rest) = split_front_matter(&source[heading_end..])?;
    Some((block, format!("{heading}{rest}")))
}

fn apply_front_matter(id: &str, doc: &mut Document) -> CallbackResult<()> {
    let Some((block, remaining)) = strip_front_matter(&doc.source) else {
        return Ok(());
    };
    let fields: FrontMatterFields =
        toml::from_str(block).map_err(|e| format!("front matter of {id}: {e}"))?;

    let mut parsed = parse_document(&remaining);
    parsed.template_override = fields.template.or_else(|| doc.template_override.take());
    parsed.skip_markdown = doc.skip_markdown || fields.skip_markdown;
    *doc = parsed;
    Ok(())
}

impl Extension for FrontMatter {
    fn name(&self) -> &'static str {
        "front_matter"
    }

    fn register(&self, hooks: &mut Hooks) {
        hooks.on_load_content(
            ContentCallback::value(|mut content: ContentMap| {
                for (id, doc) in content.iter_mut() {
                    apply_front_matter(id, doc)?;
                }
                Ok(content)
            }),
            0,
        );
    }
}

// ============================================================================
// active_menu
// ============================================================================

/// Replaces `{{menu_active: NAME}}` with `active` on the page whose document
/// is `NAME` (file name or stem) and with nothing elsewhere.
pub struct ActiveMenu;

fn mark_active_menu(page: &str, document: &str, syntax: &RenderConfig) -> String {
    let prefix = format!("{}menu_active: ", syntax.open_delimiter);
    let close = syntax.close_delimiter.as_str();
    let stem = Path::new(document).file_stem().and_then(|s| s.to_str());

    let mut out = String::with_capacity(page.len());
    let mut rest = page;
    while let Some(start) = rest.find(&prefix) {
        let after = &rest[start + prefix.len()..];
        let Some(end) = after.find(close) else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = after[..end].trim();
        if name == document || Some(name) == stem {
            out.push_str("active");
        }
        rest = &after[end + close.len()..];
    }
    out.push_str(rest);
    out
}

impl Extension for ActiveMenu {
    fn name(&self) -> &'static str {
        "active_menu"
    }

    fn register(&self, hooks: &mut Hooks) {
        hooks.on_page(
            names::PRE_LOAD_CUSTOM_FUNCTIONS,
            PageCallback::context(|page, document, ctx| {
                Ok(mark_active_menu(&page, document, ctx.syntax()))
            }),
            DEFAULT_PRIORITY,
        );
    }
}
