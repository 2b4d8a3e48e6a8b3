//! Placeholder rendering: one pass over every loaded document.
//!
//! A pass runs in two loops so that `pre_render_content` sees every
//! document's converted body and composed base page before any page is
//! assembled:
//!
//! ```text
//! loop 1, per document            loop 2, per document
//! ────────────────────            ─────────────────────────────────────────
//! body ─► HTML                    page.html: {{title}} {{content}}
//!   (content_rendered)                  ─► excerpt hook ─► {{excerpt}}
//! index.html composed                   ─► single_content hook
//!   (prerendered_html)            index.html {{content}} ◄─ splice
//!                                       ─► pre_load_custom_functions hook
//!          pre_render_content           ─► site functions (final_html)
//!                                               after_render_content
//! ```
//!
//! Every substitution is a literal replace-all of one token. Substitutions
//! run as independent passes in a fixed order, so a value inserted early can
//! still be matched by a later token.
//!
//! The per-document `{{title}}` only reaches the single-document template.
//! Any `{{title}}` left in the composed base page (header, footer, `<title>`)
//! is filled by the site title when the site functions run.

use crate::compose::{ComposeError, Composer};
use crate::config::{RenderConfig, SiteMeta};
use crate::hooks::{HookError, Hooks, names};
use crate::markdown;
use crate::site::Site;
use crate::types::{ContentMap, Document, Rendered, Templates};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Hook(#[from] HookError),
    #[error("single-document template not found: {0}")]
    TemplateNotFound(String),
}

/// State of one render pass. A fresh context is built for every pass.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub site: Site,
    pub templates: Templates,
    pub content: ContentMap,
    /// Converted body of each document.
    pub content_rendered: Rendered,
    /// Composed base page of each document, later with its content slot filled.
    pub prerendered_html: Rendered,
    /// Finished page of each document, ready to be written.
    pub final_html: Rendered,
    /// Unix seconds at the start of the pass.
    pub timestamp: u64,
}

impl RenderContext {
    pub fn new(site: Site, templates: Templates, content: ContentMap) -> Self {
        Self {
            site,
            templates,
            content,
            content_rendered: Rendered::new(),
            prerendered_html: Rendered::new(),
            final_html: Rendered::new(),
            timestamp: unix_now(),
        }
    }

    /// Delimiters and template names of the pass.
    pub fn syntax(&self) -> &RenderConfig {
        &self.site.config.render
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let site = Site::new(std::path::Path::new("site"), crate::config::SiteConfig::default());
        let mut ctx = Self::new(site, Templates::new(), ContentMap::new());
        ctx.timestamp = 0;
        ctx
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Site-wide placeholder values, applied to every finished page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFunctions {
    pub timestamp: u64,
    pub title: String,
    pub keywords: String,
    pub description: String,
}

impl SiteFunctions {
    pub fn new(timestamp: u64, meta: &SiteMeta) -> Self {
        Self {
            timestamp,
            title: meta.title.clone(),
            keywords: meta.keywords.clone(),
            description: meta.description.clone(),
        }
    }

    /// Replace `{{timestamp}}`, `{{title}}`, `{{keywords}}` and `{{description}}`, in that order.
    pub fn apply(&self, html: &str, syntax: &RenderConfig) -> String {
        html.replace(&syntax.token("timestamp"), &self.timestamp.to_string())
            .replace(&syntax.token("title"), &self.title)
            .replace(&syntax.token("keywords"), &self.keywords)
            .replace(&syntax.token("description"), &self.description)
    }
}

/// Body HTML for one document.
fn convert_body(doc: &Document, site: &Site) -> String {
    if doc.skip_markdown {
        doc.body.clone()
    } else {
        markdown::to_html(&doc.body, &site.config.markdown)
    }
}

/// Render every document in `ctx`, filling `content_rendered`,
/// `prerendered_html` and `final_html`.
pub fn render_site(ctx: &mut RenderContext, hooks: &Hooks) -> Result<(), RenderError> {
    let base_template = ctx.syntax().base_template.clone();
    for (id, doc) in &ctx.content {
        info!(document = %id, "rendering document");
        let body = convert_body(doc, &ctx.site);
        let page = Composer::new(&ctx.templates, &ctx.site.config.render).resolve(&base_template)?;
        ctx.content_rendered.insert(id.clone(), body);
        ctx.prerendered_html.insert(id.clone(), page);
    }

    hooks.fire_context(names::PRE_RENDER_CONTENT, ctx)?;

    let functions = SiteFunctions::new(ctx.timestamp, &ctx.site.config.partwork);
    let ids: Vec<String> = ctx.prerendered_html.keys().cloned().collect();
    for id in &ids {
        let Some(page) = assemble_page(ctx, hooks, id)? else {
            warn!(document = %id, "page has no matching document, skipped");
            continue;
        };
        let finished = functions.apply(&page, ctx.syntax());
        ctx.prerendered_html.insert(id.clone(), page);
        ctx.final_html.insert(id.clone(), finished);
    }

    hooks.fire_context(names::AFTER_RENDER_CONTENT, ctx)?;
    Ok(())
}

/// Slot one document into its base page and run the per-document hooks.
///
/// Returns `None` when a `pre_render_content` hook dropped the document.
fn assemble_page(
    ctx: &RenderContext,
    hooks: &Hooks,
    id: &str,
) -> Result<Option<String>, RenderError> {
    let (Some(doc), Some(base)) = (ctx.content.get(id), ctx.prerendered_html.get(id)) else {
        return Ok(None);
    };
    let syntax = ctx.syntax();

    let template_name = doc
        .template_override
        .as_deref()
        .unwrap_or(&syntax.page_template);
    let template = ctx
        .templates
        .get(template_name)
        .ok_or_else(|| RenderError::TemplateNotFound(template_name.to_string()))?;

    let body = ctx.content_rendered.get(id).map(String::as_str).unwrap_or_default();
    let single = template
        .replace(&syntax.token("title"), &doc.title)
        .replace(&syntax.token("content"), body);

    let excerpt = hooks.filter_page(names::EXCERPT, doc.excerpt.clone(), id, ctx)?;
    let single = single.replace(&syntax.token("excerpt"), &excerpt);
    let single = hooks.filter_page(names::SINGLE_CONTENT, single, id, ctx)?;

    let page = base.replace(&syntax.token("content"), &single);
    let page = hooks.filter_page(names::PRE_LOAD_CUSTOM_FUNCTIONS, page, id, ctx)?;
    Ok(Some(page))
}
