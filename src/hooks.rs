//! Priority-ordered, named hook dispatch.
//!
//! Every stage of a render pass threads its intermediate value through a named
//! hook so extensions can rewrite it. A [`HookRegistry`] stores callbacks in
//! priority buckets:
//!
//! ```text
//! priority 5  → [("excerpt", cb_a)]
//! priority 10 → [("excerpt", cb_b), ("single_content", cb_c), ("excerpt", cb_d)]
//! priority 20 → [("excerpt", cb_e)]
//! ```
//!
//! `apply("excerpt", v)` runs `cb_a`, `cb_b`, `cb_d`, `cb_e` in that order:
//! ascending priority, registration order within a bucket. Names are not
//! unique; any number of extensions may register the same one.
//!
//! ## Callback shapes
//!
//! Each hook has a fixed value type, so [`Hooks`] keeps one typed registry per
//! shape. Callbacks that may or may not want the extra arguments are enums
//! tagged at registration time ([`ContentCallback`], [`PageCallback`]): a
//! value-only callback simply never sees the document id or the context.
//!
//! ## Failures
//!
//! A callback error is wrapped in [`HookError::Callback`] with the hook name
//! and aborts the pass. Nothing isolates one extension from another.

use crate::render::RenderContext;
use crate::site::Site;
use crate::types::{ContentMap, Templates};
use std::collections::BTreeMap;
use thiserror::Error;

/// Priority used when a caller has no ordering preference.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Error type callbacks return.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

pub type CallbackResult<T> = Result<T, CallbackError>;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("hook `{hook}` failed: {source}")]
    Callback {
        hook: String,
        #[source]
        source: CallbackError,
    },
}

/// Hook names fired by the generator, in firing order.
pub mod names {
    pub const PLUGINS_LOADED: &str = "plugins_loaded";
    pub const TEMPLATES: &str = "templates";
    pub const LOAD_CONTENT: &str = "load_content";
    pub const PRE_RENDER_CONTENT: &str = "pre_render_content";
    pub const EXCERPT: &str = "excerpt";
    pub const SINGLE_CONTENT: &str = "single_content";
    pub const PRE_LOAD_CUSTOM_FUNCTIONS: &str = "pre_load_custom_functions";
    pub const AFTER_RENDER_CONTENT: &str = "after_render_content";
    pub const AFTER_SAVE_SITE: &str = "after_save_site";
}

struct Registration<C> {
    name: String,
    callback: C,
}

/// Named callbacks of one shape, bucketed by priority.
pub struct HookRegistry<C> {
    buckets: BTreeMap<i32, Vec<Registration<C>>>,
}

impl<C> Default for HookRegistry<C> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }
}

impl<C> HookRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callback` to the bucket for `priority`.
    pub fn register(&mut self, name: impl Into<String>, callback: C, priority: i32) {
        self.buckets.entry(priority).or_default().push(Registration {
            name: name.into(),
            callback,
        });
    }

    /// Callbacks registered under `name`, in execution order.
    pub fn matching<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a C> + 'a {
        self.buckets
            .values()
            .flatten()
            .filter(move |registration| registration.name == name)
            .map(|registration| &registration.callback)
    }

    /// Total number of registrations across all names.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Thread `initial` through every callback registered under `name`.
    ///
    /// `invoke` adapts a stored callback to the running value (and whatever
    /// extra arguments the caller has in scope). Returns `initial` unchanged
    /// when nothing matches.
    pub fn apply<V>(
        &self,
        name: &str,
        initial: V,
        mut invoke: impl FnMut(&C, V) -> CallbackResult<V>,
    ) -> Result<V, HookError> {
        let mut value = initial;
        for callback in self.matching(name) {
            value = invoke(callback, value).map_err(|source| HookError::Callback {
                hook: name.to_string(),
                source,
            })?;
        }
        Ok(value)
    }

    /// Run every callback registered under `name` for its side effects.
    pub fn exec(
        &self,
        name: &str,
        mut invoke: impl FnMut(&C) -> CallbackResult<()>,
    ) -> Result<(), HookError> {
        for callback in self.matching(name) {
            invoke(callback).map_err(|source| HookError::Callback {
                hook: name.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

// ============================================================================
// Typed callback shapes
// ============================================================================

/// `plugins_loaded`: adjust the persistent site settings once, after extensions register.
pub type SiteCallback = Box<dyn Fn(&mut Site) -> CallbackResult<()>>;

/// `templates`: replace or edit the whole template mapping.
pub type TemplatesCallback = Box<dyn Fn(Templates) -> CallbackResult<Templates>>;

/// Whole-context hooks (`pre_render_content`, `after_render_content`, `after_save_site`).
pub type ContextCallback = Box<dyn Fn(&mut RenderContext) -> CallbackResult<()>>;

/// `load_content`: edit the whole content mapping.
pub enum ContentCallback {
    Value(Box<dyn Fn(ContentMap) -> CallbackResult<ContentMap>>),
    WithSite(Box<dyn Fn(ContentMap, &Site) -> CallbackResult<ContentMap>>),
}

impl ContentCallback {
    pub fn value(f: impl Fn(ContentMap) -> CallbackResult<ContentMap> + 'static) -> Self {
        Self::Value(Box::new(f))
    }

    pub fn with_site(
        f: impl Fn(ContentMap, &Site) -> CallbackResult<ContentMap> + 'static,
    ) -> Self {
        Self::WithSite(Box::new(f))
    }

    fn call(&self, content: ContentMap, site: &Site) -> CallbackResult<ContentMap> {
        match self {
            Self::Value(f) => f(content),
            Self::WithSite(f) => f(content, site),
        }
    }
}

/// Per-document string hooks (`excerpt`, `single_content`, `pre_load_custom_functions`).
pub enum PageCallback {
    /// Sees only the running value.
    Value(Box<dyn Fn(String) -> CallbackResult<String>>),
    /// Also sees the document id (its source file name).
    Document(Box<dyn Fn(String, &str) -> CallbackResult<String>>),
    /// Also sees the document id and the whole render context.
    Context(Box<dyn Fn(String, &str, &RenderContext) -> CallbackResult<String>>),
}

impl PageCallback {
    pub fn value(f: impl Fn(String) -> CallbackResult<String> + 'static) -> Self {
        Self::Value(Box::new(f))
    }

    pub fn document(f: impl Fn(String, &str) -> CallbackResult<String> + 'static) -> Self {
        Self::Document(Box::new(f))
    }

    pub fn context(
        f: impl Fn(String, &str, &RenderContext) -> CallbackResult<String> + 'static,
    ) -> Self {
        Self::Context(Box::new(f))
    }

    fn call(&self, value: String, document: &str, ctx: &RenderContext) -> CallbackResult<String> {
        match self {
            Self::Value(f) => f(value),
            Self::Document(f) => f(value, document),
            Self::Context(f) => f(value, document, ctx),
        }
    }
}

/// All hook tables the generator fires.
#[derive(Default)]
pub struct Hooks {
    pub site: HookRegistry<SiteCallback>,
    pub templates: HookRegistry<TemplatesCallback>,
    pub content: HookRegistry<ContentCallback>,
    pub context: HookRegistry<ContextCallback>,
    pub page: HookRegistry<PageCallback>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_plugins_loaded(
        &mut self,
        f: impl Fn(&mut Site) -> CallbackResult<()> + 'static,
        priority: i32,
    ) {
        self.site
            .register(names::PLUGINS_LOADED, Box::new(f), priority);
    }

    pub fn on_templates(
        &mut self,
        f: impl Fn(Templates) -> CallbackResult<Templates> + 'static,
        priority: i32,
    ) {
        self.templates
            .register(names::TEMPLATES, Box::new(f), priority);
    }

    pub fn on_load_content(&mut self, callback: ContentCallback, priority: i32) {
        self.content
            .register(names::LOAD_CONTENT, callback, priority);
    }

    /// Register a whole-context callback under `name`.
    pub fn on_context(
        &mut self,
        name: &str,
        f: impl Fn(&mut RenderContext) -> CallbackResult<()> + 'static,
        priority: i32,
    ) {
        self.context.register(name, Box::new(f), priority);
    }

    /// Register a per-document callback under `name`.
    pub fn on_page(&mut self, name: &str, callback: PageCallback, priority: i32) {
        self.page.register(name, callback, priority);
    }

    pub fn fire_plugins_loaded(&self, site: &mut Site) -> Result<(), HookError> {
        self.site
            .exec(names::PLUGINS_LOADED, |callback| callback(&mut *site))
    }

    pub fn filter_templates(&self, templates: Templates) -> Result<Templates, HookError> {
        self.templates
            .apply(names::TEMPLATES, templates, |callback, value| callback(value))
    }

    pub fn filter_content(&self, content: ContentMap, site: &Site) -> Result<ContentMap, HookError> {
        self.content.apply(names::LOAD_CONTENT, content, |callback, value| {
            callback.call(value, site)
        })
    }

    pub fn fire_context(&self, name: &str, ctx: &mut RenderContext) -> Result<(), HookError> {
        self.context.exec(name, |callback| callback(&mut *ctx))
    }

    pub fn filter_page(
        &self,
        name: &str,
        value: String,
        document: &str,
        ctx: &RenderContext,
    ) -> Result<String, HookError> {
        self.page.apply(name, value, |callback, value| {
            callback.call(value, document, ctx)
        })
    }
}
