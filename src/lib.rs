//! # partwork
//!
//! A small static site generator. Pages are composed from template fragments
//! ("parts"), content documents are Markdown files, and a handful of
//! `{{placeholder}}` tokens are filled in with literal text substitution.
//!
//! # Site Layout
//!
//! ```text
//! site/
//! ├── partwork.toml     # Site config (required, may be empty)
//! ├── template/         # Flat directory of fragments, referenced by file name
//! │   ├── index.html    #   base page: {{part: header.html}} … {{content}}
//! │   ├── page.html     #   single-document template: {{title}} {{content}}
//! │   └── header.html
//! ├── content/          # One page per file: about.md → dist/about.html
//! ├── assets/           # Copied to dist/assets/ as-is (optional)
//! └── dist/             # Output, rebuilt from scratch on every pass
//! ```
//!
//! # One Pass
//!
//! ```text
//! load      template/ + content/            (store, hooks: templates, load_content)
//! compose   index.html with every part      (compose)
//! render    page.html per document, spliced (render, hooks: excerpt, single_content, …)
//!           into the base page's {{content}}
//! write     dist/                           (generate, hook: after_save_site)
//! ```
//!
//! Every stage threads its value through named hooks, so extensions can
//! rewrite templates, documents and pages without touching the pipeline.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`site`] | `Generator`: configuration, extensions, and the load → render → write pass |
//! | [`config`] | `partwork.toml` and `~/.partworkrc` loading, validation, stock config text |
//! | [`hooks`] | Priority-ordered named hook registry and the typed hook tables |
//! | [`store`] | Reads `template/` and `content/` into name-keyed maps |
//! | [`content`] | Title, excerpt and body extraction for one document |
//! | [`compose`] | Recursive `{{part: name}}` inlining with a cycle guard |
//! | [`render`] | `RenderContext`, per-document slotting and site-wide placeholders |
//! | [`markdown`] | pulldown-cmark wrapper honoring the `[markdown]` options |
//! | [`extensions`] | Built-in extensions (`front_matter`, `active_menu`) and their activation |
//! | [`generate`] | Writes `dist/`: clear, copy assets, one HTML file per document |
//! | [`watch`] | Polling rebuild loop |
//! | [`types`] | Shared types (`Document`, `SitePaths`, map aliases) |
//! | [`output`] | CLI output formatting for a finished pass |
//!
//! # Substitution Order
//!
//! Placeholders are replaced by plain text search, one token at a time, in a
//! fixed order. The per-document `{{title}}` only applies inside the
//! single-document template; a `{{title}}` in the base page or its parts
//! receives the site title from `[partwork]`. A value inserted by an earlier
//! substitution is visible to later ones, so content that literally contains
//! `{{description}}` will have it replaced.

pub mod compose;
pub mod config;
pub mod content;
pub mod extensions;
pub mod generate;
pub mod hooks;
pub mod markdown;
pub mod output;
pub mod render;
pub mod site;
pub mod store;
pub mod types;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Install the global `tracing` subscriber.
///
/// `verbose` counts `-v` flags: 0 = warnings, 1 = info, 2 = debug, 3+ = trace.
/// Directives in `RUST_LOG` are applied as well.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
