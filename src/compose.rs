//! Template composition: recursive `{{part: name}}` inlining.
//!
//! A template line containing `{{part: header.html}}` pulls in the
//! `header.html` template, itself fully composed first:
//!
//! ```text
//! index.html                 header.html             nav.html
//! <html>                     <header>                <nav>…</nav>
//!   {{part: header.html}}  →   {{part: nav.html}}  →
//!   {{content}}              </header>
//! </html>
//! ```
//!
//! Markers are detected line by line in the template's own text, but each
//! detected marker is replaced everywhere in the accumulated output, so a
//! part referenced twice is inlined at both places.
//!
//! Resolution tracks the chain of templates currently being composed. A name
//! that reappears on that chain is a cycle and fails instead of recursing
//! forever; a part included by two siblings is not a cycle.

use crate::config::RenderConfig;
use crate::types::Templates;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ComposeError {
    #[error("template not found: {0}")]
    NotFound(String),
    #[error("template includes itself: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

/// Flattens templates from one loaded mapping.
pub struct Composer<'a> {
    templates: &'a Templates,
    syntax: &'a RenderConfig,
}

impl<'a> Composer<'a> {
    pub fn new(templates: &'a Templates, syntax: &'a RenderConfig) -> Self {
        Self { templates, syntax }
    }

    /// The composed text of `name` with every part marker resolved.
    pub fn resolve(&self, name: &str) -> Result<String, ComposeError> {
        let mut active = Vec::new();
        self.resolve_on_path(name, &mut active)
    }

    fn resolve_on_path(&self, name: &str, active: &mut Vec<String>) -> Result<String, ComposeError> {
        if active.iter().any(|entry| entry == name) {
            let mut chain = active.clone();
            chain.push(name.to_string());
            return Err(ComposeError::Cycle(chain));
        }

        let raw = self
            .templates
            .get(name)
            .ok_or_else(|| ComposeError::NotFound(name.to_string()))?;

        active.push(name.to_string());
        let mut html = raw.clone();
        for line in raw.lines() {
            for part in self.part_names(line) {
                let nested = self.resolve_on_path(part, active)?;
                html = html.replace(&self.part_marker(part), &nested);
                tracing::debug!(template = name, part, "inlined part");
            }
        }
        active.pop();

        Ok(html)
    }

    /// `{{part: ` with the configured open delimiter.
    fn part_prefix(&self) -> String {
        format!("{}part: ", self.syntax.open_delimiter)
    }

    fn part_marker(&self, part: &str) -> String {
        self.syntax.token(&format!("part: {part}"))
    }

    /// Names referenced by the complete part markers on one line.
    fn part_names<'l>(&self, line: &'l str) -> Vec<&'l str> {
        let prefix = self.part_prefix();
        let close = self.syntax.close_delimiter.as_str();
        let mut names = Vec::new();
        let mut rest = line;
        while let Some(start) = rest.find(&prefix) {
            let after = &rest[start + prefix.len()..];
            let Some(end) = after.find(close) else {
                break;
            };
            names.push(&after[..end]);
            rest = &after[end + close.len()..];
        }
        names
    }
}
