#![deny(missing_docs)]

//! # Templates
//!
//! Template formats, template resource resolution and the template engine binding.
//!
//! - **resolver**: finds the source of a named template (user overrides, then built-ins).
//! - **engine**: compiles and renders templates with `tera`.
//! - **filters**: custom filters available to every template.

use crate::error::{RestDocsError, RestDocsResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

pub mod engine;
pub mod filters;
pub mod resolver;

pub use engine::TeraTemplateEngine;
pub use resolver::{StandardTemplateResourceResolver, TemplateResource, TemplateResourceResolver};

/// The model a template is rendered against.
pub type Model = serde_json::Map<String, serde_json::Value>;

/// The markup a snippet is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateFormat {
    /// Asciidoctor; files end in `.adoc`.
    #[default]
    Asciidoctor,
    /// Markdown; files end in `.md`.
    Markdown,
}

impl TemplateFormat {
    /// Identifier used in template lookup paths.
    pub fn id(&self) -> &'static str {
        match self {
            TemplateFormat::Asciidoctor => "asciidoctor",
            TemplateFormat::Markdown => "markdown",
        }
    }

    /// Extension of the files written in this format.
    pub fn file_extension(&self) -> &'static str {
        match self {
            TemplateFormat::Asciidoctor => "adoc",
            TemplateFormat::Markdown => "md",
        }
    }

    /// Escapes content placed in a table cell.
    ///
    /// Asciidoctor tables delimit cells with `|`, so every `|` not already preceded by a
    /// backslash gets one. Markdown content is returned unchanged.
    pub fn escape_table_cell(&self, content: &str) -> String {
        match self {
            TemplateFormat::Asciidoctor => escape_pipes(content),
            TemplateFormat::Markdown => content.to_string(),
        }
    }
}

fn escape_pipes(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len() + 4);
    let mut previous = None;
    for c in content.chars() {
        if c == '|' && previous != Some('\\') {
            escaped.push('\\');
        }
        escaped.push(c);
        previous = Some(c);
    }
    escaped
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TemplateFormat {
    type Err = RestDocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asciidoctor" | "adoc" => Ok(TemplateFormat::Asciidoctor),
            "markdown" | "md" => Ok(TemplateFormat::Markdown),
            other => Err(RestDocsError::Configuration(format!(
                "Unknown template format '{}'",
                other
            ))),
        }
    }
}

/// A compiled template.
pub trait Template: Debug {
    /// Renders the template against `model`.
    fn render(&self, model: &Model) -> RestDocsResult<String>;
}

/// Compiles named templates.
pub trait TemplateEngine: Send + Sync + Debug {
    /// Compiles the template called `name`.
    ///
    /// Fails with [`RestDocsError::TemplateNotFound`] when no source exists for `name`.
    fn compile_template(&self, name: &str) -> RestDocsResult<Box<dyn Template>>;
}
