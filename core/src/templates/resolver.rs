#![deny(missing_docs)]

//! # Template Resource Resolution
//!
//! Locates the source of a named template. User overrides live in a templates directory:
//!
//! 1. `<dir>/<format-id>/<name>.snippet`
//! 2. `<dir>/<name>.snippet`
//!
//! When neither exists the built-in `<format-id>/default-<name>.snippet` compiled into the
//! crate is used.

use super::TemplateFormat;
use crate::error::{RestDocsError, RestDocsResult};
use std::fmt::Debug;
use std::path::PathBuf;

const ASCIIDOCTOR_DEFAULTS: &[(&str, &str)] = &[
    ("curl-request", include_str!("../../templates/asciidoctor/default-curl-request.snippet")),
    ("httpie-request", include_str!("../../templates/asciidoctor/default-httpie-request.snippet")),
    ("http-request", include_str!("../../templates/asciidoctor/default-http-request.snippet")),
    ("http-response", include_str!("../../templates/asciidoctor/default-http-response.snippet")),
    ("request-body", include_str!("../../templates/asciidoctor/default-request-body.snippet")),
    ("response-body", include_str!("../../templates/asciidoctor/default-response-body.snippet")),
    (
        "request-headers",
        include_str!("../../templates/asciidoctor/default-request-headers.snippet"),
    ),
    (
        "response-headers",
        include_str!("../../templates/asciidoctor/default-response-headers.snippet"),
    ),
    (
        "path-parameters",
        include_str!("../../templates/asciidoctor/default-path-parameters.snippet"),
    ),
    (
        "query-parameters",
        include_str!("../../templates/asciidoctor/default-query-parameters.snippet"),
    ),
    (
        "form-parameters",
        include_str!("../../templates/asciidoctor/default-form-parameters.snippet"),
    ),
    ("request-parts", include_str!("../../templates/asciidoctor/default-request-parts.snippet")),
    (
        "request-cookies",
        include_str!("../../templates/asciidoctor/default-request-cookies.snippet"),
    ),
    (
        "response-cookies",
        include_str!("../../templates/asciidoctor/default-response-cookies.snippet"),
    ),
    ("links", include_str!("../../templates/asciidoctor/default-links.snippet")),
    ("request-fields", include_str!("../../templates/asciidoctor/default-request-fields.snippet")),
    (
        "response-fields",
        include_str!("../../templates/asciidoctor/default-response-fields.snippet"),
    ),
];

const MARKDOWN_DEFAULTS: &[(&str, &str)] = &[
    ("curl-request", include_str!("../../templates/markdown/default-curl-request.snippet")),
    ("httpie-request", include_str!("../../templates/markdown/default-httpie-request.snippet")),
    ("http-request", include_str!("../../templates/markdown/default-http-request.snippet")),
    ("http-response", include_str!("../../templates/markdown/default-http-response.snippet")),
    ("request-body", include_str!("../../templates/markdown/default-request-body.snippet")),
    ("response-body", include_str!("../../templates/markdown/default-response-body.snippet")),
    ("request-headers", include_str!("../../templates/markdown/default-request-headers.snippet")),
    ("response-headers", include_str!("../../templates/markdown/default-response-headers.snippet")),
    ("path-parameters", include_str!("../../templates/markdown/default-path-parameters.snippet")),
    ("query-parameters", include_str!("../../templates/markdown/default-query-parameters.snippet")),
    ("form-parameters", include_str!("../../templates/markdown/default-form-parameters.snippet")),
    ("request-parts", include_str!("../../templates/markdown/default-request-parts.snippet")),
    ("request-cookies", include_str!("../../templates/markdown/default-request-cookies.snippet")),
    ("response-cookies", include_str!("../../templates/markdown/default-response-cookies.snippet")),
    ("links", include_str!("../../templates/markdown/default-links.snippet")),
    ("request-fields", include_str!("../../templates/markdown/default-request-fields.snippet")),
    ("response-fields", include_str!("../../templates/markdown/default-response-fields.snippet")),
];

/// The source of a template and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateResource {
    /// File path of an override, or `builtin:<format-id>/default-<name>.snippet`.
    pub location: String,
    /// Template source.
    pub content: String,
}

/// Finds template sources by name.
pub trait TemplateResourceResolver: Send + Sync + Debug {
    /// Resolves the template called `name`.
    fn resolve_template_resource(&self, name: &str) -> RestDocsResult<TemplateResource>;
}

/// Resolves user overrides from a directory, then the built-in templates of a format.
#[derive(Debug, Clone, Default)]
pub struct StandardTemplateResourceResolver {
    format: TemplateFormat,
    override_dir: Option<PathBuf>,
}

impl StandardTemplateResourceResolver {
    /// Resolves built-in templates for `format`.
    pub fn new(format: TemplateFormat) -> Self {
        Self {
            format,
            override_dir: None,
        }
    }

    /// Consults `dir` for overrides before the built-ins.
    pub fn with_override_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.override_dir = Some(dir.into());
        self
    }

    /// The format templates are resolved for.
    pub fn format(&self) -> TemplateFormat {
        self.format
    }

    fn builtin(&self, name: &str) -> Option<&'static str> {
        let defaults = match self.format {
            TemplateFormat::Asciidoctor => ASCIIDOCTOR_DEFAULTS,
            TemplateFormat::Markdown => MARKDOWN_DEFAULTS,
        };
        defaults
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, content)| *content)
    }
}

impl TemplateResourceResolver for StandardTemplateResourceResolver {
    fn resolve_template_resource(&self, name: &str) -> RestDocsResult<TemplateResource> {
        let file_name = format!("{}.snippet", name);
        if let Some(dir) = &self.override_dir {
            let candidates = [dir.join(self.format.id()).join(&file_name), dir.join(&file_name)];
            for candidate in candidates {
                if candidate.is_file() {
                    tracing::debug!(
                        template = name,
                        path = %candidate.display(),
                        "Using template override"
                    );
                    return Ok(TemplateResource {
                        location: candidate.display().to_string(),
                        content: std::fs::read_to_string(&candidate)?,
                    });
                }
            }
        }
        match self.builtin(name) {
            Some(content) => Ok(TemplateResource {
                location: format!("builtin:{}/default-{}", self.format.id(), file_name),
                content: content.to_string(),
            }),
            None => Err(RestDocsError::TemplateNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_builtin_template() {
        let resource = StandardTemplateResourceResolver::new(TemplateFormat::Markdown)
            .resolve_template_resource("curl-request")
            .unwrap();
        assert_eq!(resource.location, "builtin:markdown/default-curl-request.snippet");
        assert!(resource.content.contains("$ curl"));
    }

    #[test]
    fn test_format_specific_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("asciidoctor")).unwrap();
        fs::write(dir.path().join("asciidoctor/links.snippet"), "format").unwrap();
        fs::write(dir.path().join("links.snippet"), "general").unwrap();

        let resolver = StandardTemplateResourceResolver::new(TemplateFormat::Asciidoctor)
            .with_override_dir(dir.path());
        assert_eq!(resolver.resolve_template_resource("links").unwrap().content, "format");

        let markdown = StandardTemplateResourceResolver::new(TemplateFormat::Markdown)
            .with_override_dir(dir.path());
        assert_eq!(markdown.resolve_template_resource("links").unwrap().content, "general");
    }

    #[test]
    fn test_override_of_custom_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("custom.snippet"), "{{ a }}").unwrap();
        let resolver = StandardTemplateResourceResolver::default().with_override_dir(dir.path());
        assert_eq!(resolver.resolve_template_resource("custom").unwrap().content, "{{ a }}");
    }

    #[test]
    fn test_missing_template() {
        let err = StandardTemplateResourceResolver::default()
            .resolve_template_resource("missing")
            .unwrap_err();
        assert_eq!(err.to_string(), "Template named 'missing' could not be resolved");
    }
}
