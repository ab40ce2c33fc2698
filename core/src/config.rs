#![deny(missing_docs)]

//! # Configuration
//!
//! The strongly typed configuration one operation is documented with, and the
//! [`RestDocumentationConfigurer`] that builds it.
//!
//! ```
//! use restdocs_core::config::RestDocumentationConfigurer;
//! use restdocs_core::context::RestDocumentationContext;
//! use restdocs_core::templates::TemplateFormat;
//!
//! let configuration = RestDocumentationConfigurer::new()
//!     .snippets(|snippets| snippets.with_template_format(TemplateFormat::Markdown))
//!     .build(RestDocumentationContext::new("Api", "list", None))
//!     .unwrap();
//! assert_eq!(configuration.snippet_configuration().format(), TemplateFormat::Markdown);
//! ```

use crate::context::RestDocumentationContext;
use crate::error::{RestDocsError, RestDocsResult};
use crate::preprocess::{
    DelegatingOperationRequestPreprocessor, DelegatingOperationResponsePreprocessor,
    OperationRequestPreprocessor, OperationResponsePreprocessor, PreprocessorRef,
};
use crate::snippet::writer::{StandardWriterResolver, WriterResolver};
use crate::snippet::{self, SnippetRef};
use crate::templates::{
    Model, StandardTemplateResourceResolver, TemplateEngine, TemplateFormat, TeraTemplateEngine,
};
use std::path::PathBuf;
use std::sync::Arc;

/// The only supported snippet encoding.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Encoding and markup of generated snippets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetConfiguration {
    encoding: String,
    format: TemplateFormat,
}

impl SnippetConfiguration {
    /// Snippet encoding.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Snippet markup.
    pub fn format(&self) -> TemplateFormat {
        self.format
    }
}

/// Everything a single operation is documented with.
///
/// Built once per operation by [`RestDocumentationConfigurer::build`] and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct RestDocumentationConfiguration {
    context: RestDocumentationContext,
    default_snippets: Vec<SnippetRef>,
    default_request_preprocessor: Option<Arc<dyn OperationRequestPreprocessor>>,
    default_response_preprocessor: Option<Arc<dyn OperationResponsePreprocessor>>,
    template_engine: Arc<dyn TemplateEngine>,
    writer_resolver: Arc<dyn WriterResolver>,
    snippet_configuration: SnippetConfiguration,
    url_template: Option<String>,
    attributes: Model,
}

impl RestDocumentationConfiguration {
    /// Context of the operation.
    pub fn context(&self) -> &RestDocumentationContext {
        &self.context
    }

    /// Snippets produced for every operation, before any explicit snippets.
    pub fn default_snippets(&self) -> &[SnippetRef] {
        &self.default_snippets
    }

    /// Request preprocessor applied after the call-specific one.
    pub fn default_request_preprocessor(&self) -> Option<&Arc<dyn OperationRequestPreprocessor>> {
        self.default_request_preprocessor.as_ref()
    }

    /// Response preprocessor applied after the call-specific one.
    pub fn default_response_preprocessor(
        &self,
    ) -> Option<&Arc<dyn OperationResponsePreprocessor>> {
        self.default_response_preprocessor.as_ref()
    }

    /// Engine used to compile snippet templates.
    pub fn template_engine(&self) -> &Arc<dyn TemplateEngine> {
        &self.template_engine
    }

    /// Resolver that opens snippet destinations.
    pub fn writer_resolver(&self) -> &Arc<dyn WriterResolver> {
        &self.writer_resolver
    }

    /// Encoding and format.
    pub fn snippet_configuration(&self) -> &SnippetConfiguration {
        &self.snippet_configuration
    }

    /// URL template of the request, e.g. `/notes/{id}`.
    pub fn url_template(&self) -> Option<&str> {
        self.url_template.as_deref()
    }

    /// Free-form attributes.
    pub fn attributes(&self) -> &Model {
        &self.attributes
    }

    /// A copy carrying `url_template`.
    pub fn with_url_template(&self, url_template: impl Into<String>) -> Self {
        Self {
            url_template: Some(url_template.into()),
            ..self.clone()
        }
    }

    /// A copy carrying an additional attribute.
    pub fn with_attribute(&self, key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut copy = self.clone();
        copy.attributes.insert(key.into(), value);
        copy
    }
}

/// Default snippets, encoding, format and template overrides.
#[derive(Debug, Clone)]
pub struct SnippetConfigurer {
    default_snippets: Vec<SnippetRef>,
    encoding: String,
    format: TemplateFormat,
    templates_dir: Option<PathBuf>,
}

impl Default for SnippetConfigurer {
    fn default() -> Self {
        Self {
            default_snippets: vec![
                Arc::new(snippet::curl_request()) as SnippetRef,
                Arc::new(snippet::httpie_request()),
                Arc::new(snippet::http_request()),
                Arc::new(snippet::http_response()),
                Arc::new(snippet::request_body()),
                Arc::new(snippet::response_body()),
            ],
            encoding: DEFAULT_ENCODING.to_string(),
            format: TemplateFormat::default(),
            templates_dir: None,
        }
    }
}

impl SnippetConfigurer {
    /// Replaces the default snippets.
    pub fn with_defaults(mut self, snippets: Vec<SnippetRef>) -> Self {
        self.default_snippets = snippets;
        self
    }

    /// Appends to the default snippets.
    pub fn with_additional_defaults(mut self, snippets: Vec<SnippetRef>) -> Self {
        self.default_snippets.extend(snippets);
        self
    }

    /// Sets the snippet encoding. Only UTF-8 is accepted by `build`.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Sets the snippet markup.
    pub fn with_template_format(mut self, format: TemplateFormat) -> Self {
        self.format = format;
        self
    }

    /// Looks for template overrides in `dir`.
    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }
}

/// Default request and response preprocessors.
#[derive(Debug, Clone, Default)]
pub struct OperationPreprocessorsConfigurer {
    request: Vec<PreprocessorRef>,
    response: Vec<PreprocessorRef>,
}

impl OperationPreprocessorsConfigurer {
    /// Preprocessors applied to every request.
    pub fn with_request_defaults(mut self, preprocessors: Vec<PreprocessorRef>) -> Self {
        self.request = preprocessors;
        self
    }

    /// Preprocessors applied to every response.
    pub fn with_response_defaults(mut self, preprocessors: Vec<PreprocessorRef>) -> Self {
        self.response = preprocessors;
        self
    }
}

/// Builds a [`RestDocumentationConfiguration`] for each operation.
#[derive(Debug, Clone, Default)]
pub struct RestDocumentationConfigurer {
    snippets: SnippetConfigurer,
    operation_preprocessors: OperationPreprocessorsConfigurer,
    template_engine: Option<Arc<dyn TemplateEngine>>,
    writer_resolver: Option<Arc<dyn WriterResolver>>,
    attributes: Model,
}

impl RestDocumentationConfigurer {
    /// A configurer with the default snippets, UTF-8 Asciidoctor output, the tera engine
    /// and the standard writer resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjusts snippet configuration.
    pub fn snippets(
        mut self,
        configure: impl FnOnce(SnippetConfigurer) -> SnippetConfigurer,
    ) -> Self {
        self.snippets = configure(self.snippets);
        self
    }

    /// Adjusts default preprocessors.
    pub fn operation_preprocessors(
        mut self,
        configure: impl FnOnce(OperationPreprocessorsConfigurer) -> OperationPreprocessorsConfigurer,
    ) -> Self {
        self.operation_preprocessors = configure(self.operation_preprocessors);
        self
    }

    /// Uses `engine` instead of the tera engine.
    pub fn template_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.template_engine = Some(engine);
        self
    }

    /// Uses `resolver` instead of the standard writer resolver.
    pub fn writer_resolver(mut self, resolver: Arc<dyn WriterResolver>) -> Self {
        self.writer_resolver = Some(resolver);
        self
    }

    /// Adds a free-form attribute to every configuration.
    pub fn attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// The configuration for the operation described by `context`.
    pub fn build(
        &self,
        context: RestDocumentationContext,
    ) -> RestDocsResult<RestDocumentationConfiguration> {
        let encoding = self.snippets.encoding.replace('_', "-");
        if !encoding.eq_ignore_ascii_case(DEFAULT_ENCODING)
            && !encoding.eq_ignore_ascii_case("utf8")
        {
            return Err(RestDocsError::Configuration(format!(
                "Unsupported snippet encoding '{}'; only {} is supported",
                self.snippets.encoding, DEFAULT_ENCODING
            )));
        }
        let format = self.snippets.format;

        let template_engine = match &self.template_engine {
            Some(engine) => Arc::clone(engine),
            None => {
                let mut resolver = StandardTemplateResourceResolver::new(format);
                if let Some(dir) = &self.snippets.templates_dir {
                    resolver = resolver.with_override_dir(dir);
                }
                Arc::new(TeraTemplateEngine::new(Arc::new(resolver), format))
            }
        };
        let writer_resolver = match &self.writer_resolver {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(StandardWriterResolver::new(format)),
        };

        let request = &self.operation_preprocessors.request;
        let response = &self.operation_preprocessors.response;
        let default_request_preprocessor: Option<Arc<dyn OperationRequestPreprocessor>> =
            if request.is_empty() {
                None
            } else {
                Some(Arc::new(DelegatingOperationRequestPreprocessor::new(
                    request.clone(),
                )))
            };
        let default_response_preprocessor: Option<Arc<dyn OperationResponsePreprocessor>> =
            if response.is_empty() {
                None
            } else {
                Some(Arc::new(DelegatingOperationResponsePreprocessor::new(
                    response.clone(),
                )))
            };

        Ok(RestDocumentationConfiguration {
            context,
            default_snippets: self.snippets.default_snippets.clone(),
            default_request_preprocessor,
            default_response_preprocessor,
            template_engine,
            writer_resolver,
            snippet_configuration: SnippetConfiguration {
                encoding: DEFAULT_ENCODING.to_string(),
                format,
            },
            url_template: None,
            attributes: self.attributes.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::pretty_print;

    fn context() -> RestDocumentationContext {
        RestDocumentationContext::new("Api", "test", None)
    }

    #[test]
    fn test_defaults() {
        let configuration = RestDocumentationConfigurer::new().build(context()).unwrap();
        let names: Vec<&str> = configuration
            .default_snippets()
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "curl-request",
                "httpie-request",
                "http-request",
                "http-response",
                "request-body",
                "response-body"
            ]
        );
        assert_eq!(configuration.snippet_configuration().encoding(), "UTF-8");
        assert_eq!(
            configuration.snippet_configuration().format(),
            TemplateFormat::Asciidoctor
        );
        assert!(configuration.default_request_preprocessor().is_none());
        assert!(configuration.url_template().is_none());
    }

    #[test]
    fn test_additional_defaults_and_preprocessors() {
        let configuration = RestDocumentationConfigurer::new()
            .snippets(|s| s.with_additional_defaults(vec![Arc::new(snippet::request_body())]))
            .operation_preprocessors(|p| p.with_response_defaults(vec![pretty_print()]))
            .build(context())
            .unwrap();
        assert_eq!(configuration.default_snippets().len(), 7);
        assert!(configuration.default_request_preprocessor().is_none());
        assert!(configuration.default_response_preprocessor().is_some());
    }

    #[test]
    fn test_unsupported_encoding() {
        let err = RestDocumentationConfigurer::new()
            .snippets(|s| s.with_encoding("ISO-8859-1"))
            .build(context())
            .unwrap_err();
        assert!(matches!(err, RestDocsError::Configuration(_)));
        assert!(RestDocumentationConfigurer::new()
            .snippets(|s| s.with_encoding("utf-8"))
            .build(context())
            .is_ok());
    }

    #[test]
    fn test_url_template_and_attributes() {
        let configuration = RestDocumentationConfigurer::new()
            .attribute("team", serde_json::json!("notes"))
            .build(context())
            .unwrap()
            .with_url_template("/notes/{id}");
        assert_eq!(configuration.url_template(), Some("/notes/{id}"));
        assert_eq!(configuration.attributes()["team"], "notes");
    }
}
