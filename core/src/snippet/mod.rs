#![deny(missing_docs)]

//! # Snippets
//!
//! A snippet turns an [`Operation`] into a model, renders the model with the template of
//! the same name and writes the result to the destination chosen by the configured
//! [`writer::WriterResolver`].
//!
//! Most snippets only build a model; they implement [`TemplatedSnippet`] and get
//! rendering and writing from the blanket [`Snippet`] implementation.

/// Output path placeholders.
pub mod placeholder;

/// Snippet destinations.
pub mod writer;

/// Descriptors shared by the documentation snippets.
pub mod descriptor;

/// `curl` and HTTPie command lines.
pub mod cli;

/// Raw HTTP request and response.
pub mod http_message;

/// Request and response headers.
pub mod headers;

/// Path, query and form parameters, and request parts.
pub mod request;

/// Request and response cookies.
pub mod cookies;

/// Hypermedia links.
pub mod hypermedia;

/// Bodies and fields.
pub mod payload;

pub use cli::{curl_request, httpie_request, CurlRequestSnippet, HttpieRequestSnippet};
pub use cookies::{
    cookie_with_name, relaxed_request_cookies, relaxed_response_cookies, request_cookies,
    response_cookies, CookiesSnippet,
};
pub use descriptor::Descriptor;
pub use headers::{header_with_name, request_headers, response_headers, HeadersSnippet};
pub use http_message::{http_request, http_response, HttpRequestSnippet, HttpResponseSnippet};
pub use hypermedia::{
    atom_links, hal_links, link_with_rel, links, links_with, relaxed_links, relaxed_links_with,
    LinkExtractor, LinksSnippet,
};
pub use payload::{
    field_with_path, relaxed_request_fields, relaxed_response_fields, request_body,
    request_fields, response_body, response_fields, BodySnippet, FieldDescriptor,
    FieldsSnippet, JsonFieldType,
};
pub use request::{
    form_parameters, parameter_with_name, part_with_name, path_parameters, query_parameters,
    relaxed_form_parameters, relaxed_path_parameters, relaxed_query_parameters,
    relaxed_request_parts, request_parts, ParametersSnippet, RequestPartsSnippet,
};

use crate::error::RestDocsResult;
use crate::operation::Operation;
use crate::templates::Model;
use std::fmt::Debug;
use std::io::Write;
use std::sync::Arc;

/// Documents an operation.
pub trait Snippet: Send + Sync + Debug {
    /// The snippet's name, used as the default output file name.
    fn name(&self) -> &str;

    /// Documents `operation`, returning the model that was rendered.
    fn document(&self, operation: &Operation) -> RestDocsResult<Model>;
}

/// A shared, type-erased snippet.
pub type SnippetRef = Arc<dyn Snippet>;

/// A snippet rendered from a template.
pub trait TemplatedSnippet: Send + Sync + Debug {
    /// Name of the snippet.
    fn snippet_name(&self) -> &str;

    /// Name of the template. Defaults to the snippet name.
    fn template_name(&self) -> &str {
        self.snippet_name()
    }

    /// Extra values merged over the model before rendering.
    fn attributes(&self) -> &Model;

    /// Builds the model for `operation`.
    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model>;
}

impl<T: TemplatedSnippet> Snippet for T {
    fn name(&self) -> &str {
        self.snippet_name()
    }

    fn document(&self, operation: &Operation) -> RestDocsResult<Model> {
        let configuration = operation.attributes();
        let mut model = configuration.attributes().clone();
        model.extend(self.create_model(operation)?);
        model.extend(self.attributes().clone());

        let rendered = configuration
            .template_engine()
            .compile_template(self.template_name())?
            .render(&model)?;

        let mut writer = configuration.writer_resolver().resolve(
            operation.name(),
            self.snippet_name(),
            configuration.context(),
        )?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        tracing::debug!(
            operation = operation.name(),
            snippet = self.snippet_name(),
            "Snippet written"
        );
        Ok(model)
    }
}

/// Builds a [`Model`] from key/value pairs.
///
/// ```
/// use restdocs_core::snippet::attributes;
///
/// let model = attributes([("title", "Notes")]);
/// assert_eq!(model["title"], "Notes");
/// ```
pub fn attributes<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Model
where
    K: Into<String>,
    V: Into<serde_json::Value>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::operation::OperationRequest;
    use crate::templates::TemplateFormat;
    use http::Method;
    use serde_json::json;
    use url::Url;

    #[test]
    fn test_attributes_are_merged_over_the_model() {
        let writer = CapturingWriterResolver::default();
        let request =
            OperationRequest::builder(Method::GET, Url::parse("http://localhost/foo").unwrap())
                .content("body")
                .build();
        let operation = crate::operation::Operation::new(
            "op",
            request,
            ok(),
            configuration(TemplateFormat::Markdown, &writer),
        );
        let snippet = request_body().with_attributes(attributes([("body", "replaced")]));
        let model = snippet.document(&operation).unwrap();
        assert_eq!(model["body"], json!("replaced"));
        assert_eq!(
            writer.get("request-body").unwrap().trim_end(),
            "```\nreplaced\n```"
        );
    }
}
