//! Documents the parameters and parts of a request.
//!
//! Path parameters are read from the url template of the operation, query parameters
//! from the query string of its URI, and form parameters from an
//! `application/x-www-form-urlencoded` body.

use super::descriptor::{self, Descriptor, Mismatch};
use super::http_message::is_form_urlencoded;
use super::TemplatedSnippet;
use crate::error::{RestDocsError, RestDocsResult};
use crate::operation::{Operation, QueryStringParser};
use crate::templates::Model;
use indexmap::IndexSet;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static TEMPLATE_VARIABLE: OnceLock<Regex> = OnceLock::new();

fn template_variable() -> &'static Regex {
    TEMPLATE_VARIABLE.get_or_init(|| Regex::new(r"\{([^/]+?)\}").expect("Invalid regex"))
}

/// A descriptor for the parameter `name`.
pub fn parameter_with_name(name: impl Into<String>) -> Descriptor {
    Descriptor::new(name)
}

/// A descriptor for the request part `name`.
pub fn part_with_name(name: impl Into<String>) -> Descriptor {
    Descriptor::new(name)
}

/// Documents the variables of the url template.
pub fn path_parameters(descriptors: Vec<Descriptor>) -> ParametersSnippet {
    ParametersSnippet::new(ParameterSource::Path, descriptors, false)
}

/// Like [`path_parameters`], tolerating undocumented parameters.
pub fn relaxed_path_parameters(descriptors: Vec<Descriptor>) -> ParametersSnippet {
    ParametersSnippet::new(ParameterSource::Path, descriptors, true)
}

/// Documents the query string parameters.
pub fn query_parameters(descriptors: Vec<Descriptor>) -> ParametersSnippet {
    ParametersSnippet::new(ParameterSource::Query, descriptors, false)
}

/// Like [`query_parameters`], tolerating undocumented parameters.
pub fn relaxed_query_parameters(descriptors: Vec<Descriptor>) -> ParametersSnippet {
    ParametersSnippet::new(ParameterSource::Query, descriptors, true)
}

/// Documents form parameters sent in the request body.
pub fn form_parameters(descriptors: Vec<Descriptor>) -> ParametersSnippet {
    ParametersSnippet::new(ParameterSource::Form, descriptors, false)
}

/// Like [`form_parameters`], tolerating undocumented parameters.
pub fn relaxed_form_parameters(descriptors: Vec<Descriptor>) -> ParametersSnippet {
    ParametersSnippet::new(ParameterSource::Form, descriptors, true)
}

/// Documents the parts of a multipart request.
pub fn request_parts(descriptors: Vec<Descriptor>) -> RequestPartsSnippet {
    RequestPartsSnippet::new(descriptors, false)
}

/// Like [`request_parts`], tolerating undocumented parts.
pub fn relaxed_request_parts(descriptors: Vec<Descriptor>) -> RequestPartsSnippet {
    RequestPartsSnippet::new(descriptors, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParameterSource {
    Path,
    Query,
    Form,
}

impl ParameterSource {
    fn kind(&self) -> &'static str {
        match self {
            ParameterSource::Path => "Path parameters",
            ParameterSource::Query => "Query parameters",
            ParameterSource::Form => "Form parameters",
        }
    }
}

/// The `path-parameters`, `query-parameters` and `form-parameters` snippets.
#[derive(Debug, Clone)]
pub struct ParametersSnippet {
    source: ParameterSource,
    descriptors: Vec<Descriptor>,
    ignore_undocumented: bool,
    attributes: Model,
}

impl ParametersSnippet {
    fn new(
        source: ParameterSource,
        descriptors: Vec<Descriptor>,
        ignore_undocumented: bool,
    ) -> Self {
        Self {
            source,
            descriptors,
            ignore_undocumented,
            attributes: Model::new(),
        }
    }

    /// A copy with additional descriptors.
    pub fn and(&self, descriptors: Vec<Descriptor>) -> Self {
        let mut copy = self.clone();
        copy.descriptors.extend(descriptors);
        copy
    }

    /// A copy with additional template attributes.
    pub fn with_attributes(mut self, attributes: Model) -> Self {
        self.attributes.extend(attributes);
        self
    }

    fn url_template<'a>(&self, operation: &'a Operation) -> RestDocsResult<&'a str> {
        operation.attributes().url_template().ok_or_else(|| {
            RestDocsError::Configuration(
                "Path parameters cannot be documented without a url template".to_string(),
            )
        })
    }

    fn parameter_names(&self, operation: &Operation) -> RestDocsResult<IndexSet<String>> {
        let request = operation.request();
        match self.source {
            ParameterSource::Path => {
                let template = self.url_template(operation)?;
                Ok(template_variable()
                    .captures_iter(template)
                    .map(|c| {
                        let variable = &c[1];
                        variable
                            .split_once(':')
                            .map_or(variable, |(name, _)| name)
                            .to_string()
                    })
                    .collect())
            }
            ParameterSource::Query => {
                let mut names: IndexSet<String> = QueryStringParser::parse(request.uri())?
                    .names()
                    .map(str::to_string)
                    .collect();
                if !request.is_put_or_post() {
                    names.extend(request.parameters().names().map(str::to_string));
                }
                Ok(names)
            }
            ParameterSource::Form => {
                if is_form_urlencoded(request) && !request.content().is_empty() {
                    Ok(QueryStringParser::parse_query(&request.content_as_string())?
                        .names()
                        .map(str::to_string)
                        .collect())
                } else if request.is_put_or_post() {
                    Ok(request
                        .parameters()
                        .unique_parameters(request.uri())?
                        .names()
                        .map(str::to_string)
                        .collect())
                } else {
                    Ok(IndexSet::new())
                }
            }
        }
    }
}

impl TemplatedSnippet for ParametersSnippet {
    fn snippet_name(&self) -> &str {
        match self.source {
            ParameterSource::Path => "path-parameters",
            ParameterSource::Query => "query-parameters",
            ParameterSource::Form => "form-parameters",
        }
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let names = self.parameter_names(operation)?;
        let (mut undocumented, missing) =
            descriptor::compare(&self.descriptors, names.iter().map(String::as_str), false);
        if self.ignore_undocumented {
            undocumented.clear();
        }
        Mismatch {
            kind: self.source.kind(),
            identified_by: "names",
            location: "request",
        }
        .check(&undocumented, &missing)?;

        let rows = descriptor::rows("name", &self.descriptors, |d| {
            d.required_description("parameter")
        })?;
        let mut model = Model::new();
        if self.source == ParameterSource::Path {
            let template = self.url_template(operation)?;
            let path = template.split_once('?').map_or(template, |(path, _)| path);
            model.insert("path".to_string(), Value::String(path.to_string()));
        }
        model.insert("parameters".to_string(), Value::Array(rows));
        Ok(model)
    }
}

/// The `request-parts` snippet.
#[derive(Debug, Clone)]
pub struct RequestPartsSnippet {
    descriptors: Vec<Descriptor>,
    ignore_undocumented: bool,
    attributes: Model,
}

impl RequestPartsSnippet {
    fn new(descriptors: Vec<Descriptor>, ignore_undocumented: bool) -> Self {
        Self {
            descriptors,
            ignore_undocumented,
            attributes: Model::new(),
        }
    }

    /// A copy with additional descriptors.
    pub fn and(&self, descriptors: Vec<Descriptor>) -> Self {
        let mut copy = self.clone();
        copy.descriptors.extend(descriptors);
        copy
    }

    /// A copy with additional template attributes.
    pub fn with_attributes(mut self, attributes: Model) -> Self {
        self.attributes.extend(attributes);
        self
    }
}

impl TemplatedSnippet for RequestPartsSnippet {
    fn snippet_name(&self) -> &str {
        "request-parts"
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let names = operation.request().parts().iter().map(|p| p.name());
        let (mut undocumented, missing) = descriptor::compare(&self.descriptors, names, false);
        if self.ignore_undocumented {
            undocumented.clear();
        }
        Mismatch {
            kind: "Request parts",
            identified_by: "names",
            location: "request",
        }
        .check(&undocumented, &missing)?;

        let rows = descriptor::rows("name", &self.descriptors, |d| {
            d.required_description("part")
        })?;
        let mut model = Model::new();
        model.insert("request_parts".to_string(), Value::Array(rows));
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ok, operation};
    use super::*;
    use crate::config::RestDocumentationConfigurer;
    use crate::context::RestDocumentationContext;
    use crate::operation::{HttpHeaders, OperationRequest, OperationRequestPart};
    use http::Method;
    use serde_json::json;
    use url::Url;

    fn get(uri: &str) -> OperationRequest {
        OperationRequest::builder(Method::GET, Url::parse(uri).unwrap()).build()
    }

    fn with_template(request: OperationRequest, template: &str) -> Operation {
        let configuration = RestDocumentationConfigurer::new()
            .build(RestDocumentationContext::new("Tests", "test", None))
            .unwrap()
            .with_url_template(template);
        Operation::new("test", request, ok(), configuration)
    }

    #[test]
    fn test_path_parameters() {
        let snippet = path_parameters(vec![
            parameter_with_name("id").description("Note id"),
            parameter_with_name("format").description("Format"),
        ]);
        let operation = with_template(
            get("http://localhost/notes/1/json?x=1"),
            "/notes/{id}/{format:[a-z]+}?x={x}",
        );
        let err = snippet.create_model(&operation).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Path parameters with the following names were not documented: [x]"
        );

        let operation = with_template(
            get("http://localhost/notes/1/json"),
            "/notes/{id}/{format:[a-z]+}",
        );
        let model = snippet.create_model(&operation).unwrap();
        assert_eq!(model["path"], json!("/notes/{id}/{format:[a-z]+}"));
        assert_eq!(model["parameters"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_path_parameters_need_a_url_template() {
        let snippet = path_parameters(vec![parameter_with_name("id").description("Id")]);
        let err = snippet
            .create_model(&operation(get("http://localhost/notes/1"), ok()))
            .unwrap_err();
        assert!(matches!(err, RestDocsError::Configuration(_)));
    }

    #[test]
    fn test_query_parameters() {
        let snippet = query_parameters(vec![
            parameter_with_name("page").description("Page"),
            parameter_with_name("size").description("Size").optional(),
        ]);
        let model = snippet
            .create_model(&operation(get("http://localhost/notes?page=2"), ok()))
            .unwrap();
        assert_eq!(model["parameters"][0]["name"], json!("page"));

        let err = snippet
            .create_model(&operation(get("http://localhost/notes?page=2&sort=asc"), ok()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Query parameters with the following names were not documented: [sort]"
        );
        let relaxed =
            relaxed_query_parameters(vec![parameter_with_name("page").description("Page")]);
        assert!(relaxed
            .create_model(&operation(get("http://localhost/notes?page=2&sort=asc"), ok()))
            .is_ok());
    }

    #[test]
    fn test_form_parameters_from_body() {
        let request =
            OperationRequest::builder(Method::POST, Url::parse("http://localhost/notes").unwrap())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .content("title=Hello&body=")
            .build();
        let snippet = form_parameters(vec![
            parameter_with_name("title").description("Title"),
            parameter_with_name("tags").description("Tags"),
        ]);
        let err = snippet.create_model(&operation(request, ok())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Form parameters with the following names were not documented: [body]. \
             Form parameters with the following names were not found in the request: [tags]"
        );
    }

    #[test]
    fn test_request_parts() {
        let request =
            OperationRequest::builder(Method::POST, Url::parse("http://localhost/upload").unwrap())
            .part(OperationRequestPart::new(
                "file",
                Some("notes.txt".to_string()),
                b"hello".to_vec(),
                HttpHeaders::new(),
            ))
            .build();
        let snippet = request_parts(vec![part_with_name("file").description("The file")]);
        let model = snippet.create_model(&operation(request.clone(), ok())).unwrap();
        assert_eq!(
            model["request_parts"],
            json!([{"name": "file", "description": "The file", "optional": false}])
        );

        let missing = snippet.and(vec![part_with_name("meta").description("Metadata")]);
        let err = missing.create_model(&operation(request, ok())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Request parts with the following names were not found in the request: [meta]"
        );
    }
}
