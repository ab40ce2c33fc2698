//! Documents request and response headers.
//!
//! Header names are matched ignoring case. Only missing required headers are reported;
//! headers present in the operation but not documented are never an error.

use super::descriptor::{self, Descriptor, Mismatch};
use super::TemplatedSnippet;
use crate::error::RestDocsResult;
use crate::operation::{HttpHeaders, Operation};
use crate::templates::Model;
use serde_json::Value;

/// A descriptor for the header `name`.
pub fn header_with_name(name: impl Into<String>) -> Descriptor {
    Descriptor::new(name)
}

/// Documents the headers of the request.
pub fn request_headers(descriptors: Vec<Descriptor>) -> HeadersSnippet {
    HeadersSnippet::new(Side::Request, descriptors)
}

/// Documents the headers of the response.
pub fn response_headers(descriptors: Vec<Descriptor>) -> HeadersSnippet {
    HeadersSnippet::new(Side::Response, descriptors)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Request,
    Response,
}

/// The `request-headers` and `response-headers` snippets.
#[derive(Debug, Clone)]
pub struct HeadersSnippet {
    side: Side,
    descriptors: Vec<Descriptor>,
    attributes: Model,
}

impl HeadersSnippet {
    fn new(side: Side, descriptors: Vec<Descriptor>) -> Self {
        Self {
            side,
            descriptors,
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

    fn headers<'a>(&self, operation: &'a Operation) -> &'a HttpHeaders {
        match self.side {
            Side::Request => operation.request().headers(),
            Side::Response => operation.response().headers(),
        }
    }
}

impl TemplatedSnippet for HeadersSnippet {
    fn snippet_name(&self) -> &str {
        match self.side {
            Side::Request => "request-headers",
            Side::Response => "response-headers",
        }
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let (_, missing) =
            descriptor::compare(&self.descriptors, self.headers(operation).names(), true);
        let location = match self.side {
            Side::Request => "request",
            Side::Response => "response",
        };
        Mismatch {
            kind: "Headers",
            identified_by: "names",
            location,
        }
        .check(&Default::default(), &missing)?;

        let rows = descriptor::rows("name", &self.descriptors, |d| {
            d.required_description("header")
        })?;
        let mut model = Model::new();
        model.insert("headers".to_string(), Value::Array(rows));
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ok, operation};
    use super::*;
    use crate::operation::{HttpHeaders, OperationRequest, OperationResponse};
    use http::{Method, StatusCode};
    use serde_json::json;
    use url::Url;

    fn request() -> OperationRequest {
        OperationRequest::builder(Method::GET, Url::parse("http://localhost/").unwrap())
            .header("X-Test", "test")
            .header("Accept", "*/*")
            .build()
    }

    #[test]
    fn test_documented_headers() {
        let snippet = request_headers(vec![
            header_with_name("x-test").description("one"),
            header_with_name("Accept").description("two"),
        ]);
        let model = snippet.create_model(&operation(request(), ok())).unwrap();
        assert_eq!(
            model["headers"],
            json!([
                {"name": "x-test", "description": "one", "optional": false},
                {"name": "Accept", "description": "two", "optional": false}
            ])
        );
    }

    #[test]
    fn test_undocumented_headers_are_allowed() {
        let snippet = request_headers(vec![header_with_name("X-Test").description("one")]);
        assert!(snippet.create_model(&operation(request(), ok())).is_ok());
    }

    #[test]
    fn test_missing_header() {
        let snippet = response_headers(vec![
            header_with_name("ETag").description("tag"),
            header_with_name("X-Optional").description("maybe").optional(),
        ]);
        let err = snippet.create_model(&operation(request(), ok())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Headers with the following names were not found in the response: [ETag]"
        );
    }

    #[test]
    fn test_and_adds_descriptors() {
        let response = OperationResponse::new(
            StatusCode::OK,
            [("ETag", "1"), ("Vary", "Accept")].into_iter().collect::<HttpHeaders>(),
            Vec::new(),
        );
        let first = response_headers(vec![header_with_name("ETag").description("tag")]);
        let second = first.and(vec![header_with_name("Vary").description("vary")]);
        let model = second.create_model(&operation(request(), response)).unwrap();
        assert_eq!(model["headers"].as_array().unwrap().len(), 2);
        assert_eq!(first.descriptors.len(), 1);
    }
}
