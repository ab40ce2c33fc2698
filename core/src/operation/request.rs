#![deny(missing_docs)]

//! # Operation Request
//!
//! The framework-neutral, immutable view of a documented request.
//!
//! Derived requests (see the `with_*` methods) are new values; the original is never
//! modified, which lets preprocessors share requests freely.

use super::headers::{media_type_charset, HttpHeaders, CONTENT_LENGTH};
use super::parameters::Parameters;
use http::Method;
use url::Url;

/// A cookie sent with a request or set by a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
}

impl Cookie {
    /// Creates a cookie.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequestPart {
    name: String,
    submitted_file_name: Option<String>,
    content: Vec<u8>,
    headers: HttpHeaders,
}

impl OperationRequestPart {
    /// Creates a part.
    pub fn new(
        name: impl Into<String>,
        submitted_file_name: Option<String>,
        content: Vec<u8>,
        headers: HttpHeaders,
    ) -> Self {
        Self {
            name: name.into(),
            submitted_file_name,
            content,
            headers,
        }
    }

    /// The part's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the file submitted in this part, if any.
    pub fn submitted_file_name(&self) -> Option<&str> {
        self.submitted_file_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Raw content bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content decoded using the part's charset.
    pub fn content_as_string(&self) -> String {
        decode_content(&self.content, self.headers.content_type())
    }

    /// The part's headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// A copy of this part with different content and headers.
    pub fn with_content_and_headers(&self, content: Vec<u8>, headers: HttpHeaders) -> Self {
        Self {
            name: self.name.clone(),
            submitted_file_name: self.submitted_file_name.clone(),
            content,
            headers,
        }
    }
}

/// The request of a documented operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    uri: Url,
    method: Method,
    content: Vec<u8>,
    headers: HttpHeaders,
    parameters: Parameters,
    parts: Vec<OperationRequestPart>,
    cookies: Vec<Cookie>,
}

impl OperationRequest {
    /// Starts building a request.
    pub fn builder(method: Method, uri: Url) -> OperationRequestBuilder {
        OperationRequestBuilder::new(method, uri)
    }

    /// Absolute request URI.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Raw body bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Body decoded using the charset of the `Content-Type` header.
    pub fn content_as_string(&self) -> String {
        decode_content(&self.content, self.headers.content_type())
    }

    /// Request headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Query and form parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Multipart parts.
    pub fn parts(&self) -> &[OperationRequestPart] {
        &self.parts
    }

    /// Cookies sent with the request.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Whether the method is `PUT` or `POST`.
    pub fn is_put_or_post(&self) -> bool {
        self.method == Method::PUT || self.method == Method::POST
    }

    /// A copy of this request with new content. An existing `Content-Length` is updated.
    pub fn with_content(&self, content: Vec<u8>) -> Self {
        let headers = content_length_updated(&self.headers, content.len());
        Self {
            content,
            headers,
            ..self.clone()
        }
    }

    /// A copy of this request with new headers.
    pub fn with_headers(&self, headers: HttpHeaders) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }

    /// A copy of this request with new parameters.
    pub fn with_parameters(&self, parameters: Parameters) -> Self {
        Self {
            parameters,
            ..self.clone()
        }
    }

    /// A copy of this request with a new URI.
    pub fn with_uri(&self, uri: Url) -> Self {
        Self {
            uri,
            ..self.clone()
        }
    }

    /// A copy of this request with new parts.
    pub fn with_parts(&self, parts: Vec<OperationRequestPart>) -> Self {
        Self {
            parts,
            ..self.clone()
        }
    }
}

/// Builder for [`OperationRequest`].
///
/// `build` adds a `Content-Length` header when the request has content and none was set.
#[derive(Debug)]
pub struct OperationRequestBuilder {
    request: OperationRequest,
}

impl OperationRequestBuilder {
    fn new(method: Method, uri: Url) -> Self {
        Self {
            request: OperationRequest {
                uri,
                method,
                content: Vec::new(),
                headers: HttpHeaders::new(),
                parameters: Parameters::new(),
                parts: Vec::new(),
                cookies: Vec::new(),
            },
        }
    }

    /// Sets the body.
    pub fn content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.request.content = content.into();
        self
    }

    /// Adds a header value.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.request.headers.add(name, value);
        self
    }

    /// Replaces all headers.
    pub fn headers(mut self, headers: HttpHeaders) -> Self {
        self.request.headers = headers;
        self
    }

    /// Adds a parameter value.
    pub fn parameter(mut self, name: &str, value: impl Into<String>) -> Self {
        self.request.parameters.add(name, value);
        self
    }

    /// Replaces all parameters.
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.request.parameters = parameters;
        self
    }

    /// Adds a part.
    pub fn part(mut self, part: OperationRequestPart) -> Self {
        self.request.parts.push(part);
        self
    }

    /// Adds a cookie.
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.request.cookies.push(Cookie::new(name, value));
        self
    }

    /// Finishes the request.
    pub fn build(self) -> OperationRequest {
        let mut request = self.request;
        if !request.content.is_empty() && !request.headers.contains(CONTENT_LENGTH) {
            request
                .headers
                .add(CONTENT_LENGTH, request.content.len().to_string());
        }
        request
    }
}

/// Updates an existing `Content-Length` header to `length`.
pub(crate) fn content_length_updated(headers: &HttpHeaders, length: usize) -> HttpHeaders {
    let mut updated = headers.clone();
    if updated.contains(CONTENT_LENGTH) {
        updated.set(CONTENT_LENGTH, vec![length.to_string()]);
    }
    updated
}

/// Decodes `content` using the charset named by `content_type`.
///
/// UTF-8 is assumed when no charset is given; ISO-8859-1 maps bytes to chars directly.
pub(crate) fn decode_content(content: &[u8], content_type: Option<&str>) -> String {
    match content_type.and_then(media_type_charset).as_deref() {
        Some("iso-8859-1") | Some("latin1") => content.iter().map(|&b| b as char).collect(),
        _ => String::from_utf8_lossy(content).into_owned(),
    }
}
