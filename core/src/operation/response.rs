#![deny(missing_docs)]

//! # Operation Response
//!
//! The framework-neutral, immutable view of a documented response.

use super::headers::HttpHeaders;
use super::request::{content_length_updated, decode_content, Cookie};
use http::StatusCode;

/// The response of a documented operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResponse {
    status: StatusCode,
    headers: HttpHeaders,
    content: Vec<u8>,
    cookies: Vec<Cookie>,
}

impl OperationResponse {
    /// Creates a response.
    pub fn new(status: StatusCode, headers: HttpHeaders, content: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            content,
            cookies: Vec::new(),
        }
    }

    /// A copy of this response carrying `cookies`.
    pub fn with_cookies(&self, cookies: Vec<Cookie>) -> Self {
        Self {
            cookies,
            ..self.clone()
        }
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Raw body bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Body decoded using the charset of the `Content-Type` header.
    pub fn content_as_string(&self) -> String {
        decode_content(&self.content, self.headers.content_type())
    }

    /// Cookies set by the response.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// A copy of this response with new content. An existing `Content-Length` is updated.
    pub fn with_content(&self, content: Vec<u8>) -> Self {
        let headers = content_length_updated(&self.headers, content.len());
        Self {
            content,
            headers,
            ..self.clone()
        }
    }

    /// A copy of this response with new headers.
    pub fn with_headers(&self, headers: HttpHeaders) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_content_updates_existing_length() {
        let headers: HttpHeaders = [("Content-Length", "2")].into_iter().collect();
        let response = OperationResponse::new(StatusCode::OK, headers, b"{}".to_vec());
        let modified = response.with_content(b"{ }".to_vec());
        assert_eq!(modified.headers().first("content-length"), Some("3"));
        assert_eq!(response.content(), b"{}");
    }

    #[test]
    fn test_with_content_does_not_invent_length() {
        let response = OperationResponse::new(StatusCode::OK, HttpHeaders::new(), vec![]);
        let modified = response.with_content(b"abc".to_vec());
        assert!(!modified.headers().contains("Content-Length"));
    }
}
