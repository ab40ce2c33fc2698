#![deny(missing_docs)]

//! # URI Modification
//!
//! Rewrites the scheme, host, port and path of the request URI and of every absolute
//! `http`/`https` URI found in header values, bodies and multipart parts.
//!
//! URIs found in content are rewritten textually. A match covers the scheme, the authority
//! and the path only, so query strings, fragments and any delimiter following the URI are
//! preserved byte for byte and are never re-encoded.

use super::content::ContentModifier;
use super::OperationPreprocessor;
use crate::error::{RestDocsError, RestDocsResult};
use crate::operation::headers::HOST;
use crate::operation::request::decode_content;
use crate::operation::{HttpHeaders, OperationRequest, OperationResponse};
use regex::Regex;
use std::sync::OnceLock;

static URI_REGEX: OnceLock<Regex> = OnceLock::new();

fn uri_regex() -> &'static Regex {
    URI_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r#"(?P<scheme>https?)://"#,
            r#"(?:(?P<user_info>[^\s"'/?#@<>\[\]]+)@)?"#,
            r#"(?P<host>\[[0-9A-Fa-f:.]*\]|[^\s"'/?#:@\[\]<>(),;]+)"#,
            r#"(?::(?P<port>[0-9]+))?"#,
            r#"(?P<path>/[^\s"'?#<>]*)?"#,
        ))
        .expect("Invalid regex")
    })
}

/// Modifies URIs in requests and responses.
///
/// `None` for a component leaves it as found. A port of `Some("")` (see
/// [`remove_port`](Self::remove_port)) removes the port together with its colon.
#[derive(Debug, Clone, Default)]
pub struct UriModifyingOperationPreprocessor {
    scheme: Option<String>,
    host: Option<String>,
    port: Option<String>,
    path_prefix: Option<String>,
}

impl UriModifyingOperationPreprocessor {
    /// Uses `scheme`.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Uses `host`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Uses `port`.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port.to_string());
        self
    }

    /// Removes the port.
    pub fn remove_port(mut self) -> Self {
        self.port = Some(String::new());
        self
    }

    /// Prefixes the path with `path_prefix`.
    pub fn path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(path_prefix.into());
        self
    }

    fn is_identity(&self) -> bool {
        self.scheme.is_none()
            && self.host.is_none()
            && self.port.is_none()
            && self.path_prefix.is_none()
    }

    /// Rewrites every absolute URI in `input`.
    pub fn modify_text(&self, input: &str) -> String {
        if self.is_identity() {
            return input.to_string();
        }
        uri_regex()
            .replace_all(input, |caps: &regex::Captures| self.modify_uri(caps))
            .into_owned()
    }

    fn modify_uri(&self, caps: &regex::Captures) -> String {
        let mut modified = String::with_capacity(caps[0].len());
        modified.push_str(self.scheme.as_deref().unwrap_or(&caps["scheme"]));
        modified.push_str("://");
        if let Some(user_info) = caps.name("user_info") {
            modified.push_str(user_info.as_str());
            modified.push('@');
        }
        modified.push_str(self.host.as_deref().unwrap_or(&caps["host"]));
        match (self.port.as_deref(), caps.name("port")) {
            (Some(""), _) | (None, None) => {}
            (Some(port), _) => {
                modified.push(':');
                modified.push_str(port);
            }
            (None, Some(port)) => {
                modified.push(':');
                modified.push_str(port.as_str());
            }
        }
        let path = caps.name("path").map_or("", |m| m.as_str());
        match &self.path_prefix {
            Some(prefix) => modified.push_str(&prefix_path(prefix, path)),
            None => modified.push_str(path),
        }
        modified
    }

    fn modify_headers(&self, headers: &HttpHeaders) -> HttpHeaders {
        headers.map_values(|value| self.modify_text(value))
    }

    fn modify_request_uri(&self, request: &OperationRequest) -> RestDocsResult<url::Url> {
        let mut uri = request.uri().clone();
        if let Some(scheme) = &self.scheme {
            uri.set_scheme(scheme).map_err(|_| {
                RestDocsError::Configuration(format!("Cannot change URI scheme to '{}'", scheme))
            })?;
        }
        if let Some(host) = &self.host {
            uri.set_host(Some(host.as_str())).map_err(|e| {
                RestDocsError::Configuration(format!("Cannot change URI host to '{}': {}", host, e))
            })?;
        }
        match self.port.as_deref() {
            None => {}
            Some("") => uri.set_port(None).map_err(|_| {
                RestDocsError::Configuration("Cannot remove the URI port".to_string())
            })?,
            Some(port) => {
                let port = port.parse::<u16>().map_err(|_| {
                    RestDocsError::Configuration(format!("Invalid port '{}'", port))
                })?;
                uri.set_port(Some(port)).map_err(|_| {
                    RestDocsError::Configuration(format!("Cannot change URI port to {}", port))
                })?;
            }
        }
        if let Some(prefix) = &self.path_prefix {
            let path = prefix_path(prefix, request.uri().path());
            uri.set_path(&path);
        }
        Ok(uri)
    }
}

fn prefix_path(prefix: &str, path: &str) -> String {
    let mut normalized_prefix = if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{}", prefix)
    };
    while normalized_prefix.len() > 1 && normalized_prefix.ends_with('/') {
        normalized_prefix.pop();
    }
    let normalized_path = path.trim_start_matches('/');
    if normalized_path.is_empty() {
        normalized_prefix
    } else {
        format!("{}/{}", normalized_prefix, normalized_path)
    }
}

impl ContentModifier for UriModifyingOperationPreprocessor {
    fn modify_content(
        &self,
        content: &[u8],
        content_type: Option<&str>,
    ) -> RestDocsResult<Vec<u8>> {
        if self.is_identity() || content.is_empty() {
            return Ok(content.to_vec());
        }
        Ok(self
            .modify_text(&decode_content(content, content_type))
            .into_bytes())
    }
}

impl OperationPreprocessor for UriModifyingOperationPreprocessor {
    fn preprocess_request(&self, request: &OperationRequest) -> RestDocsResult<OperationRequest> {
        let uri = self.modify_request_uri(request)?;
        let mut headers = self.modify_headers(request.headers());
        let host = match (uri.host_str(), uri.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        headers.set(HOST, vec![host]);

        let parts = request
            .parts()
            .iter()
            .map(|part| {
                let content = self.modify_content(part.content(), part.headers().content_type())?;
                Ok(part.with_content_and_headers(content, self.modify_headers(part.headers())))
            })
            .collect::<RestDocsResult<Vec<_>>>()?;

        let content = self.modify_content(request.content(), request.headers().content_type())?;
        Ok(request
            .with_uri(uri)
            .with_headers(headers)
            .with_parts(parts)
            .with_content(content))
    }

    fn preprocess_response(
        &self,
        response: &OperationResponse,
    ) -> RestDocsResult<OperationResponse> {
        let content =
            self.modify_content(response.content(), response.headers().content_type())?;
        Ok(response
            .with_headers(self.modify_headers(response.headers()))
            .with_content(content))
    }
}
