#![deny(missing_docs)]

//! # Recorded Exchanges
//!
//! A framework-neutral request/response representation that can be captured by any HTTP
//! client, stored as JSON or YAML, and converted into the operation model.
//!
//! ```yaml
//! name: create-note
//! url-template: /notes/{id}
//! request:
//!   method: POST
//!   uri: http://localhost:8080/notes
//!   headers:
//!     Content-Type: application/json
//!   body: '{"title":"REST"}'
//! response:
//!   status: 201
//!   headers:
//!     Location: http://localhost:8080/notes/1
//! ```

use crate::error::{RestDocsError, RestDocsResult};
use crate::operation::{
    Cookie, HttpHeaders, OperationRequest, OperationRequestPart, OperationResponse, Parameters,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use http::{Method, StatusCode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use super::{RequestConverter, ResponseConverter};

/// One or more values of a header or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values {
    /// A single value.
    One(String),
    /// Several values, possibly none.
    Many(Vec<String>),
}

impl Values {
    fn into_vec(self) -> Vec<String> {
        match self {
            Values::One(value) => vec![value],
            Values::Many(values) => values,
        }
    }
}

/// A recorded body: plain text, or base64 for binary content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordedBody {
    /// UTF-8 text.
    Text(String),
    /// Base64-encoded bytes.
    Binary {
        /// The encoded bytes.
        base64: String,
    },
}

impl Default for RecordedBody {
    fn default() -> Self {
        RecordedBody::Text(String::new())
    }
}

impl RecordedBody {
    fn to_bytes(&self) -> RestDocsResult<Vec<u8>> {
        match self {
            RecordedBody::Text(text) => Ok(text.clone().into_bytes()),
            RecordedBody::Binary { base64 } => STANDARD
                .decode(base64)
                .map_err(|e| RestDocsError::Conversion(format!("Invalid base64 body: {}", e))),
        }
    }
}

/// A recorded multipart part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecordedPart {
    /// Part name.
    pub name: String,
    /// Submitted file name.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Part content.
    #[serde(default)]
    pub body: RecordedBody,
    /// Part headers.
    #[serde(default)]
    pub headers: IndexMap<String, Values>,
}

/// A recorded request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecordedRequest {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Absolute URI.
    pub uri: String,
    /// Headers.
    #[serde(default)]
    pub headers: IndexMap<String, Values>,
    /// Query and form parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, Values>,
    /// Body.
    #[serde(default)]
    pub body: RecordedBody,
    /// Multipart parts.
    #[serde(default)]
    pub parts: Vec<RecordedPart>,
    /// Cookies.
    #[serde(default)]
    pub cookies: IndexMap<String, String>,
}

/// A recorded response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecordedResponse {
    /// Status code.
    pub status: u16,
    /// Headers.
    #[serde(default)]
    pub headers: IndexMap<String, Values>,
    /// Body.
    #[serde(default)]
    pub body: RecordedBody,
    /// Cookies set by the response.
    #[serde(default)]
    pub cookies: IndexMap<String, String>,
}

/// A recorded request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecordedExchange {
    /// Operation name; callers fall back to the file stem when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// URL template the request was built from, e.g. `/notes/{id}`.
    #[serde(default)]
    pub url_template: Option<String>,
    /// The request.
    pub request: RecordedRequest,
    /// The response.
    pub response: RecordedResponse,
}

impl RecordedExchange {
    /// Reads an exchange from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> RestDocsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                RestDocsError::Conversion(format!("Failed to parse {}: {}", path.display(), e))
            })
        }
    }
}

/// Converts [`RecordedRequest`]s and [`RecordedResponse`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordedExchangeConverter;

fn to_headers(recorded: &IndexMap<String, Values>) -> HttpHeaders {
    let mut headers = HttpHeaders::new();
    for (name, values) in recorded {
        for value in values.clone().into_vec() {
            headers.add(name, value);
        }
    }
    headers
}

fn to_cookies(recorded: &IndexMap<String, String>) -> Vec<Cookie> {
    recorded
        .iter()
        .map(|(name, value)| Cookie::new(name, value))
        .collect()
}

impl RequestConverter<RecordedRequest> for RecordedExchangeConverter {
    fn convert(&self, request: &RecordedRequest) -> RestDocsResult<OperationRequest> {
        let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| {
                RestDocsError::Conversion(format!("Invalid HTTP method '{}'", request.method))
            })?;
        let uri = Url::parse(&request.uri).map_err(|e| {
            RestDocsError::Conversion(format!("Invalid request URI '{}': {}", request.uri, e))
        })?;

        let mut parameters = Parameters::new();
        for (name, values) in &request.parameters {
            parameters.set(name, values.clone().into_vec());
        }

        let mut builder = OperationRequest::builder(method, uri)
            .headers(to_headers(&request.headers))
            .parameters(parameters)
            .content(request.body.to_bytes()?);
        for part in &request.parts {
            builder = builder.part(OperationRequestPart::new(
                part.name.clone(),
                part.file_name.clone(),
                part.body.to_bytes()?,
                to_headers(&part.headers),
            ));
        }
        for cookie in to_cookies(&request.cookies) {
            builder = builder.cookie(&cookie.name, &cookie.value);
        }
        Ok(builder.build())
    }
}

impl ResponseConverter<RecordedResponse> for RecordedExchangeConverter {
    fn convert(&self, response: &RecordedResponse) -> RestDocsResult<OperationResponse> {
        let status = StatusCode::from_u16(response.status).map_err(|_| {
            RestDocsError::Conversion(format!("Invalid status code {}", response.status))
        })?;
        Ok(OperationResponse::new(
            status,
            to_headers(&response.headers),
            response.body.to_bytes()?,
        )
        .with_cookies(to_cookies(&response.cookies)))
    }
}
