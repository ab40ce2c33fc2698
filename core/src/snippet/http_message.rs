//! Documents the request and response as raw HTTP messages.

use super::TemplatedSnippet;
use crate::error::RestDocsResult;
use crate::operation::headers::{media_type_essence, CONTENT_TYPE};
use crate::operation::{Operation, OperationRequest, OperationResponse};
use crate::templates::Model;
use http::Method;
use serde_json::{json, Value};

/// Boundary used when rendering multipart bodies.
pub const MULTIPART_BOUNDARY: &str = "6o2knFse3p53ty9dmcQvWAIx1zInP11uCfbm";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The `http-request` snippet.
pub fn http_request() -> HttpRequestSnippet {
    HttpRequestSnippet::default()
}

/// The `http-response` snippet.
pub fn http_response() -> HttpResponseSnippet {
    HttpResponseSnippet::default()
}

fn header(name: &str, value: impl Into<String>) -> Value {
    json!({ "name": name, "value": value.into() })
}

/// The `http-request` snippet: model keys `method`, `path`, `headers` and `request_body`.
#[derive(Debug, Clone, Default)]
pub struct HttpRequestSnippet {
    attributes: Model,
}

impl HttpRequestSnippet {
    /// A copy with additional template attributes.
    pub fn with_attributes(mut self, attributes: Model) -> Self {
        self.attributes.extend(attributes);
        self
    }

    fn path(&self, request: &OperationRequest) -> RestDocsResult<String> {
        let uri = request.uri();
        let mut query = uri.query().unwrap_or_default().to_string();
        let unique = request.parameters().unique_parameters(uri)?;
        let in_uri = *request.method() == Method::GET || !request.content().is_empty();
        if !unique.is_empty() && in_uri {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&unique.to_query_string());
        }
        if query.is_empty() {
            Ok(uri.path().to_string())
        } else {
            Ok(format!("{}?{}", uri.path(), query))
        }
    }

    fn headers(&self, request: &OperationRequest) -> Vec<Value> {
        let multipart = !request.parts().is_empty();
        let mut headers = Vec::new();
        for (name, values) in request.headers().iter() {
            for value in values {
                if multipart && name.eq_ignore_ascii_case(CONTENT_TYPE) {
                    headers.push(header(
                        name,
                        format!("{}; boundary={}", value, MULTIPART_BOUNDARY),
                    ));
                } else {
                    headers.push(header(name, value.clone()));
                }
            }
        }
        for cookie in request.cookies() {
            headers.push(header("Cookie", format!("{}={}", cookie.name, cookie.value)));
        }
        if request.headers().content_type().is_none()
            && request.is_put_or_post()
            && !request.parameters().is_empty()
        {
            headers.push(header(CONTENT_TYPE, FORM_URLENCODED));
        }
        headers
    }

    fn body(&self, request: &OperationRequest) -> RestDocsResult<String> {
        let content = request.content_as_string();
        if !content.trim().is_empty() {
            return Ok(format!("\n{}", content));
        }
        if !request.is_put_or_post() {
            return Ok(String::new());
        }
        if request.parts().is_empty() {
            let query = request
                .parameters()
                .unique_parameters(request.uri())?
                .to_query_string();
            return Ok(if query.is_empty() {
                String::new()
            } else {
                format!("\n{}", query)
            });
        }

        let mut body = String::from("\n");
        for (name, values) in request.parameters().iter() {
            if values.is_empty() {
                body.push_str(&multipart_section(name, None, ""));
            }
            for value in values {
                body.push_str(&multipart_section(name, None, value));
            }
        }
        for part in request.parts() {
            body.push_str(&multipart_section(
                part.name(),
                part.headers().content_type(),
                &part.content_as_string(),
            ));
        }
        body.push_str(&format!("--{}--", MULTIPART_BOUNDARY));
        Ok(body)
    }
}

fn multipart_section(name: &str, content_type: Option<&str>, value: &str) -> String {
    let mut section = format!(
        "--{}\nContent-Disposition: form-data; name={}\n",
        MULTIPART_BOUNDARY, name
    );
    if let Some(content_type) = content_type {
        section.push_str(&format!("Content-Type: {}\n", content_type));
    }
    section.push('\n');
    section.push_str(value);
    section.push('\n');
    section
}

impl TemplatedSnippet for HttpRequestSnippet {
    fn snippet_name(&self) -> &str {
        "http-request"
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let request = operation.request();
        let mut model = Model::new();
        model.insert(
            "method".to_string(),
            Value::String(request.method().to_string()),
        );
        model.insert("path".to_string(), Value::String(self.path(request)?));
        model.insert("headers".to_string(), Value::Array(self.headers(request)));
        model.insert("request_body".to_string(), Value::String(self.body(request)?));
        Ok(model)
    }
}

/// The `http-response` snippet: model keys `status_code`, `status_reason`, `headers` and
/// `response_body`.
#[derive(Debug, Clone, Default)]
pub struct HttpResponseSnippet {
    attributes: Model,
}

impl HttpResponseSnippet {
    /// A copy with additional template attributes.
    pub fn with_attributes(mut self, attributes: Model) -> Self {
        self.attributes.extend(attributes);
        self
    }

    fn headers(&self, response: &OperationResponse) -> Vec<Value> {
        response
            .headers()
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| header(name, v.clone())))
            .collect()
    }
}

impl TemplatedSnippet for HttpResponseSnippet {
    fn snippet_name(&self) -> &str {
        "http-response"
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let response = operation.response();
        let status = response.status();
        let content = response.content_as_string();
        let body = if content.is_empty() {
            String::new()
        } else {
            format!("\n{}", content)
        };

        let mut model = Model::new();
        model.insert("status_code".to_string(), json!(status.as_u16()));
        model.insert(
            "status_reason".to_string(),
            Value::String(status.canonical_reason().unwrap_or_default().to_string()),
        );
        model.insert("headers".to_string(), Value::Array(self.headers(response)));
        model.insert("response_body".to_string(), Value::String(body));
        Ok(model)
    }
}

/// Whether a request body is form-urlencoded.
pub(crate) fn is_form_urlencoded(request: &OperationRequest) -> bool {
    request
        .headers()
        .content_type()
        .is_some_and(|ct| media_type_essence(ct) == FORM_URLENCODED)
}
