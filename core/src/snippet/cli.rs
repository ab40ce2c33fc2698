#![deny(missing_docs)]

//! # Command Line Snippets
//!
//! Renders the request as a `curl` or HTTPie command.
//!
//! `Host` and `Content-Length` headers are left to the tool. A single `Basic`
//! `Authorization` header becomes the tool's credential option instead of a header.

use super::http_message::is_form_urlencoded;
use super::TemplatedSnippet;
use crate::error::RestDocsResult;
use crate::operation::headers::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HOST};
use crate::operation::{HttpHeaders, Operation, OperationRequest, Parameters};
use crate::templates::Model;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use http::Method;
use serde_json::Value;

/// The `curl-request` snippet.
pub fn curl_request() -> CurlRequestSnippet {
    CurlRequestSnippet::default()
}

/// The `httpie-request` snippet.
pub fn httpie_request() -> HttpieRequestSnippet {
    HttpieRequestSnippet::default()
}

/// Decoded `user:password` of a single `Basic` authorization header.
fn basic_auth_credentials(headers: &HttpHeaders) -> Option<String> {
    match headers.get(AUTHORIZATION)? {
        [value] if value.starts_with("Basic ") => {
            let decoded = STANDARD.decode(value[6..].trim()).ok()?;
            Some(String::from_utf8_lossy(&decoded).into_owned())
        }
        _ => None,
    }
}

/// Headers a command line should pass explicitly.
fn command_headers(request: &OperationRequest) -> Vec<(&str, &str)> {
    let basic_auth = basic_auth_credentials(request.headers()).is_some();
    request
        .headers()
        .iter()
        .filter(|(name, _)| {
            !name.eq_ignore_ascii_case(HOST) && !name.eq_ignore_ascii_case(CONTENT_LENGTH)
        })
        .filter(|(name, _)| !(basic_auth && name.eq_ignore_ascii_case(AUTHORIZATION)))
        .flat_map(|(name, values)| values.iter().map(move |v| (name, v.as_str())))
        .collect()
}

fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}

fn pairs(parameters: &Parameters) -> impl Iterator<Item = (&str, &str)> {
    parameters
        .iter()
        .flat_map(|(name, values)| values.iter().map(move |v| (name, v.as_str())))
}

/// The `curl-request` snippet: model keys `url` and `options`.
#[derive(Debug, Clone, Default)]
pub struct CurlRequestSnippet {
    attributes: Model,
}

impl CurlRequestSnippet {
    /// A copy with additional template attributes.
    pub fn with_attributes(mut self, attributes: Model) -> Self {
        self.attributes.extend(attributes);
        self
    }

    fn url(&self, request: &OperationRequest) -> RestDocsResult<String> {
        let unique = request.parameters().unique_parameters(request.uri())?;
        let in_uri = *request.method() == Method::GET
            || (!request.content().is_empty() && !is_form_urlencoded(request));
        if unique.is_empty() || !in_uri {
            return Ok(format!("'{}'", request.uri()));
        }
        let separator = if request.uri().query().is_some_and(has_text) {
            '&'
        } else {
            '?'
        };
        Ok(format!(
            "'{}{}{}'",
            request.uri(),
            separator,
            unique.to_query_string()
        ))
    }

    fn options(&self, request: &OperationRequest) -> RestDocsResult<String> {
        let mut options = String::from("-i");
        if let Some(credentials) = basic_auth_credentials(request.headers()) {
            options.push_str(&format!(" -u '{}'", credentials));
        }
        if *request.method() != Method::GET {
            options.push_str(&format!(" -X {}", request.method()));
        }
        for (name, value) in command_headers(request) {
            options.push_str(&format!(" -H '{}: {}'", name, value));
        }
        for cookie in request.cookies() {
            options.push_str(&format!(" --cookie '{}={}'", cookie.name, cookie.value));
        }
        for part in request.parts() {
            options.push_str(&format!(" -F '{}=", part.name()));
            match part.submitted_file_name().filter(|f| has_text(f)) {
                Some(file) => options.push_str(&format!("@{}", file)),
                None => options.push_str(&part.content_as_string()),
            }
            if let Some(content_type) = part.headers().content_type() {
                options.push_str(";type=");
                options.push_str(content_type);
            }
            options.push('\'');
        }

        let content = request.content_as_string();
        if has_text(&content) {
            options.push_str(&format!(" -d '{}'", content));
        } else if !request.parts().is_empty() {
            for (name, value) in pairs(request.parameters()) {
                options.push_str(&format!(" -F '{}={}'", name, value));
            }
        } else if request.is_put_or_post() {
            let query = request
                .parameters()
                .unique_parameters(request.uri())?
                .to_query_string();
            if has_text(&query) {
                options.push_str(&format!(" -d '{}'", query));
            }
        }
        Ok(options)
    }
}

impl TemplatedSnippet for CurlRequestSnippet {
    fn snippet_name(&self) -> &str {
        "curl-request"
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let request = operation.request();
        let mut model = Model::new();
        model.insert("url".to_string(), Value::String(self.url(request)?));
        model.insert("options".to_string(), Value::String(self.options(request)?));
        Ok(model)
    }
}

/// The `httpie-request` snippet: model keys `echo_content`, `options`, `url` and
/// `request_items`.
#[derive(Debug, Clone, Default)]
pub struct HttpieRequestSnippet {
    attributes: Model,
}

impl HttpieRequestSnippet {
    /// A copy with additional template attributes.
    pub fn with_attributes(mut self, attributes: Model) -> Self {
        self.attributes.extend(attributes);
        self
    }

    fn options(&self, request: &OperationRequest, unique: &Parameters) -> String {
        let mut options = String::new();
        if !request.parts().is_empty() || !unique.is_empty() {
            options.push_str("--form ");
        }
        if let Some(credentials) = basic_auth_credentials(request.headers()) {
            options.push_str(&format!("--auth '{}' ", credentials));
        }
        options.push_str(request.method().as_str());
        options
    }

    fn request_items(&self, request: &OperationRequest, unique: &Parameters) -> String {
        let mut items = String::new();
        for part in request.parts() {
            items.push_str(&format!(" \\\n  '{}'", part.name()));
            match part.submitted_file_name().filter(|f| has_text(f)) {
                Some(file) => items.push_str(&format!("@'{}'", file)),
                None => items.push_str(&format!("@<(echo '{}')", part.content_as_string())),
            }
        }
        for (name, value) in command_headers(request) {
            if !request.parts().is_empty()
                && name.eq_ignore_ascii_case(CONTENT_TYPE)
                && value.starts_with("multipart/form-data")
            {
                continue;
            }
            items.push_str(&format!(" '{}:{}'", name, value));
        }
        if !has_text(&request.content_as_string()) {
            if !request.parts().is_empty() {
                for (name, value) in pairs(request.parameters()) {
                    items.push_str(&format!(" '{}={}'", name, value));
                }
            } else if request.is_put_or_post() {
                for (name, values) in unique.iter() {
                    if values.is_empty() {
                        items.push_str(&format!(" '{}='", name));
                    }
                    for value in values {
                        items.push_str(&format!(" '{}={}'", name, value));
                    }
                }
            }
        }
        items
    }
}

impl TemplatedSnippet for HttpieRequestSnippet {
    fn snippet_name(&self) -> &str {
        "httpie-request"
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let request = operation.request();
        let unique = request.parameters().unique_parameters(request.uri())?;
        let content = request.content_as_string();
        let echo_content = if has_text(&content) {
            format!("echo '{}' | ", content)
        } else {
            String::new()
        };

        let mut model = Model::new();
        model.insert("echo_content".to_string(), Value::String(echo_content));
        model.insert(
            "options".to_string(),
            Value::String(self.options(request, &unique)),
        );
        model.insert(
            "url".to_string(),
            Value::String(format!("'{}'", request.uri())),
        );
        model.insert(
            "request_items".to_string(),
            Value::String(self.request_items(request, &unique)),
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{configuration, ok, operation, CapturingWriterResolver};
    use super::super::Snippet;
    use super::*;
    use crate::operation::OperationRequestPart;
    use crate::templates::TemplateFormat;
    use pretty_assertions::assert_eq;
    use url::Url;

    fn builder(method: Method, uri: &str) -> crate::operation::OperationRequestBuilder {
        OperationRequest::builder(method, Url::parse(uri).unwrap())
    }

    fn curl(request: OperationRequest) -> Model {
        curl_request().create_model(&operation(request, ok())).unwrap()
    }

    fn httpie(request: OperationRequest) -> Model {
        httpie_request().create_model(&operation(request, ok())).unwrap()
    }

    fn rendered_curl(request: OperationRequest) -> String {
        let writer = CapturingWriterResolver::default();
        let operation = Operation::new(
            "curl",
            request,
            ok(),
            configuration(TemplateFormat::Markdown, &writer),
        );
        curl_request().document(&operation).unwrap();
        let written = writer.get("curl-request").unwrap();
        written.lines().nth(1).unwrap().to_string()
    }

    #[test]
    fn test_get_request() {
        assert_eq!(
            rendered_curl(builder(Method::GET, "http://localhost/foo").build()),
            "$ curl 'http://localhost/foo' -i"
        );
    }

    #[test]
    fn test_post_with_parameter() {
        let request = builder(Method::POST, "http://localhost/foo")
            .parameter("k1", "v1")
            .build();
        assert_eq!(
            rendered_curl(request),
            "$ curl 'http://localhost/foo' -i -X POST -d 'k1=v1'"
        );
    }

    #[test]
    fn test_get_with_parameters_not_in_query() {
        let model = curl(
            builder(Method::GET, "http://localhost/foo?a=alpha")
                .parameter("a", "alpha")
                .parameter("b", "bravo")
                .build(),
        );
        assert_eq!(model["url"], "'http://localhost/foo?a=alpha&b=bravo'");
        assert_eq!(model["options"], "-i");
    }

    #[test]
    fn test_get_with_padded_query_value() {
        let model = curl(
            builder(Method::GET, "http://localhost/foo?token=abc==")
                .parameter("token", "abc==")
                .build(),
        );
        assert_eq!(model["url"], "'http://localhost/foo?token=abc=='");
        assert_eq!(model["options"], "-i");
    }

    #[test]
    fn test_headers_and_basic_auth() {
        let model = curl(
            builder(Method::PUT, "http://localhost/foo")
                .header("Host", "localhost")
                .header("Authorization", "Basic dXNlcjpzZWNyZXQ=")
                .header("Content-Type", "application/json")
                .content(r#"{"a":1}"#)
                .build(),
        );
        assert_eq!(
            model["options"],
            r#"-i -u 'user:secret' -X PUT -H 'Content-Type: application/json' -d '{"a":1}'"#
        );
    }

    #[test]
    fn test_multipart() {
        let part_headers: HttpHeaders = [("Content-Type", "image/png")].into_iter().collect();
        let request = builder(Method::POST, "http://localhost/upload")
            .header("Content-Type", "multipart/form-data")
            .parameter("title", "Logo")
            .part(OperationRequestPart::new(
                "image",
                Some("logo.png".to_string()),
                b"<png>".to_vec(),
                part_headers,
            ))
            .part(OperationRequestPart::new("note", None, b"hi".to_vec(), HttpHeaders::new()))
            .build();
        assert_eq!(
            curl(request.clone())["options"],
            "-i -X POST -H 'Content-Type: multipart/form-data' \
             -F 'image=@logo.png;type=image/png' -F 'note=hi' -F 'title=Logo'"
        );
        let model = httpie(request);
        assert_eq!(model["options"], "--form POST");
        assert_eq!(
            model["request_items"],
            " \\\n  'image'@'logo.png' \\\n  'note'@<(echo 'hi') 'title=Logo'"
        );
    }

    #[test]
    fn test_httpie_content_and_auth() {
        let model = httpie(
            builder(Method::POST, "http://localhost/foo")
                .header("Authorization", "Basic dXNlcjpzZWNyZXQ=")
                .header("Content-Type", "application/json")
                .content("{}")
                .build(),
        );
        assert_eq!(model["echo_content"], "echo '{}' | ");
        assert_eq!(model["options"], "--auth 'user:secret' POST");
        assert_eq!(model["url"], "'http://localhost/foo'");
        assert_eq!(model["request_items"], " 'Content-Type:application/json'");
    }

    #[test]
    fn test_httpie_form_parameters() {
        let model = httpie(
            builder(Method::POST, "http://localhost/foo")
                .parameter("k1", "v1")
                .parameter("empty", "")
                .build(),
        );
        assert_eq!(model["options"], "--form POST");
        assert_eq!(model["request_items"], " 'k1=v1' 'empty='");
    }
}
