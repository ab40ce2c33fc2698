//! Documents request and response cookies.

use super::descriptor::{self, Descriptor, Mismatch};
use super::TemplatedSnippet;
use crate::error::RestDocsResult;
use crate::operation::{Cookie, Operation};
use crate::templates::Model;
use serde_json::Value;

/// A descriptor for the cookie `name`.
pub fn cookie_with_name(name: impl Into<String>) -> Descriptor {
    Descriptor::new(name)
}

/// Documents the cookies of the request. Undocumented cookies are an error.
pub fn request_cookies(descriptors: Vec<Descriptor>) -> CookiesSnippet {
    CookiesSnippet::new(Side::Request, descriptors, false)
}

/// Documents the cookies of the request, tolerating undocumented cookies.
pub fn relaxed_request_cookies(descriptors: Vec<Descriptor>) -> CookiesSnippet {
    CookiesSnippet::new(Side::Request, descriptors, true)
}

/// Documents the cookies set by the response. Undocumented cookies are an error.
pub fn response_cookies(descriptors: Vec<Descriptor>) -> CookiesSnippet {
    CookiesSnippet::new(Side::Response, descriptors, false)
}

/// Documents the cookies set by the response, tolerating undocumented cookies.
pub fn relaxed_response_cookies(descriptors: Vec<Descriptor>) -> CookiesSnippet {
    CookiesSnippet::new(Side::Response, descriptors, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Request,
    Response,
}

/// The `request-cookies` and `response-cookies` snippets.
#[derive(Debug, Clone)]
pub struct CookiesSnippet {
    side: Side,
    descriptors: Vec<Descriptor>,
    ignore_undocumented: bool,
    attributes: Model,
}

impl CookiesSnippet {
    fn new(side: Side, descriptors: Vec<Descriptor>, ignore_undocumented: bool) -> Self {
        Self {
            side,
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

    fn cookies<'a>(&self, operation: &'a Operation) -> &'a [Cookie] {
        match self.side {
            Side::Request => operation.request().cookies(),
            Side::Response => operation.response().cookies(),
        }
    }
}

impl TemplatedSnippet for CookiesSnippet {
    fn snippet_name(&self) -> &str {
        match self.side {
            Side::Request => "request-cookies",
            Side::Response => "response-cookies",
        }
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let names = self.cookies(operation).iter().map(|c| c.name.as_str());
        let (mut undocumented, missing) = descriptor::compare(&self.descriptors, names, false);
        if self.ignore_undocumented {
            undocumented.clear();
        }
        let location = match self.side {
            Side::Request => "request",
            Side::Response => "response",
        };
        Mismatch {
            kind: "Cookies",
            identified_by: "names",
            location,
        }
        .check(&undocumented, &missing)?;

        let rows = descriptor::rows("name", &self.descriptors, |d| {
            d.required_description("cookie")
        })?;
        let mut model = Model::new();
        model.insert("cookies".to_string(), Value::Array(rows));
        Ok(model)
    }
}
