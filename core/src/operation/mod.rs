#![deny(missing_docs)]

//! # Operation Model
//!
//! Immutable value types describing one documented API call: the request, the response
//! and the configuration snapshot the call was documented with.

/// Header map and media type helpers.
pub mod headers;

/// Query and form parameters.
pub mod parameters;

/// The request side of an operation.
pub mod request;

/// The response side of an operation.
pub mod response;

pub use headers::HttpHeaders;
pub use parameters::{Parameters, QueryStringParser};
pub use request::{Cookie, OperationRequest, OperationRequestBuilder, OperationRequestPart};
pub use response::OperationResponse;

use crate::config::RestDocumentationConfiguration;

/// A documented operation: the canonical request + response + attributes triple.
///
/// Created once per documented call by the generator and handed to every snippet.
#[derive(Debug, Clone)]
pub struct Operation {
    name: String,
    request: OperationRequest,
    response: OperationResponse,
    attributes: RestDocumentationConfiguration,
}

impl Operation {
    /// Creates an operation.
    pub fn new(
        name: impl Into<String>,
        request: OperationRequest,
        response: OperationResponse,
        attributes: RestDocumentationConfiguration,
    ) -> Self {
        Self {
            name: name.into(),
            request,
            response,
            attributes,
        }
    }

    /// The operation's name, possibly containing output path placeholders.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The (preprocessed) request.
    pub fn request(&self) -> &OperationRequest {
        &self.request
    }

    /// The (preprocessed) response.
    pub fn response(&self) -> &OperationResponse {
        &self.response
    }

    /// The configuration the operation is documented with.
    pub fn attributes(&self) -> &RestDocumentationConfiguration {
        &self.attributes
    }
}
