#![deny(missing_docs)]

//! # Converters
//!
//! The seam between a test framework and the operation model. Each integration provides
//! converters for its native request and response types; the generator only depends on
//! these two traits.

use crate::error::RestDocsResult;
use crate::operation::{OperationRequest, OperationResponse};

/// Recorded (serialized) exchanges and their converter.
pub mod recorded;

pub use recorded::{RecordedExchange, RecordedExchangeConverter, RecordedRequest, RecordedResponse};

/// Converts a framework-specific request into an [`OperationRequest`].
pub trait RequestConverter<R>: Send + Sync {
    /// Converts `request`.
    ///
    /// Fails with a conversion error when the request cannot be read (e.g. its body stream
    /// was already consumed). Conversion is never retried.
    fn convert(&self, request: &R) -> RestDocsResult<OperationRequest>;
}

/// Converts a framework-specific response into an [`OperationResponse`].
pub trait ResponseConverter<R>: Send + Sync {
    /// Converts `response`.
    fn convert(&self, response: &R) -> RestDocsResult<OperationResponse>;
}
