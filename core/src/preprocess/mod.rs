#![deny(missing_docs)]

//! # Preprocessors
//!
//! Transformations applied to a request or response before it is documented.
//!
//! - **content**: `ContentModifier` strategies (pretty printing, pattern replacement and
//!   link masking).
//! - **headers**: header removal and modification.
//! - **parameters**: parameter modification.
//! - **uri**: scheme/host/port/path rewriting of the request URI and of every URI in the content.
//!
//! Preprocessors never modify their input; each returns a new request or response.

use crate::error::RestDocsResult;
use crate::operation::{OperationRequest, OperationResponse};
use regex::Regex;
use std::fmt::Debug;
use std::sync::Arc;

pub mod content;
pub mod headers;
pub mod parameters;
pub mod uri;

pub use content::{
    ContentModifier, ContentModifyingOperationPreprocessor, LinkMaskingContentModifier,
    PatternReplacingContentModifier, PrettyPrintingContentModifier,
};
pub use headers::{HeaderRemovingOperationPreprocessor, HeadersModifyingOperationPreprocessor};
pub use parameters::ParametersModifyingOperationPreprocessor;
pub use uri::UriModifyingOperationPreprocessor;

/// A preprocessor that can be applied to requests, responses, or both.
///
/// Both methods default to the identity transformation so implementors only override the
/// side they care about.
pub trait OperationPreprocessor: Send + Sync + Debug {
    /// Returns a preprocessed copy of `request`.
    fn preprocess_request(&self, request: &OperationRequest) -> RestDocsResult<OperationRequest> {
        Ok(request.clone())
    }

    /// Returns a preprocessed copy of `response`.
    fn preprocess_response(
        &self,
        response: &OperationResponse,
    ) -> RestDocsResult<OperationResponse> {
        Ok(response.clone())
    }
}

/// Preprocesses the request of an operation.
pub trait OperationRequestPreprocessor: Send + Sync + Debug {
    /// Returns a preprocessed copy of `request`.
    fn preprocess(&self, request: &OperationRequest) -> RestDocsResult<OperationRequest>;
}

/// Preprocesses the response of an operation.
pub trait OperationResponsePreprocessor: Send + Sync + Debug {
    /// Returns a preprocessed copy of `response`.
    fn preprocess(&self, response: &OperationResponse) -> RestDocsResult<OperationResponse>;
}

/// Shared handle to an [`OperationPreprocessor`].
pub type PreprocessorRef = Arc<dyn OperationPreprocessor>;

/// Applies its delegates to a request, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct DelegatingOperationRequestPreprocessor {
    delegates: Vec<PreprocessorRef>,
}

impl DelegatingOperationRequestPreprocessor {
    /// Creates a preprocessor folding through `delegates`.
    pub fn new(delegates: Vec<PreprocessorRef>) -> Self {
        Self { delegates }
    }

    /// The delegates, in application order.
    pub fn delegates(&self) -> &[PreprocessorRef] {
        &self.delegates
    }
}

impl OperationRequestPreprocessor for DelegatingOperationRequestPreprocessor {
    fn preprocess(&self, request: &OperationRequest) -> RestDocsResult<OperationRequest> {
        self.delegates
            .iter()
            .try_fold(request.clone(), |current, delegate| {
                delegate.preprocess_request(&current)
            })
    }
}

/// Applies its delegates to a response, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct DelegatingOperationResponsePreprocessor {
    delegates: Vec<PreprocessorRef>,
}

impl DelegatingOperationResponsePreprocessor {
    /// Creates a preprocessor folding through `delegates`.
    pub fn new(delegates: Vec<PreprocessorRef>) -> Self {
        Self { delegates }
    }

    /// The delegates, in application order.
    pub fn delegates(&self) -> &[PreprocessorRef] {
        &self.delegates
    }
}

impl OperationResponsePreprocessor for DelegatingOperationResponsePreprocessor {
    fn preprocess(&self, response: &OperationResponse) -> RestDocsResult<OperationResponse> {
        self.delegates
            .iter()
            .try_fold(response.clone(), |current, delegate| {
                delegate.preprocess_response(&current)
            })
    }
}

/// An [`OperationRequestPreprocessor`] applying `preprocessors` in order.
pub fn preprocess_request(
    preprocessors: Vec<PreprocessorRef>,
) -> DelegatingOperationRequestPreprocessor {
    DelegatingOperationRequestPreprocessor::new(preprocessors)
}

/// An [`OperationResponsePreprocessor`] applying `preprocessors` in order.
pub fn preprocess_response(
    preprocessors: Vec<PreprocessorRef>,
) -> DelegatingOperationResponsePreprocessor {
    DelegatingOperationResponsePreprocessor::new(preprocessors)
}

/// Pretty prints JSON content.
pub fn pretty_print() -> PreprocessorRef {
    Arc::new(ContentModifyingOperationPreprocessor::new(
        PrettyPrintingContentModifier,
    ))
}

/// Removes the headers with the given names (case-insensitive).
pub fn remove_headers<I, S>(names: I) -> PreprocessorRef
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(HeaderRemovingOperationPreprocessor::exact(names))
}

/// Removes the headers whose names fully match any of `patterns`.
pub fn remove_matching_headers(patterns: impl IntoIterator<Item = Regex>) -> PreprocessorRef {
    Arc::new(HeaderRemovingOperationPreprocessor::matching(patterns))
}

/// Masks the `href` of every JSON link with `...`.
pub fn mask_links() -> PreprocessorRef {
    Arc::new(ContentModifyingOperationPreprocessor::new(
        LinkMaskingContentModifier::default(),
    ))
}

/// Masks the `href` of every JSON link with `mask`.
pub fn mask_links_with(mask: impl Into<String>) -> PreprocessorRef {
    Arc::new(ContentModifyingOperationPreprocessor::new(
        LinkMaskingContentModifier::new(mask),
    ))
}

/// Replaces the first capture group of every match of `pattern` (the whole match when the
/// pattern has no groups) with `replacement`.
pub fn replace_pattern(pattern: Regex, replacement: impl Into<String>) -> PreprocessorRef {
    Arc::new(ContentModifyingOperationPreprocessor::new(
        PatternReplacingContentModifier::new(pattern, replacement),
    ))
}

/// A configurable header modifier.
pub fn modify_headers() -> HeadersModifyingOperationPreprocessor {
    HeadersModifyingOperationPreprocessor::default()
}

/// A configurable parameter modifier.
pub fn modify_parameters() -> ParametersModifyingOperationPreprocessor {
    ParametersModifyingOperationPreprocessor::default()
}

/// A configurable URI modifier.
pub fn modify_uris() -> UriModifyingOperationPreprocessor {
    UriModifyingOperationPreprocessor::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use url::Url;

    #[derive(Debug)]
    struct AppendHeader(&'static str);

    impl OperationPreprocessor for AppendHeader {
        fn preprocess_request(
            &self,
            request: &OperationRequest,
        ) -> RestDocsResult<OperationRequest> {
            let mut headers = request.headers().clone();
            headers.add("X-Trail", self.0);
            Ok(request.with_headers(headers))
        }
    }

    fn request() -> OperationRequest {
        OperationRequest::builder(Method::GET, Url::parse("http://localhost/").unwrap()).build()
    }

    #[test]
    fn test_request_delegates_apply_in_order() {
        let delegates: Vec<PreprocessorRef> = vec![
            Arc::new(AppendHeader("a")),
            Arc::new(AppendHeader("b")),
            Arc::new(AppendHeader("c")),
        ];
        let original = request();
        let processed = preprocess_request(delegates).preprocess(&original).unwrap();
        assert_eq!(processed.headers().get("X-Trail").unwrap(), ["a", "b", "c"]);
        assert!(!original.headers().contains("X-Trail"));
    }

    #[test]
    fn test_request_only_preprocessor_leaves_response_alone() {
        let response = OperationResponse::new(
            StatusCode::OK,
            [("X-Trail", "z")].into_iter().collect(),
            vec![],
        );
        let delegates: Vec<PreprocessorRef> = vec![Arc::new(AppendHeader("a"))];
        let processed = preprocess_response(delegates)
            .preprocess(&response)
            .unwrap();
        assert_eq!(processed, response);
    }
}
