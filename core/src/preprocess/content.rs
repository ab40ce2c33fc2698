#![deny(missing_docs)]

//! # Content Modification
//!
//! Preprocessors that rewrite the body of a request or response through a
//! [`ContentModifier`] strategy.

use super::OperationPreprocessor;
use crate::error::RestDocsResult;
use crate::operation::request::decode_content;
use crate::operation::{OperationRequest, OperationResponse};
use regex::Regex;
use std::fmt::Debug;
use std::sync::OnceLock;

static LINK_HREF_REGEX: OnceLock<Regex> = OnceLock::new();

/// Rewrites content bytes.
pub trait ContentModifier: Send + Sync + Debug {
    /// Returns the modified form of `content`, whose media type is `content_type`.
    fn modify_content(&self, content: &[u8], content_type: Option<&str>)
        -> RestDocsResult<Vec<u8>>;
}

/// Applies a [`ContentModifier`] to request and response bodies.
///
/// An existing `Content-Length` header is updated to the new length.
#[derive(Debug, Clone)]
pub struct ContentModifyingOperationPreprocessor<M> {
    modifier: M,
}

impl<M: ContentModifier> ContentModifyingOperationPreprocessor<M> {
    /// Wraps `modifier`.
    pub fn new(modifier: M) -> Self {
        Self { modifier }
    }
}

impl<M: ContentModifier> OperationPreprocessor for ContentModifyingOperationPreprocessor<M> {
    fn preprocess_request(&self, request: &OperationRequest) -> RestDocsResult<OperationRequest> {
        let content = self
            .modifier
            .modify_content(request.content(), request.headers().content_type())?;
        Ok(request.with_content(content))
    }

    fn preprocess_response(
        &self,
        response: &OperationResponse,
    ) -> RestDocsResult<OperationResponse> {
        let content = self
            .modifier
            .modify_content(response.content(), response.headers().content_type())?;
        Ok(response.with_content(content))
    }
}

/// Re-indents JSON content. Anything that does not parse as JSON is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyPrintingContentModifier;

impl ContentModifier for PrettyPrintingContentModifier {
    fn modify_content(&self, content: &[u8], _: Option<&str>) -> RestDocsResult<Vec<u8>> {
        if content.is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_slice::<serde_json::Value>(content) {
            Ok(value) => Ok(serde_json::to_vec_pretty(&value)?),
            Err(_) => Ok(content.to_vec()),
        }
    }
}

/// Replaces part of every match of a pattern.
#[derive(Debug, Clone)]
pub struct PatternReplacingContentModifier {
    pattern: Regex,
    replacement: String,
}

impl PatternReplacingContentModifier {
    /// Replaces capture group 1 of each match of `pattern`, or the whole match when the
    /// pattern has no groups.
    pub fn new(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
        }
    }

    /// Applies the replacement to `input`.
    pub fn replace(&self, input: &str) -> String {
        let group = if self.pattern.captures_len() > 1 { 1 } else { 0 };
        let mut output = String::with_capacity(input.len());
        let mut previous = 0;
        for captures in self.pattern.captures_iter(input) {
            if let Some(target) = captures.get(group) {
                output.push_str(&input[previous..target.start()]);
                output.push_str(&self.replacement);
                previous = target.end();
            }
        }
        output.push_str(&input[previous..]);
        output
    }
}

impl ContentModifier for PatternReplacingContentModifier {
    fn modify_content(
        &self,
        content: &[u8],
        content_type: Option<&str>,
    ) -> RestDocsResult<Vec<u8>> {
        let original = decode_content(content, content_type);
        Ok(self.replace(&original).into_bytes())
    }
}

/// Replaces the `href` of every link in JSON content with a mask, `...` by default.
#[derive(Debug, Clone)]
pub struct LinkMaskingContentModifier {
    delegate: PatternReplacingContentModifier,
}

impl LinkMaskingContentModifier {
    /// Masks links with `mask`.
    pub fn new(mask: impl Into<String>) -> Self {
        let pattern = LINK_HREF_REGEX
            .get_or_init(|| Regex::new(r#""href"\s*:\s*"(.*?)""#).expect("Invalid regex"))
            .clone();
        Self {
            delegate: PatternReplacingContentModifier::new(pattern, mask),
        }
    }
}

impl Default for LinkMaskingContentModifier {
    fn default() -> Self {
        Self::new("...")
    }
}

impl ContentModifier for LinkMaskingContentModifier {
    fn modify_content(
        &self,
        content: &[u8],
        content_type: Option<&str>,
    ) -> RestDocsResult<Vec<u8>> {
        self.delegate.modify_content(content, content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use pretty_assertions::assert_eq;

    fn modify(modifier: &impl ContentModifier, input: &str) -> String {
        String::from_utf8(modifier.modify_content(input.as_bytes(), None).unwrap()).unwrap()
    }

    #[test]
    fn test_pretty_print_json() {
        let output = modify(&PrettyPrintingContentModifier, r#"{"a":5,"b":[1,2]}"#);
        assert_eq!(output, "{\n  \"a\": 5,\n  \"b\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_pretty_print_leaves_other_content() {
        assert_eq!(modify(&PrettyPrintingContentModifier, "not json"), "not json");
        assert_eq!(modify(&PrettyPrintingContentModifier, ""), "");
    }

    #[test]
    fn test_pattern_replaces_first_group() {
        let modifier = PatternReplacingContentModifier::new(
            Regex::new(r"id: ([0-9]+)").unwrap(),
            "<<id>>",
        );
        assert_eq!(modify(&modifier, "id: 12, id: 345"), "id: <<id>>, id: <<id>>");
    }

    #[test]
    fn test_pattern_without_groups_replaces_match() {
        let modifier = PatternReplacingContentModifier::new(
            Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}").unwrap(),
            "<<uuid>>",
        );
        assert_eq!(modify(&modifier, "uuid 01234567-89ab end"), "uuid <<uuid>> end");
    }

    #[test]
    fn test_mask_links() {
        let input = r#"{"_links":{"self":{"href":"https://example.com/1"},"b":{"href" : "x"}}}"#;
        assert_eq!(
            modify(&LinkMaskingContentModifier::default(), input),
            r#"{"_links":{"self":{"href":"..."},"b":{"href" : "..."}}}"#
        );
        assert_eq!(
            modify(&LinkMaskingContentModifier::new("@"), r#"{"href":"a"}"#),
            r#"{"href":"@"}"#
        );
    }

    #[test]
    fn test_content_length_follows_modified_content() {
        let response = OperationResponse::new(
            StatusCode::OK,
            [("Content-Length", "7")].into_iter().collect(),
            br#"{"a":1}"#.to_vec(),
        );
        let processed = ContentModifyingOperationPreprocessor::new(PrettyPrintingContentModifier)
            .preprocess_response(&response)
            .unwrap();
        assert_eq!(processed.content_as_string(), "{\n  \"a\": 1\n}");
        assert_eq!(processed.headers().first("Content-Length"), Some("12"));
    }
}
