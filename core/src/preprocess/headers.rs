#![deny(missing_docs)]

//! # Header Preprocessors

use super::OperationPreprocessor;
use crate::error::RestDocsResult;
use crate::operation::{HttpHeaders, OperationRequest, OperationResponse};
use regex::Regex;

fn full_match(pattern: &Regex, name: &str) -> bool {
    pattern
        .find(name)
        .is_some_and(|m| m.start() == 0 && m.end() == name.len())
}

/// Which headers a [`HeaderRemovingOperationPreprocessor`] removes.
#[derive(Debug, Clone)]
enum HeaderFilter {
    Exact(Vec<String>),
    Pattern(Vec<Regex>),
}

impl HeaderFilter {
    fn excludes(&self, name: &str) -> bool {
        match self {
            HeaderFilter::Exact(names) => names.iter().any(|n| n.eq_ignore_ascii_case(name)),
            HeaderFilter::Pattern(patterns) => patterns.iter().any(|p| full_match(p, name)),
        }
    }
}

/// Removes headers from requests and responses.
#[derive(Debug, Clone)]
pub struct HeaderRemovingOperationPreprocessor {
    filter: HeaderFilter,
}

impl HeaderRemovingOperationPreprocessor {
    /// Removes headers whose names equal one of `names`, ignoring case.
    pub fn exact<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter: HeaderFilter::Exact(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Removes headers whose names fully match one of `patterns`.
    pub fn matching(patterns: impl IntoIterator<Item = Regex>) -> Self {
        Self {
            filter: HeaderFilter::Pattern(patterns.into_iter().collect()),
        }
    }

    fn remove(&self, headers: &HttpHeaders) -> HttpHeaders {
        let mut processed = headers.clone();
        processed.retain_names(|name| !self.filter.excludes(name));
        processed
    }
}

impl OperationPreprocessor for HeaderRemovingOperationPreprocessor {
    fn preprocess_request(&self, request: &OperationRequest) -> RestDocsResult<OperationRequest> {
        Ok(request.with_headers(self.remove(request.headers())))
    }

    fn preprocess_response(
        &self,
        response: &OperationResponse,
    ) -> RestDocsResult<OperationResponse> {
        Ok(response.with_headers(self.remove(response.headers())))
    }
}

#[derive(Debug, Clone)]
enum Modification {
    Add(String, String),
    Set(String, Vec<String>),
    Remove(String),
    RemoveValue(String, String),
    RemoveMatching(Regex),
}

impl Modification {
    fn apply_to(&self, headers: &mut HttpHeaders) {
        match self {
            Modification::Add(name, value) => headers.add(name, value.clone()),
            Modification::Set(name, values) => headers.set(name, values.clone()),
            Modification::Remove(name) => {
                headers.remove(name);
            }
            Modification::RemoveValue(name, value) => headers.remove_value(name, value),
            Modification::RemoveMatching(pattern) => {
                headers.retain_names(|name| !full_match(pattern, name))
            }
        }
    }
}

/// Applies a sequence of header modifications, in the order they were declared.
#[derive(Debug, Clone, Default)]
pub struct HeadersModifyingOperationPreprocessor {
    modifications: Vec<Modification>,
}

impl HeadersModifyingOperationPreprocessor {
    /// Adds `value` to the header `name`.
    pub fn add(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.modifications
            .push(Modification::Add(name.into(), value.into()));
        self
    }

    /// Replaces all values of `name` with `values`.
    pub fn set<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifications.push(Modification::Set(
            name.into(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Removes the header `name`.
    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.modifications.push(Modification::Remove(name.into()));
        self
    }

    /// Removes `value` from the header `name`, and the header once it has no values.
    pub fn remove_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.modifications
            .push(Modification::RemoveValue(name.into(), value.into()));
        self
    }

    /// Removes every header whose name fully matches `pattern`.
    pub fn remove_matching(mut self, pattern: Regex) -> Self {
        self.modifications.push(Modification::RemoveMatching(pattern));
        self
    }

    fn modify(&self, headers: &HttpHeaders) -> HttpHeaders {
        let mut modified = headers.clone();
        for modification in &self.modifications {
            modification.apply_to(&mut modified);
        }
        modified
    }
}

impl OperationPreprocessor for HeadersModifyingOperationPreprocessor {
    fn preprocess_request(&self, request: &OperationRequest) -> RestDocsResult<OperationRequest> {
        Ok(request.with_headers(self.modify(request.headers())))
    }

    fn preprocess_response(
        &self,
        response: &OperationResponse,
    ) -> RestDocsResult<OperationResponse> {
        Ok(response.with_headers(self.modify(response.headers())))
    }
}
