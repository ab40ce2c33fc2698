#![deny(missing_docs)]

//! # Parameter Preprocessor

use super::OperationPreprocessor;
use crate::error::RestDocsResult;
use crate::operation::{OperationRequest, Parameters};

#[derive(Debug, Clone)]
enum Modification {
    Add(String, String),
    Set(String, Vec<String>),
    Remove(String),
    RemoveValue(String, String),
}

/// Applies a sequence of parameter modifications to requests. Responses pass through.
#[derive(Debug, Clone, Default)]
pub struct ParametersModifyingOperationPreprocessor {
    modifications: Vec<Modification>,
}

impl ParametersModifyingOperationPreprocessor {
    /// Adds `value` to the parameter `name`.
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

    /// Removes the parameter `name`.
    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.modifications.push(Modification::Remove(name.into()));
        self
    }

    /// Removes `value` from `name`, and the parameter once it has no values.
    pub fn remove_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.modifications
            .push(Modification::RemoveValue(name.into(), value.into()));
        self
    }
}

impl OperationPreprocessor for ParametersModifyingOperationPreprocessor {
    fn preprocess_request(&self, request: &OperationRequest) -> RestDocsResult<OperationRequest> {
        let mut parameters: Parameters = request.parameters().clone();
        for modification in &self.modifications {
            match modification {
                Modification::Add(name, value) => parameters.add(name, value.clone()),
                Modification::Set(name, values) => parameters.set(name, values.clone()),
                Modification::Remove(name) => {
                    parameters.remove(name);
                }
                Modification::RemoveValue(name, value) => parameters.remove_value(name, value),
            }
        }
        Ok(request.with_parameters(parameters))
    }
}
