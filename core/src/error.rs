#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `RestDocsError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum RestDocsError {
    /// Wrapper for standard IO errors raised while writing snippets.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A payload could not be parsed as JSON.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// A native request or response could not be converted into the operation model.
    #[from(ignore)]
    #[display("Conversion Error: {_0}")]
    Conversion(String),

    /// No template resource exists for the given snippet name.
    #[from(ignore)]
    #[display("Template named '{_0}' could not be resolved")]
    TemplateNotFound(String),

    /// A template failed to compile or render.
    #[from(ignore)]
    #[display("Template Error: {_0}")]
    Render(String),

    /// The documentation does not match the documented operation.
    #[from(ignore)]
    #[display("{_0}")]
    Snippet(String),

    /// A placeholder in an output path could not be resolved.
    #[from(ignore)]
    #[display("Could not resolve placeholder '{_0}'")]
    Placeholder(String),

    /// Required configuration is missing or invalid.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Configuration(String),

    /// A snippet failed while documenting an operation.
    #[from(ignore)]
    #[display("Failed to document operation '{operation}': {source}")]
    Generation {
        /// Name of the operation being documented.
        operation: String,
        /// The underlying failure.
        source: Box<RestDocsError>,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl std::error::Error for RestDocsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RestDocsError::Io(e) => Some(e),
            RestDocsError::Json(e) => Some(e),
            RestDocsError::Generation { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl RestDocsError {
    /// Wraps `self` as the cause of a failed documentation of `operation`.
    ///
    /// Errors that are already wrapped are returned unchanged.
    pub fn generation(operation: &str, source: RestDocsError) -> Self {
        match source {
            wrapped @ RestDocsError::Generation { .. } => wrapped,
            other => RestDocsError::Generation {
                operation: operation.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Helper type alias for Result using RestDocsError.
pub type RestDocsResult<T> = Result<T, RestDocsError>;
