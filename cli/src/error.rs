#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use restdocs_core::RestDocsError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Documenting an exchange failed.
    #[display("{}", _0)]
    Docs(RestDocsError),

    /// Invalid command line or configuration file values.
    #[from(ignore)]
    #[display("Invalid configuration: {}", _0)]
    Config(String),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// `General(String)` and `Config(String)` carry no source error, so the trait is
/// implemented by hand.
impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Docs(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_errors_display_unchanged() {
        let err: CliError = RestDocsError::TemplateNotFound("curl-request".into()).into();
        assert_eq!(
            err.to_string(),
            "Template named 'curl-request' could not be resolved"
        );
    }
}
