#![deny(missing_docs)]

//! # RestDocs Core
//!
//! Core library for documenting HTTP APIs from the requests and responses of tests.
//!
//! A documented call flows through a fixed pipeline: converters turn native
//! request/response types into the operation model, preprocessors clean them up, and
//! snippets render templates into Asciidoctor or Markdown files.

/// Shared error types.
pub mod error;

/// Request, response and operation model.
pub mod operation;

/// Native request/response conversion.
pub mod convert;

/// Request and response preprocessing.
pub mod preprocess;

/// Template resolution and rendering.
pub mod templates;

/// Snippets and their output.
pub mod snippet;

/// Per-test documentation context.
pub mod context;

/// Typed documentation configuration.
pub mod config;

/// The documentation pipeline.
pub mod generate;

pub use config::{RestDocumentationConfiguration, RestDocumentationConfigurer};
pub use context::{
    ManualRestDocumentation, RestDocumentationContext, RestDocumentationContextProvider,
};
pub use convert::{
    RecordedExchange, RecordedExchangeConverter, RecordedRequest, RecordedResponse,
    RequestConverter, ResponseConverter,
};
pub use error::{RestDocsError, RestDocsResult};
pub use generate::RestDocumentationGenerator;
pub use operation::{
    Cookie, HttpHeaders, Operation, OperationRequest, OperationRequestPart, OperationResponse,
    Parameters,
};
pub use snippet::{Snippet, SnippetRef, TemplatedSnippet};
pub use templates::{Model, TemplateFormat};
