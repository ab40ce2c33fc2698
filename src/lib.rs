#![deny(missing_docs)]

//! # RestDocs
//!
//! Documents HTTP APIs from the calls made by tests. Each documented call renders a set of
//! snippets (curl and HTTPie commands, the raw request and response, field, header,
//! parameter and link tables) as Asciidoctor or Markdown files.
//!
//! ```no_run
//! use restdocs::snippet::{field_with_path, response_fields};
//! use restdocs::{ManualRestDocumentation, RecordedExchange, RestDocumentationConfigurer};
//! use restdocs::{RestDocumentationContextProvider, SnippetRef};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> restdocs::RestDocsResult<()> {
//! let mut docs = ManualRestDocumentation::new("target/generated-snippets");
//! docs.before_test("NotesApi", "getNote")?;
//!
//! let exchange = RecordedExchange::from_path(Path::new("exchanges/get-note.yaml"))?;
//! let configuration = RestDocumentationConfigurer::new().build(docs.before_operation()?)?;
//! restdocs::document_with(
//!     "get-note",
//!     vec![Arc::new(response_fields(vec![
//!         field_with_path("id").description("The note's id"),
//!         field_with_path("title").description("The note's title"),
//!     ])) as SnippetRef],
//! )
//! .handle(&exchange.request, &exchange.response, &configuration)?;
//!
//! docs.after_test();
//! # Ok(())
//! # }
//! ```

pub use restdocs_core::*;

/// A generator for recorded exchanges that renders only the configured default snippets.
pub fn document(
    identifier: impl Into<String>,
) -> RestDocumentationGenerator<RecordedRequest, RecordedResponse> {
    RestDocumentationGenerator::for_recorded(identifier)
}

/// A generator for recorded exchanges that renders `snippets` after the configured
/// defaults.
pub fn document_with(
    identifier: impl Into<String>,
    snippets: Vec<SnippetRef>,
) -> RestDocumentationGenerator<RecordedRequest, RecordedResponse> {
    document(identifier).with_snippets(snippets)
}
