#![deny(missing_docs)]

//! # Documentation Context
//!
//! Per-test state used to resolve output paths: the test class and method, the output
//! directory and a step counter that advances once per documented operation.
//!
//! Contexts are plain values passed explicitly through the pipeline; nothing is stored in
//! globals or thread-locals.

use crate::error::{RestDocsError, RestDocsResult};
use std::path::{Path, PathBuf};

/// A snapshot of the documentation state for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestDocumentationContext {
    test_class_name: String,
    test_method_name: String,
    output_directory: Option<PathBuf>,
    step_count: u32,
}

impl RestDocumentationContext {
    /// Creates a context at step zero.
    pub fn new(
        test_class_name: impl Into<String>,
        test_method_name: impl Into<String>,
        output_directory: Option<PathBuf>,
    ) -> Self {
        Self {
            test_class_name: test_class_name.into(),
            test_method_name: test_method_name.into(),
            output_directory,
            step_count: 0,
        }
    }

    /// Simple name of the test class (or module).
    pub fn test_class_name(&self) -> &str {
        &self.test_class_name
    }

    /// Name of the test method (or function).
    pub fn test_method_name(&self) -> &str {
        &self.test_method_name
    }

    /// Root directory for generated snippets. `None` writes snippets to standard output.
    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    /// Number of operations documented so far in the current test, 1-based once an
    /// operation has begun.
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    fn next_step(&mut self) -> Self {
        self.step_count += 1;
        self.clone()
    }
}

/// Supplies the context for each documented operation.
pub trait RestDocumentationContextProvider {
    /// Advances the step counter and returns a snapshot for the operation about to be
    /// documented.
    fn before_operation(&mut self) -> RestDocsResult<RestDocumentationContext>;
}

/// Lifecycle driven explicitly by the caller: `before_test`, any number of
/// `before_operation` calls, then `after_test`.
///
/// ```
/// use restdocs_core::context::{ManualRestDocumentation, RestDocumentationContextProvider};
///
/// let mut docs = ManualRestDocumentation::new("target/generated-snippets");
/// docs.before_test("NotesApi", "createNote").unwrap();
/// assert_eq!(docs.before_operation().unwrap().step_count(), 1);
/// assert_eq!(docs.before_operation().unwrap().step_count(), 2);
/// docs.after_test();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualRestDocumentation {
    output_directory: Option<PathBuf>,
    context: Option<RestDocumentationContext>,
}

impl ManualRestDocumentation {
    /// Writes snippets beneath `output_directory`.
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: Some(output_directory.into()),
            context: None,
        }
    }

    /// Writes snippets to standard output unless their resolved path is absolute.
    pub fn to_stdout() -> Self {
        Self::default()
    }

    /// Starts a test. Fails when the previous test was not ended with `after_test`.
    pub fn before_test(
        &mut self,
        test_class_name: impl Into<String>,
        test_method_name: impl Into<String>,
    ) -> RestDocsResult<()> {
        if self.context.is_some() {
            return Err(RestDocsError::Configuration(
                "Context already exists. Did you forget to call after_test()?".to_string(),
            ));
        }
        self.context = Some(RestDocumentationContext::new(
            test_class_name,
            test_method_name,
            self.output_directory.clone(),
        ));
        Ok(())
    }

    /// Ends the current test, discarding its context.
    pub fn after_test(&mut self) {
        self.context = None;
    }
}

impl RestDocumentationContextProvider for ManualRestDocumentation {
    fn before_operation(&mut self) -> RestDocsResult<RestDocumentationContext> {
        match self.context.as_mut() {
            Some(context) => Ok(context.next_step()),
            None => Err(RestDocsError::Configuration(
                "Context is not available. Did you forget to call before_test()?".to_string(),
            )),
        }
    }
}
