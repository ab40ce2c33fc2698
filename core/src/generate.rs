#![deny(missing_docs)]

//! # Documentation Generator
//!
//! Documents one API call per [`RestDocumentationGenerator::handle`]:
//!
//! 1. The native request and response are converted into the operation model.
//! 2. The request is preprocessed by the call-specific preprocessor, then by the
//!    configured default. The response likewise.
//! 3. An [`Operation`] is built from the results and the configuration.
//! 4. The configured default snippets, then the generator's own snippets, document the
//!    operation in order. The first failure aborts the call.

use crate::config::RestDocumentationConfiguration;
use crate::convert::{
    RecordedExchangeConverter, RecordedRequest, RecordedResponse, RequestConverter,
    ResponseConverter,
};
use crate::error::{RestDocsError, RestDocsResult};
use crate::operation::Operation;
use crate::preprocess::{OperationRequestPreprocessor, OperationResponsePreprocessor};
use crate::snippet::SnippetRef;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Documents API calls made with native request type `Req` and response type `Resp`.
pub struct RestDocumentationGenerator<Req, Resp> {
    identifier: String,
    request_converter: Arc<dyn RequestConverter<Req>>,
    response_converter: Arc<dyn ResponseConverter<Resp>>,
    request_preprocessor: Option<Arc<dyn OperationRequestPreprocessor>>,
    response_preprocessor: Option<Arc<dyn OperationResponsePreprocessor>>,
    snippets: Vec<SnippetRef>,
}

impl<Req, Resp> Clone for RestDocumentationGenerator<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier.clone(),
            request_converter: Arc::clone(&self.request_converter),
            response_converter: Arc::clone(&self.response_converter),
            request_preprocessor: self.request_preprocessor.clone(),
            response_preprocessor: self.response_preprocessor.clone(),
            snippets: self.snippets.clone(),
        }
    }
}

impl<Req, Resp> fmt::Debug for RestDocumentationGenerator<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestDocumentationGenerator")
            .field("identifier", &self.identifier)
            .field("request_preprocessor", &self.request_preprocessor)
            .field("response_preprocessor", &self.response_preprocessor)
            .field("snippets", &self.snippets)
            .finish_non_exhaustive()
    }
}

impl<Req, Resp> RestDocumentationGenerator<Req, Resp> {
    /// Creates a generator documenting calls as `identifier`.
    ///
    /// The identifier names the output directory of the snippets and may contain
    /// placeholders such as `{method-name}` or `{step}`.
    pub fn new(
        identifier: impl Into<String>,
        request_converter: Arc<dyn RequestConverter<Req>>,
        response_converter: Arc<dyn ResponseConverter<Resp>>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            request_converter,
            response_converter,
            request_preprocessor: None,
            response_preprocessor: None,
            snippets: Vec::new(),
        }
    }

    /// Sets the call-specific request preprocessor.
    pub fn with_request_preprocessor(
        mut self,
        preprocessor: impl OperationRequestPreprocessor + 'static,
    ) -> Self {
        self.request_preprocessor = Some(Arc::new(preprocessor));
        self
    }

    /// Sets the call-specific response preprocessor.
    pub fn with_response_preprocessor(
        mut self,
        preprocessor: impl OperationResponsePreprocessor + 'static,
    ) -> Self {
        self.response_preprocessor = Some(Arc::new(preprocessor));
        self
    }

    /// A generator sharing this one's identifier, converters and preprocessors, with
    /// `snippets` as its own snippet list. `self` is left unchanged.
    pub fn with_snippets(&self, snippets: Vec<SnippetRef>) -> Self {
        Self {
            snippets,
            ..self.clone()
        }
    }

    /// The identifier operations are documented as.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The generator's own snippets, run after the configured defaults.
    pub fn snippets(&self) -> &[SnippetRef] {
        &self.snippets
    }

    /// Documents the call made with `request` that produced `response`.
    pub fn handle(
        &self,
        request: &Req,
        response: &Resp,
        configuration: &RestDocumentationConfiguration,
    ) -> RestDocsResult<()> {
        tracing::debug!(operation = %self.identifier, "Documenting operation");

        let mut operation_request = self.request_converter.convert(request)?;
        if let Some(preprocessor) = &self.request_preprocessor {
            operation_request = preprocessor.preprocess(&operation_request)?;
        }
        if let Some(preprocessor) = configuration.default_request_preprocessor() {
            operation_request = preprocessor.preprocess(&operation_request)?;
        }

        let mut operation_response = self.response_converter.convert(response)?;
        if let Some(preprocessor) = &self.response_preprocessor {
            operation_response = preprocessor.preprocess(&operation_response)?;
        }
        if let Some(preprocessor) = configuration.default_response_preprocessor() {
            operation_response = preprocessor.preprocess(&operation_response)?;
        }

        let operation = Operation::new(
            self.identifier.clone(),
            operation_request,
            operation_response,
            configuration.clone(),
        );

        let snippets: Vec<&SnippetRef> = configuration
            .default_snippets()
            .iter()
            .chain(self.snippets.iter())
            .collect();
        let mut seen = HashSet::new();
        for snippet in &snippets {
            if !seen.insert(snippet.name()) {
                tracing::warn!(
                    operation = %self.identifier,
                    snippet = snippet.name(),
                    "Snippet documented more than once; the last output wins"
                );
            }
        }

        for snippet in snippets {
            snippet
                .document(&operation)
                .map_err(|e| RestDocsError::generation(&self.identifier, e))?;
        }
        tracing::info!(operation = %self.identifier, "Operation documented");
        Ok(())
    }
}

impl RestDocumentationGenerator<RecordedRequest, RecordedResponse> {
    /// A generator for recorded exchanges.
    pub fn for_recorded(identifier: impl Into<String>) -> Self {
        let converter = Arc::new(RecordedExchangeConverter);
        Self::new(identifier, converter.clone(), converter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RestDocumentationConfigurer;
    use crate::context::RestDocumentationContext;
    use crate::operation::{HttpHeaders, OperationRequest, OperationResponse};
    use crate::preprocess::{preprocess_request, OperationPreprocessor, PreprocessorRef};
    use crate::snippet::Snippet;
    use crate::templates::Model;
    use http::{Method, StatusCode};
    use std::sync::Mutex;
    use url::Url;

    #[derive(Debug)]
    struct Identity;

    impl RequestConverter<OperationRequest> for Identity {
        fn convert(&self, request: &OperationRequest) -> RestDocsResult<OperationRequest> {
            Ok(request.clone())
        }
    }

    impl ResponseConverter<OperationResponse> for Identity {
        fn convert(&self, response: &OperationResponse) -> RestDocsResult<OperationResponse> {
            Ok(response.clone())
        }
    }

    type Log = Arc<Mutex<Vec<String>>>;

    #[derive(Debug)]
    struct Recording {
        name: String,
        log: Log,
        fail: bool,
    }

    impl Snippet for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        fn document(&self, operation: &Operation) -> RestDocsResult<Model> {
            let order = operation.request().headers().get("X-Order").unwrap_or_default();
            self.log
                .lock()
                .unwrap()
                .push(format!("{} {}", self.name, order.join(",")));
            if self.fail {
                return Err(RestDocsError::Snippet(format!("{} failed", self.name)));
            }
            Ok(Model::new())
        }
    }

    fn recording(name: &str, log: &Log) -> SnippetRef {
        Arc::new(Recording {
            name: name.to_string(),
            log: Arc::clone(log),
            fail: false,
        })
    }

    #[derive(Debug)]
    struct Tag(&'static str);

    impl OperationPreprocessor for Tag {
        fn preprocess_request(
            &self,
            request: &OperationRequest,
        ) -> RestDocsResult<OperationRequest> {
            let mut headers = request.headers().clone();
            headers.add("X-Order", self.0);
            Ok(request.with_headers(headers))
        }
    }

    fn generator() -> RestDocumentationGenerator<OperationRequest, OperationResponse> {
        let identity = Arc::new(Identity);
        RestDocumentationGenerator::new("op", identity.clone(), identity)
    }

    fn exchange() -> (OperationRequest, OperationResponse) {
        (
            OperationRequest::builder(Method::GET, Url::parse("http://localhost/").unwrap())
                .build(),
            OperationResponse::new(StatusCode::OK, HttpHeaders::new(), Vec::new()),
        )
    }

    fn configuration(
        defaults: Vec<SnippetRef>,
        preprocessors: Vec<PreprocessorRef>,
    ) -> RestDocumentationConfiguration {
        RestDocumentationConfigurer::new()
            .snippets(|s| s.with_defaults(defaults))
            .operation_preprocessors(|p| p.with_request_defaults(preprocessors))
            .build(RestDocumentationContext::new("Tests", "test", None))
            .unwrap()
    }

    #[test]
    fn test_defaults_run_before_explicit_snippets() {
        let log = Log::default();
        let configuration =
            configuration(vec![recording("d1", &log), recording("d2", &log)], vec![]);
        let generator = generator().with_snippets(vec![recording("s1", &log)]);
        let (request, response) = exchange();
        generator.handle(&request, &response, &configuration).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["d1 ", "d2 ", "s1 "]);
    }

    #[test]
    fn test_call_specific_preprocessor_runs_first() {
        let log = Log::default();
        let defaults: Vec<PreprocessorRef> =
            vec![Arc::new(Tag("default1")), Arc::new(Tag("default2"))];
        let configuration = configuration(vec![recording("d", &log)], defaults);
        let call_specific: Vec<PreprocessorRef> = vec![Arc::new(Tag("call"))];
        let generator = generator().with_request_preprocessor(preprocess_request(call_specific));
        let (request, response) = exchange();
        generator.handle(&request, &response, &configuration).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["d call,default1,default2"]);
    }

    #[test]
    fn test_with_snippets_is_isolated() {
        let log = Log::default();
        let configuration = configuration(vec![], vec![]);
        let original = generator().with_snippets(vec![recording("x", &log)]);
        let derived = original.with_snippets(vec![recording("y", &log)]);
        let (request, response) = exchange();

        derived.handle(&request, &response, &configuration).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["y "]);
        log.lock().unwrap().clear();
        original.handle(&request, &response, &configuration).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["x "]);
        assert_eq!(original.snippets().len(), 1);
    }

    #[test]
    fn test_first_failure_aborts_and_names_the_operation() {
        let log = Log::default();
        let failing: SnippetRef = Arc::new(Recording {
            name: "broken".to_string(),
            log: Arc::clone(&log),
            fail: true,
        });
        let configuration = configuration(vec![], vec![]);
        let generator = generator().with_snippets(vec![failing, recording("after", &log)]);
        let (request, response) = exchange();
        let err = generator.handle(&request, &response, &configuration).unwrap_err();
        assert_eq!(err.to_string(), "Failed to document operation 'op': broken failed");
        assert_eq!(*log.lock().unwrap(), vec!["broken "]);
    }

    #[test]
    fn test_repeated_snippets_run_each_time() {
        let log = Log::default();
        let configuration = configuration(vec![recording("a", &log)], vec![]);
        let generator = generator().with_snippets(vec![recording("a", &log)]);
        let (request, response) = exchange();
        generator.handle(&request, &response, &configuration).unwrap();
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
