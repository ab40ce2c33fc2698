#![deny(missing_docs)]

//! # Hypermedia Links
//!
//! Documents the links of a response payload. Links are found by a [`LinkExtractor`]:
//!
//! * [`hal_links`] reads HAL (`{"_links": {"self": {"href": ".."}}}`).
//! * [`atom_links`] reads Atom-style JSON (`{"links": [{"rel": "self", "href": ".."}]}`).
//!
//! Without an explicit extractor, the response's `Content-Type` decides:
//! `application/hal+json` is read as HAL and any other JSON as Atom.

use super::descriptor::{self, Descriptor, Mismatch};
use super::TemplatedSnippet;
use crate::error::{RestDocsError, RestDocsResult};
use crate::operation::headers::{is_json_media_type, media_type_essence};
use crate::operation::{Operation, OperationResponse};
use crate::templates::Model;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// A link found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    /// Relation of the link.
    #[serde(default)]
    pub rel: String,
    /// Target of the link.
    pub href: String,
    /// Optional human-readable title.
    #[serde(default)]
    pub title: Option<String>,
}

/// Links grouped by relation, in payload order.
pub type Links = IndexMap<String, Vec<Link>>;

/// Extracts links from a response.
pub trait LinkExtractor: Send + Sync + Debug {
    /// Links of `response`, grouped by relation.
    fn extract_links(&self, response: &OperationResponse) -> RestDocsResult<Links>;
}

fn payload(response: &OperationResponse) -> RestDocsResult<Option<Value>> {
    if response.content().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(response.content())?))
}

/// Reads HAL `_links`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalLinkExtractor;

impl LinkExtractor for HalLinkExtractor {
    fn extract_links(&self, response: &OperationResponse) -> RestDocsResult<Links> {
        let mut links = Links::new();
        let Some(Value::Object(mut root)) = payload(response)? else {
            return Ok(links);
        };
        let Some(Value::Object(by_rel)) = root.remove("_links") else {
            return Ok(links);
        };
        for (rel, value) in by_rel {
            let entries = match value {
                Value::Array(items) => items,
                other => vec![other],
            };
            for entry in entries {
                let mut link: Link = serde_json::from_value(entry)?;
                link.rel = rel.clone();
                links.entry(rel.clone()).or_default().push(link);
            }
        }
        Ok(links)
    }
}

/// Reads Atom-style `links` arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomLinkExtractor;

impl LinkExtractor for AtomLinkExtractor {
    fn extract_links(&self, response: &OperationResponse) -> RestDocsResult<Links> {
        let mut links = Links::new();
        let Some(Value::Object(mut root)) = payload(response)? else {
            return Ok(links);
        };
        let Some(Value::Array(items)) = root.remove("links") else {
            return Ok(links);
        };
        for item in items {
            let link: Link = serde_json::from_value(item)?;
            links.entry(link.rel.clone()).or_default().push(link);
        }
        Ok(links)
    }
}

/// Picks an extractor from the response's `Content-Type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentTypeLinkExtractor;

impl LinkExtractor for ContentTypeLinkExtractor {
    fn extract_links(&self, response: &OperationResponse) -> RestDocsResult<Links> {
        if response.content().is_empty() {
            return Ok(Links::new());
        }
        let content_type = response.headers().content_type().unwrap_or_default();
        if media_type_essence(content_type) == "application/hal+json" {
            HalLinkExtractor.extract_links(response)
        } else if is_json_media_type(content_type) {
            AtomLinkExtractor.extract_links(response)
        } else {
            Err(RestDocsError::Snippet(format!(
                "No LinkExtractor has been provided and one is not available for the content type {}",
                content_type
            )))
        }
    }
}

/// HAL link extraction.
pub fn hal_links() -> HalLinkExtractor {
    HalLinkExtractor
}

/// Atom link extraction.
pub fn atom_links() -> AtomLinkExtractor {
    AtomLinkExtractor
}

/// A descriptor for the link relation `rel`.
pub fn link_with_rel(rel: impl Into<String>) -> Descriptor {
    Descriptor::new(rel)
}

/// Documents links, choosing the extractor from the response's content type.
pub fn links(descriptors: Vec<Descriptor>) -> LinksSnippet {
    LinksSnippet::new(Arc::new(ContentTypeLinkExtractor), descriptors, false)
}

/// Documents links found by `extractor`.
pub fn links_with(
    extractor: impl LinkExtractor + 'static,
    descriptors: Vec<Descriptor>,
) -> LinksSnippet {
    LinksSnippet::new(Arc::new(extractor), descriptors, false)
}

/// Like [`links`], tolerating undocumented relations.
pub fn relaxed_links(descriptors: Vec<Descriptor>) -> LinksSnippet {
    LinksSnippet::new(Arc::new(ContentTypeLinkExtractor), descriptors, true)
}

/// Like [`links_with`], tolerating undocumented relations.
pub fn relaxed_links_with(
    extractor: impl LinkExtractor + 'static,
    descriptors: Vec<Descriptor>,
) -> LinksSnippet {
    LinksSnippet::new(Arc::new(extractor), descriptors, true)
}

/// The `links` snippet.
#[derive(Debug, Clone)]
pub struct LinksSnippet {
    extractor: Arc<dyn LinkExtractor>,
    descriptors: Vec<Descriptor>,
    ignore_undocumented: bool,
    attributes: Model,
}

impl LinksSnippet {
    fn new(
        extractor: Arc<dyn LinkExtractor>,
        descriptors: Vec<Descriptor>,
        ignore_undocumented: bool,
    ) -> Self {
        Self {
            extractor,
            descriptors,
            ignore_undocumented,
            attributes: Model::new(),
        }
    }

    /// A copy with additional descriptors.
    pub fn and(&self, descriptors: Vec<Descriptor>) -> Self {
        let mut copy = self.clone();
        copy.descriptors.extend(descriptors);
        copy
    }

    /// A copy with additional template attributes.
    pub fn with_attributes(mut self, attributes: Model) -> Self {
        self.attributes.extend(attributes);
        self
    }
}

impl TemplatedSnippet for LinksSnippet {
    fn snippet_name(&self) -> &str {
        "links"
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let links = self.extractor.extract_links(operation.response())?;
        let (mut undocumented, missing) =
            descriptor::compare(&self.descriptors, links.keys().map(String::as_str), false);
        if self.ignore_undocumented {
            undocumented.clear();
        }
        Mismatch {
            kind: "Links",
            identified_by: "relations",
            location: "response",
        }
        .check(&undocumented, &missing)?;

        let rows = descriptor::rows("rel", &self.descriptors, |d| {
            if let Some(description) = d.description_text() {
                return Ok(description.to_string());
            }
            links
                .get(d.name())
                .and_then(|found| found.iter().find_map(|l| l.title.clone()))
                .ok_or_else(|| {
                    RestDocsError::Snippet(format!(
                        "No description was provided for the link with rel '{}' and no \
                         title was available from the link in the payload",
                        d.name()
                    ))
                })
        })?;
        let mut model = Model::new();
        model.insert("links".to_string(), Value::Array(rows));
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::operation;
    use super::*;
    use crate::operation::{HttpHeaders, OperationRequest};
    use http::{Method, StatusCode};
    use serde_json::json;
    use url::Url;

    fn response(content_type: &str, body: Value) -> OperationResponse {
        OperationResponse::new(
            StatusCode::OK,
            [("Content-Type", content_type)].into_iter().collect::<HttpHeaders>(),
            body.to_string().into_bytes(),
        )
    }

    fn documented(response: OperationResponse) -> Operation {
        operation(
            OperationRequest::builder(Method::GET, Url::parse("http://localhost/").unwrap())
                .build(),
            response,
        )
    }

    fn hal() -> OperationResponse {
        response(
            "application/hal+json",
            json!({"_links": {
                "self": {"href": "http://localhost/notes/1"},
                "alpha": [{"href": "http://a/1", "title": "Alpha one"}, {"href": "http://a/2"}]
            }}),
        )
    }

    #[test]
    fn test_hal_extraction() {
        let links = HalLinkExtractor.extract_links(&hal()).unwrap();
        assert_eq!(links.keys().collect::<Vec<_>>(), vec!["self", "alpha"]);
        assert_eq!(links["alpha"].len(), 2);
        assert_eq!(links["alpha"][0].title.as_deref(), Some("Alpha one"));
        assert_eq!(links["self"][0].rel, "self");
    }

    #[test]
    fn test_atom_extraction() {
        let response = response(
            "application/json",
            json!({"links": [{"rel": "self", "href": "http://localhost/"}]}),
        );
        let links = ContentTypeLinkExtractor.extract_links(&response).unwrap();
        assert_eq!(links["self"][0].href, "http://localhost/");
    }

    #[test]
    fn test_title_used_when_description_is_absent() {
        let snippet = links(vec![
            link_with_rel("self").description("This note"),
            link_with_rel("alpha"),
        ]);
        let model = snippet.create_model(&documented(hal())).unwrap();
        assert_eq!(
            model["links"],
            json!([
                {"rel": "self", "description": "This note", "optional": false},
                {"rel": "alpha", "description": "Alpha one", "optional": false}
            ])
        );
    }

    #[test]
    fn test_no_description_and_no_title() {
        let snippet = links(vec![link_with_rel("self"), link_with_rel("alpha").ignored()]);
        let err = snippet.create_model(&documented(hal())).unwrap_err();
        assert!(err.to_string().contains("link with rel 'self'"));
    }

    #[test]
    fn test_undocumented_and_missing_relations() {
        let snippet = links_with(
            hal_links(),
            vec![
                link_with_rel("self").description("Self"),
                link_with_rel("next").description("Next"),
            ],
        );
        let err = snippet.create_model(&documented(hal())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Links with the following relations were not documented: [alpha]. \
             Links with the following relations were not found in the response: [next]"
        );
        let relaxed = relaxed_links(vec![link_with_rel("self").description("Self")]);
        assert!(relaxed.create_model(&documented(hal())).is_ok());
    }

    #[test]
    fn test_unsupported_content_type() {
        let response = OperationResponse::new(
            StatusCode::OK,
            [("Content-Type", "text/plain")].into_iter().collect(),
            b"hello".to_vec(),
        );
        assert!(ContentTypeLinkExtractor.extract_links(&response).is_err());
    }
}
