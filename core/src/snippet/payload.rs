#![deny(missing_docs)]

//! # Payloads
//!
//! Snippets for request and response bodies: the raw body, and a table of the JSON
//! fields it contains.
//!
//! Fields snippets check the documentation against the payload. Every documented field
//! that is not optional must be present, documented types must match the payload, and
//! (unless relaxed) every part of the payload must be covered by a documented field. A
//! documented field covers all of its descendants.

/// Field path syntax and matching.
pub mod field_path;

/// Field types.
pub mod field_type;

pub use field_path::JsonFieldPath;
pub use field_type::JsonFieldType;

use super::TemplatedSnippet;
use crate::error::{RestDocsError, RestDocsResult};
use crate::operation::Operation;
use crate::templates::Model;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Request,
    Response,
}

impl Side {
    fn noun(&self) -> &'static str {
        match self {
            Side::Request => "request",
            Side::Response => "response",
        }
    }

    fn content<'a>(&self, operation: &'a Operation) -> &'a [u8] {
        match self {
            Side::Request => operation.request().content(),
            Side::Response => operation.response().content(),
        }
    }

    fn content_as_string(&self, operation: &Operation) -> String {
        match self {
            Side::Request => operation.request().content_as_string(),
            Side::Response => operation.response().content_as_string(),
        }
    }
}

/// The `request-body` snippet.
pub fn request_body() -> BodySnippet {
    BodySnippet::new(Side::Request)
}

/// The `response-body` snippet.
pub fn response_body() -> BodySnippet {
    BodySnippet::new(Side::Response)
}

/// The `request-body` and `response-body` snippets: model key `body`.
#[derive(Debug, Clone)]
pub struct BodySnippet {
    side: Side,
    attributes: Model,
}

impl BodySnippet {
    fn new(side: Side) -> Self {
        Self {
            side,
            attributes: Model::new(),
        }
    }

    /// A copy with additional template attributes.
    pub fn with_attributes(mut self, attributes: Model) -> Self {
        self.attributes.extend(attributes);
        self
    }
}

impl TemplatedSnippet for BodySnippet {
    fn snippet_name(&self) -> &str {
        match self.side {
            Side::Request => "request-body",
            Side::Response => "response-body",
        }
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let mut model = Model::new();
        model.insert(
            "body".to_string(),
            Value::String(self.side.content_as_string(operation)),
        );
        Ok(model)
    }
}

/// Describes a field of a JSON payload.
///
/// ```
/// use restdocs_core::snippet::{field_with_path, JsonFieldType};
///
/// let field = field_with_path("notes[].title")
///     .field_type(JsonFieldType::String)
///     .description("Title of the note");
/// assert_eq!(field.path(), "notes[].title");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    path: String,
    field_type: Option<JsonFieldType>,
    description: Option<String>,
    optional: bool,
    ignored: bool,
    attributes: Model,
}

/// A descriptor for the field at `path`.
pub fn field_with_path(path: impl Into<String>) -> FieldDescriptor {
    FieldDescriptor {
        path: path.into(),
        field_type: None,
        description: None,
        optional: false,
        ignored: false,
        attributes: Model::new(),
    }
}

impl FieldDescriptor {
    /// Declares the type instead of resolving it from the payload.
    pub fn field_type(mut self, field_type: JsonFieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the field as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the field as documented but leaves it out of the snippet.
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Adds an attribute available to the template for this field's row.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The field path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The declared type.
    pub fn declared_type(&self) -> Option<JsonFieldType> {
        self.field_type
    }

    /// Whether the field may be absent.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the field is left out of the snippet.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }
}

/// Documents the fields of the request payload.
pub fn request_fields(descriptors: Vec<FieldDescriptor>) -> FieldsSnippet {
    FieldsSnippet::new(Side::Request, descriptors, false)
}

/// Like [`request_fields`], tolerating undocumented parts of the payload.
pub fn relaxed_request_fields(descriptors: Vec<FieldDescriptor>) -> FieldsSnippet {
    FieldsSnippet::new(Side::Request, descriptors, true)
}

/// Documents the fields of the response payload.
pub fn response_fields(descriptors: Vec<FieldDescriptor>) -> FieldsSnippet {
    FieldsSnippet::new(Side::Response, descriptors, false)
}

/// Like [`response_fields`], tolerating undocumented parts of the payload.
pub fn relaxed_response_fields(descriptors: Vec<FieldDescriptor>) -> FieldsSnippet {
    FieldsSnippet::new(Side::Response, descriptors, true)
}

/// The `request-fields` and `response-fields` snippets.
#[derive(Debug, Clone)]
pub struct FieldsSnippet {
    side: Side,
    descriptors: Vec<FieldDescriptor>,
    ignore_undocumented: bool,
    attributes: Model,
}

impl FieldsSnippet {
    fn new(side: Side, descriptors: Vec<FieldDescriptor>, ignore_undocumented: bool) -> Self {
        Self {
            side,
            descriptors,
            ignore_undocumented,
            attributes: Model::new(),
        }
    }

    /// A copy with additional descriptors.
    pub fn and(&self, descriptors: Vec<FieldDescriptor>) -> Self {
        let mut copy = self.clone();
        copy.descriptors.extend(descriptors);
        copy
    }

    /// A copy with additional template attributes.
    pub fn with_attributes(mut self, attributes: Model) -> Self {
        self.attributes.extend(attributes);
        self
    }

    fn payload(&self, operation: &Operation) -> RestDocsResult<Option<Value>> {
        let content = self.side.content(operation);
        if content.is_empty() {
            if self.descriptors.iter().all(FieldDescriptor::is_optional) {
                return Ok(None);
            }
            let noun = self.side.noun();
            return Err(RestDocsError::Snippet(format!(
                "Cannot document {} fields as the {} body is empty",
                noun, noun
            )));
        }
        Ok(Some(serde_json::from_slice(content)?))
    }

    fn validate(&self, paths: &[JsonFieldPath], payload: Option<&Value>) -> RestDocsResult<()> {
        let mut messages = Vec::new();
        if let Some(payload) = payload {
            if !self.ignore_undocumented {
                let mut remaining = payload.clone();
                for path in paths {
                    path.remove(&mut remaining);
                }
                let empty = match &remaining {
                    Value::Object(map) => map.is_empty(),
                    Value::Array(items) => items.is_empty(),
                    _ => false,
                };
                if !empty {
                    messages.push(format!(
                        "The following parts of the payload were not documented:\n{}",
                        serde_json::to_string_pretty(&remaining)?
                    ));
                }
            }
        }

        let missing: Vec<&str> = self
            .descriptors
            .iter()
            .zip(paths)
            .filter(|(d, path)| {
                !d.is_optional() && !payload.is_some_and(|payload| path.is_present(payload))
            })
            .map(|(d, _)| d.path())
            .collect();
        if !missing.is_empty() {
            messages.push(format!(
                "Fields with the following paths were not found in the payload: [{}]",
                missing.join(", ")
            ));
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(RestDocsError::Snippet(messages.join("\n")))
        }
    }

    fn resolve_type(
        &self,
        descriptor: &FieldDescriptor,
        path: &JsonFieldPath,
        payload: Option<&Value>,
    ) -> RestDocsResult<JsonFieldType> {
        let actual = payload.and_then(|payload| JsonFieldType::common(path.extract(payload)));
        match (descriptor.field_type, actual) {
            (Some(declared), Some(actual))
                if declared != JsonFieldType::Varies
                    && declared != actual
                    && !(descriptor.optional && actual == JsonFieldType::Null) =>
            {
                Err(RestDocsError::Snippet(format!(
                    "The documented type of the field '{}' is {} but the actual type is {}",
                    descriptor.path, declared, actual
                )))
            }
            (Some(declared), _) => Ok(declared),
            (None, Some(actual)) => Ok(actual),
            (None, None) => Err(RestDocsError::Snippet(format!(
                "Cannot determine the type of the field '{}' as it is not present in the \
                 payload. Please declare its type with field_type(..).",
                descriptor.path
            ))),
        }
    }
}

impl TemplatedSnippet for FieldsSnippet {
    fn snippet_name(&self) -> &str {
        match self.side {
            Side::Request => "request-fields",
            Side::Response => "response-fields",
        }
    }

    fn attributes(&self) -> &Model {
        &self.attributes
    }

    fn create_model(&self, operation: &Operation) -> RestDocsResult<Model> {
        let paths = self
            .descriptors
            .iter()
            .map(|d| JsonFieldPath::compile(&d.path))
            .collect::<RestDocsResult<Vec<_>>>()?;
        let payload = self.payload(operation)?;
        self.validate(&paths, payload.as_ref())?;

        let mut fields = Vec::new();
        for (descriptor, path) in self.descriptors.iter().zip(&paths) {
            if descriptor.ignored {
                continue;
            }
            let description = descriptor.description.clone().ok_or_else(|| {
                RestDocsError::Snippet(format!(
                    "The descriptor for field '{}' must either have a description or be \
                     marked as ignored",
                    descriptor.path
                ))
            })?;
            let field_type = self.resolve_type(descriptor, path, payload.as_ref())?;
            let mut row = Model::new();
            row.insert("path".to_string(), Value::String(descriptor.path.clone()));
            row.insert("type".to_string(), Value::String(field_type.to_string()));
            row.insert("description".to_string(), Value::String(description));
            row.insert("optional".to_string(), Value::Bool(descriptor.optional));
            row.extend(descriptor.attributes.clone());
            fields.push(Value::Object(row));
        }

        let mut model = Model::new();
        model.insert("fields".to_string(), Value::Array(fields));
        Ok(model)
    }
}
