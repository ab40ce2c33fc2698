#![deny(missing_docs)]

//! # Descriptors
//!
//! Documentation of a named item of an operation (header, parameter, part, cookie or
//! link) and the checks shared by the snippets that consume them.

use crate::error::{RestDocsError, RestDocsResult};
use crate::templates::Model;
use serde_json::Value;
use std::collections::BTreeSet;

/// Describes one named item of a request or response.
///
/// ```
/// use restdocs_core::snippet::header_with_name;
///
/// let descriptor = header_with_name("X-Trace").description("Trace id").optional();
/// assert!(descriptor.is_optional());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    name: String,
    description: Option<String>,
    optional: bool,
    ignored: bool,
    attributes: Model,
}

impl Descriptor {
    /// A descriptor for the item `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            optional: false,
            ignored: false,
            attributes: Model::new(),
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the item as optional: its absence is not an error.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the item as ignored: it counts as documented but is left out of the snippet.
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Adds an attribute available to the template for this item's row.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Name of the described item.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description, if one was given.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the item may be absent.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the item is left out of the snippet.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Per-descriptor attributes.
    pub fn attributes(&self) -> &Model {
        &self.attributes
    }

    /// The description, or an error naming the item when there is none.
    pub(crate) fn required_description(&self, kind: &str) -> RestDocsResult<String> {
        self.description.clone().ok_or_else(|| {
            RestDocsError::Snippet(format!(
                "The descriptor for {} '{}' must either have a description or be marked as ignored",
                kind, self.name
            ))
        })
    }

    /// The row of this descriptor: `{<key>: name, description, optional}` plus attributes.
    pub(crate) fn row(&self, key: &str, description: String) -> Value {
        let mut row = Model::new();
        row.insert(key.to_string(), Value::String(self.name.clone()));
        row.insert("description".to_string(), Value::String(description));
        row.insert("optional".to_string(), Value::Bool(self.optional));
        row.extend(self.attributes.clone());
        Value::Object(row)
    }
}

/// Rows for every descriptor that is not ignored, in declaration order.
pub(crate) fn rows(
    key: &str,
    descriptors: &[Descriptor],
    describe: impl Fn(&Descriptor) -> RestDocsResult<String>,
) -> RestDocsResult<Vec<Value>> {
    descriptors
        .iter()
        .filter(|d| !d.is_ignored())
        .map(|d| Ok(d.row(key, describe(d)?)))
        .collect()
}

/// Compares documented names with the names actually present.
///
/// Returns the undocumented names and the missing names of required descriptors.
pub(crate) fn compare<'a>(
    descriptors: &[Descriptor],
    actual: impl IntoIterator<Item = &'a str>,
    ignore_case: bool,
) -> (BTreeSet<String>, BTreeSet<String>) {
    let matches = |a: &str, b: &str| {
        if ignore_case {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    };
    let actual: Vec<&str> = actual.into_iter().collect();
    let undocumented = actual
        .iter()
        .filter(|name| !descriptors.iter().any(|d| matches(d.name(), name)))
        .map(|name| name.to_string())
        .collect();
    let missing = descriptors
        .iter()
        .filter(|d| !d.is_optional())
        .filter(|d| !actual.iter().any(|name| matches(d.name(), name)))
        .map(|d| d.name().to_string())
        .collect();
    (undocumented, missing)
}

/// Builds the error reported when documentation and operation disagree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mismatch<'a> {
    /// Plural noun of the items, e.g. `Path parameters`.
    pub kind: &'a str,
    /// What identifies an item, `names` or `relations`.
    pub identified_by: &'a str,
    /// Where items are looked for: `request`, `response` or `payload`.
    pub location: &'a str,
}

impl Mismatch<'_> {
    /// Fails when either set is non-empty.
    pub(crate) fn check(
        &self,
        undocumented: &BTreeSet<String>,
        missing: &BTreeSet<String>,
    ) -> RestDocsResult<()> {
        let mut messages = Vec::new();
        if !undocumented.is_empty() {
            messages.push(format!(
                "{} with the following {} were not documented: {}",
                self.kind,
                self.identified_by,
                list(undocumented)
            ));
        }
        if !missing.is_empty() {
            messages.push(format!(
                "{} with the following {} were not found in the {}: {}",
                self.kind,
                self.identified_by,
                self.location,
                list(missing)
            ));
        }
        if messages.is_empty() {
            Ok(())
        } else {
            Err(RestDocsError::Snippet(messages.join(". ")))
        }
    }
}

/// Renders names as `[a, b]`.
pub(crate) fn list(names: &BTreeSet<String>) -> String {
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptors() -> Vec<Descriptor> {
        vec![
            Descriptor::new("a").description("one"),
            Descriptor::new("b").description("two").optional(),
            Descriptor::new("c").ignored(),
        ]
    }

    #[test]
    fn test_rows_skip_ignored_and_merge_attributes() {
        let mut descriptors = descriptors();
        descriptors[0] = descriptors[0].clone().attribute("constraint", "NotNull");
        let rows = rows("name", &descriptors, |d| d.required_description("parameter")).unwrap();
        assert_eq!(
            rows,
            vec![
                json!({"name": "a", "description": "one", "optional": false, "constraint": "NotNull"}),
                json!({"name": "b", "description": "two", "optional": true}),
            ]
        );
    }

    #[test]
    fn test_missing_description_is_an_error() {
        let err = rows("name", &[Descriptor::new("x")], |d| {
            d.required_description("header")
        })
        .unwrap_err();
        assert!(err.to_string().contains("header 'x'"));
    }

    #[test]
    fn test_compare_reports_sorted_names() {
        let (undocumented, missing) = compare(&descriptors(), ["z", "y", "c"], false);
        assert_eq!(list(&undocumented), "[y, z]");
        assert_eq!(list(&missing), "[a]");
    }

    #[test]
    fn test_compare_ignoring_case() {
        let (undocumented, missing) = compare(&descriptors(), ["A", "C"], true);
        assert!(undocumented.is_empty());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_mismatch_message() {
        let mismatch = Mismatch {
            kind: "Query parameters",
            identified_by: "names",
            location: "request",
        };
        let undocumented: BTreeSet<String> = ["b".to_string()].into();
        let missing: BTreeSet<String> = ["a".to_string()].into();
        assert_eq!(
            mismatch.check(&undocumented, &missing).unwrap_err().to_string(),
            "Query parameters with the following names were not documented: [b]. \
             Query parameters with the following names were not found in the request: [a]"
        );
        assert!(mismatch.check(&BTreeSet::new(), &BTreeSet::new()).is_ok());
    }
}
