#![deny(missing_docs)]

//! # HTTP Headers
//!
//! An insertion-ordered, case-insensitive, multi-valued header map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the `Content-Type` header.
pub const CONTENT_TYPE: &str = "Content-Type";
/// Name of the `Content-Length` header.
pub const CONTENT_LENGTH: &str = "Content-Length";
/// Name of the `Host` header.
pub const HOST: &str = "Host";
/// Name of the `Authorization` header.
pub const AUTHORIZATION: &str = "Authorization";

/// Multi-valued HTTP headers.
///
/// Lookups ignore ASCII case. The spelling used by the first insertion of a name is the
/// spelling rendered in snippets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HttpHeaders {
    entries: IndexMap<String, Vec<String>>,
}

impl HttpHeaders {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, name: &str) -> Option<String> {
        self.entries
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Appends `value` to the values of `name`.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        match self.key_of(name) {
            Some(key) => self.entries.entry(key).or_default().push(value.into()),
            None => {
                self.entries.insert(name.to_string(), vec![value.into()]);
            }
        }
    }

    /// Replaces all values of `name` with `values`.
    pub fn set(&mut self, name: &str, values: Vec<String>) {
        match self.key_of(name) {
            Some(key) => {
                self.entries.insert(key, values);
            }
            None => {
                self.entries.insert(name.to_string(), values);
            }
        }
    }

    /// Returns all values of `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// Returns the first value of `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    /// Removes `name` and all of its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let key = self.key_of(name)?;
        self.entries.shift_remove(&key)
    }

    /// Removes a single value of `name`, dropping the header once it has no values left.
    pub fn remove_value(&mut self, name: &str, value: &str) {
        if let Some(key) = self.key_of(name) {
            if let Some(values) = self.entries.get_mut(&key) {
                values.retain(|v| v != value);
                if values.is_empty() {
                    self.entries.shift_remove(&key);
                }
            }
        }
    }

    /// Removes every header whose name satisfies `predicate`.
    pub fn retain_names(&mut self, mut predicate: impl FnMut(&str) -> bool) {
        self.entries.retain(|k, _| predicate(k));
    }

    /// Whether a header with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.key_of(name).is_some()
    }

    /// Iterates over `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Header names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no headers are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first `Content-Type` value, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.first(CONTENT_TYPE)
    }

    /// Applies `f` to every value, keeping names and order.
    pub fn map_values(&self, mut f: impl FnMut(&str) -> String) -> HttpHeaders {
        let entries = self
            .entries
            .iter()
            .map(|(k, values)| (k.clone(), values.iter().map(|v| f(v)).collect()))
            .collect();
        HttpHeaders { entries }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for HttpHeaders {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = HttpHeaders::new();
        for (name, value) in iter {
            headers.add(&name.into(), value);
        }
        headers
    }
}

/// Whether a media type string is JSON (`application/json`, `application/*+json`).
pub fn is_json_media_type(content_type: &str) -> bool {
    let essence = media_type_essence(content_type);
    essence == "application/json" || essence.ends_with("+json")
}

/// Lower-cased `type/subtype` part of a media type, without parameters.
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// The `charset` parameter of a media type, lower-cased.
pub fn media_type_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_ascii_lowercase())
        } else {
            None
        }
    })
}
