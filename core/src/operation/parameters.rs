#![deny(missing_docs)]

//! # Request Parameters
//!
//! Query-string and form parameters of a request, plus the query-string parser used to
//! work out which parameters are already carried by a URI.

use crate::error::{RestDocsError, RestDocsResult};
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::form_urlencoded::byte_serialize;
use url::Url;

/// Insertion-ordered, multi-valued request parameters.
///
/// A parameter may be present with no values (e.g. `?flag`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    entries: IndexMap<String, Vec<String>>,
}

impl Parameters {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values of `name`.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    /// Replaces all values of `name`.
    pub fn set(&mut self, name: &str, values: Vec<String>) {
        self.entries.insert(name.to_string(), values);
    }

    /// Registers `name` without adding a value.
    pub fn add_name(&mut self, name: &str) {
        self.entries.entry(name.to_string()).or_default();
    }

    /// Returns the values of `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Removes `name` and its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries.shift_remove(name)
    }

    /// Removes one value of `name`, dropping the parameter once no values remain.
    pub fn remove_value(&mut self, name: &str, value: &str) {
        if let Some(values) = self.entries.get_mut(name) {
            values.retain(|v| v != value);
            if values.is_empty() {
                self.entries.shift_remove(name);
            }
        }
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates over `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the parameters as an `application/x-www-form-urlencoded` string.
    ///
    /// e.g. `a=alpha&b=bravo&flag=`
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        for (name, values) in &self.entries {
            if values.is_empty() {
                pairs.push(format!("{}=", encode(name)));
            }
            for value in values {
                pairs.push(format!("{}={}", encode(name), encode(value)));
            }
        }
        pairs.join("&")
    }

    /// Returns the parameters that are not already present in the query string of `uri`.
    ///
    /// A parameter whose name appears in the query keeps only the values the query lacks.
    pub fn unique_parameters(&self, uri: &Url) -> RestDocsResult<Parameters> {
        let in_query = QueryStringParser::parse(uri)?;
        let mut unique = Parameters::new();
        for (name, values) in &self.entries {
            match in_query.get(name) {
                None => unique.set(name, values.clone()),
                Some(existing) => {
                    for candidate in values {
                        if !existing.contains(candidate) {
                            unique.add(name, candidate.clone());
                        }
                    }
                }
            }
        }
        Ok(unique)
    }
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

fn decode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Parses the raw query string of a URI into [`Parameters`].
#[derive(Debug)]
pub struct QueryStringParser;

impl QueryStringParser {
    /// Parses the query of `uri`. A URI without a query yields no parameters.
    pub fn parse(uri: &Url) -> RestDocsResult<Parameters> {
        match uri.query() {
            Some(query) => Self::parse_query(query),
            None => Ok(Parameters::new()),
        }
    }

    /// Parses a raw (still encoded) query string.
    pub fn parse_query(query: &str) -> RestDocsResult<Parameters> {
        let mut parameters = Parameters::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let mut components: Vec<&str> = pair.split('=').collect();
            while components.len() > 1 && components.last() == Some(&"") {
                components.pop();
            }
            match components.as_slice() {
                [name] => parameters.add_name(&decode(name)),
                // Trailing `=` padding stays part of the value.
                [name, _] => parameters.add(&decode(name), decode(&pair[name.len() + 1..])),
                _ => {
                    return Err(RestDocsError::Conversion(format!(
                        "The parameter '{}' is malformed",
                        pair
                    )))
                }
            }
        }
        Ok(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_query_string_encodes() {
        let mut params = Parameters::new();
        params.add("a", "alpha one");
        params.add("b", "x&y");
        params.add_name("flag");
        assert_eq!(params.to_query_string(), "a=alpha+one&b=x%26y&flag=");
    }

    #[test]
    fn test_parse_query() {
        let uri = Url::parse("http://localhost/foo?a=1&a=2&b=%20x&c").unwrap();
        let params = QueryStringParser::parse(&uri).unwrap();
        assert_eq!(params.get("a").unwrap(), ["1", "2"]);
        assert_eq!(params.get("b").unwrap(), [" x"]);
        assert!(params.get("c").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_parameter() {
        let err = QueryStringParser::parse_query("a=b=c").unwrap_err();
        assert!(err.to_string().contains("The parameter 'a=b=c' is malformed"));
    }

    #[test]
    fn test_parse_padded_value() {
        let params = QueryStringParser::parse_query("token=abc==&flag=").unwrap();
        assert_eq!(params.get("token").unwrap(), ["abc=="]);
        assert!(params.get("flag").unwrap().is_empty());
    }

    #[test]
    fn test_unique_parameters() {
        let uri = Url::parse("http://localhost/foo?a=alpha").unwrap();
        let mut params = Parameters::new();
        params.add("a", "alpha");
        params.add("a", "apple");
        params.add("b", "bravo");
        let unique = params.unique_parameters(&uri).unwrap();
        assert_eq!(unique.to_query_string(), "a=apple&b=bravo");
    }
}
