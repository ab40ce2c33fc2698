//! Paths into a JSON payload.
//!
//! `a.b` walks object keys, `a[]` walks every element of an array, `*` matches every key
//! of an object and `['a.b']` quotes a key containing dots.

use crate::error::{RestDocsError, RestDocsResult};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Array,
    Wildcard,
}

/// A parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl JsonFieldPath {
    /// Parses `path`.
    pub fn compile(path: &str) -> RestDocsResult<Self> {
        let malformed =
            || RestDocsError::Snippet(format!("The field path '{}' is malformed", path));
        let mut segments = Vec::new();
        let mut rest = path;
        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix("['") {
                let end = tail.find("']").ok_or_else(malformed)?;
                segments.push(Segment::Key(tail[..end].to_string()));
                rest = &tail[end + 2..];
            } else if let Some(tail) = rest.strip_prefix("[]") {
                segments.push(Segment::Array);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix('.') {
                if tail.is_empty() || segments.is_empty() {
                    return Err(malformed());
                }
                rest = tail;
            } else {
                let end = rest.find(['.', '[']).unwrap_or(rest.len());
                if end == 0 {
                    return Err(malformed());
                }
                let key = &rest[..end];
                segments.push(if key == "*" {
                    Segment::Wildcard
                } else {
                    Segment::Key(key.to_string())
                });
                rest = &rest[end..];
            }
        }
        if segments.is_empty() {
            return Err(malformed());
        }
        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// Whether the path identifies at most one value.
    pub fn is_precise(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Key(_)))
    }

    /// Every value the path matches in `payload`. `null` values count as matches.
    pub fn extract<'a>(&self, payload: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![payload];
        for segment in &self.segments {
            let mut next = Vec::new();
            for value in current {
                match (segment, value) {
                    (Segment::Key(key), Value::Object(map)) => next.extend(map.get(key)),
                    (Segment::Wildcard, Value::Object(map)) => next.extend(map.values()),
                    (Segment::Array, Value::Array(items)) => next.extend(items.iter()),
                    _ => {}
                }
            }
            current = next;
        }
        current
    }

    /// Whether the path matches anything in `payload`.
    pub fn is_present(&self, payload: &Value) -> bool {
        !self.extract(payload).is_empty()
    }

    /// Removes every matched value from `payload`, then removes containers that the
    /// removal left empty.
    pub fn remove(&self, payload: &mut Value) {
        remove_segments(payload, &self.segments);
    }
}

impl fmt::Display for JsonFieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Returns true when `value` became empty through a removal and should be pruned.
fn remove_segments(value: &mut Value, segments: &[Segment]) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return false;
    };
    let mut removed = false;
    match (segment, value) {
        (Segment::Key(key), Value::Object(map)) => {
            if rest.is_empty() {
                removed = map.shift_remove(key).is_some();
            } else if let Some(child) = map.get_mut(key) {
                if remove_segments(child, rest) {
                    map.shift_remove(key);
                    removed = true;
                }
            }
            removed && map.is_empty()
        }
        (Segment::Wildcard, Value::Object(map)) => {
            if rest.is_empty() {
                removed = !map.is_empty();
                map.clear();
            } else {
                let keys: Vec<String> = map.keys().cloned().collect();
                for key in keys {
                    if let Some(child) = map.get_mut(&key) {
                        if remove_segments(child, rest) {
                            map.shift_remove(&key);
                            removed = true;
                        }
                    }
                }
            }
            removed && map.is_empty()
        }
        (Segment::Array, Value::Array(items)) => {
            if rest.is_empty() {
                removed = !items.is_empty();
                items.clear();
            } else {
                let before = items.len();
                items.retain_mut(|item| !remove_segments(item, rest));
                removed = items.len() != before;
            }
            removed && items.is_empty()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> JsonFieldPath {
        JsonFieldPath::compile(p).unwrap()
    }

    #[test]
    fn test_compile() {
        assert!(path("a.b.c").is_precise());
        assert!(!path("a[].b").is_precise());
        assert!(!path("a.*.b").is_precise());
        assert_eq!(
            path("['a.b'].c").segments,
            vec![Segment::Key("a.b".into()), Segment::Key("c".into())]
        );
        assert_eq!(path("[]").segments, vec![Segment::Array]);
        assert!(JsonFieldPath::compile("").is_err());
        assert!(JsonFieldPath::compile("a.").is_err());
        assert!(JsonFieldPath::compile("['a").is_err());
    }

    #[test]
    fn test_extract() {
        let payload = json!({"a": [{"b": 1}, {"b": "two"}, {}], "c": {"x": null, "y": true}});
        assert_eq!(path("a[].b").extract(&payload), vec![&json!(1), &json!("two")]);
        assert_eq!(path("c.*").extract(&payload).len(), 2);
        assert!(path("c.x").is_present(&payload));
        assert!(!path("c.z").is_present(&payload));
        assert!(!path("a.b").is_present(&payload));
    }

    #[test]
    fn test_remove_prunes_emptied_containers() {
        let mut payload = json!({"a": [{"b": 1}, {"b": 2}], "c": {"d": 1}, "e": []});
        path("a[].b").remove(&mut payload);
        path("c.d").remove(&mut payload);
        assert_eq!(payload, json!({"e": []}));
    }

    #[test]
    fn test_remove_subtree() {
        let mut payload = json!({"a": {"b": {"c": 1}}, "d": 2});
        path("a").remove(&mut payload);
        assert_eq!(payload, json!({"d": 2}));
    }

    #[test]
    fn test_remove_keeps_partially_documented_objects() {
        let mut payload = json!({"a": {"b": 1, "c": 2}});
        path("a.b").remove(&mut payload);
        assert_eq!(payload, json!({"a": {"c": 2}}));
    }
}
