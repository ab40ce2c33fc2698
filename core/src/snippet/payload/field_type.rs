//! JSON field types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The type of a JSON field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JsonFieldType {
    /// A JSON array.
    Array,
    /// `true` or `false`.
    Boolean,
    /// A JSON object.
    Object,
    /// A JSON number.
    Number,
    /// `null`.
    Null,
    /// A JSON string.
    String,
    /// Different types in different places of the payload.
    Varies,
}

impl JsonFieldType {
    /// The type of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => JsonFieldType::Array,
            Value::Bool(_) => JsonFieldType::Boolean,
            Value::Object(_) => JsonFieldType::Object,
            Value::Number(_) => JsonFieldType::Number,
            Value::Null => JsonFieldType::Null,
            Value::String(_) => JsonFieldType::String,
        }
    }

    /// The common type of `values`, `Varies` when they differ, `None` when empty.
    pub fn common<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<Self> {
        values.into_iter().map(Self::of).reduce(|common, next| {
            if common == next {
                common
            } else {
                JsonFieldType::Varies
            }
        })
    }
}

impl fmt::Display for JsonFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonFieldType::Array => "Array",
            JsonFieldType::Boolean => "Boolean",
            JsonFieldType::Object => "Object",
            JsonFieldType::Number => "Number",
            JsonFieldType::Null => "Null",
            JsonFieldType::String => "String",
            JsonFieldType::Varies => "Varies",
        };
        f.write_str(name)
    }
}
