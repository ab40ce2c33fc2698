//! Custom Tera filters.

use super::TemplateFormat;
use std::collections::HashMap;
use tera::{Result, Value};

/// Builds the `table_cell` filter for `format`.
///
/// Strings are escaped for use inside a table cell; other values pass through untouched.
pub(crate) fn table_cell(
    format: TemplateFormat,
) -> impl Fn(&Value, &HashMap<String, Value>) -> Result<Value> + Send + Sync {
    move |value: &Value, _args: &HashMap<String, Value>| match value.as_str() {
        Some(s) => Ok(Value::String(format.escape_table_cell(s))),
        None => Ok(value.clone()),
    }
}
