#![deny(missing_docs)]

//! # Placeholders
//!
//! Operation and snippet names may contain `{placeholder}` tokens that are resolved
//! against the [`RestDocumentationContext`] of the operation:
//!
//! | Placeholder | Value |
//! |---|---|
//! | `{step}` | step count |
//! | `{methodName}` | test method name, unchanged |
//! | `{method-name}` | test method name, kebab-case |
//! | `{method_name}` | test method name, snake_case |
//! | `{ClassName}` | test class name, unchanged |
//! | `{class-name}` | test class name, kebab-case |
//! | `{class_name}` | test class name, snake_case |

use crate::context::RestDocumentationContext;
use crate::error::{RestDocsError, RestDocsResult};
use heck::{ToKebabCase, ToSnakeCase};

/// Resolves the value of a named placeholder.
pub trait PlaceholderResolver {
    /// The value of `name`, or `None` when it is unknown.
    fn resolve_placeholder(&self, name: &str) -> Option<String>;
}

/// Resolves placeholders from a [`RestDocumentationContext`].
#[derive(Debug, Clone, Copy)]
pub struct RestDocumentationContextPlaceholderResolver<'a> {
    context: &'a RestDocumentationContext,
}

impl<'a> RestDocumentationContextPlaceholderResolver<'a> {
    /// Creates a resolver for `context`.
    pub fn new(context: &'a RestDocumentationContext) -> Self {
        Self { context }
    }
}

impl PlaceholderResolver for RestDocumentationContextPlaceholderResolver<'_> {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        let method = self.context.test_method_name();
        let class = self.context.test_class_name();
        match name {
            "step" => Some(self.context.step_count().to_string()),
            "methodName" => Some(method.to_string()),
            "method-name" => Some(method.to_kebab_case()),
            "method_name" => Some(method.to_snake_case()),
            "ClassName" => Some(class.to_string()),
            "class-name" => Some(class.to_kebab_case()),
            "class_name" => Some(class.to_snake_case()),
            _ => None,
        }
    }
}

/// Replaces every `{name}` in `input` using `resolver`.
///
/// An unknown placeholder is an error; text without a closing brace is kept as is.
pub fn replace_placeholders(
    input: &str,
    resolver: &dyn PlaceholderResolver,
) -> RestDocsResult<String> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('{') {
        let Some(length) = rest[start + 1..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + 1 + length];
        let value = resolver
            .resolve_placeholder(name)
            .ok_or_else(|| RestDocsError::Placeholder(name.to_string()))?;
        output.push_str(&rest[..start]);
        output.push_str(&value);
        rest = &rest[start + length + 2..];
    }
    output.push_str(rest);
    Ok(output)
}
