#![deny(missing_docs)]

//! # Tera Template Engine
//!
//! Binds template resolution to `tera`. Every compilation uses a fresh `Tera` instance
//! holding exactly one template, so rendering holds no state between calls.

use super::filters;
use super::resolver::{StandardTemplateResourceResolver, TemplateResourceResolver};
use super::{Model, Template, TemplateEngine, TemplateFormat};
use crate::error::{RestDocsError, RestDocsResult};
use std::error::Error as _;
use std::sync::Arc;
use tera::{Context, Tera};

/// Formats a tera error together with its causes.
fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// A [`TemplateEngine`] backed by `tera`.
///
/// Templates see the `table_cell` filter, which escapes cell content for the engine's
/// format. An optional base context supplies values that the snippet model overrides.
#[derive(Debug, Clone)]
pub struct TeraTemplateEngine {
    resolver: Arc<dyn TemplateResourceResolver>,
    format: TemplateFormat,
    context: Model,
}

impl TeraTemplateEngine {
    /// Creates an engine resolving templates with `resolver` for `format`.
    pub fn new(resolver: Arc<dyn TemplateResourceResolver>, format: TemplateFormat) -> Self {
        Self {
            resolver,
            format,
            context: Model::new(),
        }
    }

    /// An engine using the built-in templates of `format`.
    pub fn for_format(format: TemplateFormat) -> Self {
        Self::new(Arc::new(StandardTemplateResourceResolver::new(format)), format)
    }

    /// Adds values visible to every template.
    pub fn with_context(mut self, context: Model) -> Self {
        self.context.extend(context);
        self
    }

    /// The format this engine escapes for.
    pub fn format(&self) -> TemplateFormat {
        self.format
    }
}

impl TemplateEngine for TeraTemplateEngine {
    fn compile_template(&self, name: &str) -> RestDocsResult<Box<dyn Template>> {
        let resource = self.resolver.resolve_template_resource(name)?;
        tracing::debug!(template = name, location = %resource.location, "Compiling template");

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter("table_cell", filters::table_cell(self.format));
        tera.add_raw_template(name, &resource.content)
            .map_err(|e| {
                RestDocsError::Render(format!(
                    "Failed to compile template '{}' ({}): {}",
                    name,
                    resource.location,
                    describe(&e)
                ))
            })?;

        Ok(Box::new(TeraTemplate {
            name: name.to_string(),
            tera,
            context: self.context.clone(),
        }))
    }
}

/// A compiled tera template.
#[derive(Debug)]
pub struct TeraTemplate {
    name: String,
    tera: Tera,
    context: Model,
}

impl Template for TeraTemplate {
    fn render(&self, model: &Model) -> RestDocsResult<String> {
        let mut values = self.context.clone();
        values.extend(model.clone());
        let context = Context::from_value(serde_json::Value::Object(values))
            .map_err(|e| RestDocsError::Render(describe(&e)))?;
        self.tera.render(&self.name, &context).map_err(|e| {
            RestDocsError::Render(format!(
                "Failed to render template '{}': {}",
                self.name,
                describe(&e)
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn model(value: serde_json::Value) -> Model {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn engine_with(name: &str, source: &str) -> (tempfile::TempDir, TeraTemplateEngine) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(format!("{}.snippet", name)), source).unwrap();
        let resolver = StandardTemplateResourceResolver::new(TemplateFormat::Asciidoctor)
            .with_override_dir(dir.path());
        (dir, TeraTemplateEngine::new(Arc::new(resolver), TemplateFormat::Asciidoctor))
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let engine = TeraTemplateEngine::for_format(TemplateFormat::Asciidoctor);
        let model = model(json!({"url": "'http://localhost/foo'", "options": "-i"}));
        let first = engine.compile_template("curl-request").unwrap().render(&model).unwrap();
        let second = engine.compile_template("curl-request").unwrap().render(&model).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("$ curl 'http://localhost/foo' -i"));
    }

    #[test]
    fn test_model_overrides_base_context() {
        let (_dir, engine) = engine_with("greeting", "{{ greeting }} {{ name }}");
        let engine = engine.with_context(model(json!({"greeting": "Hello", "name": "base"})));
        let rendered = engine
            .compile_template("greeting")
            .unwrap()
            .render(&model(json!({"name": "model"})))
            .unwrap();
        assert_eq!(rendered, "Hello model");
    }

    #[test]
    fn test_table_cell_filter_and_no_html_escaping() {
        let (_dir, engine) = engine_with("cell", "|{{ text | table_cell }}|{{ html }}");
        let rendered = engine
            .compile_template("cell")
            .unwrap()
            .render(&model(json!({"text": "a|b", "html": "<b>&</b>"})))
            .unwrap();
        assert_eq!(rendered, r"|a\|b|<b>&</b>");
    }

    #[test]
    fn test_missing_template_names_the_template() {
        let err = TeraTemplateEngine::for_format(TemplateFormat::Markdown)
            .compile_template("no-such-snippet")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no-such-snippet"));
        assert!(message.contains("could not be resolved"));
    }

    #[test]
    fn test_invalid_template_is_a_render_error() {
        let (_dir, engine) = engine_with("broken", "{% for x in %}");
        let err = engine.compile_template("broken").unwrap_err();
        assert!(matches!(err, RestDocsError::Render(_)));
    }
}
