#![deny(missing_docs)]

//! # Snippet Writers
//!
//! Resolves where a rendered snippet is written:
//! `<output-directory>/<operation-name>/<snippet-name>.<extension>`, after placeholder
//! replacement in both names.

use super::placeholder::{replace_placeholders, RestDocumentationContextPlaceholderResolver};
use crate::context::RestDocumentationContext;
use crate::error::RestDocsResult;
use crate::templates::TemplateFormat;
use std::fmt::Debug;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

/// Opens the destination of a snippet.
pub trait WriterResolver: Send + Sync + Debug {
    /// Returns a writer for the snippet `snippet_name` of the operation `operation_name`.
    ///
    /// File targets are created (with their parent directories) and truncated.
    fn resolve(
        &self,
        operation_name: &str,
        snippet_name: &str,
        context: &RestDocumentationContext,
    ) -> RestDocsResult<Box<dyn Write>>;
}

/// The default [`WriterResolver`].
///
/// Relative paths are resolved against the context's output directory. An absolute
/// operation name overrides that directory. When the path is relative and no output
/// directory is configured, snippets are written to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardWriterResolver {
    format: TemplateFormat,
}

impl StandardWriterResolver {
    /// Writes files with the extension of `format`.
    pub fn new(format: TemplateFormat) -> Self {
        Self { format }
    }

    /// The file a snippet would be written to, or `None` for standard output.
    pub fn resolve_path(
        &self,
        operation_name: &str,
        snippet_name: &str,
        context: &RestDocumentationContext,
    ) -> RestDocsResult<Option<PathBuf>> {
        let resolver = RestDocumentationContextPlaceholderResolver::new(context);
        let directory = replace_placeholders(operation_name, &resolver)?;
        let file_name = format!(
            "{}.{}",
            replace_placeholders(snippet_name, &resolver)?,
            self.format.file_extension()
        );
        let path = PathBuf::from(directory).join(file_name);
        if path.is_absolute() {
            return Ok(Some(path));
        }
        Ok(context.output_directory().map(|root| root.join(&path)))
    }
}

impl WriterResolver for StandardWriterResolver {
    fn resolve(
        &self,
        operation_name: &str,
        snippet_name: &str,
        context: &RestDocumentationContext,
    ) -> RestDocsResult<Box<dyn Write>> {
        match self.resolve_path(operation_name, snippet_name, context)? {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                tracing::debug!(path = %path.display(), snippet = snippet_name, "Writing snippet");
                Ok(Box::new(File::create(&path)?))
            }
            None => Ok(Box::new(io::stdout())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn context(output: Option<&Path>) -> RestDocumentationContext {
        RestDocumentationContext::new("Api", "getNote", output.map(Path::to_path_buf))
    }

    #[test]
    fn test_relative_path_uses_output_directory() {
        let resolver = StandardWriterResolver::new(TemplateFormat::Asciidoctor);
        let path = resolver
            .resolve_path("{method-name}", "curl-request", &context(Some(Path::new("out"))))
            .unwrap();
        assert_eq!(path, Some(PathBuf::from("out/get-note/curl-request.adoc")));
    }

    #[test]
    fn test_absolute_path_overrides_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = StandardWriterResolver::new(TemplateFormat::Markdown);
        let operation = dir.path().join("abs");
        let path = resolver
            .resolve_path(
                operation.to_str().unwrap(),
                "links",
                &context(Some(Path::new("ignored"))),
            )
            .unwrap();
        assert_eq!(path, Some(dir.path().join("abs/links.md")));
    }

    #[test]
    fn test_no_output_directory_means_stdout() {
        let resolver = StandardWriterResolver::default();
        assert_eq!(resolver.resolve_path("a", "b", &context(None)).unwrap(), None);
    }

    #[test]
    fn test_writer_creates_directories_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = StandardWriterResolver::default();
        let context = context(Some(dir.path()));
        for content in ["first, longer content", "second"] {
            let mut writer = resolver.resolve("nested/op", "snippet", &context).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        let written = fs::read_to_string(dir.path().join("nested/op/snippet.adoc")).unwrap();
        assert_eq!(written, "second");
    }
}
