#![deny(missing_docs)]

//! # Render Command
//!
//! Documents a single recorded exchange.

use crate::config::{CliConfig, DocumentOptions, Settings};
use crate::error::{CliError, CliResult};
use restdocs_core::context::{ManualRestDocumentation, RestDocumentationContextProvider};
use restdocs_core::{RecordedExchange, RestDocumentationConfigurer, RestDocumentationGenerator};
use std::path::{Path, PathBuf};

/// Test class name recorded in the context of CLI-driven operations.
pub const CLI_CLASS_NAME: &str = "Cli";

/// Arguments for the render command.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Recorded exchange (`.json`, `.yaml` or `.yml`).
    #[clap(long)]
    pub exchange: PathBuf,

    #[clap(flatten)]
    pub options: DocumentOptions,
}

/// Executes the render command.
pub fn execute(args: &RenderArgs, config: &CliConfig) -> CliResult<()> {
    let settings = args.options.resolve(config)?;
    let configurer = settings.configurer()?;
    let mut docs = settings.documentation();

    docs.before_test(CLI_CLASS_NAME, file_stem(&args.exchange)?)?;
    let result = document_file(&args.exchange, &configurer, &mut docs);
    docs.after_test();
    result?;

    report(&settings, 1);
    Ok(())
}

/// Documents the exchange stored at `path` as the next operation of `docs`.
///
/// The operation is named after the exchange's `name`, or the file stem without one.
pub(crate) fn document_file(
    path: &Path,
    configurer: &RestDocumentationConfigurer,
    docs: &mut ManualRestDocumentation,
) -> CliResult<()> {
    let exchange = RecordedExchange::from_path(path)?;
    let identifier = match &exchange.name {
        Some(name) => name.clone(),
        None => file_stem(path)?.to_string(),
    };
    tracing::debug!(?path, operation = %identifier, "Documenting exchange");

    let mut configuration = configurer.build(docs.before_operation()?)?;
    if let Some(url_template) = &exchange.url_template {
        configuration = configuration.with_url_template(url_template.clone());
    }
    RestDocumentationGenerator::for_recorded(identifier).handle(
        &exchange.request,
        &exchange.response,
        &configuration,
    )?;
    Ok(())
}

pub(crate) fn file_stem(path: &Path) -> CliResult<&str> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| CliError::General(format!("Invalid exchange file name: {}", path.display())))
}

pub(crate) fn report(settings: &Settings, count: usize) {
    match &settings.output_dir {
        Some(dir) => tracing::info!(count, output = %dir.display(), "Snippets written"),
        None => tracing::info!(count, "Snippets written to stdout"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXCHANGE: &str = r#"{
        "url-template": "/notes/{id}",
        "request": {
            "method": "GET",
            "uri": "http://localhost:8080/notes/7"
        },
        "response": {
            "status": 200,
            "headers": {"Content-Type": "application/json"},
            "body": "{\"id\":7}"
        }
    }"#;

    fn args(dir: &Path, exchange: PathBuf) -> RenderArgs {
        RenderArgs {
            exchange,
            options: DocumentOptions {
                output_dir: Some(dir.join("out")),
                snippets: vec!["curl-request".into(), "response-body".into()],
                remove_port: true,
                ..DocumentOptions::default()
            },
        }
    }

    #[test]
    fn test_render_writes_snippets_under_the_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let exchange = dir.path().join("get-note.json");
        std::fs::write(&exchange, EXCHANGE).unwrap();

        execute(&args(dir.path(), exchange), &CliConfig::default()).unwrap();

        let out = dir.path().join("out").join("get-note");
        let curl = std::fs::read_to_string(out.join("curl-request.adoc")).unwrap();
        assert!(curl.contains("$ curl 'http://localhost/notes/7' -i"));
        assert!(out.join("response-body.adoc").is_file());
        assert!(!out.join("http-request.adoc").exists());
    }

    #[test]
    fn test_render_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute(
            &args(dir.path(), dir.path().join("missing.json")),
            &CliConfig::default(),
        );
        assert!(matches!(result, Err(CliError::Docs(_))));
    }
}
