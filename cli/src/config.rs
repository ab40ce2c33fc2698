#![deny(missing_docs)]

//! # CLI Configuration
//!
//! Options shared by every command, layered in precedence order:
//! 1. Command line flags (or their `RESTDOCS_*` environment fallbacks)
//! 2. `./restdocs.yaml` (project-local) or `~/.config/restdocs.yaml` (user-global)
//! 3. Built-in defaults

use crate::error::{CliError, CliResult};
use restdocs_core::context::ManualRestDocumentation;
use restdocs_core::preprocess::{self, PreprocessorRef};
use restdocs_core::snippet;
use restdocs_core::{RestDocumentationConfigurer, SnippetRef, TemplateFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CONFIG_FILENAME: &str = "restdocs.yaml";
const GLOBAL_CONFIG_DIR: &str = ".config";

/// Values read from `restdocs.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CliConfig {
    /// Directory snippets are written beneath.
    pub output_dir: Option<PathBuf>,
    /// `asciidoctor` or `markdown`.
    pub format: Option<String>,
    /// Directory holding template overrides.
    pub templates_dir: Option<PathBuf>,
    /// Snippets to render instead of the defaults.
    pub snippets: Vec<String>,
    /// Pretty-prints JSON bodies.
    pub pretty_print: bool,
    /// Headers removed from requests and responses.
    pub remove_headers: Vec<String>,
    /// Scheme documented URIs are rewritten to.
    pub scheme: Option<String>,
    /// Host documented URIs are rewritten to.
    pub host: Option<String>,
    /// Port documented URIs are rewritten to.
    pub port: Option<u16>,
    /// Strips the port from documented URIs.
    pub remove_port: bool,
}

/// Load the config file from the first discovered location, or return defaults.
pub fn load_cli_config() -> CliConfig {
    match find_config_file() {
        Some(path) => load_from(&path),
        None => CliConfig::default(),
    }
}

fn load_from(path: &Path) -> CliConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!(?path, "Loaded CLI config");
                config
            }
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to parse CLI config, using defaults");
                CliConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!(?path, error = %e, "Failed to read CLI config, using defaults");
            CliConfig::default()
        }
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }
    let global = home_dir()?.join(GLOBAL_CONFIG_DIR).join(CONFIG_FILENAME);
    global.is_file().then_some(global)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Arguments shared by `render` and `batch`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DocumentOptions {
    /// Directory snippets are written beneath. Without one, snippets go to stdout.
    #[clap(long, env = "RESTDOCS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Snippet format: `asciidoctor` or `markdown`.
    #[clap(long, env = "RESTDOCS_FORMAT")]
    pub format: Option<String>,

    /// Directory of template overrides, laid out as `<format>/<name>.snippet`.
    #[clap(long, env = "RESTDOCS_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Renders only the named snippets (repeatable), e.g. `--snippet curl-request`.
    #[clap(long = "snippet")]
    pub snippets: Vec<String>,

    /// Pretty-prints JSON bodies.
    #[clap(long)]
    pub pretty_print: bool,

    /// Removes a header from requests and responses (repeatable).
    #[clap(long = "remove-header")]
    pub remove_headers: Vec<String>,

    /// Rewrites the scheme of documented URIs.
    #[clap(long)]
    pub scheme: Option<String>,

    /// Rewrites the host of documented URIs.
    #[clap(long)]
    pub host: Option<String>,

    /// Rewrites the port of documented URIs.
    #[clap(long, conflicts_with = "remove_port")]
    pub port: Option<u16>,

    /// Strips the port from documented URIs.
    #[clap(long)]
    pub remove_port: bool,
}

/// Options after layering the command line over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Output directory, `None` for stdout.
    pub output_dir: Option<PathBuf>,
    /// Snippet format.
    pub format: TemplateFormat,
    /// Template override directory.
    pub templates_dir: Option<PathBuf>,
    /// Snippet names replacing the defaults; empty keeps the defaults.
    pub snippets: Vec<String>,
    /// Pretty-print bodies.
    pub pretty_print: bool,
    /// Headers to remove.
    pub remove_headers: Vec<String>,
    /// URI scheme override.
    pub scheme: Option<String>,
    /// URI host override.
    pub host: Option<String>,
    /// URI port override.
    pub port: Option<u16>,
    /// Strip the URI port.
    pub remove_port: bool,
}

impl DocumentOptions {
    /// Layers these options over `file`.
    pub fn resolve(&self, file: &CliConfig) -> CliResult<Settings> {
        let format = match self.format.as_ref().or(file.format.as_ref()) {
            Some(name) => name.parse::<TemplateFormat>()?,
            None => TemplateFormat::default(),
        };
        let port = self.port.or(if self.remove_port { None } else { file.port });
        Ok(Settings {
            output_dir: self.output_dir.clone().or_else(|| file.output_dir.clone()),
            format,
            templates_dir: self
                .templates_dir
                .clone()
                .or_else(|| file.templates_dir.clone()),
            snippets: prefer(&self.snippets, &file.snippets),
            pretty_print: self.pretty_print || file.pretty_print,
            remove_headers: prefer(&self.remove_headers, &file.remove_headers),
            scheme: self.scheme.clone().or_else(|| file.scheme.clone()),
            host: self.host.clone().or_else(|| file.host.clone()),
            port,
            remove_port: self.remove_port || (self.port.is_none() && file.remove_port),
        })
    }
}

fn prefer(cli: &[String], file: &[String]) -> Vec<String> {
    if cli.is_empty() {
        file.to_vec()
    } else {
        cli.to_vec()
    }
}

impl Settings {
    /// The lifecycle writing to the configured output.
    pub fn documentation(&self) -> ManualRestDocumentation {
        match &self.output_dir {
            Some(dir) => ManualRestDocumentation::new(dir),
            None => ManualRestDocumentation::to_stdout(),
        }
    }

    /// The configurer for these settings.
    pub fn configurer(&self) -> CliResult<RestDocumentationConfigurer> {
        let snippets = self
            .snippets
            .iter()
            .map(|name| snippet_named(name))
            .collect::<CliResult<Vec<_>>>()?;
        let preprocessors = self.preprocessors();
        let format = self.format;
        let templates_dir = self.templates_dir.clone();

        Ok(RestDocumentationConfigurer::new()
            .snippets(|mut s| {
                s = s.with_template_format(format);
                if !snippets.is_empty() {
                    s = s.with_defaults(snippets);
                }
                match templates_dir {
                    Some(dir) => s.with_templates_dir(dir),
                    None => s,
                }
            })
            .operation_preprocessors(|p| {
                p.with_request_defaults(preprocessors.clone())
                    .with_response_defaults(preprocessors)
            }))
    }

    fn preprocessors(&self) -> Vec<PreprocessorRef> {
        let mut preprocessors: Vec<PreprocessorRef> = Vec::new();
        if self.pretty_print {
            preprocessors.push(preprocess::pretty_print());
        }
        if !self.remove_headers.is_empty() {
            preprocessors.push(preprocess::remove_headers(self.remove_headers.clone()));
        }
        let mut uris = preprocess::modify_uris();
        let mut modify = false;
        if let Some(scheme) = &self.scheme {
            uris = uris.scheme(scheme.clone());
            modify = true;
        }
        if let Some(host) = &self.host {
            uris = uris.host(host.clone());
            modify = true;
        }
        if let Some(port) = self.port {
            uris = uris.port(port);
            modify = true;
        } else if self.remove_port {
            uris = uris.remove_port();
            modify = true;
        }
        if modify {
            preprocessors.push(Arc::new(uris));
        }
        preprocessors
    }
}

/// The snippet that documents without descriptors, by its name.
fn snippet_named(name: &str) -> CliResult<SnippetRef> {
    let snippet: SnippetRef = match name {
        "curl-request" => Arc::new(snippet::curl_request()),
        "httpie-request" => Arc::new(snippet::httpie_request()),
        "http-request" => Arc::new(snippet::http_request()),
        "http-response" => Arc::new(snippet::http_response()),
        "request-body" => Arc::new(snippet::request_body()),
        "response-body" => Arc::new(snippet::response_body()),
        other => {
            return Err(CliError::Config(format!(
                "Unknown snippet '{}'. Expected one of: curl-request, httpie-request, \
                 http-request, http-response, request-body, response-body",
                other
            )))
        }
    };
    Ok(snippet)
}
