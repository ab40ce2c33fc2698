#![deny(missing_docs)]

//! # Batch Command
//!
//! Documents every recorded exchange beneath a directory. Files are visited in name
//! order and each becomes one step of a single run, so `{step}` placeholders in
//! operation names count them.

use crate::config::{CliConfig, DocumentOptions};
use crate::error::{CliError, CliResult};
use crate::render::{document_file, report, CLI_CLASS_NAME};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EXCHANGE_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Arguments for the batch command.
#[derive(clap::Args, Debug, Clone)]
pub struct BatchArgs {
    /// Directory searched recursively for recorded exchanges.
    #[clap(long)]
    pub input_dir: PathBuf,

    #[clap(flatten)]
    pub options: DocumentOptions,
}

/// Executes the batch command.
pub fn execute(args: &BatchArgs, config: &CliConfig) -> CliResult<()> {
    let settings = args.options.resolve(config)?;
    let configurer = settings.configurer()?;
    let files = exchange_files(&args.input_dir)?;
    if files.is_empty() {
        tracing::warn!(input = %args.input_dir.display(), "No recorded exchanges found");
        return Ok(());
    }

    let mut docs = settings.documentation();
    let run_name = args
        .input_dir
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("batch");
    docs.before_test(CLI_CLASS_NAME, run_name)?;
    let result = files
        .iter()
        .try_for_each(|file| document_file(file, &configurer, &mut docs));
    docs.after_test();
    result?;

    report(&settings, files.len());
    Ok(())
}

/// Recorded exchange files beneath `dir`, sorted by path.
fn exchange_files(dir: &Path) -> CliResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::Config(format!(
            "Input directory not found: {}",
            dir.display()
        )));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CliError::General(e.to_string()))?;
        let is_exchange = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    EXCHANGE_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                });
        if is_exchange {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn exchange(name: &str, path: &str) -> String {
        format!(
            r#"{{
                "name": "{name}",
                "request": {{"method": "GET", "uri": "http://localhost{path}"}},
                "response": {{"status": 204}}
            }}"#
        )
    }

    #[test]
    fn test_exchange_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.yaml"), "").unwrap();
        fs::write(dir.path().join("a.json"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("nested/c.YML"), "").unwrap();

        let files = exchange_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.json"),
                PathBuf::from("b.yaml"),
                PathBuf::from("nested/c.YML")
            ]
        );
    }

    #[test]
    fn test_batch_numbers_steps_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("exchanges");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("1-list.json"), exchange("list-{step}", "/notes")).unwrap();
        fs::write(input.join("2-get.json"), exchange("get-{step}", "/notes/1")).unwrap();

        let args = BatchArgs {
            input_dir: input,
            options: DocumentOptions {
                output_dir: Some(dir.path().join("out")),
                snippets: vec!["http-request".into()],
                ..DocumentOptions::default()
            },
        };
        execute(&args, &CliConfig::default()).unwrap();

        let out = dir.path().join("out");
        let first = fs::read_to_string(out.join("list-1/http-request.adoc")).unwrap();
        assert!(first.contains("GET /notes HTTP/1.1"));
        let second = fs::read_to_string(out.join("get-2/http-request.adoc")).unwrap();
        assert!(second.contains("GET /notes/1 HTTP/1.1"));
    }

    #[test]
    fn test_missing_input_dir_is_an_error() {
        let args = BatchArgs {
            input_dir: PathBuf::from("/definitely/not/here"),
            options: DocumentOptions::default(),
        };
        assert!(matches!(
            execute(&args, &CliConfig::default()),
            Err(CliError::Config(_))
        ));
    }
}
