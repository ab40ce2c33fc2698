#![deny(missing_docs)]

//! # RestDocs CLI
//!
//! Renders documentation snippets from recorded HTTP exchanges.
//!
//! Supported Commands:
//! - `render`: Documents one exchange file.
//! - `batch`: Documents every exchange file beneath a directory.

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, CliResult};

mod batch;
mod config;
mod error;
mod render;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Test-driven HTTP API documentation snippets")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Documents a single recorded exchange.
    Render(render::RenderArgs),
    /// Documents every recorded exchange beneath a directory.
    Batch(batch::BatchArgs),
}

fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    let directive = "restdocs=info"
        .parse::<Directive>()
        .map_err(|e| CliError::General(format!("Invalid log directive: {}", e)))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file_config = config::load_cli_config();

    match &cli.command {
        Commands::Render(args) => render::execute(args, &file_config)?,
        Commands::Batch(args) => batch::execute(args, &file_config)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::try_parse_from([
            "restdocs",
            "render",
            "--exchange",
            "get-note.yaml",
            "--snippet",
            "curl-request",
            "--snippet",
            "http-response",
            "--remove-header",
            "Date",
            "--port",
            "443",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.options.snippets, vec!["curl-request", "http-response"]);
        assert_eq!(args.options.remove_headers, vec!["Date"]);
        assert_eq!(args.options.port, Some(443));
    }

    #[test]
    fn test_port_conflicts_with_remove_port() {
        let result = Cli::try_parse_from([
            "restdocs",
            "batch",
            "--input-dir",
            "exchanges",
            "--port",
            "80",
            "--remove-port",
        ]);
        assert!(result.is_err());
    }
}
