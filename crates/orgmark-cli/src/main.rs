//! orgmark: converts org-style markup files to HTML.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use orgmark_core::{
    Corpus, HtmlEmitOptions, LoadError, ParseOptions, Source, load_files, load_path,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orgmark", version, about = "Convert org-style markup to HTML")]
struct Cli {
    /// One file, one directory of `.org` files, or several files converted
    /// in the given order.
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Level of a single-star heading.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..))]
    heading_offset: u8,

    /// Separate rendered elements with newlines.
    #[arg(long)]
    newline: bool,

    /// Emit a fragment without the `<html><body>` shell.
    #[arg(long)]
    no_wrap: bool,

    /// Strip any HTML the converter did not produce itself.
    #[arg(long)]
    sanitized: bool,

    /// Write to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            heading_offset: self.heading_offset,
        }
    }

    fn emit_options(&self) -> HtmlEmitOptions {
        HtmlEmitOptions {
            separator: if self.newline { "\n" } else { "" }.to_string(),
            wrap: !self.no_wrap,
            sanitize: self.sanitized,
        }
    }

    fn sources(&self) -> Result<Vec<Source>, LoadError> {
        match self.inputs.as_slice() {
            [single] => load_path(single),
            many => load_files(many),
        }
    }

    fn execute(&self) -> Result<(), CliError> {
        let sources = self.sources()?;
        let corpus = Corpus::parse(&sources, &self.parse_options())?;
        info!(documents = corpus.len(), "converted");
        let html = corpus.to_html(&self.emit_options());
        match &self.output {
            Some(path) => {
                fs::write(path, &html).map_err(|source| CliError::Write {
                    path: path.clone(),
                    source,
                })?;
                debug!(path = %path.display(), bytes = html.len(), "wrote output");
            }
            None => println!("{html}"),
        }
        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise only warnings reach stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = cli.execute() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_wrap_without_separator() {
        let cli = Cli::try_parse_from(["orgmark", "notes.org"]).expect("args");
        assert_eq!(cli.parse_options(), ParseOptions::default());
        assert_eq!(
            cli.emit_options(),
            HtmlEmitOptions {
                separator: String::new(),
                wrap: true,
                sanitize: false,
            }
        );
    }

    #[test]
    fn flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "orgmark",
            "--heading-offset",
            "2",
            "--newline",
            "--no-wrap",
            "--sanitized",
            "-o",
            "out.html",
            "a.org",
            "b.org",
        ])
        .expect("args");
        assert_eq!(cli.parse_options().heading_offset, 2);
        let emit = cli.emit_options();
        assert_eq!(emit.separator, "\n");
        assert!(!emit.wrap);
        assert!(emit.sanitize);
        assert_eq!(cli.inputs.len(), 2);
        assert_eq!(cli.output, Some(PathBuf::from("out.html")));
    }

    #[test]
    fn heading_offset_must_be_positive() {
        assert!(Cli::try_parse_from(["orgmark", "--heading-offset", "0", "a.org"]).is_err());
        assert!(Cli::try_parse_from(["orgmark"]).is_err());
    }
}
