//! CLI binary for pdf_text.
//!
//! Extracts the text of a PDF, writes it to a text file and prints it to
//! stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_text::extract_to_file;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "extract-text", version, about = "Extract the text of a PDF page by page")]
struct Cli {
    /// PDF file to read.
    #[arg(default_value = "input.pdf")]
    input: PathBuf,

    /// Text file to write (overwritten if it exists).
    #[arg(short, long, default_value = "output_text.txt")]
    output: PathBuf,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let text = extract_to_file(&cli.input, &cli.output).with_context(|| {
        format!(
            "extracting '{}' into '{}'",
            cli.input.display(),
            cli.output.display()
        )
    })?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").context("writing text to stdout")?;
    Ok(())
}
