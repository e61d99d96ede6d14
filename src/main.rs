//! dirsnap: snapshot a directory tree into one browsable HTML file.
//!
//! Thin binary entry point. All logic lives in the `dirsnap-core` crate.

use anyhow::Context;
use clap::Parser;
use dirsnap_core::export::{generate, write_document, DocumentOptions};
use dirsnap_core::model::size::{format_count, format_size};
use dirsnap_core::scanner::progress::ScanProgress;
use dirsnap_core::scanner::{start_scan, ScanOptions};
use std::path::PathBuf;
use tracing::info;

/// Snapshot a directory into a single, self-contained HTML explorer
#[derive(Parser, Debug)]
#[command(name = "dirsnap")]
#[command(version)]
struct Args {
    /// Directory to snapshot
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output file (defaults to "<folder name>.html" in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include dot-files and dot-directories
    #[arg(long)]
    include_hidden: bool,

    /// Document title (defaults to the folder name)
    #[arg(short, long)]
    title: Option<String>,

    /// Log per-entry details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    info!("dirsnap starting");

    let options = ScanOptions::new(&args.path).include_hidden(args.include_hidden);
    let handle = start_scan(options)?;

    // Log at every 10% step; the channel may drop intermediate updates.
    let mut last_step = None;
    for message in handle.progress_rx.iter() {
        match message {
            ScanProgress::Update { processed, total } => {
                let step = if total == 0 { 10 } else { processed * 10 / total };
                if last_step != Some(step) {
                    last_step = Some(step);
                    info!("Scanning: {}% ({processed}/{total})", step * 10);
                }
            }
            ScanProgress::Complete { .. } | ScanProgress::Cancelled | ScanProgress::Failed { .. } => {
                break
            }
        }
    }

    let result = handle
        .join()
        .with_context(|| format!("failed to scan {}", args.path.display()))?;

    info!(
        "{} files, {} folders, {}",
        format_count(result.totals.total_files),
        format_count(result.totals.total_folders),
        format_size(result.totals.total_size)
    );

    let output = args
        .output
        .unwrap_or_else(|| default_output_name(&result.tree.root_name()));
    let document = generate(&result, &DocumentOptions { title: args.title })
        .context("failed to render document")?;
    write_document(&output, &document)?;

    println!("{}", output.display());
    Ok(())
}

/// `<name>.html`, with characters that are awkward in file names replaced.
fn default_output_name(root_name: &str) -> PathBuf {
    let stem: String = root_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches(|c| c == '_' || c == '.' || c == ' ');
    let stem = if stem.is_empty() { "snapshot" } else { stem };
    PathBuf::from(format!("{stem}.html"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_uses_folder_name() {
        assert_eq!(default_output_name("Photos 2024"), PathBuf::from("Photos 2024.html"));
    }

    #[test]
    fn default_output_replaces_separators() {
        assert_eq!(default_output_name("/"), PathBuf::from("snapshot.html"));
        assert_eq!(default_output_name("C:\\"), PathBuf::from("C.html"));
    }

    #[test]
    fn cli_parses_flags() {
        let args = Args::parse_from(["dirsnap", "/tmp", "--include-hidden", "-t", "Backup"]);
        assert_eq!(args.path, PathBuf::from("/tmp"));
        assert!(args.include_hidden);
        assert_eq!(args.title.as_deref(), Some("Backup"));
        assert!(args.output.is_none());
    }
}
