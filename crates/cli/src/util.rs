//! Shared utilities for CLI commands

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::Path;
use tally_core::import::document_from_json;
use tally_core::{display_percent, validate_structure, Clock, Document, Engine, Status};
use tracing_subscriber::EnvFilter;

/// Width of the rendered progress bar in cells
const BAR_WIDTH: usize = 20;

/// Install the tracing subscriber; `RUST_LOG` wins over `-v`
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// Read a document file without touching derived values
pub fn read_document(path: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = Document::from_json(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    validate_structure(&doc).with_context(|| format!("Invalid document {}", path.display()))?;
    Ok(doc)
}

/// Read a document file and bring every node up to date
pub fn load_document<C: Clock>(engine: &Engine<C>, path: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    document_from_json(engine, &json).with_context(|| format!("Failed to load {}", path.display()))
}

/// Write a document atomically (temp file in the same directory, then rename)
pub fn save_document(doc: &Document, path: &Path) -> Result<()> {
    let json = doc.to_json_pretty().context("Failed to serialize document")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    temp.write_all(json.as_bytes())?;
    temp.write_all(b"\n")?;
    temp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Refuse to clobber an existing file unless forced
pub fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Ok(())
}

/// Colored status label
pub fn status_badge(status: Status) -> String {
    match status {
        Status::Completed => status.as_str().green().to_string(),
        Status::InProgress => status.as_str().yellow().to_string(),
        Status::NotStarted => status.as_str().dimmed().to_string(),
    }
}

/// Fixed-width bar such as `[#########-----------]`
pub fn progress_bar(progress: f64) -> String {
    let filled = (display_percent(progress) as usize * BAR_WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Whole percentage with a trailing sign, right-aligned
pub fn format_percent(progress: f64) -> String {
    format!("{:>3}%", display_percent(progress))
}

/// Format a timestamp relative to `now` ("2 hours ago")
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 0 {
        return "in the future".to_string();
    }

    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds < 604800 {
        format!("{} days ago", seconds / 86400)
    } else {
        format!("{} weeks ago", seconds / 604800)
    }
}
