//! Build a study plan from per-chapter lecture counts

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use tally_core::import::study_plan_from_counts;
use tally_core::{summarize, Clock, Engine, NodeKind};

pub fn run<C: Clock>(
    engine: &Engine<C>,
    counts: &Path,
    out: &Path,
    name: &str,
    force: bool,
) -> Result<()> {
    util::ensure_writable(out, force)?;

    let json = std::fs::read_to_string(counts)
        .with_context(|| format!("Failed to read {}", counts.display()))?;
    let doc = study_plan_from_counts(engine, name, &json)
        .with_context(|| format!("Failed to import lecture counts from {}", counts.display()))?;
    util::save_document(&doc, out)?;

    let summary = summarize(&doc);
    println!(
        "Imported {} subjects, {} chapters, {} lectures into {}",
        summary.count_of(NodeKind::Subject),
        summary.count_of(NodeKind::Chapter),
        summary.count_of(NodeKind::Lecture),
        out.display().to_string().cyan()
    );

    Ok(())
}
