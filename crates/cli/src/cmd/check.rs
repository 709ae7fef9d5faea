//! Audit a document file as stored

use crate::util;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use tally_core::{audit, Clock, Engine};

pub fn run<C: Clock>(engine: &Engine<C>, file: &Path) -> Result<()> {
    let doc = util::read_document(file)?;
    let violations = audit(&doc, engine.config());

    if violations.is_empty() {
        println!(
            "{} {} ({} nodes)",
            "✓".green(),
            "Document is consistent".bold(),
            doc.node_count()
        );
        return Ok(());
    }

    println!("{}", "Inconsistent progress or status:".yellow());
    for violation in &violations {
        println!("  - {}", violation);
    }
    println!();
    println!("{}", "Tip: run 'tally recompute' to repair".dimmed());

    bail!("{} problem(s) found in {}", violations.len(), file.display())
}
