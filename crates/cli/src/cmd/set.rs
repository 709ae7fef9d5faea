//! Update a leaf

use crate::util;
use anyhow::{bail, Result};
use std::path::Path;
use tally_core::{Clock, Engine, LeafPatch, Status};

pub fn run<C: Clock>(
    engine: &Engine<C>,
    file: &Path,
    id: &str,
    progress: Option<f64>,
    status: Option<Status>,
    completed: Option<bool>,
    notes: Option<String>,
) -> Result<()> {
    if progress.is_none() && status.is_none() && completed.is_none() && notes.is_none() {
        bail!("Nothing to update: pass --progress, --status, --done, --undone or --notes");
    }

    let mut doc = util::load_document(engine, file)?;
    let patch = LeafPatch {
        progress,
        status,
        completed,
        notes,
        ..LeafPatch::default()
    };
    engine.update_leaf(&mut doc, id, patch)?;
    util::save_document(&doc, file)?;

    if let Some(node) = doc.find(id) {
        println!(
            "{} {} {}",
            node.name(),
            util::format_percent(node.header().progress).trim(),
            util::status_badge(node.status())
        );
    }
    println!(
        "{} now {} {}",
        doc.name(),
        util::format_percent(doc.progress()).trim(),
        util::status_badge(doc.status())
    );

    Ok(())
}
