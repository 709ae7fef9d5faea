//! Recompute every node and persist the result

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tally_core::{Clock, Engine};

pub fn run<C: Clock>(engine: &Engine<C>, file: &Path, dry_run: bool) -> Result<()> {
    let mut doc = util::read_document(file)?;
    let changed = engine.recompute_all(&mut doc);

    if changed == 0 {
        println!("{}", "Already up to date".dimmed());
        return Ok(());
    }

    if dry_run {
        println!("Would update {} node(s)", changed.to_string().yellow());
        return Ok(());
    }

    util::save_document(&doc, file)?;
    println!(
        "Updated {} node(s); {} is at {} ({})",
        changed.to_string().yellow(),
        doc.name().bold(),
        util::format_percent(doc.progress()).trim(),
        util::status_badge(doc.status())
    );

    Ok(())
}
