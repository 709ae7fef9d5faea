//! Rename a node

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tally_core::{Clock, Engine};

pub fn run<C: Clock>(engine: &Engine<C>, file: &Path, id: &str, name: &str) -> Result<()> {
    let mut doc = util::load_document(engine, file)?;
    let old = doc
        .find(id)
        .map(|node| node.name().to_string())
        .unwrap_or_default();

    engine.rename_node(&mut doc, id, name)?;
    util::save_document(&doc, file)?;

    println!("Renamed {} to {}", old.dimmed(), name.trim().bold());
    Ok(())
}
