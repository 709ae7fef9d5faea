//! Add a child node

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tally_core::{Clock, Engine, NewNode};

pub fn run<C: Clock>(
    engine: &Engine<C>,
    file: &Path,
    parent: &str,
    name: &str,
    description: Option<String>,
    estimate: Option<u32>,
) -> Result<()> {
    let mut doc = util::load_document(engine, file)?;

    let spec = NewNode {
        description,
        estimated_minutes: estimate,
        ..NewNode::named(name)
    };
    let id = engine.add_child(&mut doc, parent, spec)?;
    util::save_document(&doc, file)?;

    let kind = doc.find(id.as_str()).map(|node| node.kind().to_string()).unwrap_or_default();
    println!("Added {} {}", kind, name.bold());
    println!("  ID: {}", id.yellow());

    Ok(())
}
