//! Delete a node and its subtree

use crate::util;
use anyhow::{Context, Result};
use std::path::Path;
use tally_core::{Clock, Engine, Node};

pub fn run<C: Clock>(engine: &Engine<C>, file: &Path, id: &str) -> Result<()> {
    let mut doc = util::load_document(engine, file)?;

    let removed = doc
        .find(id)
        .map(|node| {
            let mut count = 0;
            count_subtree(node, &mut count);
            (node.kind(), node.name().to_string(), count)
        })
        .with_context(|| format!("Node not found: {}", id))?;

    engine.delete_node(&mut doc, id)?;
    util::save_document(&doc, file)?;

    let (kind, name, count) = removed;
    println!("Deleted {} {} ({} node(s) removed)", kind, name, count);
    println!(
        "{} now {} {}",
        doc.name(),
        util::format_percent(doc.progress()).trim(),
        util::status_badge(doc.status())
    );

    Ok(())
}

fn count_subtree(node: &dyn Node, count: &mut usize) {
    *count += 1;
    for child in node.children() {
        count_subtree(child, count);
    }
}
