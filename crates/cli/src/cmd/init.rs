//! Create an empty document

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tally_core::{Clock, Engine};

pub fn run<C: Clock>(engine: &Engine<C>, file: &Path, name: &str, study: bool, force: bool) -> Result<()> {
    util::ensure_writable(file, force)?;

    let doc = if study {
        engine.new_study_plan(name)?
    } else {
        engine.new_project(name)?
    };
    util::save_document(&doc, file)?;

    let kind = doc.root().kind();
    println!(
        "Created {} {} in {}",
        kind,
        doc.name().bold(),
        file.display().to_string().cyan()
    );
    println!("  Root id: {}", doc.id().yellow());

    Ok(())
}
