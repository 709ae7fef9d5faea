//! Print a document as an indented tree

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tally_core::{summarize, Clock, Engine};

pub fn run<C: Clock>(
    engine: &Engine<C>,
    file: &Path,
    depth: Option<usize>,
    ids: bool,
    json: bool,
) -> Result<()> {
    let doc = util::load_document(engine, file)?;

    if json {
        println!("{}", doc.to_json_pretty()?);
        return Ok(());
    }

    let now = engine.clock().now();
    println!(
        "{} {} {}",
        doc.name().bold(),
        util::format_percent(doc.progress()),
        util::status_badge(doc.status())
    );
    println!(
        "  {} {}",
        util::progress_bar(doc.progress()),
        format!(
            "updated {}",
            util::format_relative_time(doc.root().header().updated_at, now)
        )
        .dimmed()
    );
    println!();

    doc.walk(|node, level| {
        if level == 0 || depth.is_some_and(|max| level > max) {
            return;
        }
        let indent = "  ".repeat(level - 1);
        let id = if ids {
            format!(" {}", node.id().to_string().yellow())
        } else {
            String::new()
        };
        println!(
            "{}{} {} {}{} {}",
            indent,
            util::format_percent(node.header().progress),
            node.kind().to_string().dimmed(),
            node.name(),
            id,
            util::status_badge(node.status())
        );
    });

    let summary = summarize(&doc);
    println!();
    println!(
        "{} leaves: {} completed, {} in progress, {} not started",
        summary.total(),
        summary.completed.green(),
        summary.in_progress.yellow(),
        summary.not_started
    );

    Ok(())
}
