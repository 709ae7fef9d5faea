//! Bringing external data into a consistent document
//!
//! Nothing leaves this module without a full recompute, so callers can hand
//! the result straight to persistence or presentation.

use crate::clock::Clock;
use crate::engine::Engine;
use crate::error::{Result, TallyError};
use crate::node::{Chapter, Document, Lecture, NodeHeader, StudyPlan, Subject};
use crate::validate::validate_structure;
use serde_json::Value;
use tracing::{debug, warn};

/// Duration string given to freshly imported lectures
pub const ZERO_TIME_SPENT: &str = "00:00:00:00";

/// Largest lecture count accepted for a single chapter
pub const MAX_LECTURES_PER_CHAPTER: u64 = 10_000;

/// Parse a serialized document, check its structure and recompute it
pub fn document_from_json<C: Clock>(engine: &Engine<C>, json: &str) -> Result<Document> {
    let mut doc = Document::from_json(json)?;
    validate_structure(&doc)?;

    let repaired = engine.recompute_all(&mut doc);
    if repaired > 0 {
        warn!(
            "Imported '{}' had {} node(s) with stale progress or status; recomputed",
            doc.name(),
            repaired
        );
    }
    debug!("Imported {} with {} node(s)", doc.name(), doc.node_count());
    Ok(doc)
}

/// Build a study plan from `{"subject": {"chapter": lectureCount}}`
///
/// Lectures are named `Lecture 1..n` and start not completed. Key order of the
/// input object is kept.
pub fn study_plan_from_counts<C: Clock>(
    engine: &Engine<C>,
    name: &str,
    counts_json: &str,
) -> Result<Document> {
    let counts: Value = serde_json::from_str(counts_json)?;
    let subjects = counts
        .as_object()
        .ok_or_else(|| shape_error("top level must be an object of subjects"))?;

    let now = engine.clock().now();
    let mut plan = StudyPlan::new(name.trim(), now);

    for (subject_name, chapters) in subjects {
        let chapters = chapters.as_object().ok_or_else(|| {
            shape_error(format!("subject '{}' must map chapter names to counts", subject_name))
        })?;

        let mut subject = Subject {
            header: NodeHeader::new(subject_name.as_str(), now),
            chapters: Vec::with_capacity(chapters.len()),
        };

        for (chapter_name, count) in chapters {
            let count = count.as_u64().ok_or_else(|| {
                shape_error(format!(
                    "lecture count for '{}/{}' must be a non-negative integer",
                    subject_name, chapter_name
                ))
            })?;
            if count > MAX_LECTURES_PER_CHAPTER {
                return Err(shape_error(format!(
                    "lecture count {} for '{}/{}' exceeds the limit of {}",
                    count, subject_name, chapter_name, MAX_LECTURES_PER_CHAPTER
                )));
            }

            let lectures = (1..=count)
                .map(|n| Lecture {
                    header: NodeHeader::new(format!("Lecture {}", n), now),
                    completed: false,
                    time_spent: Some(ZERO_TIME_SPENT.to_string()),
                })
                .collect();

            subject.chapters.push(Chapter {
                header: NodeHeader::new(chapter_name.as_str(), now),
                lectures,
                topics: Vec::new(),
            });
        }

        plan.subjects.push(subject);
    }

    let mut doc = Document::Study(plan);
    validate_structure(&doc)?;
    engine.recompute_all(&mut doc);
    debug!(
        "Built study plan '{}' with {} node(s) from lecture counts",
        doc.name(),
        doc.node_count()
    );
    Ok(doc)
}

fn shape_error(message: impl Into<String>) -> TallyError {
    TallyError::InvalidShape(message.into())
}
