//! Structural validation and invariant auditing
//!
//! [`validate_structure`] guards the preconditions the engine relies on (unique
//! ids, named nodes). [`audit`] reports every place where stored progress or
//! status disagrees with what a recompute would produce.

use crate::config::EngineConfig;
use crate::engine::settle_leaf;
use crate::error::{Result, TallyError};
use crate::node::{Document, Node, NodeId, NodeKind};
use crate::progress::{aggregate_with, MAX_PROGRESS, MIN_PROGRESS};
use crate::status::{derive_status, Status};
use std::collections::HashSet;
use std::fmt;

/// Tolerance when comparing stored and recomputed aggregates
const EPSILON: f64 = 1e-9;

/// Reject documents with duplicate ids, blank names or mixed chapters
pub fn validate_structure(doc: &Document) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut first_error = None;

    fn check<'a>(
        node: &'a dyn Node,
        seen: &mut HashSet<&'a str>,
        first_error: &mut Option<TallyError>,
    ) {
        if first_error.is_some() {
            return;
        }
        let id = node.id().as_str();
        if !seen.insert(id) {
            *first_error = Some(TallyError::DuplicateId(id.to_string()));
            return;
        }
        if node.name().trim().is_empty() {
            *first_error = Some(TallyError::InvalidName(format!(
                "{} '{}' has an empty name",
                node.kind(),
                id
            )));
            return;
        }
        for child in node.children() {
            check(child, seen, first_error);
        }
    }

    check(doc.root(), &mut seen, &mut first_error);
    if let Some(err) = first_error {
        return Err(err);
    }

    if let Document::Study(plan) = doc {
        let chapters = plan.subjects.iter().flat_map(|subject| &subject.chapters);
        for chapter in chapters {
            if chapter.is_topical() && !chapter.lectures.is_empty() {
                return Err(TallyError::InvalidShape(format!(
                    "chapter '{}' mixes lectures and topics",
                    chapter.header.id
                )));
            }
        }
    }
    Ok(())
}

/// What is wrong with a node
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    /// Progress outside [0, 100] (or NaN)
    OutOfRange(f64),
    /// Status disagrees with progress
    StatusMismatch { stored: Status, derived: Status },
    /// Composite progress differs from the mean of its children
    StaleAggregate { stored: f64, expected: f64 },
    /// Lecture progress disagrees with its checkbox
    CheckboxMismatch { completed: bool, progress: f64 },
}

/// An invariant violation found by [`audit`]
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub id: NodeId,
    pub kind: NodeKind,
    pub problem: Problem,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': ", self.kind, self.id)?;
        match &self.problem {
            Problem::OutOfRange(value) => write!(f, "progress {} outside 0-100", value),
            Problem::StatusMismatch { stored, derived } => {
                write!(f, "status {} but progress implies {}", stored, derived)
            }
            Problem::StaleAggregate { stored, expected } => {
                write!(f, "progress {:.2} but children average {:.2}", stored, expected)
            }
            Problem::CheckboxMismatch { completed, progress } => write!(
                f,
                "completed={} but progress {}",
                completed, progress
            ),
        }
    }
}

/// Collect every invariant violation in the document
///
/// Composites are compared against the values a recompute would give their
/// children, so a stale subtree is reported at every ancestor it would move.
/// An empty result means a full recompute would change nothing.
pub fn audit(doc: &Document, config: &EngineConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    audit_node(doc.root(), config, &mut violations);
    violations
}

/// Audit `node` and its subtree, returning the progress it settles on
fn audit_node(node: &dyn Node, config: &EngineConfig, out: &mut Vec<Violation>) -> f64 {
    let header = node.header();
    let mut report = |problem| {
        out.push(Violation {
            id: header.id.clone(),
            kind: node.kind(),
            problem,
        })
    };

    let progress = header.progress;
    if progress.is_nan() || !(MIN_PROGRESS..=MAX_PROGRESS).contains(&progress) {
        report(Problem::OutOfRange(progress));
    }

    let derived = derive_status(progress);
    if derived != header.status {
        report(Problem::StatusMismatch {
            stored: header.status,
            derived,
        });
    }

    if let Some(intrinsic) = node.intrinsic_progress() {
        if intrinsic != progress {
            report(Problem::CheckboxMismatch {
                completed: intrinsic >= MAX_PROGRESS,
                progress,
            });
        }
    }

    if node.is_leaf() {
        return settle_leaf(config, node).0;
    }

    let settled: Vec<f64> = node
        .children()
        .into_iter()
        .map(|child| audit_node(child, config, out))
        .collect();
    let expected = aggregate_with(settled, config.rounding);
    if (expected - progress).abs() > EPSILON {
        out.push(Violation {
            id: header.id.clone(),
            kind: node.kind(),
            problem: Problem::StaleAggregate {
                stored: progress,
                expected,
            },
        });
    }
    expected
}
