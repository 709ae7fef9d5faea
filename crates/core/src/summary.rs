//! Read-only statistics for display

use crate::node::{Document, NodeKind};
use crate::progress::display_percent;
use crate::status::Status;

/// Leaf counts and headline numbers for a document
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub progress: f64,
    pub status: Status,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    /// Node count per level, root first; levels with no nodes are omitted
    pub per_kind: Vec<(NodeKind, usize)>,
    pub depth: usize,
}

impl Summary {
    /// Number of leaves
    pub fn total(&self) -> usize {
        self.completed + self.in_progress + self.not_started
    }

    pub fn remaining(&self) -> usize {
        self.in_progress + self.not_started
    }

    /// Root progress as a whole percentage
    pub fn percent(&self) -> u8 {
        display_percent(self.progress)
    }

    pub fn count_of(&self, kind: NodeKind) -> usize {
        self.per_kind
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, count)| *count)
    }
}

/// Tally leaves by status and nodes by level
pub fn summarize(doc: &Document) -> Summary {
    let mut summary = Summary {
        progress: doc.progress(),
        status: doc.status(),
        completed: 0,
        in_progress: 0,
        not_started: 0,
        per_kind: Vec::new(),
        depth: 0,
    };

    doc.walk(|node, depth| {
        summary.depth = summary.depth.max(depth);

        let kind = node.kind();
        match summary.per_kind.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, count)) => *count += 1,
            None => summary.per_kind.push((kind, 1)),
        }

        if node.is_leaf() {
            match node.status() {
                Status::Completed => summary.completed += 1,
                Status::InProgress => summary.in_progress += 1,
                Status::NotStarted => summary.not_started += 1,
            }
        }
    });

    summary
}
