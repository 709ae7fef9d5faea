//! Bottom-up recomputation of derived progress and status
//!
//! Composite nodes never store anything the engine cannot rebuild from their
//! children. A pass only ever reads children that were already refreshed in the
//! same pass: the path walk recurses to the deepest node first and refreshes on
//! the way back up, the full walk is post-order.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{Result, TallyError};
use crate::node::{Document, Node};
use crate::progress::{aggregate_with, clamp_progress, MIN_PROGRESS};
use crate::status::{derive_status, progress_for_status, Status};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// When a refreshed node gets a new `updated_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stamp {
    /// Node lies on a mutated path
    Always,
    /// Only if progress or status moved
    OnChange,
}

/// Recomputation engine and entry point for mutations
#[derive(Debug, Clone)]
pub struct Engine<C: Clock = SystemClock> {
    config: EngineConfig,
    clock: C,
}

impl Engine<SystemClock> {
    /// Create an engine using wall-clock time
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for Engine<SystemClock> {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Engine<C> {
    /// Create an engine with an explicit time source
    pub fn with_clock(config: EngineConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Recompute the node `id` and every ancestor up to the root
    ///
    /// Returns the number of nodes refreshed (path length).
    pub fn recompute_path(&self, doc: &mut Document, id: &str) -> Result<usize> {
        let path = path_to(doc.root(), id).ok_or_else(|| TallyError::NotFound(id.to_string()))?;
        Ok(self.recompute_along(doc, &path))
    }

    pub(crate) fn recompute_along(&self, doc: &mut Document, path: &[usize]) -> usize {
        let now = self.now();
        let touched = self.refresh_along(doc.root_mut(), path, now);
        debug!(
            "Recomputed {} node(s) on path to root of '{}' (progress {:.2}, {})",
            touched,
            doc.name(),
            doc.progress(),
            doc.status()
        );
        touched
    }

    /// Recompute every node in the document, leaves first
    ///
    /// Returns the number of nodes whose progress or status changed. Only those
    /// nodes get a new `updated_at`.
    pub fn recompute_all(&self, doc: &mut Document) -> usize {
        let now = self.now();
        let changed = self.refresh_subtree(doc.root_mut(), now);
        debug!(
            "Full recompute of '{}': {} node(s) changed, root at {:.2} ({})",
            doc.name(),
            changed,
            doc.progress(),
            doc.status()
        );
        changed
    }

    fn refresh_along(&self, node: &mut dyn Node, path: &[usize], now: DateTime<Utc>) -> usize {
        let mut touched = 0;
        if let Some((&index, rest)) = path.split_first() {
            let mut children = node.children_mut();
            if let Some(child) = children.get_mut(index) {
                touched += self.refresh_along(&mut **child, rest, now);
            }
        }
        self.refresh(node, now, Stamp::Always);
        touched + 1
    }

    fn refresh_subtree(&self, node: &mut dyn Node, now: DateTime<Utc>) -> usize {
        let mut changed = 0;
        for child in node.children_mut() {
            changed += self.refresh_subtree(child, now);
        }
        if self.refresh(node, now, Stamp::OnChange) {
            changed += 1;
        }
        changed
    }

    /// Rebuild one node's derived fields from its (already fresh) children
    fn refresh(&self, node: &mut dyn Node, now: DateTime<Utc>, stamp: Stamp) -> bool {
        let before = (node.header().progress, node.header().status);

        let (progress, status) = if node.is_leaf() {
            self.normalize_leaf(node)
        } else {
            let progress = aggregate_with(node.children(), self.config.rounding);
            (progress, derive_status(progress))
        };

        if !node.is_leaf() {
            let header = node.header_mut();
            header.progress = progress;
            header.status = status;
        }

        let changed = before != (progress, status);
        if changed || stamp == Stamp::Always {
            node.header_mut().updated_at = now;
        }
        changed
    }

    /// Bring a leaf's progress and status into agreement
    fn normalize_leaf(&self, node: &mut dyn Node) -> (f64, Status) {
        let raw = node.header().progress;
        let (progress, status) = settle_leaf(&self.config, &*node);
        if node.intrinsic_progress().is_none() && clamp_progress(raw) != raw {
            warn!(
                "Clamped out-of-range progress {} to {} on {} '{}'",
                raw,
                clamp_progress(raw),
                node.kind(),
                node.id()
            );
        }

        node.set_leaf_progress(progress);
        let header = node.header_mut();
        header.status = status;
        (header.progress, status)
    }

    /// Resolve a leaf's new progress and status from a patch
    pub(crate) fn resolve_leaf(
        &self,
        current: f64,
        progress: Option<f64>,
        status: Option<Status>,
    ) -> (f64, Status) {
        match (progress, status) {
            (None, None) => {
                let current = clamp_progress(current);
                (current, derive_status(current))
            }
            (None, Some(status)) => (
                progress_for_status(status, current, self.config.nominal_in_progress),
                status,
            ),
            (Some(progress), None) => {
                let progress = clamp_progress(progress);
                (progress, derive_status(progress))
            }
            (Some(progress), Some(status)) => {
                let progress = clamp_progress(progress);
                if derive_status(progress) == status {
                    (progress, status)
                } else if progress == MIN_PROGRESS {
                    (
                        progress_for_status(status, progress, self.config.nominal_in_progress),
                        status,
                    )
                } else {
                    (progress, derive_status(progress))
                }
            }
        }
    }
}

/// Progress and status a leaf settles on after a recompute
///
/// Checkbox leaves take their intrinsic value. Otherwise progress wins, except
/// for a leaf that claims a status while still sitting at zero: that is a
/// direct status choice and gets a representative progress.
pub(crate) fn settle_leaf(config: &EngineConfig, node: &dyn Node) -> (f64, Status) {
    if let Some(progress) = node.intrinsic_progress() {
        return (progress, derive_status(progress));
    }

    let progress = clamp_progress(node.header().progress);
    let claimed = node.header().status;
    if derive_status(progress) == claimed {
        (progress, claimed)
    } else if progress == MIN_PROGRESS {
        (
            progress_for_status(claimed, progress, config.nominal_in_progress),
            claimed,
        )
    } else {
        (progress, derive_status(progress))
    }
}

/// Index path from `root` to the node with `id` (empty for the root itself)
pub fn path_to(root: &dyn Node, id: &str) -> Option<Vec<usize>> {
    if root.id().as_str() == id {
        return Some(Vec::new());
    }
    for (index, child) in root.children().into_iter().enumerate() {
        if let Some(mut rest) = path_to(child, id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Follow an index path down from `node`
pub(crate) fn node_at_mut<'a>(node: &'a mut dyn Node, path: &[usize]) -> Option<&'a mut dyn Node> {
    match path.split_first() {
        None => Some(node),
        Some((&index, rest)) => {
            let child = node.children_mut().into_iter().nth(index)?;
            node_at_mut(child, rest)
        }
    }
}
