//! Mutation operations
//!
//! Every operation validates first and mutates second, so an error always
//! leaves the document exactly as it was. Operations that can move progress
//! finish with a recompute of the touched path.

use crate::clock::Clock;
use crate::engine::{node_at_mut, path_to, Engine};
use crate::error::{Result, TallyError};
use crate::node::{Document, NewNode, NodeId, Project, StudyPlan};
use crate::progress::{MAX_PROGRESS, MIN_PROGRESS};
use crate::status::{derive_status, Status};
use tracing::debug;

/// Partial update for a leaf (subtask or lecture)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub progress: Option<f64>,
    pub status: Option<Status>,
    /// Checkbox shorthand for progress 100 or 0; `progress` wins if both are set
    pub completed: Option<bool>,
}

impl LeafPatch {
    pub fn progress(progress: f64) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }

    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn requested_progress(&self) -> Option<f64> {
        self.progress.or_else(|| {
            self.completed
                .map(|done| if done { MAX_PROGRESS } else { MIN_PROGRESS })
        })
    }
}

impl<C: Clock> Engine<C> {
    /// Start an empty project
    pub fn new_project(&self, name: &str) -> Result<Document> {
        let name = validate_name(name)?;
        Ok(Document::Project(Project::new(name, self.now())))
    }

    /// Start an empty study plan
    pub fn new_study_plan(&self, name: &str) -> Result<Document> {
        let name = validate_name(name)?;
        Ok(Document::Study(StudyPlan::new(name, self.now())))
    }

    /// Append a new child under `parent_id` and recompute its ancestors
    pub fn add_child(&self, doc: &mut Document, parent_id: &str, spec: NewNode) -> Result<NodeId> {
        let path = locate(doc, parent_id)?;
        let spec = NewNode {
            name: validate_name(&spec.name)?,
            ..spec
        };

        let parent = node_at_mut(doc.root_mut(), &path)
            .ok_or_else(|| TallyError::NotFound(parent_id.to_string()))?;
        let header = spec.header(self.now());
        let id = header.id.clone();
        let child_kind = parent.push_child(header, &spec)?;
        debug!("Added {} '{}' ({}) under '{}'", child_kind, spec.name, id, parent_id);

        self.recompute_along(doc, &path);
        Ok(id)
    }

    /// Merge a patch into a leaf and recompute the leaf and its ancestors
    ///
    /// A status without progress back-computes a representative progress, a
    /// progress without status derives the status. Lectures are checkboxes and
    /// only accept a patch that resolves to 0 or 100.
    pub fn update_leaf(&self, doc: &mut Document, id: &str, patch: LeafPatch) -> Result<()> {
        let path = locate(doc, id)?;
        let name = patch.name.as_deref().map(validate_name).transpose()?;

        let node = node_at_mut(doc.root_mut(), &path)
            .ok_or_else(|| TallyError::NotFound(id.to_string()))?;
        if !node.is_leaf() {
            return Err(TallyError::not_a_leaf(id, node.kind()));
        }

        let checkbox = node.intrinsic_progress();
        let current = checkbox.unwrap_or(node.header().progress);
        let (progress, status) =
            self.resolve_leaf(current, patch.requested_progress(), patch.status);
        if checkbox.is_some() && progress != MIN_PROGRESS && progress != MAX_PROGRESS {
            return Err(TallyError::checkbox_only(id, node.kind(), progress));
        }
        node.set_leaf_progress(progress);

        let header = node.header_mut();
        header.status = derive_status(header.progress);
        if header.status != status {
            debug!("Leaf '{}' stores {} instead of requested {}", id, header.status, status);
        }
        if let Some(name) = name {
            header.name = name;
        }
        if let Some(description) = patch.description {
            header.description = Some(description);
        }
        if let Some(notes) = patch.notes {
            header.notes = Some(notes);
        }
        if let Some(tags) = patch.tags {
            header.tags = tags;
        }
        debug!("Updated leaf '{}' to {:.2} ({})", id, header.progress, header.status);

        self.recompute_along(doc, &path);
        Ok(())
    }

    /// Tick or untick a lecture (or complete/reset a subtask)
    pub fn set_completed(&self, doc: &mut Document, id: &str, completed: bool) -> Result<()> {
        self.update_leaf(doc, id, LeafPatch::completed(completed))
    }

    /// Remove `child_id` and its subtree from `parent_id`, then recompute
    pub fn delete_child(&self, doc: &mut Document, parent_id: &str, child_id: &str) -> Result<()> {
        let path = locate(doc, parent_id)?;

        let parent = node_at_mut(doc.root_mut(), &path)
            .ok_or_else(|| TallyError::NotFound(parent_id.to_string()))?;
        if parent.is_leaf() {
            return Err(TallyError::leaf_has_no_children(parent_id, parent.kind()));
        }
        if !parent.remove_child(child_id) {
            return Err(TallyError::NotFound(format!(
                "{} is not a child of {}",
                child_id, parent_id
            )));
        }
        debug!("Deleted '{}' from '{}'", child_id, parent_id);

        self.recompute_along(doc, &path);
        Ok(())
    }

    /// Remove a node found anywhere below the root
    pub fn delete_node(&self, doc: &mut Document, id: &str) -> Result<()> {
        let path = locate(doc, id)?;
        let Some((_, parent_path)) = path.split_last() else {
            return Err(TallyError::InvalidShape(format!(
                "'{}' is the document root and cannot be deleted",
                id
            )));
        };
        let parent_id = node_at_mut(doc.root_mut(), parent_path)
            .map(|parent| parent.id().to_string())
            .ok_or_else(|| TallyError::NotFound(id.to_string()))?;
        self.delete_child(doc, &parent_id, id)
    }

    /// Change a node's label; progress is unaffected so nothing is recomputed
    pub fn rename_node(&self, doc: &mut Document, id: &str, name: &str) -> Result<()> {
        let path = locate(doc, id)?;
        let name = validate_name(name)?;

        let node = node_at_mut(doc.root_mut(), &path)
            .ok_or_else(|| TallyError::NotFound(id.to_string()))?;
        let header = node.header_mut();
        header.name = name;
        header.updated_at = self.now();
        Ok(())
    }
}

fn locate(doc: &Document, id: &str) -> Result<Vec<usize>> {
    path_to(doc.root(), id).ok_or_else(|| TallyError::NotFound(id.to_string()))
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TallyError::InvalidName("name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
