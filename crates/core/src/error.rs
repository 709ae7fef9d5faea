//! Error types for tree operations

use crate::node::NodeKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Node not found: {0}")]
    NotFound(String),

    #[error("Invalid node shape: {0}")]
    InvalidShape(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TallyError {
    pub(crate) fn leaf_has_no_children(id: &str, kind: NodeKind) -> Self {
        Self::InvalidShape(format!("{} '{}' cannot have children", kind, id))
    }

    pub(crate) fn checkbox_only(id: &str, kind: NodeKind, requested: f64) -> Self {
        Self::InvalidShape(format!(
            "{} '{}' is a checkbox and only takes completed or not-started (requested progress {})",
            kind, id, requested
        ))
    }

    pub(crate) fn not_a_leaf(id: &str, kind: NodeKind) -> Self {
        Self::InvalidShape(format!(
            "{} '{}' derives its progress from children and cannot be edited directly",
            kind, id
        ))
    }
}

/// Result type for tally operations
pub type Result<T> = std::result::Result<T, TallyError>;
