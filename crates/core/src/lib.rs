//! Tally Core - progress aggregation for hierarchical plans
//!
//! This crate provides:
//! - Work trees (project, phase, step, task, subtask) and study trees
//!   (study plan, subject, chapter, lecture) behind one `Node` trait
//! - Unweighted mean aggregation and progress-to-status derivation
//! - Bottom-up recomputation along a mutated path or over a whole document
//! - Add/update/delete/rename operations that keep every level consistent
//! - JSON import, invariant auditing and summary statistics

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod import;
pub mod node;
pub mod ops;
pub mod progress;
pub mod status;
pub mod summary;
pub mod validate;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, Rounding};
pub use engine::{path_to, Engine};
pub use error::{Result, TallyError};
pub use node::{Document, NewNode, Node, NodeHeader, NodeId, NodeKind};
pub use ops::LeafPatch;
pub use progress::{aggregate, display_percent, HasProgress};
pub use status::{derive_status, progress_for_status, Status};
pub use summary::{summarize, Summary};
pub use validate::{audit, validate_structure, Violation};
