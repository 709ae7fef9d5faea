//! Workflow integration tests
//!
//! Tests for complete workflows that exercise multiple commands
//! and validate the documents they leave on disk.

pub mod error_cases;
pub mod project_lifecycle;
pub mod study_plan;
