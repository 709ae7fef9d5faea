//! CLI command implementations

pub mod add;
pub mod check;
pub mod delete;
pub mod import_gate;
pub mod init;
pub mod recompute;
pub mod rename;
pub mod set;
pub mod show;
