//! Lifecycle status and its mapping to progress

use crate::progress::{clamp_progress, MAX_PROGRESS, MIN_PROGRESS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest progress an in-progress leaf can hold
pub const MAX_IN_PROGRESS: f64 = 99.0;

/// Lifecycle state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "not-started",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "not-started" | "todo" => Ok(Status::NotStarted),
            "in-progress" | "doing" => Ok(Status::InProgress),
            "completed" | "done" => Ok(Status::Completed),
            other => Err(format!(
                "unknown status '{}': expected not-started, in-progress or completed",
                other
            )),
        }
    }
}

/// Map a progress value to its lifecycle status
///
/// Total over f64: values at or below 0 (and NaN) are not started, values at or
/// above 100 are completed.
pub fn derive_status(progress: f64) -> Status {
    if progress.is_nan() || progress <= MIN_PROGRESS {
        Status::NotStarted
    } else if progress >= MAX_PROGRESS {
        Status::Completed
    } else {
        Status::InProgress
    }
}

/// Representative progress for a status chosen directly on a leaf
///
/// `in-progress` keeps the current value when it already lies strictly between
/// the bounds, otherwise it lands on `nominal_minimum` (from zero) or
/// [`MAX_IN_PROGRESS`] (from completed).
pub fn progress_for_status(status: Status, current: f64, nominal_minimum: f64) -> f64 {
    match status {
        Status::NotStarted => MIN_PROGRESS,
        Status::Completed => MAX_PROGRESS,
        Status::InProgress => clamp_progress(current)
            .max(nominal_minimum)
            .min(MAX_IN_PROGRESS),
    }
}
