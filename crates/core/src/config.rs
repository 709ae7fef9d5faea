//! Engine configuration

use crate::error::{Result, TallyError};
use crate::progress::{round_half_up, MAX_PROGRESS, MIN_PROGRESS};
use serde::{Deserialize, Serialize};

/// Default progress assigned to a leaf switched to in-progress from zero
pub const DEFAULT_NOMINAL_IN_PROGRESS: f64 = 10.0;

/// How aggregated progress is stored on composite nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    /// Keep the exact mean (display layers round)
    #[default]
    Exact,
    /// Round half-up to whole percentages at rest
    Integer,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Exact => value,
            Rounding::Integer => round_half_up(value),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rounding::Exact => "exact",
            Rounding::Integer => "integer",
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Progress floor for a leaf set to in-progress without a progress value (default: 10)
    #[serde(default = "default_nominal_in_progress")]
    pub nominal_in_progress: f64,

    /// Storage rounding for composite progress (default: exact)
    #[serde(default)]
    pub rounding: Rounding,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nominal_in_progress: DEFAULT_NOMINAL_IN_PROGRESS,
            rounding: Rounding::Exact,
        }
    }
}

impl EngineConfig {
    /// Check that values keep the status/progress invariant reachable
    pub fn validate(&self) -> Result<()> {
        let nominal = self.nominal_in_progress;
        if !(nominal > MIN_PROGRESS && nominal < MAX_PROGRESS) {
            return Err(TallyError::Config(format!(
                "nominal_in_progress must be within (0, 100), got {}",
                nominal
            )));
        }
        if self.rounding == Rounding::Integer && nominal < 0.5 {
            return Err(TallyError::Config(format!(
                "nominal_in_progress {} rounds to zero under integer rounding",
                nominal
            )));
        }
        Ok(())
    }
}

fn default_nominal_in_progress() -> f64 {
    DEFAULT_NOMINAL_IN_PROGRESS
}
