//! Progress aggregation
//!
//! Every composite node in both tree variants gets its progress from
//! [`aggregate`]: the unweighted mean of its immediate children. A child with a
//! deep subtree weighs exactly as much as a childless one.

use crate::config::Rounding;

/// Lower bound of the progress scale
pub const MIN_PROGRESS: f64 = 0.0;

/// Upper bound of the progress scale
pub const MAX_PROGRESS: f64 = 100.0;

/// Anything that carries a progress value on the 0-100 scale
pub trait HasProgress {
    fn progress(&self) -> f64;
}

impl HasProgress for f64 {
    fn progress(&self) -> f64 {
        *self
    }
}

impl<T: HasProgress + ?Sized> HasProgress for &T {
    fn progress(&self) -> f64 {
        (**self).progress()
    }
}

/// Clamp a progress value into [0, 100]
///
/// NaN maps to 0 so a bad input can never poison an aggregate.
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        MIN_PROGRESS
    } else {
        value.clamp(MIN_PROGRESS, MAX_PROGRESS)
    }
}

/// Unweighted arithmetic mean of the children's progress
///
/// Returns exactly 0 for an empty collection.
pub fn aggregate<I>(children: I) -> f64
where
    I: IntoIterator,
    I::Item: HasProgress,
{
    let (sum, count) = children
        .into_iter()
        .fold((0.0_f64, 0usize), |(sum, count), child| {
            (sum + clamp_progress(child.progress()), count + 1)
        });

    if count == 0 {
        return MIN_PROGRESS;
    }

    clamp_progress(sum / count as f64)
}

/// Aggregate and apply the storage rounding policy
pub fn aggregate_with<I>(children: I, rounding: Rounding) -> f64
where
    I: IntoIterator,
    I::Item: HasProgress,
{
    rounding.apply(aggregate(children))
}

/// Round half-up to the nearest integer
pub fn round_half_up(value: f64) -> f64 {
    (clamp_progress(value) + 0.5).floor().min(MAX_PROGRESS)
}

/// Integer percentage for display (bars, badges)
pub fn display_percent(progress: f64) -> u8 {
    round_half_up(progress) as u8
}
