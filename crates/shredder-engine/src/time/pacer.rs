use std::time::Duration;

use super::{FrameClock, Timestamp};
use crate::error::ConfigError;

/// Minimum interval between two executed frames.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameBudget(Duration);

impl FrameBudget {
    /// No pacing: every tick is a frame.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Derives the budget from a target rate in frames per second.
    pub fn from_rate(frames_per_second: f64) -> Result<Self, ConfigError> {
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(frames_per_second));
        }
        Duration::try_from_secs_f64(1.0 / frames_per_second)
            .map(Self)
            .map_err(|_| ConfigError::InvalidFrameRate(frames_per_second))
    }

    #[inline]
    pub const fn from_duration(d: Duration) -> Self {
        Self(d)
    }

    #[inline]
    pub const fn as_duration(self) -> Duration {
        self.0
    }
}

/// Decides whether the tick at `now` should execute a frame.
///
/// The first tick is always due. Later ticks are due once `budget` has passed
/// since the last executed frame; earlier ticks are skipped without building
/// up a backlog.
pub fn is_due(clock: &FrameClock, now: Timestamp, budget: FrameBudget) -> bool {
    match clock.previous_frame_time() {
        None => true,
        Some(prev) => now >= prev + budget.as_duration(),
    }
}
