use crate::error::ConfigError;
use crate::time::FrameBudget;

/// Render loop configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// Frames per second the loop aims for; determines the frame budget.
    pub target_frame_rate: f64,

    /// When false every tick becomes a frame and `target_frame_rate` is ignored.
    pub paced: bool,
}

impl LoopConfig {
    pub const DEFAULT_FRAME_RATE: f64 = 30.0;

    pub fn with_frame_rate(target_frame_rate: f64) -> Self {
        Self {
            target_frame_rate,
            paced: true,
        }
    }

    /// Runs a frame on every tick.
    pub fn unpaced() -> Self {
        Self {
            paced: false,
            ..Self::default()
        }
    }

    /// Validates the configuration into the loop's frame budget.
    pub fn budget(&self) -> Result<FrameBudget, ConfigError> {
        if !self.paced {
            return Ok(FrameBudget::ZERO);
        }
        FrameBudget::from_rate(self.target_frame_rate)
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::with_frame_rate(Self::DEFAULT_FRAME_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_is_thirty_fps() {
        let config = LoopConfig::default();
        assert_eq!(config.target_frame_rate, 30.0);
        assert!(config.paced);
    }

    #[test]
    fn unpaced_has_zero_budget() {
        assert_eq!(LoopConfig::unpaced().budget().unwrap(), FrameBudget::ZERO);
    }

    #[test]
    fn sixty_fps_budget() {
        let budget = LoopConfig::with_frame_rate(60.0).budget().unwrap();
        assert!(budget.as_duration() > Duration::from_micros(16_600));
        assert!(budget.as_duration() < Duration::from_micros(16_700));
    }

    #[test]
    fn zero_rate_is_rejected() {
        let err = LoopConfig::with_frame_rate(0.0).budget().unwrap_err();
        assert_eq!(err, ConfigError::InvalidFrameRate(0.0));
    }
}
