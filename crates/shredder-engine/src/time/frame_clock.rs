use std::time::Duration;

use super::Timestamp;

/// Frame timing snapshot for an executed frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameTime {
    /// Time elapsed since the loop started.
    pub elapsed: Duration,

    /// Timestamp the frame was committed at.
    pub now: Timestamp,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Elapsed time in whole milliseconds, as handed to render engines.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Pacing state of one render loop.
///
/// `start_time` is fixed at creation. `previous_frame_time` is written once per
/// executed frame and never moves backward.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start_time: Timestamp,
    previous_frame_time: Option<Timestamp>,
    frame_index: u64,
}

impl FrameClock {
    pub fn new(start_time: Timestamp) -> Self {
        Self {
            start_time,
            previous_frame_time: None,
            frame_index: 0,
        }
    }

    #[inline]
    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    #[inline]
    pub fn previous_frame_time(&self) -> Option<Timestamp> {
        self.previous_frame_time
    }

    /// Time since the loop started, saturating at zero.
    #[inline]
    pub fn elapsed_at(&self, now: Timestamp) -> Duration {
        now.saturating_duration_since(self.start_time)
    }

    /// Commits an executed frame at `now` and returns its snapshot.
    pub fn record_frame(&mut self, now: Timestamp) -> FrameTime {
        let committed = match self.previous_frame_time {
            Some(prev) => now.max(prev),
            None => now,
        };
        self.previous_frame_time = Some(committed);

        let ft = FrameTime {
            elapsed: self.elapsed_at(committed),
            now: committed,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Timestamp { Timestamp::from_millis(v) }

    #[test]
    fn new_clock_has_no_previous_frame() {
        let clock = FrameClock::new(ms(7));
        assert_eq!(clock.start_time(), ms(7));
        assert_eq!(clock.previous_frame_time(), None);
    }

    #[test]
    fn record_frame_reports_elapsed_and_index() {
        let mut clock = FrameClock::new(ms(100));
        let first = clock.record_frame(ms(100));
        let second = clock.record_frame(ms(145));

        assert_eq!(first.frame_index, 0);
        assert_eq!(first.elapsed_ms(), 0);
        assert_eq!(second.frame_index, 1);
        assert_eq!(second.elapsed_ms(), 45);
        assert_eq!(clock.previous_frame_time(), Some(ms(145)));
    }

    #[test]
    fn previous_frame_time_never_decreases() {
        let mut clock = FrameClock::new(ms(0));
        clock.record_frame(ms(50));
        let ft = clock.record_frame(ms(20));
        assert_eq!(ft.now, ms(50));
        assert_eq!(clock.previous_frame_time(), Some(ms(50)));
    }

    #[test]
    fn elapsed_before_start_is_zero() {
        let clock = FrameClock::new(ms(30));
        assert_eq!(clock.elapsed_at(ms(10)), Duration::ZERO);
    }
}
