//! Tick scheduling and cancellation.
//!
//! The host owns the callback that runs a tick (a redraw handler, an
//! animation-frame closure). `Scheduler` only asks the host to invoke it once
//! more at the next available frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ScheduleError;

pub trait Scheduler {
    /// Requests exactly one more tick at the next available frame.
    fn schedule_next(&mut self) -> Result<(), ScheduleError>;
}

/// Cooperative stop flag checked at the top of every tick.
///
/// Defaults to never cancelled. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_live() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn cancel_is_visible_to_clones() {
        let a = CancelToken::new();
        let b = a.clone();
        a.cancel();
        assert!(b.is_cancelled());
    }
}
