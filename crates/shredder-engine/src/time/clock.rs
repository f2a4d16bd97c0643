use std::cell::Cell;
use std::ops::Add;
use std::time::Duration;

use crate::error::ClockError;

/// Monotonic timestamp, expressed as an offset from a clock origin.
///
/// Hosts measure time differently (`std::time::Instant` natively,
/// `performance.now()` milliseconds in the browser), so the loop works on this
/// origin-relative form instead of a platform instant.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const ZERO: Self = Self(Duration::ZERO);

    #[inline]
    pub const fn from_offset(offset: Duration) -> Self {
        Self(offset)
    }

    #[inline]
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Converts a fractional millisecond reading (DOMHighResTimeStamp).
    ///
    /// Negative and non-finite readings collapse to the origin; readings too
    /// large for a `Duration` saturate.
    pub fn from_millis_f64(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Self(Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX))
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub const fn offset(self) -> Duration {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub fn saturating_add(self, d: Duration) -> Self {
        Self(self.0.saturating_add(d))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

/// Time source consumed by the render loop.
pub trait Clock {
    /// Reads the current time.
    fn now(&self) -> Result<Timestamp, ClockError>;

    /// Time elapsed since `t`, never negative.
    fn elapsed_since(&self, t: Timestamp) -> Result<Duration, ClockError> {
        Ok(self.now()?.saturating_duration_since(t))
    }
}

/// Wall clock backed by `std::time::Instant`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        Ok(Timestamp(self.origin.elapsed()))
    }
}

/// Clock advanced explicitly by its owner.
///
/// Used for deterministic replay of tick sequences. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: std::rc::Rc<Cell<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: std::rc::Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, t: Timestamp) {
        self.now.set(t);
    }

    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        Ok(self.now.get())
    }
}

/// Clamps a clock so successive readings never go backward.
///
/// A reading earlier than the previous one is reported as the previous one.
#[derive(Debug)]
pub struct Monotonic<C> {
    inner: C,
    last: Cell<Timestamp>,
}

impl<C: Clock> Monotonic<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            last: Cell::new(Timestamp::ZERO),
        }
    }
}

impl<C: Clock> Clock for Monotonic<C> {
    fn now(&self) -> Result<Timestamp, ClockError> {
        let reading = self.inner.now()?;
        let clamped = reading.max(self.last.get());
        self.last.set(clamped);
        Ok(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Timestamp { Timestamp::from_millis(v) }

    // ── Timestamp ─────────────────────────────────────────────────────────

    #[test]
    fn duration_since_saturates() {
        assert_eq!(ms(10).saturating_duration_since(ms(40)), Duration::ZERO);
        assert_eq!(ms(40).saturating_duration_since(ms(10)), Duration::from_millis(30));
    }

    #[test]
    fn from_millis_f64_rejects_garbage() {
        assert_eq!(Timestamp::from_millis_f64(-5.0), Timestamp::ZERO);
        assert_eq!(Timestamp::from_millis_f64(f64::NAN), Timestamp::ZERO);
        assert_eq!(Timestamp::from_millis_f64(1500.0), ms(1500));
    }

    #[test]
    fn from_millis_f64_saturates_huge_readings() {
        assert_eq!(Timestamp::from_millis_f64(1e300).offset(), Duration::MAX);
        assert_eq!(Timestamp::from_millis_f64(f64::MAX).offset(), Duration::MAX);
    }

    // ── ManualClock ───────────────────────────────────────────────────────

    #[test]
    fn manual_clock_clones_share_time() {
        let a = ManualClock::new(ms(5));
        let b = a.clone();
        a.advance(Duration::from_millis(20));
        assert_eq!(b.now().unwrap(), ms(25));
        assert_eq!(b.elapsed_since(ms(5)).unwrap(), Duration::from_millis(20));
    }

    // ── Monotonic ─────────────────────────────────────────────────────────

    #[test]
    fn monotonic_clamps_backward_steps() {
        let source = ManualClock::new(ms(100));
        let clock = Monotonic::new(source.clone());

        assert_eq!(clock.now().unwrap(), ms(100));
        source.set(ms(60));
        assert_eq!(clock.now().unwrap(), ms(100));
        source.set(ms(130));
        assert_eq!(clock.now().unwrap(), ms(130));
    }

    #[test]
    fn monotonic_elapsed_never_negative() {
        let source = ManualClock::new(ms(10));
        let clock = Monotonic::new(source.clone());
        assert_eq!(clock.elapsed_since(ms(50)).unwrap(), Duration::ZERO);
    }
}
