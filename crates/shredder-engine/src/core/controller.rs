use std::fmt;

use crate::coords::SurfaceSize;
use crate::engine::RenderEngine;
use crate::error::{ClockError, EngineError, LoopError};
use crate::schedule::CancelToken;
use crate::surface::SurfaceSizer;
use crate::time::{is_due, Clock, FrameBudget, FrameClock, FrameTime, Timestamp};

use super::config::LoopConfig;
use super::ctx::HostCtx;

/// Engine call that failed within a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStage {
    Update,
    Render,
}

impl fmt::Display for FrameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameStage::Update => f.write_str("update"),
            FrameStage::Render => f.write_str("render"),
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// The cancel token was set; nothing ran and nothing was rescheduled.
    Cancelled,
    /// The clock failed; the loop stopped.
    Halted(ClockError),
    /// The frame budget had not elapsed.
    Skipped,
    /// Update and render both ran. `resized` is set when the surface changed first.
    Rendered { frame: FrameTime, resized: bool },
    /// The engine failed; the frame was abandoned.
    Dropped { frame: FrameTime, stage: FrameStage },
}

impl TickOutcome {
    /// Whether the tick executed a frame (successfully or not).
    pub fn is_frame(&self) -> bool {
        matches!(self, TickOutcome::Rendered { .. } | TickOutcome::Dropped { .. })
    }
}

/// Running counters, updated every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub frames: u64,
    pub skipped: u64,
    pub resizes: u64,
    pub engine_failures: u64,
    pub resize_failures: u64,
    pub viewport_failures: u64,
    pub schedule_failures: u64,
}

/// Frame-paced render loop controller.
///
/// Owns the render engine and all cross-tick state. The host calls `tick` (or
/// `tick_at` when it has its own frame timestamp) from its refresh callback and
/// lends the loop its viewport, surface and scheduler for that tick.
pub struct RenderLoop<E, C> {
    engine: E,
    clock: C,
    budget: FrameBudget,
    frame_clock: FrameClock,
    sizer: SurfaceSizer,
    cancel: CancelToken,
    stats: LoopStats,
}

impl<E, C> RenderLoop<E, C>
where
    E: RenderEngine,
    C: Clock,
{
    /// Starts a loop at the clock's current time.
    ///
    /// `initial` is the surface size the host created; a differing viewport is
    /// reconciled on the first frame.
    pub fn new(config: &LoopConfig, engine: E, clock: C, initial: SurfaceSize) -> Result<Self, LoopError> {
        let budget = config.budget()?;
        let start = clock.now()?;

        log::info!(
            "render loop started: budget {:?}, surface {}x{}",
            budget.as_duration(),
            initial.width,
            initial.height
        );

        Ok(Self {
            engine,
            clock,
            budget,
            frame_clock: FrameClock::new(start),
            sizer: SurfaceSizer::new(initial),
            cancel: CancelToken::new(),
            stats: LoopStats::default(),
        })
    }

    /// Replaces the loop's cancel token with one the host keeps a clone of.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn budget(&self) -> FrameBudget {
        self.budget
    }

    pub fn frame_clock(&self) -> &FrameClock {
        &self.frame_clock
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.sizer.size()
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// Runs one tick, reading the time from the loop's clock.
    pub fn tick(&mut self, host: &mut HostCtx<'_>) -> TickOutcome {
        if !self.begin_tick(host) {
            return TickOutcome::Cancelled;
        }

        match self.clock.now() {
            Ok(now) => self.run_tick(now, host),
            Err(err) => {
                log::error!("render loop halted: {err}");
                // The tick scheduled above becomes a no-op.
                self.cancel.cancel();
                TickOutcome::Halted(err)
            }
        }
    }

    /// Runs one tick at a host-supplied timestamp.
    pub fn tick_at(&mut self, now: Timestamp, host: &mut HostCtx<'_>) -> TickOutcome {
        if !self.begin_tick(host) {
            return TickOutcome::Cancelled;
        }
        self.run_tick(now, host)
    }

    /// Cancellation check and unconditional reschedule. Returns false when cancelled.
    fn begin_tick(&mut self, host: &mut HostCtx<'_>) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        self.stats.ticks += 1;

        if let Err(err) = host.scheduler.schedule_next() {
            self.stats.schedule_failures += 1;
            log::warn!("{err}");
        }

        true
    }

    fn run_tick(&mut self, now: Timestamp, host: &mut HostCtx<'_>) -> TickOutcome {
        if !is_due(&self.frame_clock, now, self.budget) {
            self.stats.skipped += 1;
            log::trace!("tick at {:?} skipped", now.offset());
            return TickOutcome::Skipped;
        }

        // Committed before anything fallible so a failing frame is not retried
        // on every tick at the same timestamp.
        let frame = self.frame_clock.record_frame(now);
        self.stats.frames += 1;

        let resized = self.reconcile_surface(host);
        let size = self.sizer.size();

        if let Err(err) = self.engine.update(frame.elapsed_ms(), size.height, size.width) {
            return self.drop_frame(frame, FrameStage::Update, size, &err);
        }

        if let Err(err) = self.engine.render() {
            return self.drop_frame(frame, FrameStage::Render, size, &err);
        }

        TickOutcome::Rendered { frame, resized }
    }

    fn reconcile_surface(&mut self, host: &mut HostCtx<'_>) -> bool {
        let viewport = match host.viewport.changed_since(self.sizer.size().into()) {
            Ok(Some(viewport)) => viewport,
            Ok(None) => return false,
            Err(err) => {
                self.stats.viewport_failures += 1;
                log::warn!("{err}; keeping surface size");
                return false;
            }
        };

        match self.sizer.sync(&mut *host.surface, viewport) {
            Ok(resized) => {
                if resized {
                    self.stats.resizes += 1;
                }
                resized
            }
            Err(err) => {
                self.stats.resize_failures += 1;
                log::warn!("{err}; keeping surface size");
                false
            }
        }
    }

    fn drop_frame(
        &mut self,
        frame: FrameTime,
        stage: FrameStage,
        size: SurfaceSize,
        err: &EngineError,
    ) -> TickOutcome {
        self.stats.engine_failures += 1;
        log::warn!(
            "frame {} dropped: {stage} failed at {} ms on {}x{} surface: {err}",
            frame.frame_index,
            frame.elapsed_ms(),
            size.width,
            size.height
        );
        TickOutcome::Dropped { frame, stage }
    }
}
