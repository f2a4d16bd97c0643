use crate::schedule::Scheduler;
use crate::surface::ResizeTarget;
use crate::viewport::ViewportMonitor;

/// Host services borrowed for the duration of one tick.
///
/// The loop never stores these; each host builds a fresh context per tick
/// from whatever it owns (window, canvas, GPU surface).
pub struct HostCtx<'a> {
    pub viewport:  &'a dyn ViewportMonitor,
    pub surface:   &'a mut dyn ResizeTarget,
    pub scheduler: &'a mut dyn Scheduler,
}

impl<'a> HostCtx<'a> {
    #[inline]
    pub fn new(
        viewport: &'a dyn ViewportMonitor,
        surface: &'a mut dyn ResizeTarget,
        scheduler: &'a mut dyn Scheduler,
    ) -> Self {
        Self {
            viewport,
            surface,
            scheduler,
        }
    }
}
