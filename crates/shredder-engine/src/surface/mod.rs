//! Surface sizing.
//!
//! Keeps the drawing surface's dimensions in step with the viewport. The
//! comparison itself is a pure function (`reconcile`); pushing the new size
//! into the host goes through a `ResizeTarget`.

use crate::coords::{SurfaceSize, ViewportSize};
use crate::error::ResizeError;

/// Host-side surface whose dimensions follow the viewport.
///
/// Implementations resize the backing surface and any projection or output
/// region that depends on it.
pub trait ResizeTarget {
    fn apply_size(&mut self, size: SurfaceSize) -> Result<(), ResizeError>;
}

/// Target with no host-side state; only the tracked size changes.
#[derive(Debug, Default, Copy, Clone)]
pub struct Detached;

impl ResizeTarget for Detached {
    fn apply_size(&mut self, _size: SurfaceSize) -> Result<(), ResizeError> {
        Ok(())
    }
}

/// Updates `surface` to `viewport` if they differ. Returns whether it changed.
pub fn reconcile(surface: &mut SurfaceSize, viewport: ViewportSize) -> bool {
    if surface.matches(viewport) {
        return false;
    }
    surface.width = viewport.width;
    surface.height = viewport.height;
    true
}

/// Owns the committed surface size.
///
/// The committed size only changes once the host accepted it, so a rejected
/// size is retried on the next sync.
#[derive(Debug, Clone)]
pub struct SurfaceSizer {
    size: SurfaceSize,
}

impl SurfaceSizer {
    pub fn new(initial: SurfaceSize) -> Self {
        Self { size: initial }
    }

    #[inline]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Brings the host surface to `viewport`. Returns `Ok(true)` on resize.
    pub fn sync(
        &mut self,
        target: &mut dyn ResizeTarget,
        viewport: ViewportSize,
    ) -> Result<bool, ResizeError> {
        let mut pending = self.size;
        if !reconcile(&mut pending, viewport) {
            return Ok(false);
        }

        target.apply_size(pending)?;
        log::debug!(
            "surface resized {}x{} -> {}x{}",
            self.size.width,
            self.size.height,
            pending.width,
            pending.height
        );
        self.size = pending;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        applied: Vec<SurfaceSize>,
        reject: bool,
    }

    impl ResizeTarget for Recording {
        fn apply_size(&mut self, size: SurfaceSize) -> Result<(), ResizeError> {
            if self.reject {
                return Err(ResizeError::new(size, "rejected"));
            }
            self.applied.push(size);
            Ok(())
        }
    }

    // ── reconcile ─────────────────────────────────────────────────────────

    #[test]
    fn reconcile_updates_on_difference() {
        let mut s = SurfaceSize::new(800, 600);
        assert!(reconcile(&mut s, ViewportSize::new(1024, 768)));
        assert_eq!(s, SurfaceSize::new(1024, 768));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut s = SurfaceSize::new(800, 600);
        let vp = ViewportSize::new(640, 480);
        assert!(reconcile(&mut s, vp));
        assert!(!reconcile(&mut s, vp));
        assert_eq!(s, SurfaceSize::new(640, 480));
    }

    #[test]
    fn reconcile_equal_sizes_is_noop() {
        let mut s = SurfaceSize::new(5, 5);
        assert!(!reconcile(&mut s, ViewportSize::new(5, 5)));
        assert_eq!(s, SurfaceSize::new(5, 5));
    }

    // ── SurfaceSizer ──────────────────────────────────────────────────────

    #[test]
    fn sync_applies_once_per_change() {
        let mut sizer = SurfaceSizer::new(SurfaceSize::new(800, 600));
        let mut target = Recording::default();
        let vp = ViewportSize::new(1024, 768);

        assert!(sizer.sync(&mut target, vp).unwrap());
        assert!(!sizer.sync(&mut target, vp).unwrap());
        assert_eq!(target.applied, vec![SurfaceSize::new(1024, 768)]);
        assert_eq!(sizer.size(), SurfaceSize::new(1024, 768));
    }

    #[test]
    fn rejected_size_is_not_committed() {
        let mut sizer = SurfaceSizer::new(SurfaceSize::new(800, 600));
        let mut target = Recording { reject: true, ..Default::default() };

        let err = sizer.sync(&mut target, ViewportSize::new(0, 0)).unwrap_err();
        assert_eq!(err.requested, SurfaceSize::new(0, 0));
        assert_eq!(sizer.size(), SurfaceSize::new(800, 600));

        target.reject = false;
        assert!(sizer.sync(&mut target, ViewportSize::new(0, 0)).unwrap());
    }
}
