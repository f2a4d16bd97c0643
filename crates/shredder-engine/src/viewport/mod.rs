//! Viewport monitoring.
//!
//! A monitor reports the host display area's size at call time. It keeps no
//! cache of its own; the render loop decides what counts as a change.

use std::cell::Cell;
use std::rc::Rc;

use crate::coords::ViewportSize;
use crate::error::ViewportQueryError;

/// Source of the host's current display dimensions.
pub trait ViewportMonitor {
    /// Reads the present viewport size.
    fn current(&self) -> Result<ViewportSize, ViewportQueryError>;

    /// Returns the new size iff it differs from `last` in width or height.
    fn changed_since(&self, last: ViewportSize) -> Result<Option<ViewportSize>, ViewportQueryError> {
        let now = self.current()?;
        Ok((now != last).then_some(now))
    }
}

/// Viewport fed by host events.
///
/// Event handlers (e.g. a window `Resized` callback) write the latest size;
/// the render loop reads it on its next due tick. Clones share the cell.
#[derive(Debug, Clone, Default)]
pub struct SharedViewport {
    size: Rc<Cell<ViewportSize>>,
}

impl SharedViewport {
    pub fn new(initial: ViewportSize) -> Self {
        Self {
            size: Rc::new(Cell::new(initial)),
        }
    }

    pub fn set(&self, size: ViewportSize) {
        self.size.set(size);
    }
}

impl ViewportMonitor for SharedViewport {
    fn current(&self) -> Result<ViewportSize, ViewportQueryError> {
        Ok(self.size.get())
    }
}

/// Viewport that never changes; the fixed-canvas configuration.
#[derive(Debug, Copy, Clone)]
pub struct FixedViewport(pub ViewportSize);

impl ViewportMonitor for FixedViewport {
    fn current(&self) -> Result<ViewportSize, ViewportQueryError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_size_reports_none() {
        let vp = SharedViewport::new(ViewportSize::new(800, 600));
        assert_eq!(vp.changed_since(ViewportSize::new(800, 600)).unwrap(), None);
    }

    #[test]
    fn width_or_height_change_is_reported() {
        let vp = SharedViewport::new(ViewportSize::new(800, 600));
        let last = ViewportSize::new(800, 600);

        vp.set(ViewportSize::new(1024, 600));
        assert_eq!(vp.changed_since(last).unwrap(), Some(ViewportSize::new(1024, 600)));

        vp.set(ViewportSize::new(800, 768));
        assert_eq!(vp.changed_since(last).unwrap(), Some(ViewportSize::new(800, 768)));
    }

    #[test]
    fn clones_observe_writes() {
        let writer = SharedViewport::default();
        let reader = writer.clone();
        writer.set(ViewportSize::new(3, 4));
        assert_eq!(reader.current().unwrap(), ViewportSize::new(3, 4));
    }

    #[test]
    fn fixed_viewport_is_stable() {
        let vp = FixedViewport(ViewportSize::new(512, 512));
        assert_eq!(vp.changed_since(ViewportSize::new(512, 512)).unwrap(), None);
    }
}
