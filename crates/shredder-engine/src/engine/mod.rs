//! Render engine contract.
//!
//! The loop treats the engine as an opaque, exclusively owned handle. Within
//! one executed frame `update` is always called before `render`.

use crate::error::EngineError;

pub trait RenderEngine {
    /// Advances engine state to `elapsed_ms` since loop start, for a surface
    /// of `height` x `width` pixels.
    fn update(&mut self, elapsed_ms: u64, height: u32, width: u32) -> Result<(), EngineError>;

    /// Draws the current state onto the host surface.
    fn render(&mut self) -> Result<(), EngineError>;
}

impl<E: RenderEngine + ?Sized> RenderEngine for Box<E> {
    fn update(&mut self, elapsed_ms: u64, height: u32, width: u32) -> Result<(), EngineError> {
        (**self).update(elapsed_ms, height, width)
    }

    fn render(&mut self) -> Result<(), EngineError> {
        (**self).render()
    }
}
