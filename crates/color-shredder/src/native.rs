use shredder_engine::coords::SurfaceSize;
use shredder_engine::device::{PresentError, SharedGpu, SurfaceErrorAction};
use shredder_engine::engine::RenderEngine;
use shredder_engine::error::EngineError;

use crate::Shredder;

/// Noise engine presenting through the window's wgpu surface.
pub struct GpuShredder {
    shredder: Shredder,
    gpu: SharedGpu,
}

impl GpuShredder {
    pub fn new(gpu: SharedGpu, shredder: Shredder) -> Self {
        Self { shredder, gpu }
    }

    fn present(&self) -> Result<(), PresentError> {
        let mut gpu = self.gpu.try_borrow_mut().map_err(|_| PresentError::Busy)?;
        gpu.present_rgba(self.shredder.pixels(), self.shredder.size())
    }
}

impl RenderEngine for GpuShredder {
    fn update(&mut self, elapsed_ms: u64, height: u32, width: u32) -> Result<(), EngineError> {
        self.shredder.shred(elapsed_ms, SurfaceSize::new(width, height));
        Ok(())
    }

    fn render(&mut self) -> Result<(), EngineError> {
        // Minimized window.
        if self.shredder.size().is_empty() {
            return Ok(());
        }

        match self.present() {
            Ok(()) => Ok(()),
            Err(PresentError::Surface(SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame)) => {
                log::debug!("surface not ready, frame not presented");
                Ok(())
            }
            Err(err) => Err(EngineError::with_source("failed to present noise frame", err)),
        }
    }
}
