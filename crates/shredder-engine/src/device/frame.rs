use thiserror::Error;

use crate::coords::SurfaceSize;

/// Represents a single acquired frame.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Unrecoverable for this surface (commonly OOM).
    Fatal,
}

/// Failure to put a frame on screen.
#[derive(Debug, Error)]
pub enum PresentError {
    #[error("surface texture unavailable ({0:?})")]
    Surface(SurfaceErrorAction),

    #[error("surface is zero-sized")]
    ZeroSized,

    #[error("pixel buffer holds {got} bytes, a {}x{} surface needs {}", .size.width, .size.height, .size.rgba_len())]
    BufferSize { got: usize, size: SurfaceSize },

    #[error("gpu surface is busy")]
    Busy,
}
