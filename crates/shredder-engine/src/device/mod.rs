//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain) and following resizes
//! - acquiring frames and presenting pixel buffers

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::{GpuFrame, PresentError, SurfaceErrorAction};
pub use gpu::{Gpu, SharedGpu};
pub use init::GpuInit;
