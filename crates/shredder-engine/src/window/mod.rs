//! Native window host.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer and
//! drives a `RenderLoop` once per display refresh.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};

pub use winit::dpi::LogicalSize;
