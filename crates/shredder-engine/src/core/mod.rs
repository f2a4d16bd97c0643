//! Render loop controller.
//!
//! This module defines the stable interface between a host (native window,
//! browser page) and a render engine: the host lends its services through a
//! per-tick `HostCtx`, and `RenderLoop` decides whether the tick becomes a frame.

mod config;
mod controller;
mod ctx;

pub use config::LoopConfig;
pub use controller::{FrameStage, LoopStats, RenderLoop, TickOutcome};
pub use ctx::HostCtx;
