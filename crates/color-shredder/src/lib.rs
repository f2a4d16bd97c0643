//! Color shredder.
//!
//! Fills the whole drawing surface with fresh RGBA noise on every frame of a
//! `shredder_engine` render loop. The native build presents through wgpu, the
//! wasm32 build through a 2D canvas.

use shredder_engine::coords::SurfaceSize;

mod shredder;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use shredder::Shredder;

/// Canvas size used when the host does not provide one.
pub const DEFAULT_SIZE: SurfaceSize = SurfaceSize::new(512, 512);
