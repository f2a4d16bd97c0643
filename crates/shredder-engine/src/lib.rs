//! Shredder engine crate.
//!
//! Frame-paced render loop plus the native (winit + wgpu) and browser hosts
//! that drive it.

pub mod coords;
pub mod core;
pub mod engine;
pub mod error;
pub mod logging;
pub mod schedule;
pub mod surface;
pub mod time;
pub mod viewport;

#[cfg(not(target_arch = "wasm32"))]
pub mod device;
#[cfg(not(target_arch = "wasm32"))]
pub mod window;

#[cfg(target_arch = "wasm32")]
pub mod web;
