//! Size types shared by the viewport monitor, the surface sizer and engines.
//!
//! All dimensions are physical pixels.

mod size;

pub use size::{SurfaceSize, ViewportSize};
