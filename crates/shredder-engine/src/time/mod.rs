//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per render loop, created when the loop starts
//! - `is_due` decides per tick whether the frame budget has elapsed
//! - `FrameClock::record_frame` commits each executed frame

mod clock;
mod frame_clock;
mod pacer;

#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock, Monotonic, Timestamp};
pub use frame_clock::{FrameClock, FrameTime};
pub use pacer::{is_due, FrameBudget};
