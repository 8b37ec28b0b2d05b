//! Time subsystem.
//!
//! - `FrameClock` produces one `FrameTime` per presented frame
//! - `FpsCounter` turns those deltas into the once-per-second FPS figure

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
