//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the game,
//! and the application state machine that drives the scene each frame.

mod app;
mod application;
mod ctx;

pub use app::{AppControl, AppSettings, Game};
pub use application::{Application, FrameReport, Phase};
pub use ctx::UpdateCtx;
