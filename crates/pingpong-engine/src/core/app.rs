use crate::coords::ColorRgba;
use crate::device::RenderBackend;
use crate::scene::Scene;

use super::ctx::UpdateCtx;

/// Control directive returned by game callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application-wide settings a game may override.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AppSettings {
    /// Color the back buffer is cleared to at the start of every frame.
    pub clear_color: ColorRgba,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            clear_color: ColorRgba::black(),
        }
    }
}

/// Game contract implemented by the binary crate.
///
/// The engine owns the scene and the GPU; the game populates the scene once
/// and then adjusts it every frame.
pub trait Game {
    fn settings(&self) -> AppSettings {
        AppSettings::default()
    }

    /// Adds nodes and components. Called once, before any GPU resource exists.
    fn configure(&mut self, scene: &mut Scene);

    /// Game rules for one frame. Runs after the scene's own update.
    fn update(&mut self, ctx: &mut UpdateCtx<'_>, scene: &mut Scene) -> AppControl;

    /// Called after the scene has drawn, before the frame is presented.
    fn restore_targets(&mut self, backend: &mut dyn RenderBackend) {
        let _ = backend;
    }
}
