use crate::device::{RenderBackend, ShaderError};
use crate::time::FrameTime;

/// Failure reported by a component lifecycle call.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("expected {expected} vertices, got {actual}")]
    Geometry { expected: usize, actual: usize },

    #[error("component resources were already destroyed")]
    Destroyed,
}

/// Unit of behaviour attached to a [`SceneNode`](super::SceneNode).
///
/// Lifecycle: `initialize` once, then per frame `update`, `fixed_update` and
/// `draw`, and finally `destroy_resources`. GPU access is only available
/// through the backend passed to each call.
pub trait Component {
    /// Short name used in log output.
    fn name(&self) -> &str;

    fn initialize(&mut self, backend: &mut dyn RenderBackend) -> Result<(), ComponentError>;

    fn update(&mut self, time: &FrameTime) {
        let _ = time;
    }

    fn fixed_update(&mut self, time: &FrameTime) {
        let _ = time;
    }

    /// Records this component's draws for the current frame.
    fn draw(&mut self, backend: &mut dyn RenderBackend);

    /// Rebuilds shader programs from their current sources.
    fn reload(&mut self, backend: &mut dyn RenderBackend) -> Result<(), ComponentError> {
        let _ = backend;
        Ok(())
    }

    fn destroy_resources(&mut self, backend: &mut dyn RenderBackend);
}
