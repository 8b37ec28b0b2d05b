use crate::input::InputSnapshot;
use crate::time::FrameTime;

/// Per-frame context passed to `Game::update`.
#[derive(Debug, Copy, Clone)]
pub struct UpdateCtx<'a> {
    pub time: FrameTime,
    pub input: InputSnapshot<'a>,
}

impl UpdateCtx<'_> {
    /// Seconds since the previous frame.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.time.dt
    }
}
