/// Accumulates frame deltas and reports frames-per-second roughly once a second.
///
/// After a report the accumulator keeps the overshoot past one second and the
/// frame counter restarts at zero.
#[derive(Debug, Default, Clone)]
pub struct FpsCounter {
    total: f32,
    frames: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame of `dt` seconds. Returns the FPS value when a report is due.
    pub fn record(&mut self, dt: f32) -> Option<f32> {
        self.total += dt;
        self.frames += 1;

        if self.total > 1.0 {
            let fps = self.frames as f32 / self.total;
            self.total -= 1.0;
            self.frames = 0;
            return Some(fps);
        }

        None
    }

    /// Seconds accumulated since the last report (plus any carried overshoot).
    pub fn accumulated(&self) -> f32 {
        self.total
    }

    /// Frames counted since the last report.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}
