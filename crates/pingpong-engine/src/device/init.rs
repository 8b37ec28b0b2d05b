/// Initialization parameters for the GPU layer.
///
/// The defaults describe the only configuration the game uses: vsync on, two
/// frames in flight, WebGPU default limits.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Present mode. FIFO waits for vertical blank on every present.
    pub present_mode: wgpu::PresentMode,

    /// Adapter preference passed to `request_adapter`.
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// The single limits set requested from the adapter. There is no fallback
    /// to lower limits if the adapter cannot satisfy it.
    pub required_limits: wgpu::Limits,

    /// Number of frames the surface may queue (2 = double buffering).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            present_mode: wgpu::PresentMode::Fifo,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
