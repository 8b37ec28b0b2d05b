use crate::coords::ColorRgba;

use super::DrawIndexed;

/// Represents a single acquired frame.
///
/// Draw commands are recorded here between `begin_frame` and `end_frame` and
/// replayed in one render pass. Holding the surface texture prevents
/// acquisition of subsequent frames, so the frame must be finalized promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    pub clear: ColorRgba,
    pub draws: Vec<DrawIndexed>,
}
