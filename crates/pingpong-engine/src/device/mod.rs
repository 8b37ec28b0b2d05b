//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - owning programs and buffers behind [`RenderBackend`] ids
//! - recording a frame's draws and replaying them in one render pass

mod backend;
mod error;
mod frame;
mod gpu;
mod init;
mod recording;
mod surface;

pub use backend::{
    BufferDesc, BufferId, BufferKind, DrawIndexed, ProgramDesc, ProgramId, RasterizerState,
    RenderBackend,
};
pub use error::{DeviceError, ShaderError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use recording::{Command, RecordingDevice};
