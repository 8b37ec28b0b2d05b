use std::path::PathBuf;

/// Failure while creating the graphics device. Always fatal for the application.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("window has zero size ({width}x{height})")]
    ZeroSizedWindow { width: u32, height: u32 },

    #[error("failed to create wgpu surface")]
    Surface(#[source] wgpu::CreateSurfaceError),

    #[error("no hardware GPU adapter satisfies the requested limits")]
    NoAdapter(#[source] wgpu::RequestAdapterError),

    #[error("adapter '{name}' is a software rasterizer; a hardware adapter is required")]
    SoftwareAdapter { name: String },

    #[error("failed to create wgpu device/queue")]
    RequestDevice(#[source] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Failure while loading or compiling a shader program.
///
/// Non-fatal: the component that requested the program stays non-drawable.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("missing shader file: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read shader file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader '{label}' failed to compile:\n{diagnostic}")]
    Compile { label: String, diagnostic: String },
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}
