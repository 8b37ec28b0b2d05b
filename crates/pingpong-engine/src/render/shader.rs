use std::io;
use std::path::{Path, PathBuf};

use crate::device::ShaderError;

/// Vertex stage entry point every mesh shader exports.
pub const VERTEX_ENTRY: &str = "VSMain";

/// Fragment stage entry point every mesh shader exports.
pub const FRAGMENT_ENTRY: &str = "PSMain";

/// Shader shipped with the engine.
pub const DEFAULT_SHADER_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/mesh.wgsl");

/// WGSL source read from disk.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub code: String,
}

impl ShaderSource {
    /// Reads the file at `path`. A missing file is reported separately from
    /// other I/O failures.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref().to_path_buf();
        match std::fs::read_to_string(&path) {
            Ok(code) => Ok(Self { path, code }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ShaderError::MissingFile { path }),
            Err(source) => Err(ShaderError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shader_exports_entry_points() {
        let src = ShaderSource::load(DEFAULT_SHADER_PATH).unwrap();
        assert!(src.code.contains(&format!("fn {VERTEX_ENTRY}(")));
        assert!(src.code.contains(&format!("fn {FRAGMENT_ENTRY}(")));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ShaderSource::load("/nonexistent/pingpong/mesh.wgsl").unwrap_err();
        assert!(matches!(err, ShaderError::MissingFile { .. }));
    }
}
