//! GPU rendering components.
//!
//! Renderers own their GPU resources through ids handed out by a
//! [`RenderBackend`](crate::device::RenderBackend) and record one
//! self-contained draw per frame.
//!
//! Convention:
//! - vertex positions are authored in clip space (`-1..1`, +Y up)
//! - the vertex shader adds a per-node offset uniform

mod mesh;
mod shader;
mod shape;
mod vertex;

pub use mesh::{MeshRenderer, MeshState};
pub use shader::{ShaderSource, DEFAULT_SHADER_PATH, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use shape::Shape;
pub use vertex::{Vertex, VERTEX_STRIDE};
