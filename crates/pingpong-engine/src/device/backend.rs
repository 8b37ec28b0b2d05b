use crate::coords::ColorRgba;

use super::{ShaderError, SurfaceErrorAction};

/// Handle to a compiled shader program (shader modules + pipeline).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(pub(crate) u32);

/// Handle to a GPU buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub(crate) u32);

/// What a buffer is bound as.
///
/// Vertex and index buffers are immutable once created; uniform buffers accept
/// `write_buffer` updates.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    Vertex,
    Index,
    Uniform,
}

impl BufferKind {
    pub fn usages(self) -> wgpu::BufferUsages {
        match self {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
            BufferKind::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        }
    }
}

/// Buffer creation request. The buffer size is exactly `contents.len()`.
#[derive(Debug, Copy, Clone)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub kind: BufferKind,
    pub contents: &'a [u8],
}

/// Fixed-function rasterizer configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RasterizerState {
    pub cull_mode: Option<wgpu::Face>,
    pub polygon_mode: wgpu::PolygonMode,
}

impl RasterizerState {
    /// Both faces drawn, filled triangles.
    pub const SOLID_NO_CULL: Self = Self {
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
    };
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self::SOLID_NO_CULL
    }
}

/// Everything needed to build a program: shader source and entry points,
/// the vertex input layout, topology, rasterizer state and the size of the
/// single vertex-stage uniform binding.
#[derive(Debug, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub source: &'a str,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
    pub topology: wgpu::PrimitiveTopology,
    pub rasterizer: RasterizerState,
    pub uniform_size: u64,
}

/// One self-contained indexed draw.
///
/// A draw names every resource it depends on, so nothing leaks from one
/// component's draw into the next.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawIndexed {
    pub program: ProgramId,
    pub topology: wgpu::PrimitiveTopology,
    pub vertex_buffer: BufferId,
    pub vertex_stride: u64,
    pub vertex_offset: u64,
    pub index_buffer: BufferId,
    pub index_format: wgpu::IndexFormat,
    pub index_count: u32,
    /// Bound at vertex-stage binding 0 of group 0.
    pub uniform: Option<BufferId>,
}

/// GPU capability handle passed into every component lifecycle call.
///
/// Frame contract:
/// - `begin_frame` starts from default pipeline state and records the clear color
/// - `draw_indexed` calls are kept in call order
/// - `end_frame` clears the target, executes the draws in order and presents
///
/// Resource contract: ids stay valid until released; releasing an unknown or
/// already released id is a no-op.
pub trait RenderBackend {
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError>;

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId;

    /// Writes `data` at offset 0 of a uniform buffer.
    fn write_buffer(&mut self, buffer: BufferId, data: &[u8]);

    fn release_program(&mut self, program: ProgramId);

    fn release_buffer(&mut self, buffer: BufferId);

    fn begin_frame(&mut self, clear: ColorRgba) -> Result<(), SurfaceErrorAction>;

    fn draw_indexed(&mut self, draw: DrawIndexed);

    fn end_frame(&mut self);
}

/// Slot storage used by backends to hand out stable integer ids.
///
/// Ids are never reused, so a stale id can only miss, never alias a newer
/// resource. Removed entries leave an empty slot behind; a shader reload costs
/// one slot per program, which stays negligible for a hand-driven hot key.
#[derive(Debug)]
pub(crate) struct Slots<T> {
    items: Vec<Option<T>>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Slots<T> {
    pub(crate) fn insert(&mut self, value: T) -> u32 {
        self.items.push(Some(value));
        (self.items.len() - 1) as u32
    }

    pub(crate) fn get(&self, id: u32) -> Option<&T> {
        self.items.get(id as usize).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.items.get_mut(id as usize).and_then(Option::as_mut)
    }

    pub(crate) fn remove(&mut self, id: u32) -> Option<T> {
        self.items.get_mut(id as usize).and_then(Option::take)
    }

    pub(crate) fn live(&self) -> usize {
        self.items.iter().filter(|s| s.is_some()).count()
    }
}
