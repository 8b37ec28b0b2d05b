use std::path::{Path, PathBuf};

use crate::coords::Vec4;
use crate::device::{
    BufferDesc, BufferId, BufferKind, DrawIndexed, ProgramDesc, ProgramId, RasterizerState,
    RenderBackend,
};
use crate::scene::{Component, ComponentError, SharedOffset};

use super::shader::{ShaderSource, DEFAULT_SHADER_PATH, FRAGMENT_ENTRY, VERTEX_ENTRY};
use super::{Shape, Vertex, VERTEX_STRIDE};

const UNIFORM_SIZE: u64 = std::mem::size_of::<Vec4>() as u64;

/// GPU handles owned by an initialized renderer.
#[derive(Debug, Copy, Clone)]
struct Resources {
    program: ProgramId,
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    uniform_buffer: BufferId,
}

#[derive(Debug, Copy, Clone)]
enum State {
    Uninitialized,
    Ready(Resources),
    Destroyed,
}

/// Lifecycle phase of a [`MeshRenderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MeshState {
    Uninitialized,
    Ready,
    Destroyed,
}

/// Draws one fixed shape with a flat-color shader, offset by a shared position.
///
/// Resources are created in `initialize`, used by every `draw` and released in
/// `destroy_resources`. Until `initialize` succeeds the renderer records nothing.
#[derive(Debug)]
pub struct MeshRenderer {
    name: String,
    shape: Shape,
    vertices: Vec<Vertex>,
    shader_path: PathBuf,
    offset: SharedOffset,
    rasterizer: RasterizerState,
    state: State,
    last_error: Option<String>,
}

impl MeshRenderer {
    /// Renderer for `shape`. Without a shared offset the renderer keeps its own,
    /// initially zero.
    pub fn new(
        name: impl Into<String>,
        shape: Shape,
        vertices: impl Into<Vec<Vertex>>,
        offset: Option<SharedOffset>,
    ) -> Self {
        Self {
            name: name.into(),
            shape,
            vertices: vertices.into(),
            shader_path: PathBuf::from(DEFAULT_SHADER_PATH),
            offset: offset.unwrap_or_default(),
            rasterizer: RasterizerState::SOLID_NO_CULL,
            state: State::Uninitialized,
            last_error: None,
        }
    }

    pub fn quad(
        name: impl Into<String>,
        vertices: [Vertex; 4],
        offset: Option<SharedOffset>,
    ) -> Self {
        Self::new(name, Shape::Quad, vertices, offset)
    }

    pub fn triangle(
        name: impl Into<String>,
        vertices: [Vertex; 3],
        offset: Option<SharedOffset>,
    ) -> Self {
        Self::new(name, Shape::Triangle, vertices, offset)
    }

    /// Overrides the shader file read by `initialize` and `reload`.
    pub fn with_shader_path(mut self, path: impl AsRef<Path>) -> Self {
        self.shader_path = path.as_ref().to_path_buf();
        self
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn shader_path(&self) -> &Path {
        &self.shader_path
    }

    pub fn offset(&self) -> Vec4 {
        self.offset.get()
    }

    pub fn offset_handle(&self) -> SharedOffset {
        self.offset.clone()
    }

    pub fn state(&self) -> MeshState {
        match self.state {
            State::Uninitialized => MeshState::Uninitialized,
            State::Ready(_) => MeshState::Ready,
            State::Destroyed => MeshState::Destroyed,
        }
    }

    pub fn is_drawable(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Message of the most recent failed `initialize` or `reload`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn compile(&self, backend: &mut dyn RenderBackend) -> Result<ProgramId, ComponentError> {
        let source = ShaderSource::load(&self.shader_path)?;
        let label = format!("{} {}", self.name, self.shape.label());
        let program = backend.compile_program(&ProgramDesc {
            label: &label,
            source: &source.code,
            vertex_entry: VERTEX_ENTRY,
            fragment_entry: FRAGMENT_ENTRY,
            vertex_layout: Vertex::layout(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            rasterizer: self.rasterizer,
            uniform_size: UNIFORM_SIZE,
        })?;
        Ok(program)
    }

    fn create_resources(
        &self,
        backend: &mut dyn RenderBackend,
    ) -> Result<Resources, ComponentError> {
        let expected = self.shape.vertex_count();
        if self.vertices.len() != expected {
            return Err(ComponentError::Geometry {
                expected,
                actual: self.vertices.len(),
            });
        }

        let program = self.compile(backend)?;

        let vertex_buffer = backend.create_buffer(&BufferDesc {
            label: "mesh vertices",
            kind: BufferKind::Vertex,
            contents: bytemuck::cast_slice(&self.vertices),
        });
        let index_buffer = backend.create_buffer(&BufferDesc {
            label: "mesh indices",
            kind: BufferKind::Index,
            contents: bytemuck::cast_slice(self.shape.indices()),
        });
        let uniform_buffer = backend.create_buffer(&BufferDesc {
            label: "mesh offset",
            kind: BufferKind::Uniform,
            contents: bytemuck::bytes_of(&self.offset.get()),
        });

        Ok(Resources {
            program,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
        })
    }

    /// The owning node logs the failure; the renderer only keeps the message.
    fn record_failure(&mut self, err: &ComponentError) {
        self.last_error = Some(err.to_string());
    }
}

impl Component for MeshRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    /// A second call on a ready renderer is a no-op.
    fn initialize(&mut self, backend: &mut dyn RenderBackend) -> Result<(), ComponentError> {
        match self.state {
            State::Ready(_) => return Ok(()),
            State::Destroyed => return Err(ComponentError::Destroyed),
            State::Uninitialized => {}
        }

        match self.create_resources(backend) {
            Ok(res) => {
                log::debug!("{}: ready ({:?})", self.name, res.program);
                self.state = State::Ready(res);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    fn draw(&mut self, backend: &mut dyn RenderBackend) {
        let State::Ready(res) = self.state else { return };

        backend.write_buffer(res.uniform_buffer, bytemuck::bytes_of(&self.offset.get()));
        backend.draw_indexed(DrawIndexed {
            program: res.program,
            topology: wgpu::PrimitiveTopology::TriangleList,
            vertex_buffer: res.vertex_buffer,
            vertex_stride: VERTEX_STRIDE,
            vertex_offset: 0,
            index_buffer: res.index_buffer,
            index_format: wgpu::IndexFormat::Uint32,
            index_count: self.shape.index_count(),
            uniform: Some(res.uniform_buffer),
        });
    }

    /// Recompiles the program; buffers are kept. On failure the previous
    /// program stays in use.
    fn reload(&mut self, backend: &mut dyn RenderBackend) -> Result<(), ComponentError> {
        match self.state {
            State::Destroyed => Ok(()),
            State::Uninitialized => self.initialize(backend),
            State::Ready(res) => match self.compile(backend) {
                Ok(program) => {
                    backend.release_program(res.program);
                    self.state = State::Ready(Resources { program, ..res });
                    self.last_error = None;
                    log::info!("{}: shader reloaded", self.name);
                    Ok(())
                }
                Err(err) => {
                    self.record_failure(&err);
                    Err(err)
                }
            },
        }
    }

    fn destroy_resources(&mut self, backend: &mut dyn RenderBackend) {
        if let State::Ready(res) = self.state {
            backend.release_program(res.program);
            backend.release_buffer(res.vertex_buffer);
            backend.release_buffer(res.index_buffer);
            backend.release_buffer(res.uniform_buffer);
            log::debug!("{}: resources released", self.name);
        }
        self.state = State::Destroyed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ColorRgba;
    use crate::device::{Command, RecordingDevice, ShaderError};

    fn v(x: f32, y: f32) -> Vertex {
        Vertex::new(Vec4::new(x, y, 0.5, 1.0), ColorRgba::new(0.67, 0.9, 0.76, 1.0))
    }

    fn quad() -> MeshRenderer {
        MeshRenderer::quad(
            "paddle",
            [v(-0.8, 0.5), v(-1.0, -0.5), v(-0.8, -0.5), v(-1.0, 0.5)],
            None,
        )
    }

    fn triangle() -> MeshRenderer {
        MeshRenderer::triangle("tri", [v(0.0, 0.5), v(-0.5, -0.5), v(0.5, -0.5)], None)
    }

    fn created_sizes(dev: &RecordingDevice) -> Vec<(BufferKind, u64)> {
        dev.commands()
            .iter()
            .filter_map(|c| match c {
                Command::CreateBuffer { kind, size, .. } => Some((*kind, *size)),
                _ => None,
            })
            .collect()
    }

    // ── initialize ────────────────────────────────────────────────────────

    #[test]
    fn buffer_sizes_match_geometry() {
        for (mut mesh, n_vertices, n_indices) in [(quad(), 4, 6), (triangle(), 3, 3)] {
            let mut dev = RecordingDevice::new();
            mesh.initialize(&mut dev).unwrap();
            assert_eq!(
                created_sizes(&dev),
                [
                    (BufferKind::Vertex, 32 * n_vertices),
                    (BufferKind::Index, 4 * n_indices),
                    (BufferKind::Uniform, 16),
                ]
            );
        }
    }

    #[test]
    fn second_initialize_is_a_no_op() {
        let mut dev = RecordingDevice::new();
        let mut mesh = quad();
        mesh.initialize(&mut dev).unwrap();
        mesh.initialize(&mut dev).unwrap();
        assert_eq!(dev.live_programs(), 1);
        assert_eq!(dev.live_buffers(), 3);
    }

    #[test]
    fn missing_shader_leaves_mesh_undrawable() {
        let mut dev = RecordingDevice::new();
        let mut mesh = quad().with_shader_path("/nonexistent/pingpong/mesh.wgsl");

        let err = mesh.initialize(&mut dev).unwrap_err();
        assert!(matches!(err, ComponentError::Shader(ShaderError::MissingFile { .. })));
        assert_eq!(mesh.state(), MeshState::Uninitialized);
        assert!(mesh.last_error().is_some());
        assert_eq!(dev.live_buffers(), 0);

        dev.begin_frame(ColorRgba::black()).unwrap();
        mesh.draw(&mut dev);
        dev.end_frame();
        assert!(dev.draws().is_empty());
        assert_eq!(dev.frames_presented(), 1);
    }

    #[test]
    fn compile_error_is_reported() {
        let mut dev = RecordingDevice::new();
        dev.fail_next_compile("1:1: expected global item");
        let mut mesh = quad();
        let err = mesh.initialize(&mut dev).unwrap_err();
        assert!(matches!(err, ComponentError::Shader(ShaderError::Compile { .. })));
        assert!(mesh.last_error().unwrap_or_default().contains("expected global item"));
    }

    #[test]
    fn wrong_vertex_count_is_rejected() {
        let mut dev = RecordingDevice::new();
        let mut mesh = MeshRenderer::new("bad", Shape::Quad, vec![v(0.0, 0.0)], None);
        let err = mesh.initialize(&mut dev).unwrap_err();
        assert!(matches!(err, ComponentError::Geometry { expected: 4, actual: 1 }));
        assert_eq!(dev.live_programs(), 0);
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn quad_records_one_indexed_draw_of_six() {
        let mut dev = RecordingDevice::new();
        let mut mesh = quad();
        mesh.initialize(&mut dev).unwrap();

        dev.begin_frame(ColorRgba::black()).unwrap();
        mesh.draw(&mut dev);
        dev.end_frame();

        let draws = dev.draws();
        assert_eq!(draws.len(), 1);
        let d = draws[0];
        assert_eq!(d.index_count, 6);
        assert_eq!(d.topology, wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(d.index_format, wgpu::IndexFormat::Uint32);
        assert_eq!(d.vertex_stride, 32);
        assert_eq!(d.vertex_offset, 0);
        assert!(d.uniform.is_some());
        assert_eq!(dev.violations(), 0);
    }

    #[test]
    fn draw_uploads_current_offset() {
        let mut dev = RecordingDevice::new();
        let offset = SharedOffset::default();
        let mut mesh = MeshRenderer::quad(
            "paddle",
            [v(1.0, 0.5), v(0.8, -0.5), v(1.0, -0.5), v(0.8, 0.5)],
            Some(offset.clone()),
        );
        mesh.initialize(&mut dev).unwrap();

        offset.translate(Vec4::y_axis(0.25));
        dev.begin_frame(ColorRgba::black()).unwrap();
        mesh.draw(&mut dev);
        dev.end_frame();

        let uniform = dev.draws()[0].uniform.unwrap();
        let expected = Vec4::new(0.0, 0.25, 0.0, 0.0);
        assert_eq!(dev.buffer_contents(uniform), Some(bytemuck::bytes_of(&expected)));
    }

    // ── reload / destroy ──────────────────────────────────────────────────

    #[test]
    fn reload_swaps_program_and_keeps_buffers() {
        let mut dev = RecordingDevice::new();
        let mut mesh = quad();
        mesh.initialize(&mut dev).unwrap();
        dev.clear_commands();

        mesh.reload(&mut dev).unwrap();
        assert_eq!(dev.live_programs(), 1);
        assert_eq!(dev.live_buffers(), 3);
        assert!(created_sizes(&dev).is_empty());
        assert!(dev.commands().iter().any(|c| matches!(c, Command::ReleaseProgram(_))));
    }

    #[test]
    fn failed_reload_keeps_old_program() {
        let mut dev = RecordingDevice::new();
        let mut mesh = quad();
        mesh.initialize(&mut dev).unwrap();

        dev.fail_next_compile("bad");
        assert!(mesh.reload(&mut dev).is_err());
        assert!(mesh.is_drawable());
        assert_eq!(dev.live_programs(), 1);
    }

    #[test]
    fn destroy_releases_everything_and_is_idempotent() {
        let mut dev = RecordingDevice::new();
        let mut mesh = quad();
        mesh.initialize(&mut dev).unwrap();

        mesh.destroy_resources(&mut dev);
        mesh.destroy_resources(&mut dev);
        assert_eq!(dev.live_programs(), 0);
        assert_eq!(dev.live_buffers(), 0);
        assert_eq!(mesh.state(), MeshState::Destroyed);

        assert!(matches!(mesh.initialize(&mut dev), Err(ComponentError::Destroyed)));
        assert!(mesh.reload(&mut dev).is_ok());
        assert_eq!(dev.live_programs(), 0);
    }
}
