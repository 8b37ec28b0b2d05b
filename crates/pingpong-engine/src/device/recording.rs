use crate::coords::ColorRgba;

use super::backend::Slots;
use super::{
    BufferDesc, BufferId, BufferKind, DrawIndexed, ProgramDesc, ProgramId, RenderBackend,
    ShaderError, SurfaceErrorAction,
};

/// A call observed by [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CompileProgram { id: ProgramId, label: String },
    CreateBuffer { id: BufferId, kind: BufferKind, size: u64 },
    WriteBuffer { id: BufferId, data: Vec<u8> },
    ReleaseProgram(ProgramId),
    ReleaseBuffer(BufferId),
    BeginFrame { clear: ColorRgba },
    DrawIndexed(DrawIndexed),
    EndFrame,
}

#[derive(Debug)]
struct RecordedBuffer {
    kind: BufferKind,
    contents: Vec<u8>,
}

/// Headless [`RenderBackend`] that records every call instead of talking to a GPU.
///
/// It performs the checks a real driver would: entry points must exist in the
/// shader source, uniform writes must fit the buffer, draws must reference
/// live resources. Violations are reported through `log` and counted in
/// [`RecordingDevice::violations`].
#[derive(Debug, Default)]
pub struct RecordingDevice {
    commands: Vec<Command>,
    programs: Slots<String>,
    buffers: Slots<RecordedBuffer>,
    in_frame: bool,
    frames_presented: u64,
    violations: u32,
    fail_next_compile: Option<String>,
    fail_next_frame: Option<SurfaceErrorAction>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in arrival order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Draws recorded so far, across all frames.
    pub fn draws(&self) -> Vec<DrawIndexed> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::DrawIndexed(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of programs that have been compiled and not yet released.
    pub fn live_programs(&self) -> usize {
        self.programs.live()
    }

    /// Number of buffers that have been created and not yet released.
    pub fn live_buffers(&self) -> usize {
        self.buffers.live()
    }

    /// Current contents of a live buffer.
    pub fn buffer_contents(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(id.0).map(|b| b.contents.as_slice())
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn violations(&self) -> u32 {
        self.violations
    }

    /// Makes the next `compile_program` fail with `diagnostic`.
    pub fn fail_next_compile(&mut self, diagnostic: impl Into<String>) {
        self.fail_next_compile = Some(diagnostic.into());
    }

    /// Makes the next `begin_frame` fail with `action`.
    pub fn fail_next_frame(&mut self, action: SurfaceErrorAction) {
        self.fail_next_frame = Some(action);
    }

    fn violation(&mut self, what: &str) {
        log::warn!("RecordingDevice: {what}");
        self.violations += 1;
    }

    fn buffer_is(&self, id: BufferId, kind: BufferKind) -> bool {
        self.buffers.get(id.0).is_some_and(|b| b.kind == kind)
    }
}

impl RenderBackend for RecordingDevice {
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError> {
        if let Some(diagnostic) = self.fail_next_compile.take() {
            return Err(ShaderError::Compile {
                label: desc.label.to_string(),
                diagnostic,
            });
        }

        for entry in [desc.vertex_entry, desc.fragment_entry] {
            if !desc.source.contains(&format!("fn {entry}(")) {
                return Err(ShaderError::Compile {
                    label: desc.label.to_string(),
                    diagnostic: format!("entry point `{entry}` not found"),
                });
            }
        }

        let id = ProgramId(self.programs.insert(desc.label.to_string()));
        self.commands.push(Command::CompileProgram {
            id,
            label: desc.label.to_string(),
        });
        Ok(id)
    }

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId {
        let id = BufferId(self.buffers.insert(RecordedBuffer {
            kind: desc.kind,
            contents: desc.contents.to_vec(),
        }));
        self.commands.push(Command::CreateBuffer {
            id,
            kind: desc.kind,
            size: desc.contents.len() as u64,
        });
        id
    }

    fn write_buffer(&mut self, buffer: BufferId, data: &[u8]) {
        let ok = match self.buffers.get_mut(buffer.0) {
            Some(b) if b.kind == BufferKind::Uniform && data.len() <= b.contents.len() => {
                b.contents[..data.len()].copy_from_slice(data);
                true
            }
            _ => false,
        };
        if !ok {
            self.violation("write to a missing, immutable or undersized buffer");
        }
        self.commands.push(Command::WriteBuffer {
            id: buffer,
            data: data.to_vec(),
        });
    }

    fn release_program(&mut self, program: ProgramId) {
        if self.programs.remove(program.0).is_some() {
            self.commands.push(Command::ReleaseProgram(program));
        }
    }

    fn release_buffer(&mut self, buffer: BufferId) {
        if self.buffers.remove(buffer.0).is_some() {
            self.commands.push(Command::ReleaseBuffer(buffer));
        }
    }

    fn begin_frame(&mut self, clear: ColorRgba) -> Result<(), SurfaceErrorAction> {
        if let Some(action) = self.fail_next_frame.take() {
            return Err(action);
        }
        if self.in_frame {
            self.violation("begin_frame while a frame is open");
        }
        self.in_frame = true;
        self.commands.push(Command::BeginFrame { clear });
        Ok(())
    }

    fn draw_indexed(&mut self, draw: DrawIndexed) {
        if !self.in_frame {
            self.violation("draw outside of a frame");
        }
        if self.programs.get(draw.program.0).is_none() {
            self.violation("draw with a released program");
        }
        if !self.buffer_is(draw.vertex_buffer, BufferKind::Vertex)
            || !self.buffer_is(draw.index_buffer, BufferKind::Index)
        {
            self.violation("draw with a missing vertex or index buffer");
        }
        if let Some(u) = draw.uniform {
            if !self.buffer_is(u, BufferKind::Uniform) {
                self.violation("draw with a missing uniform buffer");
            }
        }
        self.commands.push(Command::DrawIndexed(draw));
    }

    fn end_frame(&mut self) {
        if !self.in_frame {
            self.violation("end_frame without begin_frame");
            return;
        }
        self.in_frame = false;
        self.frames_presented += 1;
        self.commands.push(Command::EndFrame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(source: &str) -> ProgramDesc<'_> {
        ProgramDesc {
            label: "test",
            source,
            vertex_entry: "VSMain",
            fragment_entry: "PSMain",
            vertex_layout: wgpu::VertexBufferLayout {
                array_stride: 32,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[],
            },
            topology: wgpu::PrimitiveTopology::TriangleList,
            rasterizer: Default::default(),
            uniform_size: 16,
        }
    }

    #[test]
    fn missing_entry_point_is_a_compile_error() {
        let mut dev = RecordingDevice::new();
        let err = dev.compile_program(&desc("fn VSMain() {}")).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile { ref diagnostic, .. } if diagnostic.contains("PSMain")
        ));
        assert_eq!(dev.live_programs(), 0);
    }

    #[test]
    fn frame_brackets_are_checked() {
        let mut dev = RecordingDevice::new();
        dev.end_frame();
        assert_eq!(dev.violations(), 1);

        dev.begin_frame(ColorRgba::black()).unwrap();
        dev.end_frame();
        assert_eq!(dev.frames_presented(), 1);
        assert_eq!(dev.violations(), 1);
    }

    #[test]
    fn immutable_buffers_reject_writes() {
        let mut dev = RecordingDevice::new();
        let vb = dev.create_buffer(&BufferDesc {
            label: "vb",
            kind: BufferKind::Vertex,
            contents: &[0; 32],
        });
        dev.write_buffer(vb, &[1; 4]);
        assert_eq!(dev.violations(), 1);
        assert_eq!(dev.buffer_contents(vb), Some(&[0u8; 32][..]));
    }
}
