use std::collections::HashMap;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::{ColorRgba, Viewport};

use super::backend::Slots;
use super::surface::{
    choose_alpha_mode, choose_surface_format, classify_surface_error, configurable_size,
};
use super::{
    BufferDesc, BufferId, DeviceError, DrawIndexed, GpuFrame, GpuInit, ProgramDesc, ProgramId,
    RenderBackend, ShaderError, SurfaceErrorAction,
};

struct Program {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

/// Owns wgpu core objects, the surface configuration and every GPU resource
/// handed out through [`RenderBackend`].
///
/// Exactly one `Gpu` exists per window. It is created once at startup and
/// dropped once at shutdown; the surface borrows the window for `'w`.
pub struct Gpu<'w> {
    window: &'w Window,

    /// Kept alive for the lifetime of the surface.
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,

    programs: Slots<Program>,
    buffers: Slots<wgpu::Buffer>,
    bind_groups: HashMap<(ProgramId, BufferId), wgpu::BindGroup>,

    frame: Option<GpuFrame>,
}

impl<'w> Gpu<'w> {
    /// Creates the device and configures the window's surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; callers block on it
    /// once at startup.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self, DeviceError> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(DeviceError::ZeroSizedWindow {
                width: size.width,
                height: size.height,
            });
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(DeviceError::Surface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(DeviceError::NoAdapter)?;

        let info = adapter.get_info();
        if info.device_type == wgpu::DeviceType::Cpu {
            return Err(DeviceError::SoftwareAdapter { name: info.name });
        }
        log::info!(
            "gpu: adapter '{}' ({:?}, {:?})",
            info.name,
            info.device_type,
            info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pingpong device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(DeviceError::RequestDevice)?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps.formats).ok_or(DeviceError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode: choose_alpha_mode(&caps.alpha_modes),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);
        log::debug!(
            "gpu: surface {}x{} {:?} {:?}",
            size.width,
            size.height,
            format,
            init.present_mode
        );

        Ok(Gpu {
            window,
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size,
            programs: Slots::default(),
            buffers: Slots::default(),
            bind_groups: HashMap::new(),
            frame: None,
        })
    }

    /// Viewport covering the whole configured surface.
    pub fn viewport(&self) -> Viewport {
        Viewport::from_size(self.size.width, self.size.height)
    }

    /// Reconfigures the surface at the window's current size.
    ///
    /// Fullscreen windows may receive their final size only after the surface
    /// was first configured, so the stored size is refreshed here. A minimized
    /// window keeps the previous configuration.
    fn reconfigure(&mut self) {
        let Some(size) = configurable_size(self.window.inner_size()) else {
            log::debug!("gpu: window has no area; reconfigure deferred");
            return;
        };
        if size != self.size {
            log::info!(
                "gpu: surface {}x{} -> {}x{}",
                self.size.width,
                self.size.height,
                size.width,
                size.height
            );
        }
        self.size = size;
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn bind_group_for(&mut self, program: ProgramId, buffer: BufferId) -> bool {
        if self.bind_groups.contains_key(&(program, buffer)) {
            return true;
        }
        let (Some(p), Some(b)) = (self.programs.get(program.0), self.buffers.get(buffer.0)) else {
            return false;
        };
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pingpong uniform bind group"),
            layout: &p.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: b.as_entire_binding(),
            }],
        });
        self.bind_groups.insert((program, buffer), bind_group);
        true
    }
}

impl RenderBackend for Gpu<'_> {
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.label),
                source: wgpu::ShaderSource::Wgsl(desc.source.into()),
            });

        let info = pollster::block_on(module.get_compilation_info());
        let diagnostics: Vec<String> = info
            .messages
            .iter()
            .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
            .map(|m| match m.location {
                Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
                None => m.message.clone(),
            })
            .collect();

        let bind_group_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(desc.label),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(desc.uniform_size),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(desc.label),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(desc.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: std::slice::from_ref(&desc.vertex_layout),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(desc.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: desc.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: desc.rasterizer.cull_mode,
                    polygon_mode: desc.rasterizer.polygon_mode,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        let validation = pollster::block_on(scope.pop());

        if !diagnostics.is_empty() || validation.is_some() {
            let mut diagnostic = diagnostics.join("\n");
            if let Some(err) = validation {
                if !diagnostic.is_empty() {
                    diagnostic.push('\n');
                }
                diagnostic.push_str(&err.to_string());
            }
            return Err(ShaderError::Compile {
                label: desc.label.to_string(),
                diagnostic,
            });
        }

        let id = ProgramId(self.programs.insert(Program {
            pipeline,
            bind_group_layout,
        }));
        log::debug!("gpu: compiled program '{}' as {:?}", desc.label, id);
        Ok(id)
    }

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(desc.label),
                contents: desc.contents,
                usage: desc.kind.usages(),
            });
        BufferId(self.buffers.insert(buffer))
    }

    fn write_buffer(&mut self, buffer: BufferId, data: &[u8]) {
        match self.buffers.get(buffer.0) {
            Some(b) => self.queue.write_buffer(b, 0, data),
            None => log::warn!("gpu: write to released buffer {buffer:?} ignored"),
        }
    }

    fn release_program(&mut self, program: ProgramId) {
        if self.programs.remove(program.0).is_some() {
            self.bind_groups.retain(|(p, _), _| *p != program);
        }
    }

    fn release_buffer(&mut self, buffer: BufferId) {
        if let Some(b) = self.buffers.remove(buffer.0) {
            self.bind_groups.retain(|(_, u), _| *u != buffer);
            b.destroy();
        }
    }

    fn begin_frame(&mut self, clear: ColorRgba) -> Result<(), SurfaceErrorAction> {
        if self.frame.is_some() {
            log::warn!("gpu: begin_frame while a frame is open; previous frame discarded");
            self.frame = None;
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                log::warn!("gpu: surface acquisition failed: {err}");
                let action = classify_surface_error(&err);
                if action == SurfaceErrorAction::Reconfigured {
                    self.reconfigure();
                }
                return Err(action);
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pingpong frame encoder"),
            });

        self.frame = Some(GpuFrame {
            surface_texture,
            view,
            encoder,
            clear,
            draws: Vec::new(),
        });
        Ok(())
    }

    fn draw_indexed(&mut self, draw: DrawIndexed) {
        match self.frame.as_mut() {
            Some(frame) => frame.draws.push(draw),
            None => log::warn!("gpu: draw outside of a frame ignored"),
        }
    }

    fn end_frame(&mut self) {
        let Some(mut frame) = self.frame.take() else {
            log::warn!("gpu: end_frame without begin_frame");
            return;
        };

        let viewport = self.viewport();

        // Bind groups are created before the pass borrows the registry.
        for draw in &frame.draws {
            if let Some(u) = draw.uniform {
                self.bind_group_for(draw.program, u);
            }
        }

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pingpong frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear.into()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if viewport.is_valid() {
                rpass.set_viewport(0.0, 0.0, viewport.width, viewport.height, 0.0, 1.0);
            }

            for draw in &frame.draws {
                let (Some(program), Some(vb), Some(ib)) = (
                    self.programs.get(draw.program.0),
                    self.buffers.get(draw.vertex_buffer.0),
                    self.buffers.get(draw.index_buffer.0),
                ) else {
                    log::warn!("gpu: draw references released resources; skipped");
                    continue;
                };

                rpass.set_pipeline(&program.pipeline);
                if let Some(bg) = draw
                    .uniform
                    .and_then(|u| self.bind_groups.get(&(draw.program, u)))
                {
                    rpass.set_bind_group(0, bg, &[]);
                }
                rpass.set_vertex_buffer(0, vb.slice(draw.vertex_offset..));
                rpass.set_index_buffer(ib.slice(..), draw.index_format);
                rpass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(frame.encoder.finish()));
        self.window.pre_present_notify();
        frame.surface_texture.present();
    }
}
