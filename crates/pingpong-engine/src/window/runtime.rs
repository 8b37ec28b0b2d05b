use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use crate::core::{Application, FrameReport, Game};
use crate::device::{DeviceError, Gpu, GpuInit};
use crate::input::platform::winit::{translate_device_event, translate_window_event};
use crate::input::{InputFrame, InputSnapshot, InputState};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Client area width in physical pixels.
    pub width: u32,
    /// Client area height in physical pixels.
    pub height: u32,
    /// `false` opens a borderless fullscreen window on the current monitor.
    pub windowed: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Ping Pong".to_string(),
            width: 800,
            height: 800,
            windowed: true,
        }
    }
}

impl RuntimeConfig {
    fn title_with_fps(&self, fps: f32) -> String {
        format!("{} | FPS: {fps:.2}", self.title)
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `game` until it exits and tears everything down.
    ///
    /// Returns an error if the window or graphics device could not be created
    /// or the surface failed beyond recovery.
    pub fn run<G>(config: RuntimeConfig, gpu_init: GpuInit, game: G) -> Result<()>
    where
        G: Game + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, gpu_init, Application::new(game));

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    fn create(window: Window, gpu_init: GpuInit) -> Result<Self, DeviceError> {
        WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
    }
}

struct RuntimeState<G: Game + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: Application<G>,

    entry: Option<WindowEntry>,
    input_state: InputState,
    input_frame: InputFrame,

    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<G: Game + 'static> RuntimeState<G> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: Application<G>) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            exit_requested: false,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);
        if !self.config.windowed {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        WindowEntry::create(window, self.gpu_init.clone())
            .context("failed to create graphics device")
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else { return };

        let (app, input_state, input_frame) = (&mut self.app, &self.input_state, &self.input_frame);
        let report: FrameReport = entry.with_gpu_mut(|gpu| {
            app.tick(gpu, InputSnapshot::new(input_state, input_frame))
        });
        self.input_frame.clear();

        if let Some(fps) = report.fps {
            let title = self.config.title_with_fps(fps);
            entry.with_window(|w| w.set_title(&title));
        }

        if report.fatal {
            self.fail(event_loop, anyhow::anyhow!("surface lost beyond recovery"));
        } else if report.exit_requested {
            log::info!("exit requested");
            self.exit_requested = true;
            event_loop.exit();
        }
    }
}

impl<G: Game + 'static> ApplicationHandler for RuntimeState<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        let mut entry = match self.create_entry(event_loop) {
            Ok(e) => e,
            Err(err) => return self.fail(event_loop, err),
        };

        self.app.prepare_resources();
        let app = &mut self.app;
        entry.with_gpu_mut(|gpu| app.initialize(gpu));

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw; presentation blocks on vsync.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(ev) = translate_window_event(&event) {
            self.input_state.apply_event(&mut self.input_frame, ev);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.exit_requested = true;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::debug!(
                    "window resized to {}x{}; surface follows on its next reconfigure",
                    size.width,
                    size.height
                );
            }
            WindowEvent::RedrawRequested if !self.exit_requested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(ev) = translate_device_event(&event) {
            self.input_state.apply_event(&mut self.input_frame, ev);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut entry) = self.entry.take() {
            let app = &mut self.app;
            entry.with_gpu_mut(|gpu| app.destroy_resources(gpu));
        }
        log::debug!("runtime: shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_square_window() {
        let c = RuntimeConfig::default();
        assert_eq!((c.width, c.height), (800, 800));
        assert!(c.windowed);
    }

    #[test]
    fn title_carries_two_decimal_fps() {
        let c = RuntimeConfig::default();
        assert_eq!(c.title_with_fps(59.9412), "Ping Pong | FPS: 59.94");
    }
}
