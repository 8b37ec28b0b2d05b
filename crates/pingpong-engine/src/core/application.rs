use crate::device::{RenderBackend, SurfaceErrorAction};
use crate::input::{InputSnapshot, Key};
use crate::scene::Scene;
use crate::time::{FpsCounter, FrameClock, FrameTime};

use super::app::{AppControl, AppSettings, Game};
use super::ctx::UpdateCtx;

/// Application lifecycle phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    Created,
    ResourcesPrepared,
    Running,
    ResourcesDestroyed,
}

/// Outcome of one frame, consumed by the runtime.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Set once per second with the measured frame rate.
    pub fps: Option<f32>,
    /// Escape was held or the game asked to exit. The frame was still presented.
    pub exit_requested: bool,
    /// The back buffer could not be acquired; updates ran, nothing was drawn.
    pub skipped: bool,
    /// The surface failed unrecoverably.
    pub fatal: bool,
}

/// Owns the game and its scene and drives them through the frame sequence:
/// begin frame, scene update, exit check, game update, fixed update, draw,
/// restore targets, end frame.
pub struct Application<G: Game> {
    game: G,
    scene: Scene,
    settings: AppSettings,
    phase: Phase,
    clock: FrameClock,
    fps: FpsCounter,
    exit_pending: bool,
}

impl<G: Game> Application<G> {
    pub fn new(game: G) -> Self {
        let settings = game.settings();
        Self {
            game,
            scene: Scene::new(),
            settings,
            phase: Phase::Created,
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            exit_pending: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// True once an exit was requested during an update.
    pub fn exit_pending(&self) -> bool {
        self.exit_pending
    }

    /// Lets the game build its scene. No GPU work happens here.
    pub fn prepare_resources(&mut self) {
        if self.phase != Phase::Created {
            log::warn!("app: prepare_resources in phase {:?} ignored", self.phase);
            return;
        }
        self.game.configure(&mut self.scene);
        self.phase = Phase::ResourcesPrepared;
        log::debug!("app: scene configured with {} nodes", self.scene.len());
    }

    /// Initializes every node in registration order and starts the clock.
    ///
    /// Component failures are logged and leave those components undrawable;
    /// the application still runs. Returns the number of failed components.
    pub fn initialize(&mut self, backend: &mut dyn RenderBackend) -> usize {
        if self.phase != Phase::ResourcesPrepared {
            log::warn!("app: initialize in phase {:?} ignored", self.phase);
            return 0;
        }
        let failed = self.scene.initialize(backend);
        if failed > 0 {
            log::warn!("app: {failed} component(s) failed to initialize");
        }
        self.clock.reset();
        self.phase = Phase::Running;
        log::debug!("app: running");
        failed
    }

    /// Runs one frame timed by the internal clock.
    pub fn tick(
        &mut self,
        backend: &mut dyn RenderBackend,
        input: InputSnapshot<'_>,
    ) -> FrameReport {
        let time = self.clock.tick();
        self.frame(backend, time, input)
    }

    /// Runs one frame with an explicit delta.
    pub fn frame(
        &mut self,
        backend: &mut dyn RenderBackend,
        time: FrameTime,
        input: InputSnapshot<'_>,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        if self.phase != Phase::Running {
            return report;
        }

        report.fps = self.fps.record(time.dt);
        if let Some(fps) = report.fps {
            log::debug!("app: {fps:.2} fps");
        }

        match backend.begin_frame(self.settings.clear_color) {
            Ok(()) => {}
            Err(SurfaceErrorAction::Fatal) => {
                log::error!("app: surface lost beyond recovery");
                report.fatal = true;
                return report;
            }
            Err(_) => report.skipped = true,
        }

        if input.key_pressed(Key::F5) {
            let failed = self.scene.reload(backend);
            if failed > 0 {
                log::warn!("app: {failed} component(s) failed to reload");
            }
        }

        self.scene.update(&time);

        if input.key_down(Key::Escape) {
            self.exit_pending = true;
        }

        let mut ctx = UpdateCtx { time, input };
        if self.game.update(&mut ctx, &mut self.scene) == AppControl::Exit {
            self.exit_pending = true;
        }

        self.scene.fixed_update(&time);

        if !report.skipped {
            self.scene.draw(backend);
            self.game.restore_targets(backend);
            backend.end_frame();
        }

        report.exit_requested = self.exit_pending;
        report
    }

    /// Releases every node's GPU resources. Idempotent.
    pub fn destroy_resources(&mut self, backend: &mut dyn RenderBackend) {
        if self.phase == Phase::ResourcesDestroyed {
            return;
        }
        self.scene.destroy_resources(backend);
        self.phase = Phase::ResourcesDestroyed;
        log::debug!("app: resources destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ColorRgba, Vec4};
    use crate::device::{Command, RecordingDevice};
    use crate::input::{InputEvent, InputFrame, InputState, KeyState};
    use crate::render::{MeshRenderer, Vertex};
    use crate::scene::SceneNode;

    const CLEAR: ColorRgba = ColorRgba::new(0.18, 0.55, 0.34, 1.0);

    struct TwoQuads {
        shader_path: Option<&'static str>,
        restored: u32,
    }

    fn vertex(x: f32, y: f32) -> Vertex {
        Vertex::new(Vec4::new(x, y, 0.5, 1.0), ColorRgba::new(1.0, 1.0, 1.0, 1.0))
    }

    impl Game for TwoQuads {
        fn settings(&self) -> AppSettings {
            AppSettings { clear_color: CLEAR }
        }

        fn configure(&mut self, scene: &mut Scene) {
            for name in ["a", "b"] {
                let mut node = SceneNode::new(name);
                let mut mesh = MeshRenderer::quad(
                    name,
                    [vertex(0.1, 0.1), vertex(0.0, 0.0), vertex(0.1, 0.0), vertex(0.0, 0.1)],
                    Some(node.offset_handle()),
                );
                if let Some(path) = self.shader_path {
                    mesh = mesh.with_shader_path(path);
                }
                node.add_component(mesh);
                scene.add_node(node);
            }
        }

        fn update(&mut self, _: &mut UpdateCtx<'_>, _: &mut Scene) -> AppControl {
            AppControl::Continue
        }

        fn restore_targets(&mut self, _: &mut dyn RenderBackend) {
            self.restored += 1;
        }
    }

    fn running(shader_path: Option<&'static str>) -> (Application<TwoQuads>, RecordingDevice) {
        let mut dev = RecordingDevice::new();
        let mut app = Application::new(TwoQuads {
            shader_path,
            restored: 0,
        });
        app.prepare_resources();
        app.initialize(&mut dev);
        dev.clear_commands();
        (app, dev)
    }

    fn frame_with(
        app: &mut Application<TwoQuads>,
        dev: &mut RecordingDevice,
        keys: &[Key],
    ) -> FrameReport {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for &key in keys {
            state.apply_event(
                &mut frame,
                InputEvent::Key {
                    key,
                    state: KeyState::Pressed,
                    repeat: false,
                },
            );
        }
        app.frame(dev, FrameTime::with_dt(0.1, 0), InputSnapshot::new(&state, &frame))
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn phases_advance_in_order() {
        let mut dev = RecordingDevice::new();
        let mut app = Application::new(TwoQuads {
            shader_path: None,
            restored: 0,
        });
        assert_eq!(app.phase(), Phase::Created);

        app.prepare_resources();
        assert_eq!(app.phase(), Phase::ResourcesPrepared);
        assert_eq!(app.scene().len(), 2);

        assert_eq!(app.initialize(&mut dev), 0);
        assert_eq!(app.phase(), Phase::Running);

        app.destroy_resources(&mut dev);
        app.destroy_resources(&mut dev);
        assert_eq!(app.phase(), Phase::ResourcesDestroyed);
        assert_eq!(dev.live_buffers(), 0);
        assert_eq!(dev.live_programs(), 0);
    }

    // ── frame ─────────────────────────────────────────────────────────────

    #[test]
    fn frame_clears_draws_in_order_and_presents() {
        let (mut app, mut dev) = running(None);
        let report = frame_with(&mut app, &mut dev, &[]);

        assert!(!report.exit_requested);
        assert!(matches!(
            dev.commands().first(),
            Some(Command::BeginFrame { clear }) if *clear == CLEAR
        ));
        assert!(matches!(dev.commands().last(), Some(Command::EndFrame)));
        assert_eq!(dev.draws().len(), 2);
        assert!(dev.draws()[0].program != dev.draws()[1].program);
        assert_eq!(dev.frames_presented(), 1);
        assert_eq!(app.game().restored, 1);
        assert_eq!(dev.violations(), 0);
    }

    #[test]
    fn escape_requests_exit_after_presenting() {
        let (mut app, mut dev) = running(None);
        let report = frame_with(&mut app, &mut dev, &[Key::Escape]);

        assert!(report.exit_requested);
        assert!(app.exit_pending());
        assert_eq!(dev.frames_presented(), 1);
    }

    #[test]
    fn missing_shader_keeps_the_loop_running() {
        let (mut app, mut dev) = running(Some("/nonexistent/pingpong/mesh.wgsl"));
        let report = frame_with(&mut app, &mut dev, &[]);

        assert!(!report.fatal);
        assert!(dev.draws().is_empty());
        assert_eq!(dev.frames_presented(), 1);
    }

    #[test]
    fn skipped_frame_updates_without_drawing() {
        let (mut app, mut dev) = running(None);
        dev.fail_next_frame(SurfaceErrorAction::SkipFrame);
        let report = frame_with(&mut app, &mut dev, &[Key::Escape]);

        assert!(report.skipped);
        assert!(report.exit_requested);
        assert!(dev.draws().is_empty());
        assert_eq!(dev.frames_presented(), 0);
    }

    #[test]
    fn fatal_surface_error_is_reported() {
        let (mut app, mut dev) = running(None);
        dev.fail_next_frame(SurfaceErrorAction::Fatal);
        assert!(frame_with(&mut app, &mut dev, &[]).fatal);
    }

    #[test]
    fn fps_is_reported_after_one_second() {
        let (mut app, mut dev) = running(None);
        let state = InputState::default();
        let frame = InputFrame::default();
        let mut reports = Vec::new();
        for i in 0..5 {
            let input = InputSnapshot::new(&state, &frame);
            reports.push(app.frame(&mut dev, FrameTime::with_dt(0.25, i), input).fps);
        }
        // Exactly 1.0 s is not "past" one second; the fifth frame is.
        assert!(reports[..4].iter().all(Option::is_none));
        assert_eq!(reports[4], Some(4.0));
    }

    #[test]
    fn f5_reloads_shaders() {
        let (mut app, mut dev) = running(None);
        frame_with(&mut app, &mut dev, &[Key::F5]);
        let releases = dev
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::ReleaseProgram(_)))
            .count();
        assert_eq!(releases, 2);
        assert_eq!(dev.live_programs(), 2);
    }
}
