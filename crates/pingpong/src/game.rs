use pingpong_engine::coords::{ColorRgba, Vec4};
use pingpong_engine::core::{AppControl, AppSettings, Game, UpdateCtx};
use pingpong_engine::input::{InputSnapshot, Key};
use pingpong_engine::render::{MeshRenderer, Vertex};
use pingpong_engine::scene::{NodeId, Scene, SceneNode};

/// Horizontal paddle speed in clip-space units per second.
const SPEED_X: f32 = 0.25;
/// Vertical paddle speed in clip-space units per second.
const SPEED_Y: f32 = 0.5;

const CLEAR_COLOR: ColorRgba = ColorRgba::new(0.18, 0.55, 0.34, 1.0);
const SHAPE_COLOR: ColorRgba = ColorRgba::new(0.67, 0.9, 0.76, 1.0);
const DEPTH: f32 = 0.5;

/// Keys steering one paddle.
#[derive(Debug, Copy, Clone)]
struct Controls {
    left: Key,
    right: Key,
    up: Key,
    down: Key,
}

const LEFT_CONTROLS: Controls = Controls {
    left: Key::A,
    right: Key::D,
    up: Key::W,
    down: Key::S,
};

const RIGHT_CONTROLS: Controls = Controls {
    left: Key::ArrowLeft,
    right: Key::ArrowRight,
    up: Key::ArrowUp,
    down: Key::ArrowDown,
};

impl Controls {
    /// Displacement for one frame of `dt` seconds.
    fn displacement(self, input: &InputSnapshot<'_>, dt: f32) -> Vec4 {
        let mut d = Vec4::zero();
        if input.key_down(self.left) {
            d -= Vec4::x_axis(SPEED_X * dt);
        }
        if input.key_down(self.right) {
            d += Vec4::x_axis(SPEED_X * dt);
        }
        if input.key_down(self.up) {
            d += Vec4::y_axis(SPEED_Y * dt);
        }
        if input.key_down(self.down) {
            d -= Vec4::y_axis(SPEED_Y * dt);
        }
        d
    }
}

const fn vertex(x: f32, y: f32) -> Vertex {
    Vertex::new(Vec4::new(x, y, DEPTH, 1.0), SHAPE_COLOR)
}

// Corners in order: top-right, bottom-left, bottom-right, top-left.
const LEFT_PADDLE: [Vertex; 4] = [
    vertex(-0.8, 0.5),
    vertex(-1.0, -0.5),
    vertex(-0.8, -0.5),
    vertex(-1.0, 0.5),
];
const RIGHT_PADDLE: [Vertex; 4] = [
    vertex(1.0, 0.5),
    vertex(0.8, -0.5),
    vertex(1.0, -0.5),
    vertex(0.8, 0.5),
];
const BALL: [Vertex; 4] = [
    vertex(0.0, 0.0),
    vertex(-0.06, -0.1),
    vertex(0.0, -0.1),
    vertex(-0.06, 0.0),
];

/// Two keyboard-driven paddles and a ball.
#[derive(Debug, Default)]
pub struct PingPong {
    left: Option<NodeId>,
    right: Option<NodeId>,
    ball: Option<NodeId>,
}

impl PingPong {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_paddle(scene: &mut Scene, name: &str, vertices: [Vertex; 4]) -> NodeId {
        let mut node = SceneNode::new(name);
        let offset = node.offset_handle();
        node.add_component(MeshRenderer::quad(name, vertices, Some(offset)));
        scene.add_node(node)
    }

    fn move_paddle(scene: &mut Scene, id: Option<NodeId>, delta: Vec4) {
        if let Some(node) = id.and_then(|id| scene.node(id)) {
            node.translate(delta);
        }
    }
}

impl Game for PingPong {
    fn settings(&self) -> AppSettings {
        AppSettings {
            clear_color: CLEAR_COLOR,
        }
    }

    fn configure(&mut self, scene: &mut Scene) {
        self.left = Some(Self::add_paddle(scene, "left paddle", LEFT_PADDLE));
        self.right = Some(Self::add_paddle(scene, "right paddle", RIGHT_PADDLE));

        // The ball renders at its own offset, not at the node's position.
        let mut ball = SceneNode::new("ball");
        ball.add_component(MeshRenderer::quad("ball", BALL, None));
        self.ball = Some(scene.add_node(ball));
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>, scene: &mut Scene) -> AppControl {
        let dt = ctx.dt();
        Self::move_paddle(scene, self.left, LEFT_CONTROLS.displacement(&ctx.input, dt));
        Self::move_paddle(scene, self.right, RIGHT_CONTROLS.displacement(&ctx.input, dt));
        AppControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingpong_engine::core::Application;
    use pingpong_engine::device::RecordingDevice;
    use pingpong_engine::input::{InputEvent, InputFrame, InputState, KeyState};
    use pingpong_engine::time::FrameTime;

    fn held(keys: &[Key]) -> (InputState, InputFrame) {
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
        (state, frame)
    }

    fn started() -> (Application<PingPong>, RecordingDevice) {
        let mut dev = RecordingDevice::new();
        let mut app = Application::new(PingPong::new());
        app.prepare_resources();
        assert_eq!(app.initialize(&mut dev), 0);
        (app, dev)
    }

    fn position(app: &Application<PingPong>, id: Option<NodeId>) -> Vec4 {
        id.and_then(|id| app.scene().node(id))
            .map(|n| n.position())
            .unwrap_or_default()
    }

    fn run_frames(
        app: &mut Application<PingPong>,
        dev: &mut RecordingDevice,
        keys: &[Key],
        n: u64,
    ) {
        let (state, frame) = held(keys);
        for i in 0..n {
            let input = InputSnapshot::new(&state, &frame);
            app.frame(dev, FrameTime::with_dt(0.1, i), input);
        }
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn scene_has_paddles_and_ball() {
        let (app, dev) = started();
        let names: Vec<&str> = app.scene().nodes().iter().map(|n| n.name()).collect();
        assert_eq!(names, ["left paddle", "right paddle", "ball"]);
        assert_eq!(dev.live_programs(), 3);
        assert_eq!(dev.live_buffers(), 9);
    }

    #[test]
    fn every_node_draws_each_frame() {
        let (mut app, mut dev) = started();
        run_frames(&mut app, &mut dev, &[], 1);
        assert_eq!(dev.draws().len(), 3);
        assert!(dev.draws().iter().all(|d| d.index_count == 6));
        assert_eq!(dev.frames_presented(), 1);
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn holding_a_moves_left_paddle_left() {
        let (mut app, mut dev) = started();
        run_frames(&mut app, &mut dev, &[Key::A], 5);

        let left = app.game().left;
        let p = position(&app, left);
        assert!((p.x - -0.125).abs() < 1e-5, "x = {}", p.x);
        assert_eq!(p.y, 0.0);
        assert_eq!(position(&app, app.game().right), Vec4::zero());
    }

    #[test]
    fn arrows_move_right_paddle() {
        let (mut app, mut dev) = started();
        run_frames(&mut app, &mut dev, &[Key::ArrowUp, Key::ArrowRight], 2);

        let p = position(&app, app.game().right);
        assert!((p.x - 0.05).abs() < 1e-5);
        assert!((p.y - 0.1).abs() < 1e-5);
        assert_eq!(position(&app, app.game().left), Vec4::zero());
    }

    #[test]
    fn opposite_keys_cancel() {
        let (mut app, mut dev) = started();
        run_frames(&mut app, &mut dev, &[Key::W, Key::S], 3);
        assert_eq!(position(&app, app.game().left), Vec4::zero());
    }

    #[test]
    fn ball_does_not_follow_its_node() {
        let (mut app, mut dev) = started();
        let ball = app.game().ball;
        if let Some(node) = ball.and_then(|id| app.scene().node(id)) {
            node.translate(Vec4::x_axis(0.5));
        }
        run_frames(&mut app, &mut dev, &[], 1);

        let draw = dev.draws()[2];
        let uniform = draw.uniform.unwrap();
        assert_eq!(dev.buffer_contents(uniform), Some(&[0u8; 16][..]));
    }

    // ── exit ──────────────────────────────────────────────────────────────

    #[test]
    fn escape_requests_exit() {
        let (mut app, mut dev) = started();
        let (state, frame) = held(&[Key::Escape]);
        let input = InputSnapshot::new(&state, &frame);
        let report = app.frame(&mut dev, FrameTime::with_dt(0.016, 0), input);
        assert!(report.exit_requested);
        assert_eq!(dev.frames_presented(), 1);
    }
}
