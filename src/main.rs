//! Adoption curve explorer - watch an innovation spread through Rogers'
//! adopter segments, and steer its speed and saturation while it runs.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec2;
use log::{error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorIcon, Window, WindowId},
};

use adoption_curve::chart::layout::{SATURATION_SLIDER, SPEED_SLIDER};
use adoption_curve::chart::{build_scene, write_svg, HitTarget, Scene, SceneGeometry, Viewport};
use adoption_curve::cli::Args;
use adoption_curve::color::Rgb;
use adoption_curve::explorer::Explorer;
use adoption_curve::panels::{text_report, window_title, TITLE};
use adoption_curve::params::{RecordingConfig, RenderConfig};
use adoption_curve::rendering::{render_offscreen, save_png, RenderSystem};
use adoption_curve::{Error, Result};

/// Where the `S` key writes the current scene
const SNAPSHOT_SVG: &str = "adoption-curve.svg";

/// Fixed-timestep state for frame capture
struct Recording {
    config: RecordingConfig,
    frame_step: Duration,
    carry: Duration,
}

impl Recording {
    fn new(config: RecordingConfig) -> Self {
        let frame_step = Duration::from_secs_f64(config.frame_duration_secs());
        Self {
            config,
            frame_step,
            carry: Duration::ZERO,
        }
    }
}

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    viewport: Viewport,

    // Explorer state and the scene last drawn from it
    explorer: Explorer,
    scene: Scene,
    dirty: bool,

    // Pointer
    cursor: Option<Vec2>,
    dragging: Option<HitTarget>,

    // Configuration
    render_config: RenderConfig,
    autoplay: bool,
    recording: Option<Recording>,
    frame_num: usize,

    // First fatal error, reported after the event loop exits
    error: Option<Error>,
}

impl App {
    fn new(
        explorer: Explorer,
        render_config: RenderConfig,
        autoplay: bool,
        recording: Option<RecordingConfig>,
    ) -> Self {
        let scene = build_scene(&explorer.view());
        Self {
            window: None,
            render_system: None,
            viewport: Viewport::fit(render_config.window_width, render_config.window_height),
            explorer,
            scene,
            dirty: true,
            cursor: None,
            dragging: None,
            render_config,
            autoplay,
            recording: recording.map(Recording::new),
            frame_num: 0,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        error!("{}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(window_title(&self.explorer))
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let recording_config = self.recording.as_ref().map(|r| r.config.clone());
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.render_config,
            recording_config,
        ))?;

        self.viewport = render_system.viewport();

        if self.autoplay && !self.explorer.driver().is_running() {
            self.explorer.play_pause(Instant::now());
        }

        match &self.recording {
            Some(recording) => info!(
                "Recording {} frames to {}",
                recording.config.total_frames(),
                recording.config.frames_dir().display()
            ),
            None => {
                println!("\n{} is running!", TITLE);
                println!("Space: play/pause   R: reset   Left/Right: speed   Down/Up: saturation");
                println!("S: save SVG snapshot   Esc: quit\n");
            }
        }

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.dirty = true;
        self.request_redraw();
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Mark the scene stale if `changed`, and schedule a frame
    fn touch(&mut self, changed: bool) {
        if changed {
            self.dirty = true;
            self.request_redraw();
        }
    }

    /// Rebuild scene, GPU geometry and title from the explorer state
    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        self.scene = build_scene(&self.explorer.view());

        if let Some(render_system) = &mut self.render_system {
            let geometry = SceneGeometry::from_scene(&self.scene);
            trace!(
                "Scene rebuilt: {} vertices, {} text runs",
                geometry.mesh.vertex_count(),
                geometry.text.len()
            );
            render_system.update_geometry(&geometry);
        }
        if let Some(window) = &self.window {
            window.set_title(&window_title(&self.explorer));
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode, repeat: bool) {
        let changed = match code {
            KeyCode::Escape => {
                event_loop.exit();
                false
            }
            KeyCode::Space if !repeat => {
                self.explorer.play_pause(Instant::now());
                true
            }
            KeyCode::KeyR if !repeat => {
                self.explorer.reset();
                true
            }
            KeyCode::ArrowLeft => self.explorer.nudge_speed(-1),
            KeyCode::ArrowRight => self.explorer.nudge_speed(1),
            KeyCode::ArrowDown => self.explorer.nudge_saturation(-1),
            KeyCode::ArrowUp => self.explorer.nudge_saturation(1),
            KeyCode::KeyS if !repeat => {
                self.save_svg_snapshot();
                false
            }
            _ => false,
        };
        self.touch(changed);
    }

    fn save_svg_snapshot(&mut self) {
        self.refresh();
        let path = Path::new(SNAPSHOT_SVG);
        let background = Rgb::from_hex(self.render_config.background);
        match write_svg(path, &self.scene, TITLE, background) {
            Ok(()) => info!("Saved {}", path.display()),
            Err(e) => error!("{}", e),
        }
    }

    fn handle_cursor(&mut self, pixel: Vec2) {
        self.cursor = self.viewport.to_scene(pixel);

        if let Some(target) = self.dragging {
            let x = self.viewport.unproject(pixel).x;
            let changed = self.drag_slider(target, x);
            self.touch(changed);
            return;
        }

        let target = self.cursor.and_then(|p| self.scene.hit_test(p));
        let hovered = match target {
            Some(HitTarget::Segment(index)) => Some(index),
            _ => None,
        };
        let changed = self.explorer.hover(hovered);
        self.touch(changed);

        if let Some(window) = &self.window {
            let icon = match target {
                Some(HitTarget::PlayPause | HitTarget::Reset) => CursorIcon::Pointer,
                Some(HitTarget::SpeedSlider | HitTarget::SaturationSlider) => CursorIcon::Grab,
                _ => CursorIcon::Default,
            };
            window.set_cursor(icon);
        }
    }

    fn drag_slider(&mut self, target: HitTarget, x: f32) -> bool {
        match target {
            HitTarget::SpeedSlider => self.explorer.set_speed(SPEED_SLIDER.value_at(x) as f64),
            HitTarget::SaturationSlider => self
                .explorer
                .set_saturation(SATURATION_SLIDER.value_at(x) as f64),
            _ => false,
        }
    }

    fn handle_press(&mut self) {
        let Some(point) = self.cursor else {
            return;
        };
        let changed = match self.scene.hit_test(point) {
            Some(HitTarget::PlayPause) => {
                self.explorer.play_pause(Instant::now());
                true
            }
            Some(HitTarget::Reset) => {
                self.explorer.reset();
                true
            }
            Some(target @ (HitTarget::SpeedSlider | HitTarget::SaturationSlider)) => {
                self.dragging = Some(target);
                self.drag_slider(target, point.x)
            }
            Some(HitTarget::Segment(_)) | None => false,
        };
        self.touch(changed);
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        self.refresh();

        let Some(render_system) = &mut self.render_system else {
            return;
        };
        match render_system.render(self.frame_num) {
            Ok(()) => {}
            Err(Error::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
                self.request_redraw();
                return;
            }
            Err(Error::Surface(wgpu::SurfaceError::Timeout)) => {
                warn!("Surface timeout, skipping frame");
                return;
            }
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        }

        let Some(recording) = &mut self.recording else {
            return;
        };
        self.frame_num += 1;
        if self.frame_num >= recording.config.total_frames() {
            info!("Recording complete: {} frames", self.frame_num);
            event_loop.exit();
            return;
        }
        let changed = self
            .explorer
            .driver_mut()
            .advance_by(recording.frame_step, &mut recording.carry);
        self.dirty |= changed;
        self.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Recording advances on its own fixed timestep
        if self.recording.is_some() {
            event_loop.set_control_flow(ControlFlow::Poll);
            return;
        }

        let changed = self.explorer.driver_mut().advance(Instant::now());
        self.touch(changed);

        match self.explorer.driver().timer().deadline() {
            Some(deadline) if self.explorer.driver().is_running() => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            _ => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                    self.viewport = render_system.viewport();
                    self.request_redraw();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code, repeat),
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.dragging = None;
                let changed = self.explorer.hover(None);
                self.touch(changed);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.handle_press(),
                ElementState::Released => self.dragging = None,
            },
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Print, export or snapshot without opening a window
fn run_one_shot(args: &Args, explorer: &Explorer, render_config: &RenderConfig) -> Result<()> {
    if args.describe {
        print!("{}", text_report(explorer));
    }

    let scene = build_scene(&explorer.view());

    if let Some(path) = &args.export_svg {
        write_svg(path, &scene, TITLE, Rgb::from_hex(render_config.background))?;
        info!("Wrote {}", path.display());
    }

    if let Some(path) = &args.snapshot {
        let (width, height) = (render_config.window_width, render_config.window_height);
        let geometry = SceneGeometry::from_scene(&scene);
        let pixels = pollster::block_on(render_offscreen(
            &geometry,
            width,
            height,
            Rgb::from_hex(render_config.background),
        ))?;
        save_png(path, &pixels, width, height)?;
        info!("Wrote {} ({}x{})", path.display(), width, height);
    }

    Ok(())
}

fn run(args: Args) -> Result<()> {
    let explorer = args.build_explorer();
    let render_config = args.render_config();

    if args.is_one_shot() {
        return run_one_shot(&args, &explorer, &render_config);
    }

    let recording = args.recording_config()?;
    let mut app = App::new(explorer, render_config, args.starts_running(), recording);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
