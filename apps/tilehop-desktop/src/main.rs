use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tilehop_audio::BackgroundMusic;
use tilehop_common::GameConfig;
use tilehop_input::{InputDispatcher, InputEvent, IntentQueue, Key, KeyBindings, KeyPhase};
use tilehop_kernel::{Frame, PeriodicTimer, World, WorldEvent, WorldSummary};
use tilehop_render::Renderer;
use tilehop_render_wgpu::{DrawStats, GpuContext, WgpuRenderer};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key as WinitKey, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "tilehop-desktop", about = "Hop a cuboid across a floating tile floor")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game configuration; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the scene layout seed
    #[arg(long)]
    seed: Option<u64>,

    /// Start without background music
    #[arg(long)]
    mute: bool,
}

/// How often frame-rate stats are refreshed, in seconds.
const STATS_INTERVAL: f64 = 0.5;

/// Volume change per F2/F3 press.
const VOLUME_STEP: f32 = 0.1;

fn key_from_winit(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(NamedKey::ArrowUp) => Key::ArrowUp,
        WinitKey::Named(NamedKey::ArrowDown) => Key::ArrowDown,
        WinitKey::Named(NamedKey::ArrowLeft) => Key::ArrowLeft,
        WinitKey::Named(NamedKey::ArrowRight) => Key::ArrowRight,
        WinitKey::Named(NamedKey::Space) => Key::Space,
        WinitKey::Named(NamedKey::Escape) => Key::Escape,
        WinitKey::Character(s) => s
            .chars()
            .next()
            .filter(char::is_ascii_alphabetic)
            .map(Key::Letter)
            .unwrap_or(Key::Other),
        _ => Key::Other,
    }
}

fn phase_from_winit(event: &KeyEvent) -> KeyPhase {
    match (event.state, event.repeat) {
        (ElementState::Pressed, true) => KeyPhase::Repeat,
        (ElementState::Pressed, false) => KeyPhase::Press,
        (ElementState::Released, _) => KeyPhase::Release,
    }
}

fn mouse_from_winit(button: MouseButton) -> tilehop_input::MouseButton {
    match button {
        MouseButton::Left => tilehop_input::MouseButton::Left,
        MouseButton::Right => tilehop_input::MouseButton::Right,
        MouseButton::Middle => tilehop_input::MouseButton::Middle,
        MouseButton::Back => tilehop_input::MouseButton::Other(3),
        MouseButton::Forward => tilehop_input::MouseButton::Other(4),
        MouseButton::Other(n) => tilehop_input::MouseButton::Other(n),
    }
}

/// Background music as shown on the HUD.
struct MusicStatus {
    track: String,
    volume: f32,
    finished: bool,
}

impl MusicStatus {
    fn of(music: &BackgroundMusic) -> Self {
        Self {
            track: music.track().display().to_string(),
            volume: music.volume(),
            finished: music.is_finished(),
        }
    }
}

/// What the HUD shows for one frame.
struct Hud {
    summary: WorldSummary,
    fps: f32,
    stats: DrawStats,
    backend: wgpu::Backend,
    fov_degrees: f32,
    music: Option<MusicStatus>,
}

fn draw_hud(ctx: &EguiContext, hud: &Hud) {
    egui::Window::new("tilehop")
        .default_pos([8.0, 8.0])
        .default_width(220.0)
        .resizable(false)
        .show(ctx, |ui| {
            let s = &hud.summary;
            ui.label(format!("Frame: {}  FPS: {:.0}", s.frame, hud.fps));
            ui.label(format!("Camera: {}  (fov {:.0})", s.camera, hud.fov_degrees));
            ui.label(format!(
                "Player: ({:.2}, {:.2}, {:.2})",
                s.position.x, s.position.y, s.position.z
            ));
            ui.label(format!("Facing: {}  Jumping: {}", s.facing, s.jumping));
            ui.label(format!("Floor phase: {:.3}", s.phase));
            ui.label(format!("Resets: {}  Obstacles: {}", s.resets, s.obstacles));
            ui.separator();
            ui.label(format!(
                "{} instances, {} draws ({})",
                hud.stats.instances,
                hud.stats.draw_calls,
                hud.backend.to_str()
            ));
            match &hud.music {
                Some(m) => ui.label(format!(
                    "Music: {} vol {:.1}{}",
                    m.track,
                    m.volume,
                    if m.finished { " (ended)" } else { "" }
                )),
                None => ui.label("Music: muted"),
            };
            ui.separator();
            ui.small("Arrows: move | Space: jump | F/P/T/A: camera");
            ui.small("F1: toggle HUD | F2/F3: volume | Esc/Q: quit");
        });
}

/// Window and GPU resources, created once the event loop is running.
struct Gpu {
    window: Arc<Window>,
    ctx: GpuContext,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    world: World,
    dispatcher: InputDispatcher,
    intents: IntentQueue,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    show_hud: bool,
    started: Instant,
    stats_timer: PeriodicTimer,
    stats_window_start: f64,
    frames_in_window: u32,
    fps: f32,
    last_stats: DrawStats,
    fatal_error: Option<anyhow::Error>,
    music: Option<BackgroundMusic>,
}

impl GpuApp {
    fn new(world: World, music: Option<BackgroundMusic>) -> Self {
        let bindings = KeyBindings::from_config(&world.config().controls);
        Self {
            world,
            dispatcher: InputDispatcher::new(bindings),
            intents: IntentQueue::new(),
            gpu: None,
            egui_ctx: EguiContext::default(),
            show_hud: true,
            started: Instant::now(),
            stats_timer: PeriodicTimer::new(STATS_INTERVAL, 0.0),
            stats_window_start: 0.0,
            frames_in_window: 0,
            fps: 0.0,
            last_stats: DrawStats::default(),
            fatal_error: None,
            music,
        }
    }

    fn init_gpu(&self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let wc = &self.world.config().window;
        let attrs = Window::default_attributes()
            .with_title(&wc.title)
            .with_inner_size(PhysicalSize::new(wc.width, wc.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let ctx = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to initialise GPU")?;
        let renderer = WgpuRenderer::new(
            &ctx.device,
            ctx.format(),
            &self.world.config().camera,
            size.width,
            size.height,
        )
        .context("failed to build scene pipeline")?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.format(), None, 1, false);

        Ok(Gpu {
            window,
            ctx,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.logical_key == WinitKey::Named(NamedKey::F1)
            && event.state == ElementState::Pressed
            && !event.repeat
        {
            self.show_hud = !self.show_hud;
            return;
        }
        if let WinitKey::Named(named @ (NamedKey::F2 | NamedKey::F3)) = &event.logical_key {
            if event.state == ElementState::Pressed {
                let delta = if *named == NamedKey::F2 { -VOLUME_STEP } else { VOLUME_STEP };
                self.adjust_volume(delta);
            }
            return;
        }

        let input = InputEvent::key(key_from_winit(&event.logical_key), phase_from_winit(event));
        self.intents.dispatch(&self.dispatcher, &input);

        if let Some(text) = &event.text {
            for c in text.chars() {
                self.intents.dispatch(&self.dispatcher, &InputEvent::Char(c));
            }
        }
    }

    fn adjust_volume(&mut self, delta: f32) {
        if let Some(music) = &self.music {
            music.set_volume(music.volume() + delta);
            tracing::debug!(volume = music.volume(), "music volume changed");
        }
    }

    /// Step the world with the queued intents and drain its event log.
    fn advance(&mut self) -> Frame {
        let intents = self.intents.drain();
        let frame = self.world.step(&intents);
        for event in self.world.drain_events() {
            if !matches!(event, WorldEvent::Stepped { .. }) {
                tracing::debug!(?event, "world event");
            }
        }
        frame
    }

    fn tick_stats(&mut self) {
        self.frames_in_window += 1;
        let now = self.started.elapsed().as_secs_f64();
        if self.stats_timer.poll(now) {
            let elapsed = (now - self.stats_window_start).max(f64::EPSILON);
            self.fps = (self.frames_in_window as f64 / elapsed) as f32;
            self.frames_in_window = 0;
            self.stats_window_start = now;
            tracing::debug!(fps = self.fps, state = %self.world.summary(), "frame stats");
        }
    }

    /// Step the world with this frame's intents and draw the result.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let frame = self.advance();
        if frame.should_quit() {
            tracing::info!(frame = frame.index, "quit requested");
            event_loop.exit();
            return Ok(());
        }
        self.tick_stats();

        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        let Some(output) = gpu.ctx.acquire()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.last_stats = gpu
            .renderer
            .target(&gpu.ctx.device, &gpu.ctx.queue, &view)
            .render(&frame);

        let hud = self.show_hud.then(|| Hud {
            summary: self.world.summary(),
            fps: self.fps,
            stats: self.last_stats,
            backend: gpu.ctx.backend(),
            fov_degrees: gpu.renderer.projection().fov.to_degrees(),
            music: self.music.as_ref().map(MusicStatus::of),
        });

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(hud) = &hud {
                draw_hud(ctx, hud);
            }
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.ctx.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let device = &gpu.ctx.device;
        let queue = &gpu.ctx.queue;
        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        gpu.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                self.fatal_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.intents
                    .dispatch(&self.dispatcher, &InputEvent::CloseRequested);
                if let Some(gpu) = &self.gpu {
                    gpu.window.request_redraw();
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.ctx.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.ctx.size();
                    gpu.renderer.resize(&gpu.ctx.device, width, height);
                    tracing::debug!(width, height, "resized");
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::MouseInput { state, button, .. } => {
                let input = InputEvent::MouseButton {
                    button: mouse_from_winit(button),
                    pressed: state == ElementState::Pressed,
                };
                self.intents.dispatch(&self.dispatcher, &input);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw(event_loop) {
                    tracing::error!("render failed: {e:#}");
                    self.fatal_error = Some(e);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.world.seed = seed;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let world = World::new(config).context("invalid game configuration")?;
    tracing::info!(seed = world.config().world.seed, "world ready");

    let music = if cli.mute {
        tracing::info!("audio muted");
        None
    } else {
        Some(
            BackgroundMusic::play(&world.config().audio)
                .context("failed to start background music")?,
        )
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(world, music);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.fatal_error.take() {
        return Err(err);
    }
    tracing::info!(
        frames = app.world.frame_index(),
        resets = app.world.reset_count(),
        "tilehop-desktop exiting"
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("tilehop-desktop starting");

    let result = run(cli);
    if let Err(e) = &result {
        tracing::error!("{e:#}");
    }
    result
}
