mod loader;
mod painter;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use egui::{Color32, Context as EguiContext, RichText, TextureHandle, pos2};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};
use tilescape_assets::{AssetRegistry, SpriteId, SpriteManifest};
use tilescape_common::{WorldConfig, WorldCoord};
use tilescape_input::{InputHandler, Key, KeyBindings};
use tilescape_kernel::Session;
use tilescape_render::{CameraController, SceneCompositor};
use tilescape_stream::{FrameClock, FrameStats};
use tilescape_tools::SessionInspector;

use crate::loader::{SpriteLoad, spawn_loader};
use crate::painter::PainterSurface;

#[derive(Parser)]
#[command(name = "tilescape-desktop", about = "Walk an endless isometric world")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory that sprite paths are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// JSON sprite manifest; defaults to the built-in layout
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// JSON key bindings; defaults to WASD and arrows
    #[arg(long)]
    bindings: Option<PathBuf>,

    /// Starting tile
    #[arg(long, allow_negative_numbers = true, default_value = "0")]
    spawn_x: i32,
    #[arg(long, allow_negative_numbers = true, default_value = "0")]
    spawn_y: i32,

    /// Override the draw range in tiles
    #[arg(long)]
    draw_range: Option<i32>,

    /// Darken the screen edges
    #[arg(long)]
    vignette: bool,

    /// Hide the red marker at the player's feet
    #[arg(long)]
    no_debug_marker: bool,
}

impl Cli {
    fn world_config(&self) -> Result<WorldConfig> {
        let mut config = match &self.config {
            Some(path) => WorldConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => WorldConfig::default(),
        };
        if let Some(range) = self.draw_range {
            config.view.draw_range = range;
        }
        config.view.vignette |= self.vignette;
        config.view.debug_marker &= !self.no_debug_marker;
        config.validate()?;
        Ok(config)
    }

    fn key_bindings(&self) -> Result<KeyBindings> {
        let Some(path) = &self.bindings else {
            return Ok(KeyBindings::default());
        };
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening key bindings {}", path.display()))?;
        Ok(serde_json::from_reader(file)?)
    }
}

fn key_from_code(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        _ => Key::Unknown,
    }
}

/// Game state owned by the window.
struct AppState {
    session: Session,
    compositor: SceneCompositor,
    camera: CameraController,
    input: InputHandler,
    clock: FrameClock,
    stats: FrameStats,
    assets: AssetRegistry,
    textures: BTreeMap<SpriteId, TextureHandle>,
    loads: Option<Receiver<SpriteLoad>>,
}

impl AppState {
    fn new(
        config: &WorldConfig,
        bindings: KeyBindings,
        spawn: WorldCoord,
        manifest: &SpriteManifest,
        loads: Receiver<SpriteLoad>,
    ) -> Self {
        Self {
            session: Session::with_spawn(spawn),
            compositor: SceneCompositor::new(config),
            camera: CameraController::from_view(&config.view),
            input: InputHandler::new(bindings, Duration::from_millis(config.view.move_cooldown_ms)),
            clock: FrameClock::default(),
            stats: FrameStats::default(),
            assets: AssetRegistry::from_manifest(manifest),
            textures: BTreeMap::new(),
            loads: Some(loads),
        }
    }

    fn started(&self) -> bool {
        self.assets.gate().is_open()
    }

    /// Moves apply even while sprites are still loading. The world is not
    /// drawn until the load gate opens, so the first frame shows wherever
    /// the player ended up.
    fn handle_key(&mut self, code: KeyCode) {
        self.input
            .handle_key(&mut self.session, key_from_code(code), Instant::now());
    }

    /// Drain finished sprite loads without blocking.
    fn receive_sprites(&mut self, ctx: &EguiContext) {
        while let Some(rx) = &self.loads {
            match rx.try_recv() {
                Ok(load) => self.accept_sprite(ctx, load),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.loads = None;
                    let stranded: Vec<SpriteId> = self
                        .assets
                        .entries()
                        .iter()
                        .filter(|(_, entry)| !entry.state.is_settled())
                        .map(|(id, _)| *id)
                        .collect();
                    for id in stranded {
                        let settled = self.assets.mark_failed(id, "loader stopped early");
                        self.log_settle(settled);
                    }
                }
            }
        }
    }

    fn accept_sprite(&mut self, ctx: &EguiContext, load: SpriteLoad) {
        let settled = match load.result {
            Ok(sprite) if sprite.width > 0 && sprite.height > 0 => {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [sprite.width as usize, sprite.height as usize],
                    &sprite.rgba,
                );
                let handle = ctx.load_texture(load.id.name(), image, egui::TextureOptions::LINEAR);
                self.textures.insert(load.id, handle);
                tracing::debug!(sprite = load.id.name(), path = %load.path.display(), "sprite loaded");
                self.assets.mark_ready(load.id, sprite.width, sprite.height)
            }
            Ok(sprite) => self.assets.mark_ready(load.id, sprite.width, sprite.height),
            Err(reason) => self
                .assets
                .mark_failed(load.id, &format!("{}: {reason}", load.path.display())),
        };
        self.log_settle(settled);
    }

    fn log_settle(&self, settled: Result<bool, tilescape_assets::AssetError>) {
        match settled {
            Ok(true) => tracing::info!(
                failed = self.assets.failed().count(),
                "all sprites settled, starting"
            ),
            Ok(false) => {}
            Err(e) => tracing::warn!("sprite report rejected: {e}"),
        }
    }

    /// One pass of the game loop: camera, world, overlay.
    fn frame(&mut self, ctx: &EguiContext, now: Instant) {
        self.receive_sprites(ctx);

        let screen = ctx.screen_rect();
        self.compositor.set_viewport(screen.width(), screen.height());

        if !self.started() {
            let remaining = self.assets.gate().remaining();
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(format!("Loading sprites... {remaining} left"));
                });
            });
            return;
        }

        self.stats = self.clock.tick(now);
        self.camera.follow(&mut self.session, self.compositor.projector());

        let painter = ctx.layer_painter(egui::LayerId::background());
        let mut surface = PainterSurface::new(&painter, &self.textures);
        self.compositor
            .compose(&self.session, &self.assets, &mut surface);
        self.session.advance_frame();

        let status = SessionInspector::status(&self.session, &self.stats);
        egui::Area::new(egui::Id::new("status"))
            .fixed_pos(pos2(10.0, 10.0))
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(status.to_string())
                        .monospace()
                        .size(16.0)
                        .color(Color32::WHITE),
                );
            });
    }
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    title: String,
    initial_size: LogicalSize<f64>,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
}

impl GpuApp {
    fn new(state: AppState, initial_size: LogicalSize<f64>) -> Self {
        Self {
            state,
            title: "Tilescape".to_string(),
            initial_size,
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("tilescape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.egui_winit = Some(egui_winit);
        self.gpu = Some(Gpu {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        });
        Ok(())
    }

    fn redraw(&mut self) {
        let (Some(window), Some(gpu), Some(egui_winit)) =
            (self.window.clone(), self.gpu.as_mut(), self.egui_winit.as_mut())
        else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let now = Instant::now();
        let raw_input = egui_winit.take_egui_input(&window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.frame(ctx, now);
        });
        egui_winit.handle_platform_output(&window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("frame_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("failed to open window: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                self.state.handle_key(code);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("tilescape-desktop starting");

    let config = cli.world_config()?;
    let bindings = cli.key_bindings()?;
    let manifest = match &cli.manifest {
        Some(path) => SpriteManifest::load(path)
            .with_context(|| format!("loading sprite manifest {}", path.display()))?,
        None => SpriteManifest::default(),
    };
    let loads = spawn_loader(&manifest, &cli.root)?;

    let spawn = WorldCoord::new(cli.spawn_x, cli.spawn_y);
    let state = AppState::new(&config, bindings, spawn, &manifest, loads);
    let size = LogicalSize::new(
        config.view.viewport_width as f64,
        config.view.viewport_height as f64,
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, size);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_apply_while_sprites_load() {
        let (_tx, rx) = std::sync::mpsc::channel();
        let mut state = AppState::new(
            &WorldConfig::default(),
            KeyBindings::default(),
            WorldCoord::ORIGIN,
            &SpriteManifest::default(),
            rx,
        );
        assert!(!state.started());

        state.handle_key(KeyCode::KeyD);
        assert_eq!(state.session.player(), WorldCoord::new(1, 0));

        // Cooldown still applies before the first frame.
        state.handle_key(KeyCode::KeyD);
        assert_eq!(state.session.player(), WorldCoord::new(1, 0));
    }
}
