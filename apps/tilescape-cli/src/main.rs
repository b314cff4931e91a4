use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use tracing_subscriber::EnvFilter;
use tilescape_assets::{AssetRegistry, SpriteManifest};
use tilescape_common::{WorldConfig, WorldCoord};
use tilescape_kernel::Session;
use tilescape_render::{
    CameraController, DebugTextRenderer, DrawCommand, RecordingSurface, Renderer, SceneCompositor,
};
use tilescape_stream::{FrameStats, VisibleWindow, fake_ping};
use tilescape_tools::SessionInspector;

#[derive(Parser)]
#[command(name = "tilescape-cli", about = "CLI tool for tilescape worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print an ASCII map around a tile
    Map {
        #[arg(allow_negative_numbers = true, default_value = "0")]
        x: i32,
        #[arg(allow_negative_numbers = true, default_value = "0")]
        y: i32,
        /// Half-width of the map in tiles
        #[arg(short, long, default_value = "12")]
        radius: i32,
    },
    /// Describe one tile
    Probe {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Find the tile under a screen pixel with the camera settled on a tile
    Pick {
        #[arg(allow_negative_numbers = true)]
        sx: f32,
        #[arg(allow_negative_numbers = true)]
        sy: f32,
        /// Tile the camera is centred on, as `x,y`
        #[arg(long, value_parser = parse_coord, default_value = "0,0")]
        at: WorldCoord,
    },
    /// Count terrain and decorations in a square area
    Survey {
        #[arg(allow_negative_numbers = true, default_value = "0")]
        x: i32,
        #[arg(allow_negative_numbers = true, default_value = "0")]
        y: i32,
        #[arg(short, long, default_value = "30")]
        radius: i32,
    },
    /// Compose frames headlessly and print the draw commands of the last one
    Frame {
        /// Path of moves to replay, e.g. `wwdds`
        #[arg(short, long, default_value = "")]
        moves: String,
        /// Frames to run after the moves, letting the camera settle
        #[arg(short, long, default_value = "1")]
        frames: u32,
        /// Print every draw command instead of a summary
        #[arg(long)]
        commands: bool,
    },
    /// Write the effective config, sprite manifest, or key bindings as JSON
    Dump {
        #[arg(value_enum)]
        what: DumpTarget,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DumpTarget {
    Config,
    Manifest,
    Bindings,
}

fn parse_coord(s: &str) -> Result<WorldCoord, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(WorldCoord::new(x, y))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => {
            let config = WorldConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded config");
            config
        }
        None => {
            tracing::debug!("no config file given, using defaults");
            WorldConfig::default()
        }
    };
    tracing::debug!(
        tile_width = config.view.tile_width,
        tile_height = config.view.tile_height,
        draw_range = config.view.draw_range,
        "view settings"
    );

    match cli.command {
        Commands::Info => {
            println!("tilescape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", tilescape_common::crate_info());
            println!("kernel: {}", tilescape_kernel::crate_info());
            println!("assets: {}", tilescape_assets::crate_info());
            println!("input: {}", tilescape_input::crate_info());
            println!("stream: {}", tilescape_stream::crate_info());
            println!("render: {}", tilescape_render::crate_info());
            println!("tools: {}", tilescape_tools::crate_info());
        }
        Commands::Map { x, y, radius } => {
            let session = Session::with_spawn(WorldCoord::new(x, y));
            let mut view = config.view.clone();
            view.draw_range = radius;
            let renderer = DebugTextRenderer::new(config.generation.clone());
            print!("{}", renderer.render(&session, &view));
        }
        Commands::Probe { x, y } => {
            let info = SessionInspector::probe(WorldCoord::new(x, y), &config.generation);
            println!("{info}");
        }
        Commands::Pick { sx, sy, at } => {
            let compositor = SceneCompositor::new(&config);
            let projector = compositor.projector();
            let camera = projector.world_position(at);
            let screen = Vec2::new(sx, sy);
            let world = projector.screen_to_world(screen, camera);
            let tile = projector.tile_at(screen, camera);
            println!("Screen ({sx}, {sy}) -> world ({:.3}, {:.3})", world.x, world.y);
            println!("{}", SessionInspector::probe(tile, &config.generation));
        }
        Commands::Survey { x, y, radius } => {
            let window = VisibleWindow::new(WorldCoord::new(x, y), radius);
            println!("{}", SessionInspector::survey(window, &config.generation));
        }
        Commands::Frame {
            moves,
            frames,
            commands,
        } => run_frames(&config, &moves, frames, commands)?,
        Commands::Dump { what } => {
            let json = match what {
                DumpTarget::Config => serde_json::to_string_pretty(&config)?,
                DumpTarget::Manifest => serde_json::to_string_pretty(&SpriteManifest::default())?,
                DumpTarget::Bindings => {
                    serde_json::to_string_pretty(&tilescape_input::KeyBindings::default())?
                }
            };
            println!("{json}");
        }
    }

    Ok(())
}

/// Replay `moves` one per frame, then run `frames` more, and report the last
/// frame. Each frame follows the game loop order: input, camera, compose.
fn run_frames(config: &WorldConfig, moves: &str, frames: u32, commands: bool) -> anyhow::Result<()> {
    let compositor = SceneCompositor::new(config);
    let camera = CameraController::from_view(&config.view);
    let bindings = tilescape_input::KeyBindings::default();
    let assets = AssetRegistry::all_ready();
    let mut session = Session::new();
    let mut surface = RecordingSurface::new();
    let mut report = None;
    tracing::info!(moves = moves.len(), frames, "replaying frames");

    let steps = moves.chars().map(Some).chain((0..frames).map(|_| None));
    for step in steps {
        if let Some(c) = step {
            let key = tilescape_input::Key::from_identifier(&c.to_string());
            match bindings.action(key) {
                tilescape_input::Action::Move(direction) => {
                    session.move_player(direction);
                }
                tilescape_input::Action::Noop => anyhow::bail!("unknown move {c:?}"),
            }
        }
        camera.follow(&mut session, compositor.projector());
        surface = RecordingSurface::new();
        report = Some(compositor.compose(&session, &assets, &mut surface));
        session.advance_frame();
    }

    let report = report.context("no frames were run")?;
    tracing::debug!(
        frame = session.frame(),
        player = %session.player(),
        "replay finished"
    );
    let stats = FrameStats {
        frame: session.frame(),
        ping_ms: fake_ping(session.frame()),
        ..FrameStats::default()
    };
    println!("{}", SessionInspector::status(&session, &stats));
    println!(
        "Camera: ({:.2}, {:.2})",
        session.camera().x,
        session.camera().y
    );
    println!(
        "Frame {}: tiles={} overlays={} items={} skipped={} commands={}",
        session.frame(),
        report.tiles,
        report.overlays,
        report.items,
        report.skipped,
        surface.commands().len()
    );

    if commands {
        for cmd in surface.commands() {
            match cmd {
                DrawCommand::Clear(r) => {
                    println!("clear {:.1} {:.1} {:.1} {:.1}", r.x, r.y, r.width, r.height)
                }
                DrawCommand::Image { sprite, rect, alpha } => println!(
                    "image {} {:.1} {:.1} {:.1} {:.1} alpha={:.3}",
                    sprite.name(),
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    alpha
                ),
                DrawCommand::Circle { center, radius, .. } => {
                    println!("circle {:.1} {:.1} r={radius:.1}", center.x, center.y)
                }
                DrawCommand::RadialGradient { gradient, .. } => println!(
                    "gradient {:.1} {:.1} r={:.1}..{:.1}",
                    gradient.center.x,
                    gradient.center.y,
                    gradient.inner_radius,
                    gradient.outer_radius
                ),
            }
        }
    }

    Ok(())
}
