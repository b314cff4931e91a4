//! Rendering: isometric projection, camera follow, and scene composition.
//!
//! # Invariants
//! - Rendering reads the session; only the camera controller writes to it.
//! - Ground tiles are drawn in full before any object. Objects are drawn in
//!   ascending `x + y`, with the player among them.
//! - A sprite that is not loaded is skipped, never reported as an error.
//!
//! Drawing goes through [`DrawSurface`], so the same compositor feeds the
//! desktop painter, the recording surface used in tests, and the CLI.

mod camera;
mod compositor;
mod projection;
mod renderer;
mod surface;

pub use camera::{CameraController, update_camera};
pub use compositor::{DrawItem, DrawKind, FrameReport, SceneCompositor, sort_by_depth};
pub use projection::{IsoProjector, world_to_screen};
pub use renderer::{DebugTextRenderer, Renderer};
pub use surface::{DrawCommand, DrawSurface, RadialGradient, RecordingSurface, Rect, Rgba};

pub fn crate_info() -> &'static str {
    "tilescape-render v0.1.0"
}
