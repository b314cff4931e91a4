//! Developer Tooling: status overlay, tile probe, and area statistics.
//!
//! # Invariants
//! - Tools only read; they never move the player or the camera.

mod inspector;

pub use inspector::{AreaSummary, SessionInspector, StatusLine, TileInfo};

pub fn crate_info() -> &'static str {
    "tilescape-tools v0.1.0"
}
