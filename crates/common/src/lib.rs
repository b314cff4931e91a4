//! Shared types for the tilescape workspace.
//!
//! # Invariants
//! - Every terrain property is a pure function of a [`WorldCoord`].
//! - Tuned generation constants live in [`GenConfig`], never inline.

pub mod config;
pub mod types;

pub use config::{ConfigError, GenConfig, ViewConfig, WorldConfig};
pub use types::{DecorationKind, Direction, GroundCover, TileType, WorldCoord};

pub fn crate_info() -> &'static str {
    "tilescape-common v0.1.0"
}
