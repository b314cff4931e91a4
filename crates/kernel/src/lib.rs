//! World Kernel: deterministic terrain generation and session state.
//!
//! # Invariants
//! - Terrain, cover, and decorations are pure functions of a coordinate and
//!   a [`GenConfig`](tilescape_common::GenConfig). Nothing is cached.
//! - The only mutable state is the [`Session`]: player position, camera
//!   offset, and the frame counter.

pub mod decor;
pub mod noise;
pub mod session;
pub mod terrain;

pub use decor::{decorations_at, should_place_rock, should_place_tree};
pub use noise::{hash, splitmix64, unit_fract};
pub use session::Session;
pub use terrain::{classify_tile, cover_for, elevation, ground_cover, tile_alpha};

pub fn crate_info() -> &'static str {
    "tilescape-kernel v0.1.0"
}
