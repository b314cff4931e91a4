//! Tree and rock placement.

use crate::noise::{hash, unit_fract};
use crate::terrain::classify_tile;
use tilescape_common::{DecorationKind, GenConfig, TileType, WorldCoord};

/// Trees grow on grass only.
pub fn should_place_tree(coord: WorldCoord, config: &GenConfig) -> bool {
    if classify_tile(coord, config) != TileType::Grass {
        return false;
    }
    let h = hash(coord.x, coord.y) as f64;
    unit_fract(h.cos() * config.tree_seed_scale) < config.tree_chance
}

/// Rocks sit on grass or dirt, never water.
pub fn should_place_rock(coord: WorldCoord, config: &GenConfig) -> bool {
    if classify_tile(coord, config) == TileType::Water {
        return false;
    }
    let h = hash(coord.x, coord.y) as f64;
    unit_fract((h * config.rock_seed_scale).sin()) < config.rock_chance
}

/// Decorations standing on `coord`: a tree first, then a rock. A tile can
/// carry both.
pub fn decorations_at(
    coord: WorldCoord,
    config: &GenConfig,
) -> impl Iterator<Item = DecorationKind> {
    let tree = should_place_tree(coord, config).then_some(DecorationKind::Tree);
    let rock = should_place_rock(coord, config).then_some(DecorationKind::Rock);
    tree.into_iter().chain(rock)
}
