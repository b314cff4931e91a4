//! Terrain classification, grass cover, and elevation shading.
//!
//! Terrain is built from smooth trigonometric waves rather than per-tile
//! randomness, so water forms large connected bodies and dirt appears in
//! sparse streaks. Per-tile variety (cover, decorations) comes from [`hash`].

use crate::noise::{hash, unit_fract};
use tilescape_common::{GenConfig, GroundCover, TileType, WorldCoord};

/// Classify a tile.
///
/// Checks run in a fixed order because the thresholds trigger independently:
/// primary water, diagonal water band, dirt patch, then grass.
pub fn classify_tile(coord: WorldCoord, config: &GenConfig) -> TileType {
    let x = coord.x as f64;
    let y = coord.y as f64;

    let k = config.terrain_frequency;
    let value = (x * k + (y * k).cos()).sin();
    if value < config.water_threshold {
        return TileType::Water;
    }

    let water_noise = ((x + y * 2.0) * config.water_noise_frequency).sin();
    if water_noise > config.water_noise_threshold {
        return TileType::Water;
    }

    let dirt = (x * config.dirt_frequency_x + (y * config.dirt_frequency_y).cos()).sin();
    if dirt > config.dirt_threshold {
        return TileType::Dirt;
    }

    TileType::Grass
}

/// Grass tuft for a coordinate, assuming the tile is grass.
pub fn ground_cover(coord: WorldCoord, config: &GenConfig) -> GroundCover {
    let h = hash(coord.x, coord.y) as f64;
    let seed = unit_fract(h.sin() * config.cover_seed_scale);
    if seed < config.tall_grass_chance {
        GroundCover::TallGrass
    } else if seed < config.short_grass_chance {
        GroundCover::ShortGrass
    } else {
        GroundCover::None
    }
}

/// Ground cover for an already classified tile. Only grass carries cover.
pub fn cover_for(coord: WorldCoord, tile: TileType, config: &GenConfig) -> GroundCover {
    match tile {
        TileType::Grass => ground_cover(coord, config),
        TileType::Dirt | TileType::Water => GroundCover::None,
    }
}

/// Low-frequency height field, roughly in `[-2, 2]`.
pub fn elevation(coord: WorldCoord, config: &GenConfig) -> f64 {
    let f = config.elevation_frequency;
    let off = config.elevation_offset;
    ((coord.x as f64 + off) * f).sin() + ((coord.y as f64 - off) * f).cos()
}

/// Opacity for a ground tile at `elevation`. Higher ground is drawn slightly
/// darker; low ground stays fully opaque. A negative shade cap counts as
/// zero.
pub fn tile_alpha(elevation: f64, config: &GenConfig) -> f32 {
    let cap = config.elevation_shade_max.max(0.0);
    let shade = (elevation * config.elevation_shade).max(0.0).min(cap);
    (1.0 - shade) as f32
}
