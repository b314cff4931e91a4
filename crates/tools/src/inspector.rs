use std::fmt;

use tilescape_common::{GenConfig, GroundCover, TileType, WorldCoord};
use tilescape_kernel::{
    Session, classify_tile, cover_for, elevation, should_place_rock, should_place_tree, tile_alpha,
};
use tilescape_stream::{FrameStats, VisibleWindow};

/// Read-only queries for overlays and debugging.
pub struct SessionInspector;

impl SessionInspector {
    /// The three-line overlay shown in the corner of the screen.
    pub fn status(session: &Session, stats: &FrameStats) -> StatusLine {
        StatusLine {
            player: session.player(),
            ping_ms: stats.ping_ms,
            fps: stats.fps,
        }
    }

    /// Everything the generator says about one tile.
    pub fn probe(coord: WorldCoord, config: &GenConfig) -> TileInfo {
        let tile = classify_tile(coord, config);
        let elevation = elevation(coord, config);
        TileInfo {
            coord,
            tile,
            cover: cover_for(coord, tile, config),
            elevation,
            alpha: tile_alpha(elevation, config),
            tree: should_place_tree(coord, config),
            rock: should_place_rock(coord, config),
        }
    }

    /// Terrain and decoration counts for a square window.
    pub fn survey(window: VisibleWindow, config: &GenConfig) -> AreaSummary {
        let mut summary = AreaSummary::default();
        for coord in window.coords() {
            let info = Self::probe(coord, config);
            summary.tiles += 1;
            match info.tile {
                TileType::Grass => summary.grass += 1,
                TileType::Dirt => summary.dirt += 1,
                TileType::Water => summary.water += 1,
            }
            match info.cover {
                GroundCover::TallGrass => summary.tall_grass += 1,
                GroundCover::ShortGrass => summary.short_grass += 1,
                GroundCover::None => {}
            }
            summary.trees += info.tree as usize;
            summary.rocks += info.rock as usize;
        }
        tracing::debug!(
            center = %window.center(),
            radius = window.radius(),
            tiles = summary.tiles,
            "surveyed area"
        );
        summary
    }
}

/// Overlay text: position, ping, and frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub player: WorldCoord,
    pub ping_ms: u32,
    pub fps: u32,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X: {}, Y: {}\nPing: {}ms\nFPS: {}",
            self.player.x, self.player.y, self.ping_ms, self.fps
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileInfo {
    pub coord: WorldCoord,
    pub tile: TileType,
    pub cover: GroundCover,
    pub elevation: f64,
    pub alpha: f32,
    pub tree: bool,
    pub rock: bool,
}

impl fmt::Display for TileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tile {} {} cover={:?} elevation={:.3} alpha={:.3}",
            self.coord,
            self.tile.name(),
            self.cover,
            self.elevation,
            self.alpha
        )?;
        if self.tree {
            write!(f, " +tree")?;
        }
        if self.rock {
            write!(f, " +rock")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AreaSummary {
    pub tiles: usize,
    pub grass: usize,
    pub dirt: usize,
    pub water: usize,
    pub tall_grass: usize,
    pub short_grass: usize,
    pub trees: usize,
    pub rocks: usize,
}

impl fmt::Display for AreaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Area: tiles={} grass={} dirt={} water={} tall_grass={} short_grass={} trees={} rocks={}",
            self.tiles,
            self.grass,
            self.dirt,
            self.water,
            self.tall_grass,
            self.short_grass,
            self.trees,
            self.rocks
        )
    }
}
