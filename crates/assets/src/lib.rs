//! Sprite pipeline: declarations, per-asset load state, and the startup gate.
//!
//! The compositor consumes sprites by [`SpriteId`], never by file path, and
//! asks the [`AssetRegistry`] whether a sprite is ready before drawing it.
//!
//! # Invariants
//! - An asset leaves `Pending` at most once; `Ready` and `Failed` are final.
//! - The [`LoadGate`] opens exactly once, after every declared sprite has
//!   settled, whether it loaded or failed.

mod gate;
mod registry;

pub use gate::LoadGate;
pub use registry::{AssetEntry, AssetRegistry, AssetState};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tilescape_common::{DecorationKind, GroundCover, TileType};

/// Every sprite the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpriteId {
    Grass,
    Dirt,
    Water,
    TallGrass,
    ShortGrass,
    Player,
    Tree,
    Rock,
}

impl SpriteId {
    pub const ALL: [SpriteId; 8] = [
        SpriteId::Grass,
        SpriteId::Dirt,
        SpriteId::Water,
        SpriteId::TallGrass,
        SpriteId::ShortGrass,
        SpriteId::Player,
        SpriteId::Tree,
        SpriteId::Rock,
    ];

    pub fn for_tile(tile: TileType) -> Self {
        match tile {
            TileType::Grass => SpriteId::Grass,
            TileType::Dirt => SpriteId::Dirt,
            TileType::Water => SpriteId::Water,
        }
    }

    pub fn for_cover(cover: GroundCover) -> Option<Self> {
        match cover {
            GroundCover::None => None,
            GroundCover::TallGrass => Some(SpriteId::TallGrass),
            GroundCover::ShortGrass => Some(SpriteId::ShortGrass),
        }
    }

    pub fn for_decoration(kind: DecorationKind) -> Self {
        match kind {
            DecorationKind::Tree => SpriteId::Tree,
            DecorationKind::Rock => SpriteId::Rock,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpriteId::Grass => "grass",
            SpriteId::Dirt => "dirt",
            SpriteId::Water => "water",
            SpriteId::TallGrass => "tallGrass",
            SpriteId::ShortGrass => "shortGrass",
            SpriteId::Player => "player",
            SpriteId::Tree => "tree",
            SpriteId::Rock => "rock",
        }
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sprite not declared: {0:?}")]
    NotDeclared(SpriteId),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Maps each sprite to an image path relative to an asset directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteManifest {
    pub sprites: BTreeMap<SpriteId, String>,
}

impl Default for SpriteManifest {
    fn default() -> Self {
        let sprites = [
            (SpriteId::Grass, "assets/tiles/grass.jpg"),
            (SpriteId::Dirt, "assets/tiles/dirt.jpg"),
            (SpriteId::Water, "assets/tiles/water.jpg"),
            (SpriteId::TallGrass, "assets/tiles/tallGrass.png"),
            (SpriteId::ShortGrass, "assets/tiles/shortGrass.png"),
            (SpriteId::Player, "assets/mrguyguy.png"),
            (SpriteId::Tree, "assets/trees/tree.png"),
            (SpriteId::Rock, "assets/rocks/rock.png"),
        ]
        .into_iter()
        .map(|(id, path)| (id, path.to_string()))
        .collect();
        Self { sprites }
    }
}

impl SpriteManifest {
    /// Number of declared sprites.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Full path of a sprite under `base`, if declared.
    pub fn resolve(&self, base: impl AsRef<Path>, id: SpriteId) -> Option<PathBuf> {
        self.sprites.get(&id).map(|rel| base.as_ref().join(rel))
    }

    /// Save the manifest to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let manifest: Self = serde_json::from_reader(file)?;
        Ok(manifest)
    }
}

pub fn crate_info() -> &'static str {
    "tilescape-assets v0.1.0"
}
