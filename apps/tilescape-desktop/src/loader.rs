use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tilescape_assets::{SpriteId, SpriteManifest};

/// A decoded sprite in straight RGBA8.
pub struct LoadedSprite {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// One finished load, successful or not.
pub struct SpriteLoad {
    pub id: SpriteId,
    pub path: PathBuf,
    pub result: Result<LoadedSprite, String>,
}

/// Decode every sprite in `manifest` on a background thread.
///
/// Each sprite is reported exactly once on the returned channel, in manifest
/// order. The channel closes when all have been sent.
pub fn spawn_loader(manifest: &SpriteManifest, root: &Path) -> anyhow::Result<Receiver<SpriteLoad>> {
    let jobs: Vec<(SpriteId, PathBuf)> = manifest
        .sprites
        .keys()
        .filter_map(|id| manifest.resolve(root, *id).map(|path| (*id, path)))
        .collect();
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("sprite-loader".into())
        .spawn(move || {
            for (id, path) in jobs {
                let result = decode(&path);
                if tx.send(SpriteLoad { id, path, result }).is_err() {
                    tracing::debug!("sprite receiver dropped, stopping loader");
                    return;
                }
            }
        })?;

    Ok(rx)
}

fn decode(path: &Path) -> Result<LoadedSprite, String> {
    let reader = image::ImageReader::open(path).map_err(|error| format!("open failed: {error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode failed: {error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}
