use std::collections::BTreeMap;

use crate::{AssetError, LoadGate, SpriteId, SpriteManifest};

/// Load state of a single sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetState {
    #[default]
    Pending,
    /// Decoded, with its natural pixel size.
    Ready { width: u32, height: u32 },
    /// Failed to load. Draws referencing it are skipped for the session.
    Failed,
}

impl AssetState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, AssetState::Pending)
    }
}

#[derive(Debug, Clone)]
pub struct AssetEntry {
    pub path: String,
    pub state: AssetState,
}

/// Per-sprite load state plus the startup gate.
///
/// A loader reports each sprite exactly once through [`Self::mark_ready`] or
/// [`Self::mark_failed`]. Later reports for a settled sprite are ignored.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    entries: BTreeMap<SpriteId, AssetEntry>,
    gate: LoadGate,
}

impl AssetRegistry {
    /// Track every sprite in `manifest` as pending.
    pub fn from_manifest(manifest: &SpriteManifest) -> Self {
        let entries: BTreeMap<SpriteId, AssetEntry> = manifest
            .sprites
            .iter()
            .map(|(id, path)| {
                (
                    *id,
                    AssetEntry {
                        path: path.clone(),
                        state: AssetState::Pending,
                    },
                )
            })
            .collect();
        let gate = LoadGate::new(entries.len());
        Self { entries, gate }
    }

    /// A registry where every default sprite is already ready. Useful for
    /// headless rendering where only draw calls matter.
    pub fn all_ready() -> Self {
        let mut registry = Self::from_manifest(&SpriteManifest::default());
        for id in SpriteId::ALL {
            let _ = registry.mark_ready(id, 1, 1);
        }
        registry
    }

    /// Record a successful load. Returns `Ok(true)` if this report opened
    /// the gate.
    ///
    /// An image with a zero dimension is unusable and counts as a failure.
    pub fn mark_ready(&mut self, id: SpriteId, width: u32, height: u32) -> Result<bool, AssetError> {
        if width == 0 || height == 0 {
            return self.mark_failed(id, "image has zero size");
        }
        self.settle(id, AssetState::Ready { width, height })
    }

    /// Record a failed load. The failure is logged once here and never
    /// again; draws for this sprite become no-ops.
    pub fn mark_failed(&mut self, id: SpriteId, reason: &str) -> Result<bool, AssetError> {
        let entry = self.entries.get(&id).ok_or(AssetError::NotDeclared(id))?;
        if entry.state.is_settled() {
            return Ok(false);
        }
        tracing::warn!(sprite = id.name(), path = %entry.path, reason, "failed to load sprite");
        self.settle(id, AssetState::Failed)
    }

    fn settle(&mut self, id: SpriteId, state: AssetState) -> Result<bool, AssetError> {
        let entry = self.entries.get_mut(&id).ok_or(AssetError::NotDeclared(id))?;
        if entry.state.is_settled() {
            tracing::trace!(sprite = id.name(), "ignoring repeat load report");
            return Ok(false);
        }
        entry.state = state;
        tracing::debug!(sprite = id.name(), ?state, "sprite settled");
        Ok(self.gate.settle())
    }

    /// State of a sprite, or `None` if it was never declared.
    pub fn state(&self, id: SpriteId) -> Option<AssetState> {
        self.entries.get(&id).map(|e| e.state)
    }

    /// Whether a sprite can be drawn right now.
    pub fn is_ready(&self, id: SpriteId) -> bool {
        matches!(self.state(id), Some(AssetState::Ready { .. }))
    }

    /// Natural pixel size of a ready sprite.
    pub fn dimensions(&self, id: SpriteId) -> Option<(u32, u32)> {
        match self.state(id)? {
            AssetState::Ready { width, height } => Some((width, height)),
            AssetState::Pending | AssetState::Failed => None,
        }
    }

    /// Whether every declared sprite has loaded or failed.
    pub fn all_settled(&self) -> bool {
        self.gate.is_open()
    }

    pub fn gate(&self) -> &LoadGate {
        &self.gate
    }

    pub fn entries(&self) -> &BTreeMap<SpriteId, AssetEntry> {
        &self.entries
    }

    pub fn failed(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.entries
            .iter()
            .filter(|(_, e)| e.state == AssetState::Failed)
            .map(|(id, _)| *id)
    }
}
