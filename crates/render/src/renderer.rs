use tilescape_common::{DecorationKind, GenConfig, GroundCover, TileType, ViewConfig, WorldCoord};
use tilescape_kernel::{Session, classify_tile, cover_for, decorations_at};
use tilescape_stream::VisibleWindow;

/// Backend-agnostic renderer. Reads the session and view, never mutates them.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `session` as seen through `view`.
    fn render(&self, session: &Session, view: &ViewConfig) -> Self::Output;
}

/// Renders the visible window as an ASCII map, north up.
///
/// Useful for the CLI, logging, and eyeballing generator changes without a
/// window.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    generation: GenConfig,
}

impl DebugTextRenderer {
    pub fn new(generation: GenConfig) -> Self {
        Self { generation }
    }

    /// Map character for a tile, ignoring the player.
    pub fn glyph(&self, coord: WorldCoord) -> char {
        let mut decorations = decorations_at(coord, &self.generation);
        if let Some(kind) = decorations.next() {
            return match kind {
                DecorationKind::Tree => 'T',
                DecorationKind::Rock => 'o',
            };
        }
        let tile = classify_tile(coord, &self.generation);
        match (tile, cover_for(coord, tile, &self.generation)) {
            (TileType::Water, _) => '~',
            (TileType::Dirt, _) => '.',
            (TileType::Grass, GroundCover::TallGrass) => '"',
            (TileType::Grass, GroundCover::ShortGrass) => ',',
            (TileType::Grass, GroundCover::None) => ' ',
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, session: &Session, view: &ViewConfig) -> String {
        let window = VisibleWindow::new(session.player(), view.draw_range);
        let (lo, hi) = (window.min(), window.max());

        let mut out = String::with_capacity((window.side() + 1) * window.side() + 64);
        out.push_str(&format!(
            "=== Tilescape (frame={}, player={}) ===\n",
            session.frame(),
            session.player()
        ));
        for y in (lo.y..=hi.y).rev() {
            for x in lo.x..=hi.x {
                let coord = WorldCoord::new(x, y);
                out.push(if coord == session.player() { '@' } else { self.glyph(coord) });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(draw_range: i32) -> ViewConfig {
        ViewConfig {
            draw_range,
            ..ViewConfig::default()
        }
    }

    #[test]
    fn map_is_square_with_player_in_centre() {
        let renderer = DebugTextRenderer::default();
        let output = renderer.render(&Session::new(), &view(2));
        let mut lines = output.lines();

        assert!(lines.next().is_some_and(|h| h.contains("frame=0")));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.chars().count() == 5));
        assert_eq!(rows[2].chars().nth(2), Some('@'));
    }

    #[test]
    fn glyphs_reflect_generator() {
        let renderer = DebugTextRenderer::default();
        // The origin carries a tree, which wins over the ground.
        assert_eq!(renderer.glyph(WorldCoord::ORIGIN), 'T');
        assert_eq!(renderer.glyph(WorldCoord::new(70, 0)), '~');
    }

    #[test]
    fn north_is_up() {
        let renderer = DebugTextRenderer::default();
        let session = Session::with_spawn(WorldCoord::new(0, -1));
        let output = renderer.render(&session, &view(1));
        let rows: Vec<&str> = output.lines().skip(1).collect();
        // Top row is y = 0, so the origin tree sits above the player.
        assert_eq!(rows[0].chars().nth(1), Some('T'));
        assert_eq!(rows[1].chars().nth(1), Some('@'));
    }
}
