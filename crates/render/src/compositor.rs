use glam::Vec2;
use tilescape_assets::{AssetRegistry, SpriteId};
use tilescape_common::{DecorationKind, GenConfig, ViewConfig, WorldConfig, WorldCoord};
use tilescape_kernel::{Session, classify_tile, cover_for, decorations_at, elevation, tile_alpha};
use tilescape_stream::VisibleWindow;

use crate::{IsoProjector, RadialGradient, Rect, Rgba, surface::DrawSurface};

const MARKER_RADIUS: f32 = 5.0;
const VIGNETTE_DARKNESS: f32 = 0.5;

/// What a depth-sorted item depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Decoration(DecorationKind),
    Player,
}

/// An object drawn after the ground pass, ordered by [`Self::depth_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub coord: WorldCoord,
    pub kind: DrawKind,
}

impl DrawItem {
    pub fn depth_key(&self) -> i64 {
        self.coord.depth_key()
    }

    pub fn sprite(&self) -> SpriteId {
        match self.kind {
            DrawKind::Decoration(kind) => SpriteId::for_decoration(kind),
            DrawKind::Player => SpriteId::Player,
        }
    }
}

/// Draw counts for one composed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub tiles: usize,
    pub overlays: usize,
    pub items: usize,
    /// Image draws skipped because their sprite was not ready.
    pub skipped: usize,
}

/// Draw `sprite` if it has loaded. Returns whether anything was drawn.
fn try_draw<S: DrawSurface>(
    surface: &mut S,
    assets: &AssetRegistry,
    sprite: SpriteId,
    rect: Rect,
    alpha: f32,
) -> bool {
    if !assets.is_ready(sprite) {
        return false;
    }
    surface.draw_image(sprite, rect, alpha);
    true
}

/// Sort items back to front. Equal keys keep their insertion order.
pub fn sort_by_depth(items: &mut [DrawItem]) {
    items.sort_by_key(DrawItem::depth_key);
}

/// Builds each frame from the session and the generator.
///
/// Frames are drawn in two passes. The ground pass covers every tile in the
/// window with its terrain sprite and any grass overlay. The object pass
/// draws decorations and the player sorted by `x + y`, so nearer objects
/// cover farther ones.
#[derive(Debug, Clone)]
pub struct SceneCompositor {
    generation: GenConfig,
    view: ViewConfig,
    projector: IsoProjector,
}

impl SceneCompositor {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            generation: config.generation.clone(),
            view: config.view.clone(),
            projector: IsoProjector::from_view(&config.view),
        }
    }

    pub fn projector(&self) -> &IsoProjector {
        &self.projector
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn generation(&self) -> &GenConfig {
        &self.generation
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.projector = self.projector.with_viewport(width, height);
        self.view.viewport_width = width;
        self.view.viewport_height = height;
    }

    pub fn window(&self, session: &Session) -> VisibleWindow {
        VisibleWindow::new(session.player(), self.view.draw_range)
    }

    /// Decorations in the window plus the player, depth-sorted.
    pub fn draw_list(&self, session: &Session) -> Vec<DrawItem> {
        let mut items: Vec<DrawItem> = self
            .window(session)
            .coords()
            .flat_map(|coord| {
                decorations_at(coord, &self.generation).map(move |kind| DrawItem {
                    coord,
                    kind: DrawKind::Decoration(kind),
                })
            })
            .collect();
        items.push(DrawItem {
            coord: session.player(),
            kind: DrawKind::Player,
        });
        sort_by_depth(&mut items);
        items
    }

    /// Draw one frame onto `surface`.
    ///
    /// Sprites that are not ready are skipped and counted; nothing is retried
    /// within the frame.
    pub fn compose<S: DrawSurface>(
        &self,
        session: &Session,
        assets: &AssetRegistry,
        surface: &mut S,
    ) -> FrameReport {
        let _span = tracing::trace_span!("compose", frame = session.frame()).entered();
        let mut report = FrameReport::default();
        let camera = session.camera();
        let (tw, th) = (self.projector.tile_width, self.projector.tile_height);

        surface.clear(self.viewport());

        for coord in self.window(session).coords() {
            let anchor = self.projector.world_to_screen(coord, camera);
            let tile = classify_tile(coord, &self.generation);
            let alpha = tile_alpha(elevation(coord, &self.generation), &self.generation);

            let ground = Rect::new(anchor.x - tw / 2.0, anchor.y, tw, th);
            let counter = match try_draw(surface, assets, SpriteId::for_tile(tile), ground, alpha) {
                true => &mut report.tiles,
                false => &mut report.skipped,
            };
            *counter += 1;

            if let Some(sprite) = SpriteId::for_cover(cover_for(coord, tile, &self.generation)) {
                let overlay = Rect::new(anchor.x - tw / 2.0, anchor.y - th / 2.0, tw, th);
                let counter = match try_draw(surface, assets, sprite, overlay, 1.0) {
                    true => &mut report.overlays,
                    false => &mut report.skipped,
                };
                *counter += 1;
            }
        }

        for item in self.draw_list(session) {
            let anchor = self.projector.world_to_screen(item.coord, camera);
            let rect = self.item_rect(item.kind, anchor);
            let counter = match try_draw(surface, assets, item.sprite(), rect, 1.0) {
                true => &mut report.items,
                false => &mut report.skipped,
            };
            *counter += 1;
            if item.kind == DrawKind::Player && self.view.debug_marker {
                surface.fill_circle(anchor, MARKER_RADIUS, Rgba::RED);
            }
        }

        if self.view.vignette {
            surface.fill_radial_gradient(self.viewport(), self.vignette());
        }

        tracing::trace!(
            tiles = report.tiles,
            items = report.items,
            skipped = report.skipped,
            "frame composed"
        );
        report
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.projector.viewport_width, self.projector.viewport_height)
    }

    fn item_rect(&self, kind: DrawKind, anchor: Vec2) -> Rect {
        let (tw, th) = (self.projector.tile_width, self.projector.tile_height);
        match kind {
            DrawKind::Decoration(DecorationKind::Tree) => {
                Rect::new(anchor.x - tw / 4.0, anchor.y - 9.0 * th, tw, 4.0 * th)
            }
            DrawKind::Decoration(DecorationKind::Rock) => {
                Rect::new(anchor.x - tw / 2.0, anchor.y - 1.5 * th, tw, 1.5 * th)
            }
            DrawKind::Player => Rect::new(anchor.x - tw / 2.0, anchor.y - 1.75 * th, tw, 2.5 * th),
        }
    }

    /// Darkens the screen edges, leaving the centre clear.
    fn vignette(&self) -> RadialGradient {
        let h = self.projector.viewport_height;
        RadialGradient {
            center: self.projector.viewport_center(),
            inner_radius: h / 4.0,
            outer_radius: h / 2.0,
            inner: Rgba::TRANSPARENT,
            outer: Rgba::new(0.0, 0.0, 0.0, VIGNETTE_DARKNESS),
        }
    }
}

impl Default for SceneCompositor {
    fn default() -> Self {
        Self::new(&WorldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use tilescape_assets::SpriteManifest;

    fn compositor(draw_range: i32) -> SceneCompositor {
        let mut config = WorldConfig::default();
        config.view.draw_range = draw_range;
        SceneCompositor::new(&config)
    }

    fn item(x: i32, y: i32, kind: DrawKind) -> DrawItem {
        DrawItem {
            coord: WorldCoord::new(x, y),
            kind,
        }
    }

    #[test]
    fn sort_orders_by_coordinate_sum() {
        let tree = DrawKind::Decoration(DecorationKind::Tree);
        let mut items = vec![
            item(3, 0, tree),
            item(1, 0, tree),
            item(1, 2, DrawKind::Player),
            item(2, 0, tree),
        ];
        sort_by_depth(&mut items);
        let keys: Vec<i64> = items.iter().map(DrawItem::depth_key).collect();
        assert_eq!(keys, vec![1, 2, 3, 3]);
        // Stable: the tree at (3, 0) was inserted before the player.
        assert_eq!(items[2].kind, tree);
        assert_eq!(items[3].kind, DrawKind::Player);
    }

    #[test]
    fn draw_list_contains_player_once() {
        let c = compositor(5);
        let list = c.draw_list(&Session::new());
        assert_eq!(list.iter().filter(|i| i.kind == DrawKind::Player).count(), 1);
        assert!(list.windows(2).all(|w| w[0].depth_key() <= w[1].depth_key()));
    }

    #[test]
    fn origin_frame_command_sequence() {
        // The origin hashes to zero: grass with tall cover, a tree and a rock.
        let c = compositor(0);
        let mut surface = RecordingSurface::new();
        let report = c.compose(&Session::new(), &AssetRegistry::all_ready(), &mut surface);

        assert_eq!(
            surface.sprites().collect::<Vec<_>>(),
            vec![
                SpriteId::Grass,
                SpriteId::TallGrass,
                SpriteId::Tree,
                SpriteId::Rock,
                SpriteId::Player,
            ]
        );
        assert_eq!(report, FrameReport { tiles: 1, overlays: 1, items: 3, skipped: 0 });

        let cmds = surface.commands();
        assert_eq!(cmds[0], DrawCommand::Clear(Rect::new(0.0, 0.0, 800.0, 600.0)));
        match &cmds[1] {
            DrawCommand::Image { rect, alpha, .. } => {
                assert_eq!(*rect, Rect::new(364.0, 300.0, 72.0, 32.0));
                // Elevation at the origin is sin(2) + cos(2).
                let expected = 1.0 - ((2.0f64.sin() + 2.0f64.cos()) * 0.1) as f32;
                assert!((alpha - expected).abs() < 1e-5);
            }
            other => panic!("expected ground image, got {other:?}"),
        }
        assert!(matches!(
            cmds[2],
            DrawCommand::Image { rect, .. } if rect == Rect::new(364.0, 284.0, 72.0, 32.0)
        ));
        assert!(matches!(
            cmds[3],
            DrawCommand::Image { rect, .. } if rect == Rect::new(382.0, 12.0, 72.0, 128.0)
        ));
        assert!(matches!(
            cmds[4],
            DrawCommand::Image { rect, .. } if rect == Rect::new(364.0, 252.0, 72.0, 48.0)
        ));
        assert!(matches!(
            cmds[5],
            DrawCommand::Image { rect, .. } if rect == Rect::new(364.0, 244.0, 72.0, 80.0)
        ));
        assert_eq!(
            cmds[6],
            DrawCommand::Circle {
                center: Vec2::new(400.0, 300.0),
                radius: 5.0,
                color: Rgba::RED
            }
        );
        assert_eq!(cmds.len(), 7);
    }

    #[test]
    fn unready_sprite_is_skipped_silently() {
        let c = compositor(0);
        let mut assets = AssetRegistry::from_manifest(&SpriteManifest::default());
        for id in SpriteId::ALL {
            if id != SpriteId::Tree {
                assets.mark_ready(id, 16, 16).unwrap();
            }
        }
        let mut surface = RecordingSurface::new();
        let report = c.compose(&Session::new(), &assets, &mut surface);

        assert!(surface.sprites().all(|s| s != SpriteId::Tree));
        assert_eq!(report.skipped, 1);
        assert_eq!(report.items, 2);
    }

    #[test]
    fn failed_sprite_is_skipped_every_frame() {
        let c = compositor(2);
        let mut pending = AssetRegistry::from_manifest(&SpriteManifest::default());
        pending.mark_failed(SpriteId::Grass, "missing file").unwrap();
        assert!(!pending.is_ready(SpriteId::Grass));

        let session = Session::new();
        let mut first = RecordingSurface::new();
        let mut second = RecordingSurface::new();
        let a = c.compose(&session, &pending, &mut first);
        let b = c.compose(&session, &pending, &mut second);
        assert_eq!(a, b);
        assert_eq!(first.commands(), second.commands());

        // With everything ready nothing is skipped.
        let full = c.compose(&session, &AssetRegistry::all_ready(), &mut RecordingSurface::new());
        assert_eq!(full.skipped, 0);
        assert_eq!(full.tiles, 25);
    }

    #[test]
    fn ground_pass_covers_window_in_row_major_order() {
        let c = compositor(3);
        let mut surface = RecordingSurface::new();
        let report = c.compose(&Session::new(), &AssetRegistry::all_ready(), &mut surface);
        assert_eq!(report.tiles, 49);

        let ground: Vec<SpriteId> = surface
            .sprites()
            .filter(|s| matches!(s, SpriteId::Grass | SpriteId::Dirt | SpriteId::Water))
            .collect();
        let expected: Vec<SpriteId> = VisibleWindow::new(WorldCoord::ORIGIN, 3)
            .coords()
            .map(|coord| SpriteId::for_tile(classify_tile(coord, c.generation())))
            .collect();
        assert_eq!(ground, expected);
    }

    #[test]
    fn marker_and_vignette_follow_config() {
        let mut config = WorldConfig::default();
        config.view.draw_range = 0;
        config.view.debug_marker = false;
        config.view.vignette = true;
        let c = SceneCompositor::new(&config);

        let mut surface = RecordingSurface::new();
        c.compose(&Session::new(), &AssetRegistry::all_ready(), &mut surface);
        let cmds = surface.commands();
        assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::Circle { .. })));
        match cmds.last() {
            Some(DrawCommand::RadialGradient { gradient, .. }) => {
                assert_eq!(gradient.center, Vec2::new(400.0, 300.0));
                assert_eq!(gradient.inner_radius, 150.0);
                assert_eq!(gradient.outer_radius, 300.0);
                assert_eq!(gradient.outer.a, 0.5);
            }
            other => panic!("expected vignette last, got {other:?}"),
        }
    }

    #[test]
    fn player_drawn_after_decorations_on_nearer_tiles_only() {
        let c = compositor(4);
        let session = Session::with_spawn(WorldCoord::new(2, 2));
        let list = c.draw_list(&session);
        let player_at = list
            .iter()
            .position(|i| i.kind == DrawKind::Player)
            .unwrap();
        assert!(list[..player_at].iter().all(|i| i.depth_key() <= 4));
        assert!(list[player_at + 1..].iter().all(|i| i.depth_key() > 4));
    }
}
