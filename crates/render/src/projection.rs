use glam::{DVec2, Vec2};
use tilescape_common::{ViewConfig, WorldCoord};

/// 2:1-style isometric projection from tile coordinates to screen pixels.
///
/// `+x` runs down-right on screen and `+y` down-left. The projected point
/// is the top vertex of the tile's diamond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjector {
    pub tile_width: f32,
    pub tile_height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl IsoProjector {
    pub fn new(tile_width: f32, tile_height: f32, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            tile_width,
            tile_height,
            viewport_width,
            viewport_height,
        }
    }

    pub fn from_view(view: &ViewConfig) -> Self {
        Self::new(
            view.tile_width,
            view.tile_height,
            view.viewport_width,
            view.viewport_height,
        )
    }

    /// Same projector with a different viewport, e.g. after a window resize.
    pub fn with_viewport(self, width: f32, height: f32) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..self
        }
    }

    pub fn viewport_center(&self) -> Vec2 {
        Vec2::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    /// Isometric world position of a tile, independent of camera and
    /// viewport. The camera targets this point.
    ///
    /// Axis sums are taken in integers, so every `i32` tile maps exactly.
    pub fn world_position(&self, coord: WorldCoord) -> DVec2 {
        let diff = coord.x as i64 - coord.y as i64;
        let sum = coord.x as i64 + coord.y as i64;
        DVec2::new(
            diff as f64 * self.tile_width as f64 / 2.0,
            sum as f64 * self.tile_height as f64 / 2.0,
        )
    }

    /// Screen position of a tile for a camera offset. Only the final,
    /// camera-relative point is narrowed to `f32`.
    pub fn world_to_screen(&self, coord: WorldCoord, camera: DVec2) -> Vec2 {
        (self.world_position(coord) - camera).as_vec2() + self.viewport_center()
    }

    /// Inverse of [`Self::world_to_screen`], in fractional tile units.
    pub fn screen_to_world(&self, screen: Vec2, camera: DVec2) -> DVec2 {
        let world = (screen - self.viewport_center()).as_dvec2() + camera;
        let diff = 2.0 * world.x / self.tile_width as f64; // x - y
        let sum = 2.0 * world.y / self.tile_height as f64; // x + y
        DVec2::new((sum + diff) / 2.0, (sum - diff) / 2.0)
    }

    /// The tile whose diamond contains `screen`.
    pub fn tile_at(&self, screen: Vec2, camera: DVec2) -> WorldCoord {
        let w = self.screen_to_world(screen, camera).floor();
        WorldCoord::new(w.x as i32, w.y as i32)
    }
}

impl Default for IsoProjector {
    fn default() -> Self {
        Self::from_view(&ViewConfig::default())
    }
}

/// Project tile `(x, y)` to screen pixels without building an
/// [`IsoProjector`].
#[allow(clippy::too_many_arguments)]
pub fn world_to_screen(
    x: i32,
    y: i32,
    camera_x: f64,
    camera_y: f64,
    tile_width: f32,
    tile_height: f32,
    viewport_width: f32,
    viewport_height: f32,
) -> (f32, f32) {
    let p = IsoProjector::new(tile_width, tile_height, viewport_width, viewport_height)
        .world_to_screen(WorldCoord::new(x, y), DVec2::new(camera_x, camera_y));
    (p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_lands_on_viewport_center() {
        let p = IsoProjector::default();
        assert_eq!(p.world_to_screen(WorldCoord::ORIGIN, DVec2::ZERO), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn axis_steps() {
        let p = IsoProjector::default();
        assert_eq!(p.world_to_screen(WorldCoord::new(1, 0), DVec2::ZERO), Vec2::new(436.0, 316.0));
        assert_eq!(p.world_to_screen(WorldCoord::new(0, 1), DVec2::ZERO), Vec2::new(364.0, 316.0));
        assert_eq!(p.world_to_screen(WorldCoord::new(1, 1), DVec2::ZERO), Vec2::new(400.0, 332.0));
    }

    #[test]
    fn camera_shifts_everything() {
        let p = IsoProjector::default();
        let cam = DVec2::new(36.0, 16.0);
        assert_eq!(p.world_to_screen(WorldCoord::new(1, 0), cam), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn free_function_matches_projector() {
        assert_eq!(world_to_screen(1, 0, 0.0, 0.0, 72.0, 32.0, 800.0, 600.0), (436.0, 316.0));
        assert_eq!(world_to_screen(-3, 5, 10.0, -4.0, 72.0, 32.0, 800.0, 600.0), (102.0, 336.0));
    }

    #[test]
    fn screen_to_world_inverts() {
        let p = IsoProjector::default();
        let cam = DVec2::new(-120.0, 48.0);
        for (x, y) in [(0, 0), (7, -3), (-12, 25), (40, 40)] {
            let screen = p.world_to_screen(WorldCoord::new(x, y), cam);
            let back = p.screen_to_world(screen, cam);
            assert!((back.x - x as f64).abs() < 1e-9, "{back:?}");
            assert!((back.y - y as f64).abs() < 1e-9, "{back:?}");
        }
    }

    #[test]
    fn distant_neighbours_stay_one_tile_apart() {
        let p = IsoProjector::default();
        let far = WorldCoord::new(20_000_000, 0);
        let cam = p.world_position(far);
        let a = p.world_to_screen(far, cam);
        let b = p.world_to_screen(WorldCoord::new(20_000_001, 0), cam);
        assert_eq!(a, Vec2::new(400.0, 300.0));
        assert_eq!(b - a, Vec2::new(36.0, 16.0));

        let base = WorldCoord::new(3_000_000, -2_000_000);
        let cam = p.world_position(base);
        let east = p.world_to_screen(WorldCoord::new(3_000_001, -2_000_000), cam);
        assert_eq!(east, Vec2::new(436.0, 316.0));
    }

    #[test]
    fn extreme_coordinates_invert_exactly() {
        let p = IsoProjector::default();
        let coord = WorldCoord::new(i32::MAX, i32::MIN);
        let cam = p.world_position(coord);
        let screen = p.world_to_screen(coord, cam);
        assert_eq!(p.tile_at(screen + Vec2::new(0.0, 16.0), cam), coord);
    }

    #[test]
    fn tile_at_picks_diamond_interior() {
        let p = IsoProjector::default();
        let anchor = p.world_to_screen(WorldCoord::new(3, -2), DVec2::ZERO);
        // Centre of the diamond sits half a tile below its top vertex.
        let centre = anchor + Vec2::new(0.0, p.tile_height / 2.0);
        assert_eq!(p.tile_at(centre, DVec2::ZERO), WorldCoord::new(3, -2));
    }
}
