use glam::DVec2;
use tilescape_common::{ViewConfig, WorldCoord};
use tilescape_kernel::Session;

use crate::IsoProjector;

/// Eases the camera toward the player.
///
/// Each update covers `smoothing` of the remaining distance per axis, so the
/// camera converges exponentially and never overshoots while `smoothing`
/// lies in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    pub smoothing: f32,
}

impl CameraController {
    pub fn new(smoothing: f32) -> Self {
        Self { smoothing }
    }

    pub fn from_view(view: &ViewConfig) -> Self {
        Self::new(view.camera_smoothing)
    }

    /// One easing step from `camera` toward `target`.
    pub fn update(&self, camera: DVec2, target: DVec2) -> DVec2 {
        camera + (target - camera) * self.smoothing as f64
    }

    /// Ease the session camera one step toward the player.
    pub fn follow(&self, session: &mut Session, projector: &IsoProjector) -> DVec2 {
        let target = projector.world_position(session.player());
        session.ease_camera(target, self.smoothing as f64)
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_view(&ViewConfig::default())
    }
}

/// One easing step toward tile `(player_x, player_y)`.
pub fn update_camera(
    camera: DVec2,
    player_x: i32,
    player_y: i32,
    tile_width: f32,
    tile_height: f32,
    smoothing: f32,
) -> DVec2 {
    let projector = IsoProjector::new(tile_width, tile_height, 0.0, 0.0);
    let target = projector.world_position(WorldCoord::new(player_x, player_y));
    CameraController::new(smoothing).update(camera, target)
}
