use glam::DVec2;
use serde::{Deserialize, Serialize};
use tilescape_common::{Direction, WorldCoord};

/// Mutable state of a play session.
///
/// The world itself is regenerated from coordinates every frame, so the
/// session only tracks where the player stands, where the camera currently
/// is, and how many frames have been drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    player: WorldCoord,
    /// Camera offset in isometric world pixels. Only eased toward a target,
    /// never set directly. Kept in `f64` so distant tiles stay pixel exact.
    camera: DVec2,
    frame: u64,
}

impl Session {
    /// Start with the player and camera at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the player at `spawn`. The camera still starts at the
    /// origin and glides toward the player over the first frames.
    pub fn with_spawn(spawn: WorldCoord) -> Self {
        Self {
            player: spawn,
            ..Default::default()
        }
    }

    pub fn player(&self) -> WorldCoord {
        self.player
    }

    pub fn camera(&self) -> DVec2 {
        self.camera
    }

    /// Number of frames completed.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Step the player one tile. Returns the new position.
    pub fn move_player(&mut self, direction: Direction) -> WorldCoord {
        let from = self.player;
        self.player = from.step(direction);
        tracing::debug!(%from, to = %self.player, ?direction, "player moved");
        self.player
    }

    /// Move the camera `smoothing` of the way toward `target`, per axis.
    /// Returns the new offset.
    pub fn ease_camera(&mut self, target: DVec2, smoothing: f64) -> DVec2 {
        self.camera += (target - self.camera) * smoothing;
        self.camera
    }

    pub fn advance_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_starts_at_origin() {
        let s = Session::new();
        assert_eq!(s.player(), WorldCoord::ORIGIN);
        assert_eq!(s.camera(), DVec2::ZERO);
        assert_eq!(s.frame(), 0);
    }

    #[test]
    fn move_player_steps_one_tile() {
        let mut s = Session::with_spawn(WorldCoord::new(3, 3));
        assert_eq!(s.move_player(Direction::North), WorldCoord::new(3, 4));
        assert_eq!(s.move_player(Direction::West), WorldCoord::new(2, 4));
        assert_eq!(s.player(), WorldCoord::new(2, 4));
    }

    #[test]
    fn moving_does_not_touch_camera() {
        let mut s = Session::new();
        s.move_player(Direction::East);
        assert_eq!(s.camera(), DVec2::ZERO);
    }

    #[test]
    fn camera_eases_toward_target() {
        let mut s = Session::new();
        let next = s.ease_camera(DVec2::new(1000.0, 500.0), 0.1);
        assert_eq!(next, DVec2::new(100.0, 50.0));
        assert_eq!(s.camera(), next);
        s.ease_camera(DVec2::new(1000.0, 500.0), 1.0);
        assert_eq!(s.camera(), DVec2::new(1000.0, 500.0));
    }

    #[test]
    fn frames_count_up() {
        let mut s = Session::new();
        s.advance_frame();
        s.advance_frame();
        assert_eq!(s.advance_frame(), 3);
    }
}
