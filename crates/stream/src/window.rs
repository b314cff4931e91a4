use tilescape_common::WorldCoord;

/// Square window of tiles centred on a coordinate.
///
/// Covers `[cx - r, cx + r] x [cy - r, cy + r]`. Despite the "radius" name
/// it is not circular.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    center: WorldCoord,
    radius: i32,
}

impl VisibleWindow {
    /// Negative radii are treated as zero.
    pub fn new(center: WorldCoord, radius: i32) -> Self {
        Self {
            center,
            radius: radius.max(0),
        }
    }

    pub fn center(&self) -> WorldCoord {
        self.center
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Lowest corner (minimum x and y).
    pub fn min(&self) -> WorldCoord {
        WorldCoord::new(
            self.center.x.saturating_sub(self.radius),
            self.center.y.saturating_sub(self.radius),
        )
    }

    /// Highest corner (maximum x and y).
    pub fn max(&self) -> WorldCoord {
        WorldCoord::new(
            self.center.x.saturating_add(self.radius),
            self.center.y.saturating_add(self.radius),
        )
    }

    pub fn contains(&self, coord: WorldCoord) -> bool {
        let (lo, hi) = (self.min(), self.max());
        (lo.x..=hi.x).contains(&coord.x) && (lo.y..=hi.y).contains(&coord.y)
    }

    /// Side length in tiles.
    pub fn side(&self) -> usize {
        (self.max().x as i64 - self.min().x as i64 + 1) as usize
    }

    pub fn len(&self) -> usize {
        self.side() * self.side()
    }

    /// Always false; a window holds at least its centre.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every coordinate in raster order: rows of increasing `y`, each row
    /// left to right by `x`.
    pub fn coords(&self) -> impl Iterator<Item = WorldCoord> + use<> {
        let (lo, hi) = (self.min(), self.max());
        (lo.y..=hi.y).flat_map(move |y| (lo.x..=hi.x).map(move |x| WorldCoord::new(x, y)))
    }
}
