use glam::Vec2;
use tilescape_assets::SpriteId;

/// Axis-aligned screen rectangle, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Straight (non-premultiplied) colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Linear blend, `t = 0` gives `self`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Two-stop radial fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub inner: Rgba,
    pub outer: Rgba,
}

impl RadialGradient {
    /// Colour at `distance` from the centre. Flat inside `inner_radius` and
    /// beyond `outer_radius`.
    pub fn color_at(&self, distance: f32) -> Rgba {
        let span = self.outer_radius - self.inner_radius;
        if span <= 0.0 {
            return if distance < self.outer_radius { self.inner } else { self.outer };
        }
        self.inner.lerp(self.outer, (distance - self.inner_radius) / span)
    }
}

/// A drawing target. The compositor issues every draw through this trait.
pub trait DrawSurface {
    fn clear(&mut self, area: Rect);

    /// Draw `sprite` stretched to `rect` with opacity `alpha`.
    fn draw_image(&mut self, sprite: SpriteId, rect: Rect, alpha: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn fill_radial_gradient(&mut self, area: Rect, gradient: RadialGradient);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Image { sprite: SpriteId, rect: Rect, alpha: f32 },
    Circle { center: Vec2, radius: f32, color: Rgba },
    RadialGradient { area: Rect, gradient: RadialGradient },
}

/// Surface that records commands instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Sprites drawn so far, in draw order.
    pub fn sprites(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { sprite, .. } => Some(*sprite),
            _ => None,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, area: Rect) {
        self.commands.push(DrawCommand::Clear(area));
    }

    fn draw_image(&mut self, sprite: SpriteId, rect: Rect, alpha: f32) {
        self.commands.push(DrawCommand::Image { sprite, rect, alpha });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn fill_radial_gradient(&mut self, area: Rect, gradient: RadialGradient) {
        self.commands.push(DrawCommand::RadialGradient { area, gradient });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_blends_between_radii() {
        let g = RadialGradient {
            center: Vec2::ZERO,
            inner_radius: 100.0,
            outer_radius: 200.0,
            inner: Rgba::TRANSPARENT,
            outer: Rgba::new(0.0, 0.0, 0.0, 0.5),
        };
        assert_eq!(g.color_at(50.0), Rgba::TRANSPARENT);
        assert!((g.color_at(150.0).a - 0.25).abs() < 1e-6);
        assert_eq!(g.color_at(400.0).a, 0.5);
    }

    #[test]
    fn rgba8_quantises() {
        assert_eq!(Rgba::RED.to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Rgba::new(0.0, 0.0, 0.0, 0.5).to_rgba8(), [0, 0, 0, 128]);
    }

    #[test]
    fn recording_surface_keeps_order() {
        let mut s = RecordingSurface::new();
        s.clear(Rect::new(0.0, 0.0, 10.0, 10.0));
        s.draw_image(SpriteId::Grass, Rect::new(1.0, 2.0, 3.0, 4.0), 1.0);
        s.draw_image(SpriteId::Tree, Rect::default(), 0.5);
        assert_eq!(s.commands().len(), 3);
        assert_eq!(s.sprites().collect::<Vec<_>>(), vec![SpriteId::Grass, SpriteId::Tree]);
    }
}
