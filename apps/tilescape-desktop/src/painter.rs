use std::collections::BTreeMap;
use std::f32::consts::TAU;

use egui::{Color32, Mesh, Painter, Pos2, Shape, TextureHandle, pos2};
use glam::Vec2;
use tilescape_assets::SpriteId;
use tilescape_render::{DrawSurface, RadialGradient, Rect, Rgba};

const GRADIENT_SEGMENTS: usize = 64;
const GRADIENT_RINGS: usize = 8;

/// Draws compositor output with an egui painter. Coordinates are in points.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    textures: &'a BTreeMap<SpriteId, TextureHandle>,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, textures: &'a BTreeMap<SpriteId, TextureHandle>) -> Self {
        Self { painter, textures }
    }
}

fn to_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(pos2(rect.x, rect.y), egui::vec2(rect.width, rect.height))
}

fn to_pos(v: Vec2) -> Pos2 {
    pos2(v.x, v.y)
}

fn to_color(c: Rgba) -> Color32 {
    let [r, g, b, a] = c.to_rgba8();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn ring_point(center: Pos2, radius: f32, segment: usize) -> Pos2 {
    let angle = segment as f32 / GRADIENT_SEGMENTS as f32 * TAU;
    center + egui::vec2(angle.cos(), angle.sin()) * radius
}

impl DrawSurface for PainterSurface<'_> {
    fn clear(&mut self, area: Rect) {
        self.painter.rect_filled(to_rect(area), 0.0, Color32::BLACK);
    }

    fn draw_image(&mut self, sprite: SpriteId, rect: Rect, alpha: f32) {
        let Some(texture) = self.textures.get(&sprite) else {
            return;
        };
        let uv = egui::Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        let tint = Color32::from_white_alpha((alpha.clamp(0.0, 1.0) * 255.0).round() as u8);
        self.painter.image(texture.id(), to_rect(rect), uv, tint);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.painter
            .circle_filled(to_pos(center), radius, to_color(color));
    }

    /// Concentric rings with per-vertex colours, then a flat band out to the
    /// farthest corner of `area`.
    fn fill_radial_gradient(&mut self, area: Rect, gradient: RadialGradient) {
        let center = to_pos(gradient.center);
        let area = to_rect(area);
        let far = area
            .min
            .distance(center)
            .max(area.max.distance(center))
            .max(pos2(area.min.x, area.max.y).distance(center))
            .max(pos2(area.max.x, area.min.y).distance(center))
            .max(gradient.outer_radius);

        let span = gradient.outer_radius - gradient.inner_radius;
        let mut radii: Vec<f32> = (0..=GRADIENT_RINGS)
            .map(|i| gradient.inner_radius + span * i as f32 / GRADIENT_RINGS as f32)
            .collect();
        radii.push(far);

        if gradient.inner.a > 0.0 {
            self.painter
                .circle_filled(center, gradient.inner_radius, to_color(gradient.inner));
        }

        let mut mesh = Mesh::default();
        for band in radii.windows(2) {
            let (r0, r1) = (band[0], band[1]);
            let (c0, c1) = (
                to_color(gradient.color_at(r0)),
                to_color(gradient.color_at(r1)),
            );
            for seg in 0..GRADIENT_SEGMENTS {
                let base = mesh.vertices.len() as u32;
                mesh.colored_vertex(ring_point(center, r0, seg), c0);
                mesh.colored_vertex(ring_point(center, r0, seg + 1), c0);
                mesh.colored_vertex(ring_point(center, r1, seg), c1);
                mesh.colored_vertex(ring_point(center, r1, seg + 1), c1);
                mesh.add_triangle(base, base + 1, base + 2);
                mesh.add_triangle(base + 1, base + 3, base + 2);
            }
        }
        self.painter.add(Shape::mesh(mesh));
    }
}
