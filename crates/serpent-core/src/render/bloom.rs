use super::{Scene, Surface};
use glam::Vec2;

/// Anchor, radius and phase of one drifting blob, relative to the canvas.
struct Blob {
    anchor: Vec2,
    radius: f32,
    phase: f32,
}

const BLOBS: [Blob; 3] = [
    Blob { anchor: Vec2::new(0.2, 0.25), radius: 0.35, phase: 0.0 },
    Blob { anchor: Vec2::new(0.7, 0.35), radius: 0.42, phase: 1.4 },
    Blob { anchor: Vec2::new(0.5, 0.7), radius: 0.5, phase: 2.6 },
];

pub(super) fn draw<S: Surface>(surface: &mut S, scene: &Scene, mix: f32) {
    let min = scene.min_dim();
    let drift = Vec2::new(min * 0.08, min * 0.05);
    let size = Vec2::new(scene.width, scene.height);
    let t = scene.now as f32;

    surface.set_opacity(0.45 * scene.dot_alpha_scale() * mix);
    let inner = scene.palette.dot.with_alpha(0.55);
    for blob in &BLOBS {
        let wander = Vec2::new((t * 0.08 + blob.phase).sin(), (t * 0.07 + blob.phase).cos());
        let center = blob.anchor * size + wander * drift;
        let radius = blob.radius * min * (0.85 + 0.08 * (t * 0.09 + blob.phase).sin());
        surface.fill_radial(center, radius, inner);
    }
}
