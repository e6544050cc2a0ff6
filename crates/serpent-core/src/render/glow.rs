use super::{Composite, Scene, Surface};
use crate::color::Rgba;
use crate::math::clamp01;

/// Soft destination-out disc that dims whatever lies under the head.
pub(super) fn draw_erase<S: Surface>(surface: &mut S, scene: &Scene) {
    let overlay = scene.envelope.overlay_alpha;
    let Some(head) = scene.samples.first() else {
        return;
    };
    if overlay <= 0.02 {
        return;
    }
    let radius = scene.body.radius * (5.0 + 6.0 * scene.envelope.growth_width);
    surface.set_composite(Composite::DestinationOut);
    surface.set_opacity(1.0);
    surface.fill_radial(head.pos, radius, Rgba::new(0.0, 0.0, 0.0, clamp01(0.12 * overlay)));
    surface.set_composite(Composite::SourceOver);
}

/// Additive halo at the head plus a faint disc on every sample.
pub(super) fn draw_glow<S: Surface>(surface: &mut S, scene: &Scene) {
    let visibility = scene.envelope.visibility;
    let Some(head) = scene.samples.first() else {
        return;
    };
    if visibility <= 0.05 {
        return;
    }
    let glow = scene.palette.glow;
    let body_radius = scene.body.radius;

    surface.set_composite(Composite::Lighter);
    surface.set_opacity(1.0);
    let halo = body_radius * (6.0 + 7.0 * scene.envelope.growth_width);
    surface.fill_radial(head.pos, halo, glow.with_alpha(clamp01(0.04 * visibility)));

    surface.set_fill(glow);
    for sample in scene.samples {
        let alpha = 0.015 * visibility * sample.weight;
        if alpha < 0.005 {
            continue;
        }
        surface.set_opacity(alpha);
        surface.fill_circle(sample.pos, body_radius * (0.6 + sample.weight));
    }
    surface.set_opacity(1.0);
    surface.set_composite(Composite::SourceOver);
}
