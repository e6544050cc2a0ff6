use super::{Scene, Surface};
use crate::field::Particle;
use crate::math::heading_vec;
use crate::palette::DotStyle;
use glam::Vec2;

const MIN_DRAW_ALPHA: f32 = 0.001;

/// Draw every density-visible particle in one of the particle styles.
pub(super) fn draw<S: Surface>(surface: &mut S, scene: &Scene, style: DotStyle, mix: f32) {
    let dot_alpha = scene.dot_alpha_scale();
    let wake_alpha = scene.wake_alpha_scale();
    let radius_scale = scene.palette.dot_radius_scale;
    let t = scene.now as f32;

    match style {
        DotStyle::Dash => surface.set_stroke(scene.palette.dot),
        _ => surface.set_fill(scene.palette.dot),
    }

    for p in scene.particles {
        if !p.is_visible_at(scene.density) {
            continue;
        }
        let base = (p.alpha * dot_alpha + p.wake * 0.45 * wake_alpha).min(1.0);
        let alpha = base * mix;
        if alpha <= MIN_DRAW_ALPHA {
            continue;
        }
        surface.set_opacity(alpha);
        match style {
            DotStyle::Dash => dash(surface, p, alpha, radius_scale, t),
            DotStyle::Cloud => cloud(surface, p, alpha, radius_scale),
            _ => {
                let r = p.radius * (1.0 + p.wake * 0.25) * radius_scale;
                surface.fill_circle(p.pos, r);
            }
        }
    }
}

/// A bent stroke along the heading plus a fainter, shorter tail stroke.
fn dash<S: Surface>(surface: &mut S, p: &Particle, alpha: f32, radius_scale: f32, t: f32) {
    let length = p.radius * (6.6 + p.wake * 2.4) * radius_scale;
    let dir = heading_vec(p.heading);
    let normal = dir.perp();
    let wobble = (t * 0.6 + p.seed * 7.2).sin() * 0.2;
    let bend = length * 0.18 * ((p.seed - 0.5) * 0.7 + wobble);
    let half = dir * (length * 0.5);
    let line_width = (p.radius * 0.85).max(0.6) * radius_scale;

    surface.set_line_width(line_width);
    surface.stroke_quadratic(p.pos - half, p.pos + normal * bend, p.pos + half);

    let tail_center = p.pos - dir * (length * 0.2);
    let tail_half = dir * (length * 0.22);
    surface.set_opacity(alpha * 0.45);
    surface.set_line_width(line_width * 0.7);
    surface.stroke_quadratic(
        tail_center - tail_half,
        tail_center + normal * (bend * 0.6),
        tail_center + tail_half,
    );
}

/// Three overlapping circles strung along the heading.
fn cloud<S: Surface>(surface: &mut S, p: &Particle, alpha: f32, radius_scale: f32) {
    let radius = p.radius * (1.6 + p.wake * 0.5) * radius_scale;
    let offset: Vec2 = heading_vec(p.heading) * (radius * 0.9);

    surface.set_opacity(alpha * 0.85);
    surface.fill_circle(p.pos, radius * 1.05);
    surface.set_opacity(alpha * 0.7);
    surface.fill_circle(p.pos + offset * 0.7, radius * 0.85);
    surface.fill_circle(p.pos - offset * 0.6, radius * 0.75);
}
