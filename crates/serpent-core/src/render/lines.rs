use super::{Scene, Surface};
use crate::contour::ContourSet;
use crate::ripple::RippleSet;

pub(super) fn draw_contours<S: Surface>(
    surface: &mut S,
    scene: &Scene,
    contours: &mut ContourSet,
    mix: f32,
) {
    let min = scene.min_dim();
    let base = 0.22 * scene.dot_alpha_scale() * mix;
    surface.set_stroke(scene.palette.dot);
    surface.set_line_width((min * 0.001).max(0.5) * scene.palette.dot_radius_scale);

    let alphas: Vec<f32> = contours
        .lines()
        .iter()
        .map(|line| ContourSet::line_alpha(line, base))
        .collect();
    let polylines = contours.trace(
        scene.width,
        scene.height,
        scene.now,
        scene.samples,
        scene.envelope.visibility,
    );
    for (points, alpha) in polylines.iter().zip(alphas) {
        if points.len() < 2 {
            continue;
        }
        surface.set_opacity(alpha);
        surface.stroke_polyline(points);
    }
}

pub(super) fn draw_ripples<S: Surface>(
    surface: &mut S,
    scene: &Scene,
    ripples: &mut RippleSet,
    mix: f32,
) {
    let min = scene.min_dim();
    let base = 0.18 * scene.dot_alpha_scale() * mix;
    surface.set_stroke(scene.palette.dot);
    surface.set_line_width((min * 0.0011).max(0.55) * scene.palette.dot_radius_scale);

    for index in 0..ripples.lines().len() {
        let alpha = base * ripples.lines()[index].shade;
        surface.set_opacity(alpha);
        let points = ripples.trace(index, scene.width, scene.now);
        surface.stroke_polyline(points);
    }
}
