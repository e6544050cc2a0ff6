use super::{Scene, Surface};
use crate::color::WHITE;
use crate::constants::{STAR_ALPHA_CUTOFF, STAR_STRENGTH};
use crate::tween::Lerp;
use glam::Vec2;

pub(super) fn draw<S: Surface>(surface: &mut S, scene: &Scene) {
    let strength = scene.star_alpha * STAR_STRENGTH;
    if strength <= STAR_ALPHA_CUTOFF || scene.starfield.is_empty() {
        return;
    }
    let t = scene.now as f32;
    surface.set_fill(scene.palette.dot.lerp(&WHITE, 0.5));

    for star in scene.starfield.stars() {
        let (y, fade) = match &scene.warp {
            Some(warp) => match warp.place(star.pos.y) {
                Some(y) => (y, warp.fade_alpha(y)),
                None => continue,
            },
            None => (star.pos.y, 1.0),
        };
        let alpha = star.alpha * star.twinkle(t) * strength * fade;
        if alpha < STAR_ALPHA_CUTOFF {
            continue;
        }
        surface.set_opacity(alpha);
        surface.fill_circle(Vec2::new(star.pos.x, y), star.radius);
    }
    surface.set_opacity(1.0);
}
