use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Wrap an angle into (-π, π]. Non-finite input collapses to 0.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Clamp into [0, 1]; NaN maps to 0.
#[inline]
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Unit vector for a heading.
#[inline]
pub fn heading_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// `1` or `-1` following the sign of `value`, or `fallback` when it is exactly zero.
#[inline]
pub fn sign_or(value: f32, fallback: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        fallback
    }
}

/// Minimum distance from `p` to `points[start..limit]`, visiting every `stride`-th point.
/// Returns `f32::INFINITY` when the range is empty.
pub fn min_distance(p: Vec2, points: &[Vec2], start: usize, stride: usize, limit: usize) -> f32 {
    let end = limit.min(points.len());
    if start >= end {
        return f32::INFINITY;
    }
    points[start..end]
        .iter()
        .step_by(stride.max(1))
        .map(|q| p.distance(*q))
        .fold(f32::INFINITY, f32::min)
}
