//! Passive particle field pushed aside by the serpent body and sprung back to rest.

use crate::constants::*;
use crate::math::wrap_angle;
use crate::path::Sample;
use crate::rng::RngExt;
use glam::Vec2;
use rand::rngs::StdRng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Fixed until the next resize rebuilds the field.
    pub rest: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alpha: f32,
    /// Stable per-particle random in [0, 1): density mask and dash bend.
    pub seed: f32,
    /// Smoothed velocity heading for directional styles.
    pub heading: f32,
    /// Derived each step from influence and speed; drives alpha/size boost.
    pub wake: f32,
}

impl Particle {
    /// Whether the particle survives the palette's density mask.
    #[inline]
    pub fn is_visible_at(&self, density: f32) -> bool {
        self.seed <= density
    }
}

/// Gaussian kernel extents of the body around each sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyShape {
    /// Across the body (normal direction).
    pub radius: f32,
    /// Along the body (tangent direction).
    pub length: f32,
}

impl BodyShape {
    pub fn new(min_dim: f32, segment_spacing: f32, grow_ease: f32, growth_width: f32) -> Self {
        Self {
            radius: (min_dim * BODY_RADIUS_FRAC * growth_width).max(1e-3),
            length: (segment_spacing * (0.9 + 1.7 * grow_ease)).max(1e-3),
        }
    }
}

/// Inputs for one physics step.
#[derive(Clone, Copy, Debug)]
pub struct FieldStep<'a> {
    pub samples: &'a [Sample],
    pub body: BodyShape,
    /// Life-cycle visibility: scales push strength and the near-body behavior.
    pub visibility: f32,
    pub density: f32,
    pub track_heading: bool,
    pub dt: f32,
}

/// Push direction and peak kernel weight the body exerts at `pos`.
///
/// Each sample contributes an anisotropic Gaussian, long along the tangent and
/// narrow across it, mixing a radial shove away from the centerline, a forward
/// drag, and a swirl.
pub fn body_push(pos: Vec2, samples: &[Sample], body: BodyShape) -> (Vec2, f32) {
    let two_len2 = 2.0 * body.length * body.length;
    let two_rad2 = 2.0 * body.radius * body.radius;
    let mut push = Vec2::ZERO;
    let mut peak = 0.0f32;
    for sample in samples {
        let rel = pos - sample.pos;
        let normal = sample.tangent.perp();
        let s = rel.dot(sample.tangent);
        let d = rel.dot(normal);
        let weight = (-(s * s) / two_len2).exp() * (-(d * d) / two_rad2).exp() * sample.weight;
        if weight > INFLUENCE_CUTOFF {
            let radial = if d >= 0.0 { normal } else { -normal };
            let swirl = radial.perp();
            push += (radial * RADIAL_PUSH + sample.tangent * FORWARD_PUSH + swirl * SWIRL_PUSH)
                * weight;
            peak = peak.max(weight);
        }
    }
    (push, peak)
}

pub struct ParticleField {
    width: f32,
    height: f32,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(rng: StdRng) -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            particles: Vec::new(),
            rng,
        }
    }

    /// `min(70000, floor(w·h / 50))`
    pub fn count_for(width: f32, height: f32) -> usize {
        ((width.max(0.0) * height.max(0.0) / PARTICLE_AREA_PX).floor() as usize).min(PARTICLE_MAX)
    }

    /// Re-seed every particle at a random rest position inside the new bounds.
    pub fn rebuild(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        let count = Self::count_for(width, height);
        let rng = &mut self.rng;
        let (w, h) = (self.width, self.height);
        self.particles = (0..count)
            .map(|_| {
                let pos = Vec2::new(rng.unit() * w, rng.unit() * h);
                Particle {
                    pos,
                    rest: pos,
                    vel: Vec2::ZERO,
                    radius: rng.span(0.6, 0.7),
                    alpha: rng.span(0.06, 0.1),
                    heading: rng.angle(),
                    seed: rng.unit(),
                    wake: 0.0,
                }
            })
            .collect();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Push, spring back, drag, integrate, and clamp every visible particle.
    pub fn step(&mut self, params: &FieldStep) {
        let dt = params.dt;
        let strength = PUSH_STRENGTH * params.visibility;
        let drag_frames = dt * 60.0;
        let heading_ease = (dt * HEADING_EASE_PER_SEC).clamp(0.0, 1.0);
        let (w, h) = (self.width, self.height);

        for p in self.particles.iter_mut() {
            if !p.is_visible_at(params.density) {
                continue;
            }
            let (push, influence) = if params.samples.is_empty() {
                (Vec2::ZERO, 0.0)
            } else {
                body_push(p.pos, params.samples, params.body)
            };
            if influence > 0.00001 {
                p.vel += push * strength * dt;
            }

            // Agitated particles are let loose; calm ones spring home at full strength.
            let visible_influence = influence * params.visibility;
            let away = 1.0 - (visible_influence * 5.0).min(1.0);
            let return_mix = RETURN_BASE + away * (1.0 - RETURN_BASE);
            p.vel += (p.rest - p.pos) * RETURN_STRENGTH * return_mix * dt;

            let drag = DRAG_FAR + (DRAG_NEAR - DRAG_FAR) * (visible_influence * 6.0).min(1.0);
            p.vel *= drag.powf(drag_frames);
            p.pos += p.vel * dt;

            if p.pos.x < 0.0 {
                p.pos.x = 0.0;
                p.vel.x = 0.0;
            } else if p.pos.x > w {
                p.pos.x = w;
                p.vel.x = 0.0;
            }
            if p.pos.y < 0.0 {
                p.pos.y = 0.0;
                p.vel.y = 0.0;
            } else if p.pos.y > h {
                p.pos.y = h;
                p.vel.y = 0.0;
            }

            let speed = p.vel.length();
            p.wake = (visible_influence * 2.2 + speed * WAKE_SPEED_SCALE).min(1.0);
            if params.track_heading && speed > 0.01 {
                let target = p.vel.y.atan2(p.vel.x);
                let delta = wrap_angle(target - p.heading);
                p.heading = wrap_angle(p.heading + delta * heading_ease);
            }
        }
    }
}
