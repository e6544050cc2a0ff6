//! Path planner: steers the serpent head and drags the body chain behind it.
//!
//! The head wanders along a sinusoidal target heading, is pulled toward the
//! canvas center near edges, and is pushed away from its own body and from a
//! coarser trail of older head positions. Each frame the planner emits a
//! short list of [`Sample`]s, the only thing the field and renderer read.

use crate::constants::*;
use crate::lifecycle::{Envelope, LifeCycle};
use crate::math::{heading_vec, min_distance, sign_or, wrap_angle};
use crate::rng::RngExt;
use crate::tween::smoothstep;
use glam::Vec2;
use rand::rngs::StdRng;
use smallvec::SmallVec;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// A point on the body with its direction of travel and taper weight (1 at the head).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub pos: Vec2,
    pub tangent: Vec2,
    pub weight: f32,
}

pub type Samples = SmallVec<[Sample; 16]>;

/// Size-dependent path parameters; everything scales with `min(width, height)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathGeometry {
    pub width: f32,
    pub height: f32,
    pub min_dim: f32,
    pub segment_count: usize,
    pub segment_spacing: f32,
    pub sample_stride: usize,
    pub path_spacing: f32,
    pub max_path_points: usize,
}

impl PathGeometry {
    pub fn for_canvas(width: f32, height: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let min_dim = width.min(height);
        let segment_count = ((min_dim * SEGMENTS_PER_PX).round() as usize)
            .clamp(SEGMENT_COUNT_MIN, SEGMENT_COUNT_MAX);
        let segment_spacing = SEGMENT_SPACING_MIN.max(min_dim * SEGMENT_SPACING_FRAC);
        let sample_stride = ((segment_count as f32 / SAMPLES_PER_BODY).round() as usize).max(1);
        let path_spacing = TRAIL_SPACING_MIN.max(segment_spacing * TRAIL_SPACING_FRAC);
        let max_path_points = ((min_dim / path_spacing) * TRAIL_LENGTH_FACTOR).round() as usize;
        Self {
            width,
            height,
            min_dim,
            segment_count,
            segment_spacing,
            sample_stride,
            path_spacing,
            max_path_points,
        }
    }

    pub fn speed(&self) -> f32 {
        self.min_dim * HEAD_SPEED_FRAC
    }

    pub fn edge_pad(&self) -> f32 {
        self.min_dim * EDGE_PAD_FRAC
    }

    /// Distance from each edge at which the head is reflected.
    pub fn bounce_pad(&self) -> f32 {
        self.edge_pad() * BOUNCE_PAD_FRAC
    }

    pub fn self_avoid_radius(&self) -> f32 {
        self.segment_spacing * SELF_AVOID_SEGMENTS
    }

    pub fn trail_avoid_radius(&self) -> f32 {
        self.self_avoid_radius() * TRAIL_AVOID_SCALE
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Sinusoidal wander target plus the timing of the current curve.
#[derive(Clone, Copy, Debug, Default)]
struct Wander {
    base_angle: f32,
    amplitude: f32,
    speed: f32,
    phase: f32,
    direction: f32,
    started: f64,
    duration: f32,
}

/// Which part of the trail the head should be repelled by.
#[derive(Clone, Copy, Debug)]
struct TrailWindow {
    limit: usize,
    stride: usize,
}

pub struct PathPlanner {
    geometry: PathGeometry,
    rng: StdRng,
    head: Vec2,
    heading: f32,
    turn_velocity: f32,
    wander: Wander,
    segments: Vec<Vec2>,
    trail: Vec<Vec2>,
    life: LifeCycle,
    envelope: Envelope,
    needs_spawn: bool,
    last_spawn: Option<Vec2>,
    samples: Samples,
}

impl PathPlanner {
    pub fn new(rng: StdRng) -> Self {
        Self {
            geometry: PathGeometry::for_canvas(1.0, 1.0),
            rng,
            head: Vec2::ZERO,
            heading: 0.0,
            turn_velocity: 0.0,
            wander: Wander::default(),
            segments: Vec::new(),
            trail: Vec::new(),
            life: LifeCycle {
                start: 0.0,
                life_duration: LIFE_MIN_SEC,
                respawn_delay: RESPAWN_MIN_SEC,
            },
            envelope: Envelope::DORMANT,
            needs_spawn: true,
            last_spawn: None,
            samples: Samples::new(),
        }
    }

    /// Drop all size-dependent state; the next step spawns a fresh run.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.geometry = PathGeometry::for_canvas(width, height);
        self.segments.clear();
        self.trail.clear();
        self.samples.clear();
        self.last_spawn = None;
        self.envelope = Envelope::DORMANT;
        self.needs_spawn = true;
    }

    pub fn geometry(&self) -> &PathGeometry {
        &self.geometry
    }

    pub fn head(&self) -> Vec2 {
        self.head
    }

    /// Heading in (-π, π].
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn segments(&self) -> &[Vec2] {
        &self.segments
    }

    pub fn trail(&self) -> &[Vec2] {
        &self.trail
    }

    pub fn life(&self) -> &LifeCycle {
        &self.life
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn active_segments(&self) -> usize {
        self.envelope.active_segments(self.geometry.segment_count)
    }

    /// Advance one frame. Spawns when needed and leaves `samples` empty while dormant.
    pub fn step(&mut self, now: f64, dt: f32) {
        if self.needs_spawn || self.life.is_over(now) {
            self.spawn(now);
        }
        self.envelope = self.life.envelope(now);
        self.samples.clear();
        if self.envelope.is_dormant() {
            return;
        }
        let active = self.active_segments();
        let window = self.trail_window();

        if now - self.wander.started >= self.wander.duration as f64 {
            self.plan_curve(now, active, window);
        }
        self.steer(now, dt, active, window);
        self.advance(now, dt);
        self.record_trail();
        if self.segments.is_empty() {
            self.segments = self.seed_segments();
        }
        relax_chain(
            &mut self.segments,
            self.head,
            self.heading,
            self.geometry.segment_spacing,
        );
        self.emit_samples(active);
    }

    fn spawn(&mut self, now: f64) {
        let g = self.geometry;
        let pad = Vec2::new(g.width, g.height) * SPAWN_INSET_FRAC;

        // Rejection-sample away from the last spawn and the previous run's body;
        // after the last attempt the candidate is taken as is.
        let mut candidate = self.spawn_candidate(pad);
        for _ in 1..SPAWN_ATTEMPTS {
            if spawn_is_clear(candidate, self.last_spawn, &self.segments, &self.trail, &g) {
                break;
            }
            candidate = self.spawn_candidate(pad);
        }

        self.head = candidate;
        self.last_spawn = Some(candidate);
        self.heading = wrap_angle(
            inward_heading(candidate, g.width, g.height)
                + self.rng.signed() * SPAWN_HEADING_JITTER,
        );
        self.turn_velocity = 0.0;
        let raw = self.rng.signed() * MAX_TURN;
        let delta = self.enforce_min_turn(raw, MAX_TURN * SPAWN_MIN_TURN_FRAC);
        let duration = self.random_turn_duration();
        self.start_curve(now, delta, duration);
        self.segments = self.seed_segments();
        self.trail.clear();
        self.trail.push(self.head);
        self.life = LifeCycle::random(now, &mut self.rng);
        self.needs_spawn = false;
        log::debug!(
            "[path] spawn at ({:.1}, {:.1}) heading {:.2} life {:.2}s respawn {:.2}s",
            self.head.x,
            self.head.y,
            self.heading,
            self.life.life_duration,
            self.life.respawn_delay
        );
    }

    fn spawn_candidate(&mut self, pad: Vec2) -> Vec2 {
        let g = self.geometry;
        Vec2::new(
            pad.x + self.rng.unit() * (g.width - pad.x * 2.0).max(1.0),
            pad.y + self.rng.unit() * (g.height - pad.y * 2.0).max(1.0),
        )
    }

    /// Body laid out backward from the head along a gentle arc.
    fn seed_segments(&self) -> Vec<Vec2> {
        let spacing = self.geometry.segment_spacing;
        let curve = sign_or(self.wander.direction, 1.0) * MAX_TURN * 0.04;
        let mut angle = wrap_angle(self.heading + PI);
        let mut pos = self.head;
        let mut seeded = Vec::with_capacity(self.geometry.segment_count);
        seeded.push(pos);
        for _ in 1..self.geometry.segment_count {
            angle = wrap_angle(angle + curve);
            pos += heading_vec(angle) * spacing;
            seeded.push(pos);
        }
        seeded
    }

    fn trail_window(&self) -> TrailWindow {
        let g = &self.geometry;
        let tail_length = g.segment_count as f32 * g.segment_spacing;
        let ignore =
            TRAIL_IGNORE_MIN.max((tail_length / g.path_spacing.max(1.0)).round() as usize);
        let limit = self.trail.len().saturating_sub(ignore);
        let stride = ((limit as f32 / TRAIL_SCAN_POINTS).round() as usize).max(1);
        TrailWindow { limit, stride }
    }

    fn avoid_start(active: usize) -> usize {
        AVOID_SKIP_SEGMENTS.min(active.saturating_sub(1))
    }

    /// Grown body past the neck, the part the head steers clear of.
    fn body_window(&self, active: usize) -> &[Vec2] {
        let end = active.min(self.segments.len());
        let start = Self::avoid_start(active).min(end);
        &self.segments[start..end]
    }

    /// Choose the next curve: a biased random turn, then the safest of a few
    /// lookahead candidates. Ties keep the earliest candidate.
    fn plan_curve(&mut self, now: f64, active: usize, window: TrailWindow) {
        let g = self.geometry;
        let r = self.rng.signed();
        let magnitude = 0.35 + 0.65 * r.abs().powf(1.2);
        let mut candidate = wrap_angle(self.heading + sign_or(r, 1.0) * magnitude * MAX_TURN);

        let avoid_start = Self::avoid_start(active);
        if self.segments.len() > avoid_start {
            let mut angles = [candidate; CANDIDATE_HEADINGS];
            for angle in angles.iter_mut().skip(1) {
                *angle = wrap_angle(self.heading + self.rng.signed() * MAX_TURN);
            }
            let body = self.body_window(active);
            let trail = &self.trail[..window.limit];
            let lookahead = g.segment_spacing * LOOKAHEAD_SEGMENTS;
            let stride = g.sample_stride.max(1);
            let mut best_score = f32::NEG_INFINITY;
            for angle in angles {
                let ahead = self.head + heading_vec(angle) * lookahead;
                let score = lookahead_score(ahead, &g, body, stride, trail, window.stride);
                if score > best_score {
                    best_score = score;
                    candidate = angle;
                }
            }
        }

        let delta = wrap_angle(candidate - self.heading);
        let enforced = self.enforce_min_turn(delta, MAX_TURN * MIN_TURN_FRAC);
        let duration = self.random_turn_duration();
        self.start_curve(now, enforced, duration);
    }

    fn steer(&mut self, now: f64, dt: f32, active: usize, window: TrailWindow) {
        let g = self.geometry;
        let edge_pad = g.edge_pad();
        let edge_distance = (self.head.x - edge_pad)
            .min(g.width - edge_pad - self.head.x)
            .min(self.head.y - edge_pad)
            .min(g.height - edge_pad - self.head.y);
        let edge_influence = (1.0 - edge_distance / edge_pad).clamp(0.0, 1.0);
        let to_center_vec = g.center() - self.head;
        let center_angle = to_center_vec.y.atan2(to_center_vec.x);

        self.wander.phase += self.wander.speed * dt;
        if self.wander.phase > TAU {
            self.wander.phase -= TAU;
        }
        let wave = self.wander.phase.sin() * self.wander.amplitude * self.wander.direction;
        let desired = wrap_angle(self.wander.base_angle + wave);
        let to_target = wrap_angle(desired - self.heading);
        let to_center = wrap_angle(center_angle - self.heading);
        let mut steer =
            (to_target * (1.0 - edge_influence) + to_center * edge_influence * 0.5) * STEER_WEIGHT;

        let avoid = avoidance(
            self.head,
            self.heading,
            &g,
            self.body_window(active),
            &self.trail[..window.limit],
            window.stride,
        );
        if let Some(to_avoid) = avoid.turn.filter(|_| avoid.pressure > 0.001) {
            let blend = (avoid.pressure * 1.1).clamp(0.0, AVOID_BLEND_MAX);
            steer = steer * (1.0 - blend) + to_avoid * blend;
            if avoid.critical {
                let duration = (self.random_turn_duration() * 0.6).max(0.2);
                self.start_curve(now, to_avoid, duration);
                steer = to_avoid;
            }
        }

        let limit = MAX_TURN_RATE * dt * (1.0 + avoid.pressure * AVOID_PRESSURE_GAIN);
        let target_step = steer.clamp(-limit, limit);
        let ease = (dt * TURN_EASE_PER_SEC).clamp(0.0, 1.0);
        self.turn_velocity += (target_step - self.turn_velocity) * ease;
        let min_step = MIN_TURN_RATE * dt;
        if self.turn_velocity.abs() < min_step {
            let forced = if self.wander.direction == 0.0 {
                sign_or(self.turn_velocity, 1.0)
            } else {
                self.wander.direction
            };
            self.turn_velocity = forced * min_step;
        }
        self.heading = wrap_angle(self.heading + self.turn_velocity);
    }

    /// Move the head and reflect it off the bounce margin.
    fn advance(&mut self, now: f64, dt: f32) {
        let g = self.geometry;
        self.head += heading_vec(self.heading) * g.speed() * dt;

        let pad = g.bounce_pad();
        let mut bounced = false;
        if self.head.x < pad {
            self.head.x = pad;
            self.heading = PI - self.heading;
            bounced = true;
        } else if self.head.x > g.width - pad {
            self.head.x = g.width - pad;
            self.heading = PI - self.heading;
            bounced = true;
        }
        if self.head.y < pad {
            self.head.y = pad;
            self.heading = -self.heading;
            bounced = true;
        } else if self.head.y > g.height - pad {
            self.head.y = g.height - pad;
            self.heading = -self.heading;
            bounced = true;
        }
        self.heading = wrap_angle(self.heading);
        if bounced {
            let raw = self.rng.signed() * MAX_TURN;
            let delta = self.enforce_min_turn(raw, MAX_TURN * MIN_TURN_FRAC);
            let duration = self.random_turn_duration();
            self.start_curve(now, delta, duration);
        }
    }

    fn record_trail(&mut self) {
        let g = &self.geometry;
        push_trail(&mut self.trail, self.head, g.path_spacing, g.max_path_points);
    }

    fn emit_samples(&mut self, active: usize) {
        let count = active.min(self.segments.len());
        let last = self.segments.len().saturating_sub(1).max(1) as f32;
        let forward = heading_vec(self.heading);
        for i in (0..count).step_by(self.geometry.sample_stride.max(1)) {
            let seg = self.segments[i];
            let tangent = if i == 0 {
                forward
            } else {
                (self.segments[i - 1] - seg).try_normalize().unwrap_or(forward)
            };
            let taper = smoothstep(1.0 - i as f32 / last);
            self.samples.push(Sample {
                pos: seg,
                tangent,
                weight: (0.25 + 0.75 * taper).clamp(0.0, 1.0),
            });
        }
    }

    /// Begin a new curve of roughly `delta` radians, re-aiming the wander target
    /// toward the nearest horizontal direction.
    fn start_curve(&mut self, now: f64, delta: f32, duration: f32) {
        let sign = if delta == 0.0 {
            self.rng.coin_sign()
        } else {
            delta.signum()
        };
        let target = wrap_angle(self.heading + delta);
        let horizontal = if wrap_angle(-self.heading).abs() < wrap_angle(PI - self.heading).abs() {
            0.0
        } else {
            PI
        };
        let toward = wrap_angle(self.heading + wrap_angle(target - self.heading) * 0.5);
        let base = wrap_angle(toward + wrap_angle(horizontal - toward) * HORIZONTAL_BIAS);
        let mut phase = self.pick_wave_phase();
        if sign_or(phase.sin(), 0.0) != sign {
            phase += PI;
        }
        self.wander = Wander {
            base_angle: wrap_angle(base + self.rng.signed() * 0.2),
            amplitude: MAX_TURN * self.rng.span(0.6, 0.25),
            speed: TAU * self.rng.span(0.3, 0.35),
            phase,
            direction: sign,
            started: now,
            duration,
        };
    }

    /// Phase away from the flat spots of sine and cosine so curves start decisively.
    fn pick_wave_phase(&mut self) -> f32 {
        let mut phase = self.rng.angle();
        for _ in 0..6 {
            if phase.sin().abs() >= 0.35 && phase.cos().abs() >= 0.25 {
                break;
            }
            phase = self.rng.angle();
        }
        phase
    }

    fn enforce_min_turn(&mut self, delta: f32, min: f32) -> f32 {
        if delta.abs() >= min {
            return delta;
        }
        let sign = if delta == 0.0 {
            self.rng.coin_sign()
        } else {
            delta.signum()
        };
        sign * min
    }

    /// Mostly short bursts, sometimes a long sweep.
    fn random_turn_duration(&mut self) -> f32 {
        if self.rng.unit() < 0.55 {
            self.rng.span(0.45, 0.55)
        } else {
            self.rng.span(0.95, 0.75)
        }
    }
}

/// Whether a spawn point keeps its distance from the previous spawn and
/// from the previous run's chain and trail.
pub fn spawn_is_clear(
    candidate: Vec2,
    last_spawn: Option<Vec2>,
    segments: &[Vec2],
    trail: &[Vec2],
    geometry: &PathGeometry,
) -> bool {
    let g = geometry;
    let min_separation = g.min_dim * SPAWN_MIN_SEPARATION_FRAC;
    let clearance =
        (g.segment_spacing * SPAWN_PATH_CLEARANCE_SEGMENTS).max(g.min_dim * SPAWN_PATH_CLEARANCE_FRAC);
    let chain_stride = ((segments.len() as f32 / 12.0).round() as usize).max(1);
    let trail_stride = ((trail.len() as f32 / 16.0).round() as usize).max(1);
    let near_last = last_spawn.is_some_and(|last| candidate.distance(last) < min_separation);
    let near_chain = min_distance(candidate, segments, 0, chain_stride, usize::MAX) < clearance;
    let near_trail = min_distance(candidate, trail, 0, trail_stride, usize::MAX) < clearance;
    !(near_last || near_chain || near_trail)
}

/// Clearance of a lookahead point: the nearest of the canvas edges, the body
/// and the trail. Higher is safer.
pub fn lookahead_score(
    ahead: Vec2,
    geometry: &PathGeometry,
    body: &[Vec2],
    body_stride: usize,
    trail: &[Vec2],
    trail_stride: usize,
) -> f32 {
    let g = geometry;
    let edge = ahead
        .x
        .min(g.width - ahead.x)
        .min(ahead.y)
        .min(g.height - ahead.y);
    let body = min_distance(ahead, body, 0, body_stride, usize::MAX);
    let trail = min_distance(ahead, trail, 0, trail_stride, usize::MAX);
    edge.min(body).min(trail)
}

/// Repulsion the head feels from its body and older trail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Avoidance {
    /// Heading change toward the combined push, if anything pushes at all.
    pub turn: Option<f32>,
    /// 0 when nothing is in range, approaching 1 at contact.
    pub pressure: f32,
    /// Something is inside the panic fraction of its radius.
    pub critical: bool,
}

/// Sum the falloff pushes of `body` (sampled every `sample_stride`) and
/// `trail` (every `trail_stride`) on `head`.
pub fn avoidance(
    head: Vec2,
    heading: f32,
    geometry: &PathGeometry,
    body: &[Vec2],
    trail: &[Vec2],
    trail_stride: usize,
) -> Avoidance {
    let self_radius = geometry.self_avoid_radius();
    let trail_radius = geometry.trail_avoid_radius();
    let mut push = Vec2::ZERO;
    let mut min_self = f32::INFINITY;
    let mut min_trail = f32::INFINITY;
    for seg in body.iter().step_by(geometry.sample_stride.max(1)) {
        let away = head - *seg;
        let dist = away.length();
        min_self = min_self.min(dist);
        if dist < self_radius && dist > 0.001 {
            push += away / dist * ((self_radius - dist) / self_radius);
        }
    }
    for pt in trail.iter().step_by(trail_stride.max(1)) {
        let away = head - *pt;
        let dist = away.length();
        min_trail = min_trail.min(dist);
        if dist < trail_radius && dist > 0.001 {
            push += away / dist * ((trail_radius - dist) / trail_radius) * TRAIL_AVOID_WEIGHT;
        }
    }
    let self_pressure = ((self_radius - min_self) / self_radius).clamp(0.0, 1.0);
    let trail_pressure = ((trail_radius - min_trail) / trail_radius).clamp(0.0, 1.0);
    let turn = (push != Vec2::ZERO).then(|| wrap_angle(push.y.atan2(push.x) - heading));
    Avoidance {
        turn,
        pressure: self_pressure.max(trail_pressure),
        critical: min_self < self_radius * AVOID_PANIC_FRAC
            || min_trail < trail_radius * AVOID_PANIC_FRAC,
    }
}

/// Append `head` once it is `spacing` past the last point, dropping the
/// oldest points beyond `max`.
pub fn push_trail(trail: &mut Vec<Vec2>, head: Vec2, spacing: f32, max: usize) {
    match trail.last() {
        None => trail.push(head),
        Some(last) if head.distance(*last) >= spacing => {
            trail.push(head);
            if trail.len() > max {
                let excess = trail.len() - max;
                trail.drain(..excess);
            }
        }
        Some(_) => {}
    }
}

/// Heading pointing away from whichever canvas edge `pos` is closest to.
fn inward_heading(pos: Vec2, width: f32, height: f32) -> f32 {
    let left = pos.x;
    let right = width - pos.x;
    let top = pos.y;
    let bottom = height - pos.y;
    if left <= right && left <= top && left <= bottom {
        0.0
    } else if right <= top && right <= bottom {
        PI
    } else if top <= bottom {
        FRAC_PI_2
    } else {
        -FRAC_PI_2
    }
}

/// Pin segment 0 to the head and pull each following segment toward
/// `spacing` behind its predecessor. Iterative, so links may stretch briefly.
pub fn relax_chain(segments: &mut [Vec2], head: Vec2, heading: f32, spacing: f32) {
    let Some(first) = segments.first_mut() else {
        return;
    };
    *first = head;
    let fallback = -heading_vec(heading);
    for i in 1..segments.len() {
        let prev = segments[i - 1];
        let seg = segments[i];
        let offset = seg - prev;
        let dist = offset.length();
        let dir = if dist < 0.001 { fallback } else { offset / dist };
        let desired = prev + dir * spacing;
        segments[i] = seg + (desired - seg) * CHAIN_FOLLOW;
    }
}
