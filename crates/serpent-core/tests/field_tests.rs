use glam::Vec2;
use serpent_core::field::body_push;
use serpent_core::rng::{self, LANE_FIELD};
use serpent_core::*;

const DT: f32 = 1.0 / 60.0;

fn field(width: f32, height: f32) -> ParticleField {
    let mut field = ParticleField::new(rng::stream(3, LANE_FIELD));
    field.rebuild(width, height);
    field
}

fn body() -> BodyShape {
    BodyShape::new(600.0, 7.2, 1.0, 1.0)
}

fn calm(dt: f32) -> FieldStep<'static> {
    FieldStep {
        samples: &[],
        body: body(),
        visibility: 0.0,
        density: 1.0,
        track_heading: true,
        dt,
    }
}

#[test]
fn particle_count_follows_area_and_cap() {
    assert_eq!(ParticleField::count_for(800.0, 600.0), 9600);
    assert_eq!(ParticleField::count_for(1600.0, 300.0), 9600);
    assert_eq!(ParticleField::count_for(4000.0, 2000.0), 70_000);
    assert_eq!(ParticleField::count_for(0.0, 600.0), 0);
    assert_eq!(field(320.0, 200.0).len(), 1280);
}

#[test]
fn rebuild_seeds_at_rest_inside_bounds() {
    let field = field(400.0, 300.0);
    for p in field.particles() {
        assert_eq!(p.pos, p.rest);
        assert_eq!(p.vel, Vec2::ZERO);
        assert!(p.pos.x >= 0.0 && p.pos.x <= 400.0);
        assert!(p.pos.y >= 0.0 && p.pos.y <= 300.0);
        assert!(p.radius >= 0.6 && p.radius < 1.3);
        assert!(p.alpha >= 0.06 && p.alpha < 0.16);
        assert!(p.seed >= 0.0 && p.seed < 1.0);
    }
}

#[test]
fn disturbed_field_settles_without_a_body() {
    let mut field = field(300.0, 200.0);
    for (i, p) in field.particles_mut().iter_mut().enumerate() {
        let kick = Vec2::new((i % 7) as f32 - 3.0, (i % 5) as f32 - 2.0);
        p.pos = (p.pos + kick * 6.0).clamp(Vec2::ZERO, Vec2::new(300.0, 200.0));
        p.vel = kick * 40.0;
    }
    for _ in 0..6000 {
        field.step(&calm(DT));
    }
    for p in field.particles() {
        assert!(p.pos.distance(p.rest) < 1e-2, "{:?} vs {:?}", p.pos, p.rest);
        assert!(p.vel.length() < 1e-2);
        assert!(p.wake < 1e-2);
    }
}

#[test]
fn pushed_particles_stay_in_bounds() {
    let (w, h) = (200.0, 150.0);
    let mut field = field(w, h);
    let samples: Vec<Sample> = (0..8)
        .map(|i| Sample {
            pos: Vec2::new(8.0 + i as f32 * 6.0, 4.0),
            tangent: Vec2::X,
            weight: 1.0 - i as f32 * 0.1,
        })
        .collect();
    let body = BodyShape::new(150.0, 6.0, 1.0, 1.0);
    for _ in 0..600 {
        field.step(&FieldStep {
            samples: &samples,
            body,
            visibility: 1.0,
            density: 1.0,
            track_heading: false,
            dt: 0.033,
        });
        for p in field.particles() {
            assert!(p.pos.x >= 0.0 && p.pos.x <= w && p.pos.y >= 0.0 && p.pos.y <= h);
            assert!(p.wake >= 0.0 && p.wake <= 1.0);
        }
    }
}

#[test]
fn density_mask_freezes_hidden_particles() {
    let mut field = field(300.0, 200.0);
    for p in field.particles_mut() {
        p.pos += Vec2::new(2.0, 0.0);
        p.vel = Vec2::new(10.0, 0.0);
    }
    let before: Vec<Particle> = field.particles().to_vec();
    field.step(&FieldStep {
        density: 0.0,
        ..calm(DT)
    });
    for (old, new) in before.iter().zip(field.particles()) {
        if old.seed > 0.0 {
            assert_eq!(old, new);
        }
    }
}

#[test]
fn push_points_away_from_the_centerline() {
    let samples = [Sample {
        pos: Vec2::new(100.0, 100.0),
        tangent: Vec2::X,
        weight: 1.0,
    }];
    let body = BodyShape {
        radius: 5.0,
        length: 10.0,
    };
    let normal = Vec2::X.perp();

    let (above, peak) = body_push(Vec2::new(100.0, 100.0) + normal * 3.0, &samples, body);
    assert!(peak > 0.0 && peak <= 1.0);
    assert!(above.dot(normal) > 0.0);

    let (below, _) = body_push(Vec2::new(100.0, 100.0) - normal * 3.0, &samples, body);
    assert!(below.dot(normal) < 0.0);

    let (far, far_peak) = body_push(Vec2::new(400.0, 400.0), &samples, body);
    assert_eq!(far, Vec2::ZERO);
    assert_eq!(far_peak, 0.0);
}

#[test]
fn heading_follows_velocity_for_directional_styles() {
    let mut field = field(100.0, 100.0);
    for p in field.particles_mut() {
        p.rest = Vec2::new(50.0, 50.0);
        p.pos = Vec2::new(50.0, 50.0);
        p.vel = Vec2::new(0.0, 30.0);
        p.heading = 0.0;
    }
    for _ in 0..60 {
        field.step(&calm(DT));
    }
    for p in field.particles() {
        assert!((p.heading - std::f32::consts::FRAC_PI_2).abs() < 0.3, "{}", p.heading);
    }
}
