use serpent_core::lifecycle::{LifeCycle, Phase};
use serpent_core::path::{avoidance, lookahead_score, push_trail, relax_chain, spawn_is_clear};
use serpent_core::rng::{self, LANE_PATH};
use serpent_core::*;
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

const DT: f32 = 1.0 / 60.0;

fn planner(seed: u64, width: f32, height: f32) -> PathPlanner {
    let mut planner = PathPlanner::new(rng::stream(seed, LANE_PATH));
    planner.resize(width, height);
    planner
}

#[test]
fn geometry_scales_with_the_short_side() {
    let g = PathGeometry::for_canvas(800.0, 600.0);
    assert_eq!(g.min_dim, 600.0);
    assert_eq!(g.segment_count, 20);
    assert!((g.segment_spacing - 7.2).abs() < 1e-4);
    assert_eq!(g.sample_stride, 2);
    assert!((g.speed() - 72.0).abs() < 1e-3);

    let tiny = PathGeometry::for_canvas(100.0, 100.0);
    assert_eq!(tiny.segment_count, 18);
    assert_eq!(tiny.segment_spacing, 6.0);

    let huge = PathGeometry::for_canvas(4000.0, 3000.0);
    assert_eq!(huge.segment_count, 32);
}

#[test]
fn fully_grown_after_grow_time() {
    let mut planner = planner(7, 800.0, 600.0);
    for i in 0..=66 {
        planner.step(i as f64 / 60.0, DT);
    }
    let envelope = planner.envelope();
    assert_eq!(envelope.phase, Phase::Cruising);
    assert_eq!(planner.active_segments(), planner.geometry().segment_count);
    assert!((envelope.visibility - 1.0).abs() < 0.01, "visibility {}", envelope.visibility);
    assert!(!planner.samples().is_empty());
    assert_eq!(planner.samples()[0].weight, 1.0);
}

#[test]
fn head_stays_inside_bounce_margin() {
    for seed in [1, 2, 3] {
        let mut planner = planner(seed, 640.0, 360.0);
        let g = *planner.geometry();
        let pad = g.bounce_pad();
        for i in 0..1200 {
            planner.step(i as f64 / 60.0, DT);
            if planner.envelope().is_dormant() {
                continue;
            }
            let head = planner.head();
            assert!(head.x >= pad - 1e-3 && head.x <= g.width - pad + 1e-3, "x {}", head.x);
            assert!(head.y >= pad - 1e-3 && head.y <= g.height - pad + 1e-3, "y {}", head.y);
            let heading = planner.heading();
            assert!(heading > -PI - 1e-5 && heading <= PI + 1e-5, "heading {heading}");
            assert!(planner.trail().len() <= g.max_path_points);
        }
    }
}

#[test]
fn samples_taper_from_the_head() {
    let mut planner = planner(11, 800.0, 600.0);
    for i in 0..120 {
        planner.step(i as f64 / 60.0, DT);
    }
    let samples = planner.samples();
    assert!(samples.len() > 2);
    assert_eq!(samples[0].pos, planner.head());
    for pair in samples.windows(2) {
        assert!(pair[1].weight <= pair[0].weight + 1e-6);
    }
    for s in samples {
        assert!(s.weight >= 0.25 - 1e-6 && s.weight <= 1.0);
        assert!((s.tangent.length() - 1.0).abs() < 1e-3);
    }
}

#[test]
fn same_seed_same_path() {
    let mut a = planner(42, 500.0, 500.0);
    let mut b = planner(42, 500.0, 500.0);
    for i in 0..300 {
        let now = i as f64 / 60.0;
        a.step(now, DT);
        b.step(now, DT);
    }
    assert_eq!(a.head(), b.head());
    assert_eq!(a.segments(), b.segments());
}

#[test]
fn relaxed_chain_converges_to_spacing() {
    let spacing = 8.0;
    let head = Vec2::new(200.0, 200.0);
    let mut segments: Vec<Vec2> = (0..20)
        .map(|i| Vec2::new(200.0 - i as f32 * 3.0, 200.0 + (i as f32 * 0.7).sin() * 15.0))
        .collect();
    for _ in 0..200 {
        relax_chain(&mut segments, head, 0.0, spacing);
    }
    assert_eq!(segments[0], head);
    for pair in segments.windows(2) {
        let gap = pair[0].distance(pair[1]);
        assert!((gap - spacing).abs() < 1e-3 * spacing, "gap {gap}");
    }
}

#[test]
fn relax_chain_unstacks_coincident_points() {
    let head = Vec2::new(10.0, 10.0);
    let mut segments = vec![head; 4];
    for _ in 0..100 {
        relax_chain(&mut segments, head, 0.0, 5.0);
    }
    // Stacked links fall back to trailing straight behind the heading.
    assert!(segments[1].x < head.x);
    assert!((segments[3].distance(segments[2]) - 5.0).abs() < 1e-2);
}

#[test]
fn life_cycle_phases_in_order() {
    let life = LifeCycle {
        start: 10.0,
        life_duration: 8.0,
        respawn_delay: 2.0,
    };
    assert_eq!(life.total(), 10.0);
    assert_eq!(life.fade_duration(), 0.6);
    assert_eq!(life.phase(10.5), Phase::Growing);
    assert_eq!(life.phase(13.0), Phase::Cruising);
    assert_eq!(life.phase(17.6), Phase::Fading);
    assert_eq!(life.phase(18.5), Phase::Dormant);
    assert!(!life.is_over(19.9));
    assert!(life.is_over(20.0));

    let cruising = life.envelope(13.0);
    assert_eq!(cruising.visibility, 1.0);
    assert!((cruising.growth_width - 1.0).abs() < 1e-6);
    assert!((cruising.overlay_alpha - 0.35).abs() < 1e-5);

    let dormant = life.envelope(19.0);
    assert_eq!(dormant.visibility, 0.0);
    assert_eq!(dormant.active_segments(20), 0);
}

#[test]
fn short_lives_fade_over_a_quarter() {
    let life = LifeCycle {
        start: 0.0,
        life_duration: 2.0,
        respawn_delay: 1.0,
    };
    assert_eq!(life.fade_duration(), 0.5);
}

#[test]
fn grow_ramps_active_segments() {
    let life = LifeCycle {
        start: 0.0,
        life_duration: 7.0,
        respawn_delay: 2.0,
    };
    assert_eq!(life.envelope(0.0).active_segments(20), 1);
    let mut prev = 0;
    for i in 0..=12 {
        let active = life.envelope(i as f64 * 0.1).active_segments(20);
        assert!(active >= prev);
        prev = active;
    }
    assert_eq!(prev, 20);
}

#[test]
fn dormant_planner_emits_nothing_then_respawns() {
    let mut planner = planner(5, 800.0, 600.0);
    planner.step(0.0, DT);
    let life = *planner.life();
    let dormant_at = life.start + life.life_duration as f64 + 0.1;
    planner.step(dormant_at, DT);
    assert!(planner.envelope().is_dormant());
    assert_eq!(planner.active_segments(), 0);
    assert!(planner.samples().is_empty());

    let respawn_at = life.start + life.total() as f64 + 0.05;
    planner.step(respawn_at, DT);
    assert!(!planner.envelope().is_dormant());
    assert_eq!(planner.life().start, respawn_at);
    assert!(!planner.samples().is_empty());
}

#[test]
fn spawn_keeps_clear_of_the_last_run() {
    let g = PathGeometry::for_canvas(800.0, 600.0);
    let last = Vec2::new(200.0, 200.0);
    assert!(!spawn_is_clear(Vec2::new(350.0, 250.0), Some(last), &[], &[], &g));
    assert!(spawn_is_clear(Vec2::new(500.0, 400.0), Some(last), &[], &[], &g));

    let chain: Vec<Vec2> = (0..20).map(|i| Vec2::new(500.0 + i as f32 * 7.2, 300.0)).collect();
    assert!(!spawn_is_clear(Vec2::new(560.0, 380.0), None, &chain, &[], &g));
    assert!(spawn_is_clear(Vec2::new(560.0, 460.0), None, &chain, &[], &g));

    let trail: Vec<Vec2> = (0..160).map(|i| Vec2::new(100.0 + i as f32 * 4.0, 500.0)).collect();
    assert!(!spawn_is_clear(Vec2::new(300.0, 420.0), None, &[], &trail, &g));
    assert!(spawn_is_clear(Vec2::new(300.0, 300.0), None, &[], &trail, &g));
}

#[test]
fn respawns_land_away_from_the_previous_spawn() {
    let min_separation = 600.0 * 0.35;
    let (mut spawns, mut crowded) = (0, 0);
    for seed in 0..8 {
        let mut planner = planner(seed, 800.0, 600.0);
        let mut life_start = f64::NAN;
        let mut previous: Option<Vec2> = None;
        for i in 0..2400 {
            planner.step(i as f64 / 30.0, 1.0 / 30.0);
            if planner.life().start == life_start {
                continue;
            }
            life_start = planner.life().start;
            let spawn = planner.trail()[0];
            if let Some(prev) = previous {
                spawns += 1;
                if spawn.distance(prev) < min_separation {
                    crowded += 1;
                }
            }
            previous = Some(spawn);
        }
    }
    assert!(spawns >= 40, "only {spawns} respawns");
    assert!(crowded * 10 <= spawns, "{crowded}/{spawns} respawns too close");
}

#[test]
fn trail_drops_its_oldest_points_past_the_cap() {
    let mut trail = Vec::new();
    for i in 0..50 {
        push_trail(&mut trail, Vec2::new(i as f32 * 10.0, 0.0), 4.0, 20);
        assert!(trail.len() <= 20);
    }
    assert_eq!(trail.len(), 20);
    assert_eq!(trail[0], Vec2::new(300.0, 0.0));
    assert_eq!(trail[19], Vec2::new(490.0, 0.0));

    // Closer than the spacing: not recorded.
    push_trail(&mut trail, Vec2::new(492.0, 0.0), 4.0, 20);
    assert_eq!(trail.last(), Some(&Vec2::new(490.0, 0.0)));
}

#[test]
fn body_ahead_turns_the_head_away() {
    let g = PathGeometry::for_canvas(800.0, 600.0);
    let head = Vec2::new(400.0, 300.0);

    let below = avoidance(head, 0.0, &g, &[Vec2::new(410.0, 304.0)], &[], 1);
    assert!(below.turn.is_some_and(|turn| turn < 0.0), "{below:?}");
    assert!(below.pressure > 0.5);
    assert!(below.critical);

    let above = avoidance(head, 0.0, &g, &[Vec2::new(410.0, 296.0)], &[], 1);
    assert!(above.turn.is_some_and(|turn| turn > 0.0), "{above:?}");

    let trail = avoidance(head, FRAC_PI_2, &g, &[], &[Vec2::new(400.0, 320.0)], 1);
    assert!(trail.turn.is_some_and(|turn| turn.abs() > 3.0), "{trail:?}");
    assert!(trail.critical);

    let clear = avoidance(head, 0.0, &g, &[Vec2::new(480.0, 300.0)], &[Vec2::new(400.0, 380.0)], 1);
    assert_eq!(clear.turn, None);
    assert_eq!(clear.pressure, 0.0);
    assert!(!clear.critical);
}

#[test]
fn lookahead_scores_the_nearest_obstacle() {
    let g = PathGeometry::for_canvas(800.0, 600.0);
    let body: Vec<Vec2> = (0..10).map(|i| Vec2::new(450.0, 250.0 + i as f32 * 10.0)).collect();
    let toward = lookahead_score(Vec2::new(440.0, 300.0), &g, &body, 1, &[], 1);
    let away = lookahead_score(Vec2::new(360.0, 300.0), &g, &body, 1, &[], 1);
    assert!((toward - 10.0).abs() < 1e-4);
    assert!((away - 90.0).abs() < 1e-4);
    assert!(away > toward);

    assert_eq!(lookahead_score(Vec2::new(20.0, 300.0), &g, &[], 1, &[], 1), 20.0);
    let trail = lookahead_score(Vec2::new(400.0, 300.0), &g, &[], 1, &[Vec2::new(400.0, 330.0)], 1);
    assert!((trail - 30.0).abs() < 1e-4);
}
