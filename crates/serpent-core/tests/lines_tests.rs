use glam::Vec2;
use serpent_core::rng::{self, LANE_CONTOURS, LANE_RIPPLES};
use serpent_core::*;

fn contours(width: f32, height: f32) -> ContourSet {
    ContourSet::build(width, height, &mut rng::stream(21, LANE_CONTOURS))
}

#[test]
fn contour_lines_fill_the_height_in_order() {
    let set = contours(800.0, 600.0);
    assert!((set.spacing() - 12.0).abs() < 1e-4);
    assert!(set.lines().len() > 20);
    for pair in set.lines().windows(2) {
        assert!(pair[1].y > pair[0].y);
    }
    for line in set.lines() {
        assert!(line.y < 600.0 + set.spacing());
        assert!(line.amp >= 0.6 && line.amp < 1.4);
    }
}

#[test]
fn traced_contours_keep_order_and_gap_under_a_body() {
    let (w, h) = (800.0, 600.0);
    let mut set = contours(w, h);
    let min_gap = set.spacing() * 0.45;
    let margin = set.spacing() * 0.25;
    let samples: Vec<Sample> = (0..10)
        .map(|i| Sample {
            pos: Vec2::new(300.0 + i as f32 * 8.0, 320.0),
            tangent: Vec2::X,
            weight: 1.0 - i as f32 * 0.07,
        })
        .collect();
    let count = set.lines().len();
    let polys = set.trace(w, h, 3.7, &samples, 1.0);
    assert_eq!(polys.len(), count);
    let points = polys[0].len();
    for poly in polys {
        assert_eq!(poly.len(), points);
    }
    for column in 0..points {
        for pair in polys.windows(2) {
            let gap = pair[1][column].y - pair[0][column].y;
            assert!(gap >= min_gap - 1e-3, "gap {gap} at column {column}");
        }
        assert!(polys[0][column].y >= margin - 1e-3);
    }
}

#[test]
fn body_moves_contours_only_while_visible() {
    let (w, h) = (800.0, 600.0);
    let mut set = contours(w, h);
    let flat: Vec<Vec<Vec2>> = set.trace(w, h, 1.0, &[], 1.0).to_vec();
    let samples = [Sample {
        pos: Vec2::new(400.0, 300.0),
        tangent: Vec2::X,
        weight: 1.0,
    }];
    assert_eq!(set.trace(w, h, 1.0, &samples, 0.0), flat.as_slice());
    let lifted = set.trace(w, h, 1.0, &samples, 1.0);
    assert_ne!(lifted, flat.as_slice());
}

#[test]
fn contours_are_deterministic_per_seed() {
    let a = contours(640.0, 480.0);
    let b = contours(640.0, 480.0);
    assert_eq!(a.lines(), b.lines());
}

#[test]
fn ripple_lines_are_spread_and_traced_across() {
    let mut set = RippleSet::build(800.0, 600.0, &mut rng::stream(4, LANE_RIPPLES));
    let lines = set.lines().to_vec();
    assert!(lines.len() > 10);
    assert!((lines[0].y - 33.0 * 0.4).abs() < 1e-3);
    for pair in lines.windows(2) {
        let step = pair[1].y - pair[0].y;
        assert!(step >= 33.0 * 0.65 - 1e-3 && step <= 33.0 * 1.35 + 1e-3);
    }
    for line in &lines {
        assert!(line.shade >= 0.7 && line.shade < 1.2);
    }

    let points = set.trace(0, 800.0, 2.0).to_vec();
    assert!(points.first().is_some_and(|p| p.x < 0.0));
    assert!(points.last().is_some_and(|p| p.x > 800.0 - 14.0));
    for p in &points {
        assert!((p.y - lines[0].y).abs() <= lines[0].amp + 1e-3);
    }
    assert!(set.trace(lines.len(), 800.0, 2.0).is_empty());
}
