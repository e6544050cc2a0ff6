use serpent_core::*;

const DT: f32 = 1.0 / 60.0;

fn engine_with(params: EngineParams, width: f32, height: f32) -> SerpentEngine {
    let mut engine = SerpentEngine::new(params).unwrap();
    engine.resize(width, height);
    engine
}

fn engine(width: f32, height: f32) -> SerpentEngine {
    engine_with(EngineParams::default(), width, height)
}

fn light() -> PaletteDescriptor {
    PaletteDescriptor::light()
}

fn near(actual: f32, expected: f32, pct: f32) -> bool {
    (actual - expected).abs() <= expected.abs() * pct
}

#[test]
fn grows_to_full_length_in_grow_time() {
    let mut engine = engine(800.0, 600.0);
    for i in 0..=66 {
        engine.step(i as f64 / 60.0, DT);
    }
    let planner = engine.planner();
    assert_eq!(planner.active_segments(), planner.geometry().segment_count);
    assert!((engine.snapshot().envelope.visibility - 1.0).abs() < 0.01);
}

#[test]
fn every_draw_uses_a_unit_alpha() {
    let mut engine = engine_with(
        EngineParams {
            star_visibility: 1.0,
            ..EngineParams::default()
        },
        640.0,
        400.0,
    );
    let mut surface = RecordingSurface::new();
    for i in 0..240 {
        let now = i as f64 / 60.0;
        if i == 60 {
            engine.set_palette(&light(), now).unwrap();
        }
        if i == 150 {
            let mut cloud = light();
            cloud.dot_style = DotStyle::Cloud;
            cloud.wake_alpha_scale = 4.0;
            engine.set_palette(&cloud, now).unwrap();
        }
        engine.frame(now, DT, &mut surface);
        for op in surface.take_ops() {
            let alpha = op.alpha();
            assert!((0.0..=1.0).contains(&alpha), "{op:?}");
            if let DrawOp::Radial { inner, .. } = op {
                assert!((0.0..=1.0).contains(&inner.a), "{op:?}");
            }
        }
    }
}

#[test]
fn background_is_halfway_at_mid_crossfade() {
    let mut engine = engine(800.0, 600.0);
    engine.set_palette(&light(), 0.0).unwrap();
    let mut surface = RecordingSurface::new();
    engine.frame(0.35, DT, &mut surface);
    let color = surface
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::Rect { color, .. } => Some(*color),
            _ => None,
        })
        .expect("background rect");
    let (r, g, b) = ((20.0 + 246.0) / 2.0, (21.0 + 231.0) / 2.0, (23.0 + 198.0) / 2.0);
    assert!(near(color.r, r, 0.02), "r {}", color.r);
    assert!(near(color.g, g, 0.02), "g {}", color.g);
    assert!(near(color.b, b, 0.02), "b {}", color.b);
}

#[test]
fn bad_palette_keeps_the_current_one() {
    let mut engine = engine(300.0, 200.0);
    let mut bad = light();
    bad.background = "#12".into();
    assert!(engine.set_palette(&bad, 0.0).is_err());
    assert!(!engine.palette().in_flight());
    let mut surface = RecordingSurface::new();
    engine.frame(0.5, DT, &mut surface);
    assert_eq!(engine.snapshot().style, StyleTransition::settled(DotStyle::Dot));
    assert_eq!(engine.snapshot().palette.background, Rgb::new(20.0, 21.0, 23.0));
}

#[test]
fn paused_loop_draws_nothing_until_resumed() {
    let mut engine = engine(400.0, 300.0);
    let mut surface = RecordingSurface::new();
    let mut animation = AnimationLoop::new(ManualScheduler::new());

    animation.start(0.0);
    assert_eq!(animation.scheduler().pending(), 1);
    animation.scheduler_mut().take();
    animation.tick(1.0 / 60.0, &mut engine, &mut surface);
    assert!(surface.paint_count() > 0);
    assert!(animation.is_running());

    animation.set_paused(true, 0.02);
    assert!(animation.is_paused());
    assert_eq!(animation.scheduler().pending(), 0);
    assert_eq!(animation.scheduler().cancelled(), 1);
    surface.take_ops();
    for i in 0..5 {
        let status = animation.tick(0.03 + i as f64 / 60.0, &mut engine, &mut surface);
        assert_eq!(status, FrameStatus::Idle);
    }
    assert!(surface.ops().is_empty());
    assert_eq!(animation.scheduler().pending(), 0);

    animation.set_paused(false, 0.2);
    assert!(!animation.is_paused());
    assert!(animation.scheduler_mut().take().is_some());
    animation.tick(0.2 + 1.0 / 60.0, &mut engine, &mut surface);
    assert!(surface.paint_count() > 0);
}

#[test]
fn start_never_double_schedules() {
    let mut animation = AnimationLoop::new(ManualScheduler::new());
    animation.start(0.0);
    animation.start(0.1);
    assert_eq!(animation.scheduler().pending(), 1);
    animation.stop();
    assert!(!animation.is_running());
    assert_eq!(animation.scheduler().pending(), 0);
}

#[test]
fn dropping_the_loop_cancels_its_pending_frame() {
    let mut scheduler = ManualScheduler::new();
    {
        let mut animation = AnimationLoop::new(&mut scheduler);
        animation.start(0.0);
        assert!(animation.is_running());
    }
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.cancelled(), 1);
}

#[test]
fn resize_rebuilds_the_field_in_bounds() {
    let mut engine = engine(800.0, 600.0);
    let mut surface = RecordingSurface::new();
    let mut animation = AnimationLoop::new(ManualScheduler::new());
    for i in 0..30 {
        engine.frame(i as f64 / 60.0, DT, &mut surface);
    }
    animation.resize(&mut engine, 1600.0, 300.0, 0.5);
    assert_eq!(animation.scheduler().pending(), 1);
    assert_eq!(engine.size(), (1600.0, 300.0));
    assert_eq!(engine.particles().len(), 9600);
    for i in 0..30 {
        engine.frame(0.5 + i as f64 / 60.0, DT, &mut surface);
    }
    for p in engine.particles() {
        assert!(p.pos.x >= 0.0 && p.pos.x <= 1600.0);
        assert!(p.pos.y >= 0.0 && p.pos.y <= 300.0);
        assert!(p.rest.x <= 1600.0 && p.rest.y <= 300.0);
    }
}

#[test]
fn fractional_sizes_are_floored() {
    let engine = engine(800.7, 0.2);
    assert_eq!(engine.size(), (800.0, 1.0));
}

#[test]
fn invisible_engine_goes_idle_and_stars_wake_it() {
    let mut engine = engine_with(
        EngineParams {
            serpent_visibility: 0.0,
            star_visibility: 0.0,
            ..EngineParams::default()
        },
        400.0,
        300.0,
    );
    let mut surface = RecordingSurface::new();
    let mut animation = AnimationLoop::new(ManualScheduler::new());
    animation.start(0.0);
    animation.scheduler_mut().take();
    let status = animation.tick(0.016, &mut engine, &mut surface);
    assert_eq!(status, FrameStatus::Idle);
    assert!(!animation.is_running());
    // Only the clear and the background fill.
    assert_eq!(surface.paint_count(), 1);

    assert!(engine.set_star_visibility(1.0, 0.5));
    animation.start(0.5);
    animation.scheduler_mut().take();
    let status = animation.tick(0.516, &mut engine, &mut surface);
    assert_eq!(status, FrameStatus::Continue);
    assert!(animation.is_running());
}

#[test]
fn serpent_layer_skipped_when_invisible() {
    let mut engine = engine_with(
        EngineParams {
            serpent_visibility: 0.005,
            background_opacity: 0.0,
            ..EngineParams::default()
        },
        400.0,
        300.0,
    );
    let mut surface = RecordingSurface::new();
    engine.frame(1.0, DT, &mut surface);
    assert_eq!(surface.paint_count(), 0);
    assert!(engine.samples().is_empty());
}

#[test]
fn warp_needs_a_counter_and_ends_on_time() {
    let mut engine = engine_with(
        EngineParams {
            star_visibility: 1.0,
            ..EngineParams::default()
        },
        800.0,
        600.0,
    );
    let ignored = StarWarpTrigger {
        counter: 0,
        direction: WarpDirection::Up,
        entering: false,
    };
    assert!(!engine.trigger_star_warp(ignored, 1.0));
    assert!(!engine.is_warping());

    let trigger = StarWarpTrigger {
        counter: 1,
        ..ignored
    };
    assert!(engine.trigger_star_warp(trigger, 1.0));
    engine.step(1.2, DT);
    assert!(engine.is_warping());
    assert!(engine.snapshot().warp.is_some());
    engine.step(1.53, DT);
    assert!(!engine.is_warping());
    engine.step(1.6, DT);
    assert!(engine.snapshot().warp.is_none());
}

#[test]
fn switching_to_dash_draws_both_styles_then_strokes() {
    let mut engine = engine(500.0, 400.0);
    let mut surface = RecordingSurface::new();
    engine.frame(0.0, DT, &mut surface);
    engine.set_palette(&light(), 0.0).unwrap();

    surface.take_ops();
    engine.frame(0.35, DT, &mut surface);
    let ops = surface.take_ops();
    assert!(ops.iter().any(|op| matches!(op, DrawOp::Quadratic { .. })));
    assert!(ops.iter().any(|op| matches!(
        op,
        DrawOp::Circle {
            composite: Composite::SourceOver,
            ..
        }
    )));

    engine.frame(1.0, DT, &mut surface);
    let ops = surface.take_ops();
    assert!(ops.iter().any(|op| matches!(op, DrawOp::Quadratic { .. })));
    assert!(!ops.iter().any(|op| matches!(
        op,
        DrawOp::Circle {
            composite: Composite::SourceOver,
            ..
        }
    )));
}

#[test]
fn contour_and_ripple_styles_stroke_polylines() {
    for style in [DotStyle::Contour, DotStyle::Ripple] {
        let mut desc = PaletteDescriptor::dark();
        desc.dot_style = style;
        let mut engine = engine_with(
            EngineParams {
                palette: desc,
                ..EngineParams::default()
            },
            600.0,
            400.0,
        );
        let mut surface = RecordingSurface::new();
        engine.frame(0.5, DT, &mut surface);
        let lines = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Polyline { .. }))
            .count();
        assert!(lines > 5, "{style:?} drew {lines} lines");
    }
}

#[test]
fn bloom_draws_soft_blobs() {
    let mut desc = PaletteDescriptor::dark();
    desc.dot_style = DotStyle::Bloom;
    let mut engine = engine_with(
        EngineParams {
            palette: desc,
            ..EngineParams::default()
        },
        600.0,
        400.0,
    );
    let mut surface = RecordingSurface::new();
    engine.frame(2.0, DT, &mut surface);
    let blobs = surface
        .ops()
        .iter()
        .filter(|op| {
            matches!(
                op,
                DrawOp::Radial {
                    composite: Composite::SourceOver,
                    ..
                }
            )
        })
        .count();
    assert_eq!(blobs, 3);
}

#[test]
fn chrome_follows_palette_and_background() {
    let mut engine = engine(300.0, 200.0);
    let chrome = engine.chrome();
    assert_eq!(chrome.container_background, "rgba(20, 21, 23, 1)");
    assert_eq!(chrome.frame_border, "rgba(255, 255, 255, 0.4)");

    engine.set_background_opacity(0.0);
    assert_eq!(engine.chrome().container_background, "transparent");
}

#[test]
fn visible_signal_tracks_every_layer() {
    let mut engine = engine_with(
        EngineParams {
            serpent_visibility: 0.0,
            star_visibility: 0.0,
            background_opacity: 0.0,
            ..EngineParams::default()
        },
        300.0,
        200.0,
    );
    assert!(!engine.has_visible_signal());
    engine.set_background_opacity(0.5);
    assert!(engine.has_visible_signal());
    engine.set_background_opacity(0.0);
    engine.set_serpent_visibility(2.0);
    assert!(engine.has_visible_signal());
}

#[test]
fn frame_dt_is_clamped() {
    assert_eq!(clamp_frame_dt(f64::NAN), 0.008);
    assert_eq!(clamp_frame_dt(0.0), 0.008);
    assert_eq!(clamp_frame_dt(5.0), 0.033);
    assert!((clamp_frame_dt(0.016) - 0.016).abs() < 1e-7);
}

#[test]
fn strokes_stay_round_after_a_context_reset() {
    let mut engine = engine_with(
        EngineParams {
            palette: light(),
            ..EngineParams::default()
        },
        500.0,
        400.0,
    );
    let mut surface = RecordingSurface::new();
    engine.frame(0.5, DT, &mut surface);
    surface.reset_context();
    engine.resize(640.0, 480.0);
    engine.frame(0.6, DT, &mut surface);
    let strokes: Vec<LineCap> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Polyline { cap, .. } | DrawOp::Quadratic { cap, .. } => Some(*cap),
            _ => None,
        })
        .collect();
    assert!(!strokes.is_empty());
    assert!(strokes.iter().all(|cap| *cap == LineCap::Round));
}
