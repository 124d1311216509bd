#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

//! End-to-end lifecycle tests: sessions driven through the engine with
//! synthetic clock timestamps.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetic::{
    BurstConfig, DragConfig, EffectConfig, Engine, FieldConfig, FieldMode, HoverConfig,
    IgnoreReason, LavaConfig, OrbitConfig, Phase, PulseConfig, Rect, RippleConfig,
    SessionHandle, SharedBounds, Snapshot, TrailConfig, Trigger, TriggerOutcome, Vector,
};

const TOLERANCE: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

fn button() -> Rect {
    Rect::new(0.0, 0.0, 100.0, 40.0)
}

/// Ticks from the clock's current time to `until` in `step` increments.
fn run(engine: &Engine, until: f64, step: f64) {
    let mut now = engine.clock().now();
    while now < until {
        now = (now + step).min(until);
        engine.advance(now);
    }
}

fn record_frames(engine: &Engine, handle: SessionHandle) -> Rc<RefCell<Vec<Snapshot>>> {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);
    engine
        .on_frame(handle, move |frame| sink.borrow_mut().push(frame.clone()))
        .unwrap();
    frames
}

fn count_completions(engine: &Engine, handle: SessionHandle) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    engine
        .on_complete(handle, move |_| sink.set(sink.get() + 1))
        .unwrap();
    count
}

fn press(at: Vector) -> Trigger {
    Trigger::Press { at }
}

// =============================================================================
// Burst
// =============================================================================

#[test]
fn burst_runs_to_rest_once() {
    let engine = Engine::seeded(11);
    let handle = engine
        .create_session(EffectConfig::Burst(BurstConfig::default()), button())
        .unwrap();
    let frames = record_frames(&engine, handle);
    let completions = count_completions(&engine, handle);

    assert_eq!(engine.trigger(handle, press(Vector::new(50.0, 20.0))), TriggerOutcome::Started);
    assert_eq!(engine.phase(handle), Some(Phase::Active));
    assert_eq!(engine.snapshot(handle).unwrap().entities.len(), 100);

    run(&engine, 2000.0, 10.0);

    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert_eq!(completions.get(), 1);
    assert!(engine.snapshot(handle).unwrap().entities.is_empty());

    let frames = frames.borrow();
    assert_eq!(frames.len(), 200);
    let last = frames.last().unwrap();
    assert_eq!(last.phase, Phase::Idle);
    assert!(last.entities.is_empty());
    assert!(frames[..199].iter().all(|f| f.entities.len() == 100));
    assert!(engine.clock().is_idle());
}

#[test]
fn burst_entities_fall() {
    let engine = Engine::seeded(5);
    let config = BurstConfig {
        count: 1,
        speed: kinetic::Span::fixed(0.0),
        ..BurstConfig::default()
    };
    let handle = engine
        .create_session(EffectConfig::Burst(config), button())
        .unwrap();
    engine.trigger(handle, press(Vector::ZERO));
    let mut last_y = engine.snapshot(handle).unwrap().entities[0].position.y;
    for step in 1..50 {
        engine.advance(f64::from(step) * 16.0);
        let y = engine.snapshot(handle).unwrap().entities[0].position.y;
        assert!(y > last_y);
        last_y = y;
    }
}

#[test]
fn reentrant_press_is_swallowed() {
    let engine = Engine::seeded(2);
    let handle = engine
        .create_session(EffectConfig::Burst(BurstConfig::default()), button())
        .unwrap();
    let presses = Rc::new(Cell::new(0));
    let sink = Rc::clone(&presses);
    engine.on_press(handle, move |_| sink.set(sink.get() + 1)).unwrap();
    let completions = count_completions(&engine, handle);

    assert_eq!(engine.trigger(handle, press(Vector::ZERO)), TriggerOutcome::Started);
    engine.advance(500.0);
    assert_eq!(
        engine.trigger(handle, press(Vector::ZERO)),
        TriggerOutcome::Ignored(IgnoreReason::Reentrant)
    );
    run(&engine, 3000.0, 16.0);

    assert_eq!(presses.get(), 1);
    assert_eq!(completions.get(), 1);
    assert_eq!(engine.snapshot(handle).unwrap().run, 1);
}

#[test]
fn burst_can_restart_from_completion_listener() {
    let engine = Engine::seeded(9);
    let handle = engine
        .create_session(EffectConfig::Burst(BurstConfig::default()), button())
        .unwrap();
    let again = engine.clone();
    let restarted = Rc::new(Cell::new(false));
    let flag = Rc::clone(&restarted);
    engine
        .on_complete(handle, move |h| {
            if !flag.replace(true) {
                assert_eq!(again.trigger(h, press(Vector::ZERO)), TriggerOutcome::Started);
            }
        })
        .unwrap();

    engine.trigger(handle, press(Vector::ZERO));
    run(&engine, 2000.0, 10.0);

    assert!(restarted.get());
    let snapshot = engine.snapshot(handle).unwrap();
    assert_eq!(snapshot.run, 2);
    assert_eq!(snapshot.phase, Phase::Active);
    assert_eq!(snapshot.entities.len(), 100);
}

#[test]
fn burst_waits_for_geometry() {
    let engine = Engine::seeded(3);
    let bounds = SharedBounds::new(None);
    let handle = engine
        .create_session(EffectConfig::Burst(BurstConfig::default()), bounds.clone())
        .unwrap();
    assert_eq!(
        engine.trigger(handle, press(Vector::ZERO)),
        TriggerOutcome::Ignored(IgnoreReason::StaleGeometry)
    );
    assert_eq!(engine.phase(handle), Some(Phase::Idle));

    bounds.set(Some(button()));
    assert_eq!(engine.trigger(handle, press(Vector::ZERO)), TriggerOutcome::Started);
}

#[test]
fn settle_delay_holds_the_session() {
    let engine = Engine::seeded(4);
    let config = BurstConfig {
        duration_ms: 100.0,
        lifetime_ms: None,
        settle_ms: 200.0,
        ..BurstConfig::default()
    };
    let handle = engine
        .create_session(EffectConfig::Burst(config), button())
        .unwrap();
    let completions = count_completions(&engine, handle);

    engine.trigger(handle, press(Vector::ZERO));
    run(&engine, 100.0, 10.0);
    assert_eq!(engine.phase(handle), Some(Phase::Settling));
    run(&engine, 290.0, 10.0);
    assert_eq!(engine.phase(handle), Some(Phase::Settling));
    run(&engine, 300.0, 10.0);
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert_eq!(completions.get(), 1);
}

// =============================================================================
// Destroy
// =============================================================================

#[test]
fn destroy_stops_frames_without_completion() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Burst(BurstConfig::default()), button())
        .unwrap();
    let frames = record_frames(&engine, handle);
    let completions = count_completions(&engine, handle);

    engine.trigger(handle, press(Vector::ZERO));
    run(&engine, 100.0, 10.0);
    let seen = frames.borrow().len();
    assert!(engine.destroy(handle));
    run(&engine, 3000.0, 10.0);

    assert_eq!(frames.borrow().len(), seen);
    assert_eq!(completions.get(), 0);
    assert_eq!(
        engine.trigger(handle, press(Vector::ZERO)),
        TriggerOutcome::Ignored(IgnoreReason::Destroyed)
    );
    assert!(engine.clock().is_idle());
}

#[test]
fn destroy_inside_listener_skips_remaining_listeners() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Burst(BurstConfig::default()), button())
        .unwrap();
    let killer = engine.clone();
    engine
        .on_frame(handle, move |frame| {
            killer.destroy(frame.handle);
        })
        .unwrap();
    let frames = record_frames(&engine, handle);

    engine.trigger(handle, press(Vector::ZERO));
    engine.advance(16.0);
    engine.advance(32.0);

    assert!(frames.borrow().is_empty());
    assert_eq!(engine.phase(handle), None);
}

// =============================================================================
// Pulse
// =============================================================================

#[test]
fn pulse_lifts_then_rests() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Pulse(PulseConfig::default()), button())
        .unwrap();
    let frames = record_frames(&engine, handle);
    let completions = count_completions(&engine, handle);

    engine.trigger(handle, press(Vector::ZERO));
    run(&engine, 600.0, 16.0);
    assert_eq!(engine.phase(handle), Some(Phase::Settling));
    run(&engine, 1000.0, 16.0);

    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert_eq!(completions.get(), 1);
    let frames = frames.borrow();
    let highest = frames.iter().map(|f| f.offset.y).fold(0.0, f64::min);
    assert!(highest < -10.0);
    let last = frames.last().unwrap();
    assert_eq!(last.offset, Vector::ZERO);
    assert_eq!(last.scale, 1.0);
}

// =============================================================================
// Field
// =============================================================================

#[test]
fn attract_half_pull_half_strength() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Field(FieldConfig::default()), button())
        .unwrap();
    let frames = record_frames(&engine, handle);

    // Center is (50, 20); the pointer sits 50 away at half pull.
    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(80.0, 60.0) });
    engine.advance(16.0);

    let offset = frames.borrow()[0].offset;
    assert!(approx_eq(offset.magnitude(), 12.5));
    assert!(approx_eq(offset.x, 7.5));
    assert!(approx_eq(offset.y, 10.0));
}

#[test]
fn pointer_samples_coalesce_per_tick() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Field(FieldConfig::default()), button())
        .unwrap();
    let frames = record_frames(&engine, handle);

    assert_eq!(
        engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(50.0, 20.0) }),
        TriggerOutcome::Started
    );
    for i in 1..=10 {
        let at = Vector::new(50.0 + 3.0 * f64::from(i), 20.0 + 4.0 * f64::from(i));
        assert_eq!(
            engine.trigger(handle, Trigger::PointerMove { at }),
            TriggerOutcome::Updated
        );
    }
    engine.advance(16.0);

    let frames = frames.borrow();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].origin, Some(Vector::new(80.0, 60.0)));
    assert!(approx_eq(frames[0].offset.magnitude(), 12.5));
}

#[test]
fn field_eases_back_after_leave() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Field(FieldConfig::default()), button())
        .unwrap();
    let completions = count_completions(&engine, handle);

    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(80.0, 20.0) });
    engine.advance(16.0);
    assert!(engine.snapshot(handle).unwrap().offset.x > 0.0);

    assert_eq!(engine.trigger(handle, Trigger::PointerLeave), TriggerOutcome::Released);
    engine.advance(166.0);
    let midway = engine.snapshot(handle).unwrap();
    assert_eq!(midway.phase, Phase::Settling);
    assert!(midway.offset.x > 0.0 && midway.offset.x < 10.5);

    run(&engine, 400.0, 16.0);
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert_eq!(engine.snapshot(handle).unwrap().offset, Vector::ZERO);
    assert_eq!(completions.get(), 1);
}

#[test]
fn reentering_while_settling_resumes_the_run() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Field(FieldConfig::default()), button())
        .unwrap();
    let completions = count_completions(&engine, handle);

    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(80.0, 20.0) });
    engine.advance(16.0);
    engine.trigger(handle, Trigger::PointerLeave);
    engine.advance(100.0);
    assert_eq!(
        engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(20.0, 20.0) }),
        TriggerOutcome::Started
    );
    assert_eq!(engine.phase(handle), Some(Phase::Active));
    run(&engine, 1000.0, 16.0);

    let snapshot = engine.snapshot(handle).unwrap();
    assert_eq!(snapshot.run, 1);
    assert!(snapshot.offset.x < 0.0);
    assert_eq!(completions.get(), 0);
}

#[test]
fn repel_ignores_pointer_while_returning() {
    let engine = Engine::seeded(1);
    let config = FieldConfig {
        mode: FieldMode::Repel,
        strength: 0.5,
        ..FieldConfig::default()
    };
    let handle = engine
        .create_session(EffectConfig::Field(config), button())
        .unwrap();

    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(60.0, 20.0) });
    engine.advance(16.0);
    assert!(engine.snapshot(handle).unwrap().offset.x < 0.0);

    engine.trigger(handle, Trigger::PointerLeave);
    assert_eq!(
        engine.trigger(handle, Trigger::PointerMove { at: Vector::new(60.0, 20.0) }),
        TriggerOutcome::Ignored(IgnoreReason::Reentrant)
    );
}

#[test]
fn repel_holds_offset_when_pointer_moves_out_of_reach() {
    let engine = Engine::seeded(1);
    let config = FieldConfig {
        mode: FieldMode::Repel,
        strength: 0.5,
        ..FieldConfig::default()
    };
    let handle = engine
        .create_session(EffectConfig::Field(config), button())
        .unwrap();

    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(60.0, 20.0) });
    engine.advance(16.0);
    let near = engine.snapshot(handle).unwrap().offset;
    assert!(near.x < 0.0);

    // Default radius is twice the longest side: 200 from the displaced center.
    engine.trigger(handle, Trigger::PointerMove { at: Vector::new(300.0, 20.0) });
    engine.advance(32.0);
    let snapshot = engine.snapshot(handle).unwrap();
    assert_eq!(snapshot.offset, near);
    assert_eq!(snapshot.phase, Phase::Active);
}

#[test]
fn tilt_follows_pointer() {
    let engine = Engine::seeded(1);
    let config = FieldConfig {
        mode: FieldMode::Tilt,
        ..FieldConfig::default()
    };
    let handle = engine
        .create_session(EffectConfig::Field(config), button())
        .unwrap();

    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(75.0, 10.0) });
    engine.advance(16.0);
    let tilt = engine.snapshot(handle).unwrap().tilt;
    assert!(approx_eq(tilt.y, 7.5));
    assert!(approx_eq(tilt.x, 7.5));
    assert_eq!(engine.snapshot(handle).unwrap().offset, Vector::ZERO);
}

#[test]
fn field_defers_samples_until_measurable() {
    let engine = Engine::seeded(1);
    let bounds = SharedBounds::new(Some(Rect::new(0.0, 0.0, 0.0, 0.0)));
    let handle = engine
        .create_session(EffectConfig::Field(FieldConfig::default()), bounds.clone())
        .unwrap();

    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(80.0, 60.0) });
    engine.advance(16.0);
    assert_eq!(engine.snapshot(handle).unwrap().offset, Vector::ZERO);

    bounds.set(Some(button()));
    engine.advance(32.0);
    assert!(approx_eq(engine.snapshot(handle).unwrap().offset.magnitude(), 12.5));
}

// =============================================================================
// Drag
// =============================================================================

#[test]
fn drag_snaps_back_after_release() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Drag(DragConfig::default()), button())
        .unwrap();
    let completions = count_completions(&engine, handle);

    assert_eq!(
        engine.trigger(handle, press(Vector::new(10.0, 10.0))),
        TriggerOutcome::Started
    );
    engine.trigger(handle, Trigger::PointerMove { at: Vector::new(60.0, 10.0) });
    engine.advance(16.0);
    assert_eq!(engine.snapshot(handle).unwrap().offset, Vector::new(50.0, 0.0));

    assert_eq!(
        engine.trigger(handle, Trigger::Release { at: Vector::new(60.0, 10.0) }),
        TriggerOutcome::Released
    );
    assert_eq!(engine.phase(handle), Some(Phase::Settling));
    run(&engine, 10_000.0, 16.0);

    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert_eq!(engine.snapshot(handle).unwrap().offset, Vector::ZERO);
    assert_eq!(completions.get(), 1);
}

#[test]
fn drag_is_clamped_to_max_distance() {
    let engine = Engine::seeded(1);
    let config = DragConfig {
        max_distance: Some(30.0),
        ..DragConfig::default()
    };
    let handle = engine
        .create_session(EffectConfig::Drag(config), button())
        .unwrap();

    engine.trigger(handle, press(Vector::ZERO));
    engine.trigger(handle, Trigger::PointerMove { at: Vector::new(300.0, 400.0) });
    engine.advance(16.0);
    let offset = engine.snapshot(handle).unwrap().offset;
    assert!(approx_eq(offset.magnitude(), 30.0));
}

#[test]
fn drag_without_snap_back_stays_put() {
    let engine = Engine::seeded(1);
    let config = DragConfig {
        snap_back: 0.0,
        max_distance: None,
        ..DragConfig::default()
    };
    let handle = engine
        .create_session(EffectConfig::Drag(config), button())
        .unwrap();
    let completions = count_completions(&engine, handle);

    engine.trigger(handle, press(Vector::ZERO));
    engine.trigger(handle, Trigger::PointerMove { at: Vector::new(10.0, 0.0) });
    engine.advance(16.0);
    engine.trigger(handle, Trigger::Release { at: Vector::new(10.0, 0.0) });
    run(&engine, 10_000.0, 16.0);

    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert_eq!(completions.get(), 1);
    // The release velocity glides on under friction before stopping.
    assert!(engine.snapshot(handle).unwrap().offset.x > 50.0);
}

#[test]
fn moves_without_press_are_ignored_by_drag() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Drag(DragConfig::default()), button())
        .unwrap();
    assert_eq!(
        engine.trigger(handle, Trigger::PointerMove { at: Vector::new(5.0, 5.0) }),
        TriggerOutcome::Ignored(IgnoreReason::Unsupported)
    );
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
}

// =============================================================================
// Trail and ripple
// =============================================================================

#[test]
fn trail_marks_fade_after_leave() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Trail(TrailConfig::default()), button())
        .unwrap();
    let completions = count_completions(&engine, handle);

    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(10.0, 10.0) });
    engine.advance(16.0);
    engine.trigger(handle, Trigger::PointerMove { at: Vector::new(12.0, 10.0) });
    engine.advance(32.0);
    engine.trigger(handle, Trigger::PointerMove { at: Vector::new(30.0, 10.0) });
    engine.advance(48.0);
    assert_eq!(engine.snapshot(handle).unwrap().entities.len(), 2);

    assert_eq!(engine.trigger(handle, Trigger::PointerLeave), TriggerOutcome::Released);
    run(&engine, 500.0, 16.0);
    assert_eq!(engine.phase(handle), Some(Phase::Settling));
    run(&engine, 1000.0, 16.0);
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert_eq!(completions.get(), 1);
}

#[test]
fn ripples_grow_one_at_a_time_and_clear_on_leave() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Ripple(RippleConfig::default()), button())
        .unwrap();
    let completions = count_completions(&engine, handle);

    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(10.0, 10.0) });
    engine.advance(16.0);
    engine.trigger(handle, Trigger::PointerMove { at: Vector::new(20.0, 10.0) });
    engine.advance(32.0);

    let snapshot = engine.snapshot(handle).unwrap();
    assert_eq!(snapshot.entities.len(), 1);
    assert!(snapshot.entities[0].size > 0.0);
    assert_eq!(snapshot.origin, Some(Vector::new(10.0, 10.0)));

    assert_eq!(engine.trigger(handle, Trigger::PointerLeave), TriggerOutcome::Released);
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert!(engine.snapshot(handle).unwrap().entities.is_empty());
    assert_eq!(completions.get(), 1);
}

// =============================================================================
// Hover
// =============================================================================

#[test]
fn hover_tweens_in_and_out() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Hover(HoverConfig::default()), button())
        .unwrap();
    let completions = count_completions(&engine, handle);

    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(5.0, 5.0) });
    engine.advance(250.0);
    let midway = engine.snapshot(handle).unwrap();
    assert!(midway.progress > 0.0 && midway.progress < 1.0);
    assert_eq!(midway.origin, Some(Vector::new(5.0, 5.0)));
    engine.advance(500.0);
    assert_eq!(engine.snapshot(handle).unwrap().progress, 1.0);

    engine.trigger(handle, Trigger::PointerLeave);
    run(&engine, 1100.0, 16.0);
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert_eq!(engine.snapshot(handle).unwrap().progress, 0.0);
    assert_eq!(completions.get(), 1);
}

// =============================================================================
// Ambient effects
// =============================================================================

#[test]
fn orbit_circles_and_pauses_for_flourish() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Orbit(OrbitConfig::default()), button())
        .unwrap();
    assert_eq!(engine.phase(handle), Some(Phase::Active));
    assert_eq!(engine.snapshot(handle).unwrap().entities.len(), 6);

    let angle = |engine: &Engine| engine.snapshot(handle).unwrap().entities[0].rotation;
    engine.advance(16.0);
    let start = angle(&engine);
    engine.advance(116.0);
    assert!(approx_eq(angle(&engine) - start, 0.5));

    let presses = Rc::new(Cell::new(0));
    let sink = Rc::clone(&presses);
    engine.on_press(handle, move |_| sink.set(sink.get() + 1)).unwrap();
    assert_eq!(engine.trigger(handle, press(Vector::ZERO)), TriggerOutcome::Started);
    engine.advance(216.0);
    let paused = angle(&engine);
    assert!(approx_eq(paused - start, 0.5));
    assert!(engine.snapshot(handle).unwrap().flourish.is_some());
    assert_eq!(
        engine.trigger(handle, press(Vector::ZERO)),
        TriggerOutcome::Ignored(IgnoreReason::Reentrant)
    );

    run(&engine, 1200.0, 16.0);
    assert!(engine.snapshot(handle).unwrap().flourish.is_none());
    engine.advance(1300.0);
    assert!(angle(&engine) > paused);
    assert_eq!(presses.get(), 1);
    assert_eq!(engine.phase(handle), Some(Phase::Active));
}

#[test]
fn orbiters_keep_their_distance() {
    let engine = Engine::seeded(8);
    let handle = engine
        .create_session(EffectConfig::Orbit(OrbitConfig::default()), button())
        .unwrap();
    run(&engine, 500.0, 16.0);
    let center = button().center();
    for orbiter in engine.snapshot(handle).unwrap().entities {
        let radius = (orbiter.position - center).magnitude();
        assert!(approx_eq(radius, orbiter.distance));
        assert!((64.0..96.0).contains(&orbiter.distance));
    }
}

#[test]
fn lava_blobs_stay_inside() {
    let engine = Engine::seeded(21);
    let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
    let handle = engine
        .create_session(EffectConfig::Lava(LavaConfig::default()), bounds)
        .unwrap();
    engine.advance(16.0);
    let first = engine.snapshot(handle).unwrap();
    assert_eq!(first.entities.len(), 5);

    run(&engine, 30_000.0, 16.0);
    let later = engine.snapshot(handle).unwrap();
    assert_eq!(later.phase, Phase::Active);
    for blob in &later.entities {
        assert!(blob.position.x >= -0.5 && blob.position.x <= 200.5);
        assert!(blob.position.y >= -0.5 && blob.position.y <= 100.5);
        assert!(blob.hue.is_some_and(|h| (0.0..360.0).contains(&h)));
    }
    assert_ne!(first.entities[0].hue, later.entities[0].hue);
}

#[test]
fn lava_resize_pulls_blobs_in() {
    let engine = Engine::seeded(21);
    let bounds = SharedBounds::new(Some(Rect::new(0.0, 0.0, 400.0, 400.0)));
    let handle = engine
        .create_session(EffectConfig::Lava(LavaConfig::default()), bounds.clone())
        .unwrap();
    engine.advance(16.0);

    bounds.set(Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
    assert!(engine.resize(handle, kinetic::Size::new(50.0, 50.0)));
    for blob in engine.snapshot(handle).unwrap().entities {
        assert!(blob.position.x <= 50.0 && blob.position.y <= 50.0);
    }
}

#[test]
fn ambient_sessions_ignore_pointer_travel() {
    let engine = Engine::seeded(1);
    let handle = engine
        .create_session(EffectConfig::Lava(LavaConfig::default()), button())
        .unwrap();
    assert_eq!(
        engine.trigger(handle, Trigger::PointerMove { at: Vector::ZERO }),
        TriggerOutcome::Ignored(IgnoreReason::Unsupported)
    );
    assert_eq!(engine.trigger(handle, press(Vector::ZERO)), TriggerOutcome::PassedThrough);
    assert_eq!(engine.live_sessions(), 1);
}
