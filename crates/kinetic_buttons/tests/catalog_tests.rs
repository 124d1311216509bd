#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

use kinetic::{Engine, Phase, Rect, SessionHandle, Trigger, Vector};
use kinetic_buttons::prelude::*;
use kinetic_buttons::{FillDirection, StretchDirection};

fn bounds() -> Rect {
    Rect::new(0.0, 0.0, 120.0, 40.0)
}

fn run_until(engine: &Engine, from: f64, to: f64) -> f64 {
    let mut now = from;
    while now < to {
        now += 16.0;
        engine.advance(now);
    }
    now
}

fn start(props: &AnyButton, seed: u64) -> (Engine, SessionHandle) {
    let engine = Engine::seeded(seed);
    let handle = engine
        .create_session(props.config(), bounds())
        .expect("default props are valid");
    (engine, handle)
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn every_default_preset_is_valid() {
    for kind in ButtonKind::ALL {
        let props = kind.default_props();
        assert_eq!(props.config().validate(), Ok(()), "{kind}");
    }
}

#[test]
fn toml_props_inherit_defaults() {
    let props: AnyButton = toml::from_str(
        r#"
        button = "elastic"
        stretch = 1.3
        direction = "both"
        "#,
    )
    .unwrap();
    let AnyButton::Elastic(elastic) = props else {
        panic!("expected elastic");
    };
    assert_eq!(elastic.stretch, 1.3);
    assert_eq!(elastic.direction, StretchDirection::Both);
    assert_eq!(elastic.duration_ms, 500.0);
}

#[test]
fn original_prop_names_are_accepted() {
    let props: AnyButton = serde_json::from_str(
        r##"{
            "button": "liquid_fill",
            "liquidColor": "#10b981",
            "fillDirection": "center",
            "fillSpeed": 0.25,
            "className": "ignored"
        }"##,
    )
    .unwrap();
    let AnyButton::LiquidFill(fill) = props else {
        panic!("expected liquid fill");
    };
    assert_eq!(fill.direction, FillDirection::Center);
    assert_eq!(fill.speed_s, 0.25);
    assert_eq!(fill.color.as_str(), "#10b981");
}

#[test]
fn unknown_preset_tag_is_rejected() {
    let result: Result<AnyButton, _> = serde_json::from_str(r#"{ "button": "sparkle" }"#);
    assert!(result.is_err());
}

// =============================================================================
// Presets on a live engine
// =============================================================================

#[test]
fn confetti_label_returns_after_reset() {
    let props = ButtonKind::Confetti.default_props();
    let (engine, handle) = start(&props, 11);
    engine.trigger(handle, Trigger::Press { at: bounds().center() });
    let now = run_until(&engine, 0.0, 100.0);
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    assert_eq!(look.label_opacity, 0.0);
    assert!(!look.particles.is_empty());

    run_until(&engine, now, 2200.0);
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    assert_eq!(look.label_opacity, 1.0);
    assert!(look.particles.is_empty());
}

#[test]
fn pixelate_covers_the_button() {
    let props = ButtonKind::Pixelate.default_props();
    let (engine, handle) = start(&props, 3);
    engine.trigger(handle, Trigger::Press { at: bounds().center() });
    engine.advance(16.0);
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    // 120x40 at 8 px per pixel.
    assert_eq!(look.particles.len(), 15 * 5);
    assert_eq!(look.label_opacity, 0.0);
    assert!(look.particles.iter().all(|p| p.opacity > 0.0));

    let now = run_until(&engine, 16.0, 1200.0);
    assert_eq!(engine.phase(handle), Some(Phase::Settling));
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    assert_eq!(look.label_opacity, 1.0);

    run_until(&engine, now, 1600.0);
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
}

#[test]
fn shatter_shards_glide_to_a_stop() {
    let props = ButtonKind::Shatter.default_props();
    let (engine, handle) = start(&props, 8);
    engine.trigger(handle, Trigger::Press { at: bounds().center() });
    run_until(&engine, 0.0, 900.0);
    let snapshot = engine.snapshot(handle).unwrap();
    assert_eq!(snapshot.entities.len(), 15);
    for shard in &snapshot.entities {
        let travelled = (shard.position - bounds().center()).magnitude();
        assert!(travelled <= 150.0 + 1e-6, "shard overshot: {travelled}");
        assert!(shard.velocity.magnitude() < 1.0);
    }
}

#[test]
fn bouncy_lifts_then_lands() {
    let props = ButtonKind::Bouncy.default_props();
    let (engine, handle) = start(&props, 1);
    engine.trigger(handle, Trigger::Press { at: Vector::ZERO });
    let mut highest = 0.0_f64;
    let mut now = 0.0;
    while now < 1200.0 {
        now += 16.0;
        engine.advance(now);
        let look = props.appearance(&engine.snapshot(handle).unwrap());
        highest = highest.min(look.translate.y);
    }
    assert!(highest < -15.0, "peak lift was {highest}");
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    assert_eq!(look.transform(), "none");
}

#[test]
fn depth_tilts_toward_the_pointer_and_drops_on_leave() {
    let props = ButtonKind::Depth.default_props();
    let (engine, handle) = start(&props, 1);
    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(120.0, 0.0) });
    engine.advance(16.0);
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    assert_eq!(look.translate_z, 30.0);
    assert!(look.tilt.y > 0.0);
    assert!(look.transform().contains("rotateY(15deg)"));

    engine.trigger(handle, Trigger::PointerLeave);
    engine.advance(32.0);
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    assert_eq!(look.translate_z, 0.0);
    assert_eq!(engine.phase(handle), Some(Phase::Idle));
}

#[test]
fn neon_glow_reaches_full_strength_while_hovered() {
    let props = ButtonKind::NeonGlow.default_props();
    let (engine, handle) = start(&props, 1);
    engine.trigger(handle, Trigger::PointerEnter { at: Vector::new(10.0, 10.0) });
    run_until(&engine, 0.0, 400.0);
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    let glow = look.glow.expect("glowing");
    let alpha = glow.color.as_rgba().map_or(0.0, |c| c.a);
    assert!((alpha - 0.8).abs() < 1e-6, "glow alpha {alpha}");
}

#[test]
fn ghost_trail_marks_fade_with_age() {
    let props = ButtonKind::GhostTrail.default_props();
    let (engine, handle) = start(&props, 1);
    let mut now = 0.0;
    for step in 0..10 {
        let at = Vector::new(10.0 + f64::from(step) * 10.0, 20.0);
        engine.trigger(handle, Trigger::PointerMove { at });
        now += 16.0;
        engine.advance(now);
    }
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    assert!(look.particles.len() >= 2);
    let oldest = look.particles.first().unwrap();
    let newest = look.particles.last().unwrap();
    assert!(oldest.opacity < newest.opacity);
}

#[test]
fn lava_blobs_are_drawn_from_the_start() {
    let props = ButtonKind::LavaLamp.default_props();
    let (engine, handle) = start(&props, 4);
    run_until(&engine, 0.0, 160.0);
    let look = props.appearance(&engine.snapshot(handle).unwrap());
    assert_eq!(look.particles.len(), 5);
    assert_eq!(look.label_opacity, 1.0);
}
