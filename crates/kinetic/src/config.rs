//! Effect configuration.
//!
//! One [`EffectConfig`] variant per effect family. Every variant is a plain
//! serde struct with `#[serde(default)]`, so a configuration document only
//! needs the options it wants to change, and options a family does not
//! recognize are ignored rather than rejected.
//!
//! ```rust
//! use kinetic::EffectConfig;
//!
//! let json = r#"{ "effect": "burst", "entity_count": 40, "radius": 12 }"#;
//! let config: EffectConfig = serde_json::from_str(json).unwrap();
//! let EffectConfig::Burst(burst) = &config else { unreachable!() };
//! assert_eq!(burst.count, 40);
//! assert!(config.validate().is_ok());
//! ```
//!
//! Validation is separate from deserialization and runs when a session is
//! created. Out-of-range numbers are reported, never clamped.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::easing::Easing;
use crate::entity::Shape;
use crate::error::{Error, Result};
use crate::integrator::{
    Overflow, Rules, SettleThreshold, finite, non_negative, positive, unit_interval,
};
use crate::pool::{EmissionTemplate, Launch, Span};
use crate::vector::Vector;

/// Configuration for one widget's effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectConfig {
    /// One-shot particle emission (confetti, shards, pixel dissolve).
    Burst(BurstConfig),
    /// One-shot keyframed offset (bounce).
    Pulse(PulseConfig),
    /// Continuous pointer-driven displacement or tilt.
    Field(FieldConfig),
    /// Press-and-drag with friction and snap-back.
    Drag(DragConfig),
    /// Fading marks left behind the pointer.
    Trail(TrailConfig),
    /// Growing rings at the pointer.
    Ripple(RippleConfig),
    /// Eased 0..1 progress toward hovered and back.
    Hover(HoverConfig),
    /// Ambient satellites with a press flourish.
    Orbit(OrbitConfig),
    /// Ambient bouncing blobs.
    Lava(LavaConfig),
}

impl EffectConfig {
    /// Short family name, used in logs.
    pub const fn family(&self) -> &'static str {
        match self {
            Self::Burst(_) => "burst",
            Self::Pulse(_) => "pulse",
            Self::Field(_) => "field",
            Self::Drag(_) => "drag",
            Self::Trail(_) => "trail",
            Self::Ripple(_) => "ripple",
            Self::Hover(_) => "hover",
            Self::Orbit(_) => "orbit",
            Self::Lava(_) => "lava",
        }
    }

    /// Whether presses are guarded until the effect returns to rest.
    pub const fn is_one_shot(&self) -> bool {
        matches!(self, Self::Burst(_) | Self::Pulse(_))
    }

    /// Whether the effect runs for the widget's whole lifetime.
    pub const fn is_ambient(&self) -> bool {
        matches!(self, Self::Orbit(_) | Self::Lava(_))
    }

    /// Checks every option of the active variant.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::InvalidConfiguration`],
    /// [`Error::EmptyOption`] or [`Error::InvertedRange`] found.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Burst(c) => c.validate(),
            Self::Pulse(c) => c.validate(),
            Self::Field(c) => c.validate(),
            Self::Drag(c) => c.validate(),
            Self::Trail(c) => c.validate(),
            Self::Ripple(c) => c.validate(),
            Self::Hover(c) => c.validate(),
            Self::Orbit(c) => c.validate(),
            Self::Lava(c) => c.validate(),
        }
    }
}

fn not_empty<T>(option: &'static str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        Err(Error::EmptyOption { option })
    } else {
        Ok(())
    }
}

// ============================================================================
// Burst
// ============================================================================

/// Where a burst's entities start.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstPattern {
    /// All entities start at the widget's center.
    #[default]
    Radial,
    /// One entity per `cell`-sized tile of the widget.
    Grid { cell: f64 },
}

/// A one-shot emission of entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    #[serde(alias = "entity_count")]
    pub count: usize,
    pub pattern: BurstPattern,
    pub palette: Vec<Color>,
    #[serde(alias = "shape_set")]
    pub shapes: Vec<Shape>,
    pub size: Span,
    /// Launch speed, units per tick.
    pub speed: Span,
    /// When set, replaces `speed`: each entity glides exactly this far.
    pub travel: Option<Span>,
    /// Launch direction, radians.
    pub angle: Span,
    pub rotation: Span,
    pub spin: Span,
    /// Per-entity start delay, milliseconds.
    pub delay: Span,
    pub gravity: f64,
    #[serde(alias = "friction_coefficient")]
    pub friction: f64,
    /// Longest the effect stays Active.
    #[serde(alias = "duration_millis")]
    pub duration_ms: f64,
    /// Entity lifetime; `None` keeps entities until the session resets.
    pub lifetime_ms: Option<f64>,
    /// Settling time before returning to Idle.
    pub settle_ms: f64,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: 100,
            pattern: BurstPattern::Radial,
            palette: ["#ff6b6b", "#4ecdc4", "#ffe66d", "#1a535c", "#ff9f1c", "#2ec4b6"]
                .into_iter()
                .map(Color::from)
                .collect(),
            shapes: vec![Shape::Circle, Shape::Square, Shape::Triangle, Shape::Line],
            size: Span::new(4.0, 12.0),
            speed: Span::new(5.0, 15.0),
            travel: None,
            angle: Span::new(0.0, TAU),
            rotation: Span::new(0.0, 360.0),
            spin: Span::new(-7.5, 7.5),
            delay: Span::fixed(0.0),
            gravity: 0.2,
            friction: 0.98,
            duration_ms: 2000.0,
            lifetime_ms: Some(2000.0),
            settle_ms: 0.0,
        }
    }
}

impl BurstConfig {
    fn validate(&self) -> Result<()> {
        if let BurstPattern::Grid { cell } = self.pattern {
            positive("pattern.cell", cell)?;
        }
        not_empty("palette", &self.palette)?;
        not_empty("shapes", &self.shapes)?;
        self.size.validate("size")?;
        self.speed.validate("speed")?;
        if let Some(travel) = self.travel {
            travel.validate("travel")?;
        }
        self.angle.validate("angle")?;
        self.rotation.validate("rotation")?;
        self.spin.validate("spin")?;
        self.delay.validate("delay")?;
        if self.delay.min < 0.0 {
            return Err(Error::InvalidConfiguration {
                option: "delay",
                value: self.delay.min,
                expected: "delays >= 0",
            });
        }
        non_negative("duration_ms", self.duration_ms)?;
        if let Some(lifetime) = self.lifetime_ms {
            non_negative("lifetime_ms", lifetime)?;
        }
        non_negative("settle_ms", self.settle_ms)?;
        self.rules().validate()
    }

    /// Integration rules for the emitted entities.
    pub fn rules(&self) -> Rules {
        Rules::default()
            .with_friction(self.friction)
            .with_gravity(self.gravity)
    }

    /// Emission template for the emitted entities.
    pub fn template(&self) -> EmissionTemplate {
        EmissionTemplate {
            shapes: self.shapes.clone(),
            palette: self.palette.clone(),
            size: self.size,
            angle: self.angle,
            launch: self.travel.map_or(Launch::Speed(self.speed), |distance| {
                Launch::Travel {
                    distance,
                    friction: self.friction,
                }
            }),
            rotation: self.rotation,
            spin: self.spin,
            growth: 0.0,
            delay: self.delay,
            hue: None,
            lifetime: self.lifetime_ms,
            max_size: None,
        }
    }
}

// ============================================================================
// Pulse
// ============================================================================

/// One keyframe of a pulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keyframe {
    /// Position in the animation, `[0, 1]`.
    pub at: f64,
    pub offset: Vector,
    pub scale: f64,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self {
            at: 0.0,
            offset: Vector::ZERO,
            scale: 1.0,
        }
    }
}

impl Keyframe {
    /// A keyframe that only translates vertically.
    pub const fn lift(at: f64, y: f64) -> Self {
        Self {
            at,
            offset: Vector::new(0.0, y),
            scale: 1.0,
        }
    }
}

/// A one-shot keyframed animation of the widget's offset and scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub keyframes: Vec<Keyframe>,
    #[serde(alias = "duration_millis")]
    pub duration_ms: f64,
    /// Time after the animation during which presses are still ignored.
    pub settle_ms: f64,
    /// Timing function applied within each keyframe segment.
    pub easing: Easing,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            keyframes: vec![
                Keyframe::lift(0.0, 0.0),
                Keyframe::lift(0.25, -20.0),
                Keyframe::lift(0.375, -5.0),
                Keyframe::lift(1.0, 0.0),
            ],
            duration_ms: 600.0,
            settle_ms: 300.0,
            easing: Easing::BACK_OUT,
        }
    }
}

impl PulseConfig {
    fn validate(&self) -> Result<()> {
        not_empty("keyframes", &self.keyframes)?;
        let mut previous = 0.0;
        for frame in &self.keyframes {
            unit_interval("keyframes.at", frame.at)?;
            if frame.at < previous {
                return Err(Error::InvalidConfiguration {
                    option: "keyframes.at",
                    value: frame.at,
                    expected: "keyframes in ascending order",
                });
            }
            previous = frame.at;
            finite("keyframes.offset", frame.offset.x)?;
            finite("keyframes.offset", frame.offset.y)?;
            non_negative("keyframes.scale", frame.scale)?;
        }
        non_negative("duration_ms", self.duration_ms)?;
        non_negative("settle_ms", self.settle_ms)?;
        self.easing.validate()
    }

    /// Samples offset and scale at linear progress `t`.
    ///
    /// Before the first keyframe the first frame holds; after the last the
    /// last frame holds.
    pub fn sample(&self, t: f64) -> (Vector, f64) {
        let (Some(first), Some(last)) = (self.keyframes.first(), self.keyframes.last()) else {
            return (Vector::ZERO, 1.0);
        };
        if t <= first.at {
            return (first.offset, first.scale);
        }
        for pair in self.keyframes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.at {
                let span = b.at - a.at;
                let local = if span > 0.0 { (t - a.at) / span } else { 1.0 };
                let eased = self.easing.apply(local);
                let offset = a.offset.lerp(b.offset, eased);
                let scale = a.scale + (b.scale - a.scale) * eased;
                return (offset, scale);
            }
        }
        (last.offset, last.scale)
    }
}

// ============================================================================
// Field
// ============================================================================

/// Which way the pointer moves the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    #[default]
    Attract,
    Repel,
    Tilt,
}

/// A continuous pointer-driven field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub mode: FieldMode,
    /// Influence radius. `None` derives it from the widget as twice its
    /// longest side.
    pub radius: Option<f64>,
    pub strength: f64,
    pub reference_strength: f64,
    /// Repel only: largest offset the widget may take.
    pub max_displacement: f64,
    /// Tilt only: largest rotation in degrees.
    pub max_angle: f64,
    /// Time to ease back to rest after the pointer leaves.
    pub return_ms: f64,
    pub return_easing: Easing,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            mode: FieldMode::Attract,
            radius: Some(100.0),
            strength: 50.0,
            reference_strength: crate::field::REFERENCE_STRENGTH,
            max_displacement: 30.0,
            max_angle: 15.0,
            return_ms: 300.0,
            return_easing: Easing::Ease,
        }
    }
}

impl FieldConfig {
    fn validate(&self) -> Result<()> {
        if let Some(radius) = self.radius {
            positive("radius", radius)?;
        }
        non_negative("strength", self.strength)?;
        positive("reference_strength", self.reference_strength)?;
        non_negative("max_displacement", self.max_displacement)?;
        non_negative("max_angle", self.max_angle)?;
        non_negative("return_ms", self.return_ms)?;
        self.return_easing.validate()
    }
}

// ============================================================================
// Drag
// ============================================================================

/// Press-and-drag with friction, distance clamp and snap-back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    #[serde(alias = "friction_coefficient")]
    pub friction: f64,
    /// Zero disables snap-back: the widget stays where it was let go.
    #[serde(alias = "snap_back_factor")]
    pub snap_back: f64,
    pub max_distance: Option<f64>,
    pub overflow: Overflow,
    pub gravity: f64,
    pub settle: SettleThreshold,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            friction: 0.85,
            snap_back: 0.1,
            max_distance: Some(200.0),
            overflow: Overflow::Stop,
            gravity: 0.0,
            settle: SettleThreshold::default(),
        }
    }
}

impl DragConfig {
    fn validate(&self) -> Result<()> {
        self.rules().validate()
    }

    /// Integration rules for the widget's offset.
    pub fn rules(&self) -> Rules {
        let rules = Rules::default()
            .with_friction(self.friction)
            .with_snap_back(self.snap_back)
            .with_gravity(self.gravity)
            .with_settle(self.settle);
        match self.max_distance {
            Some(max) => rules.with_max_distance(max, self.overflow),
            None => rules,
        }
    }
}

// ============================================================================
// Trail
// ============================================================================

/// Marks dropped along the pointer's path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Minimum pointer travel between marks.
    pub spacing: f64,
    pub lifetime_ms: f64,
    pub size: f64,
    pub color: Color,
    pub shape: Shape,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            spacing: 5.0,
            lifetime_ms: 800.0,
            size: 20.0,
            color: Color::new("rgba(255, 255, 255, 0.5)"),
            shape: Shape::Mark,
        }
    }
}

impl TrailConfig {
    fn validate(&self) -> Result<()> {
        non_negative("spacing", self.spacing)?;
        non_negative("lifetime_ms", self.lifetime_ms)?;
        non_negative("size", self.size)
    }

    pub(crate) fn template(&self) -> EmissionTemplate {
        EmissionTemplate {
            shapes: vec![self.shape],
            palette: vec![self.color.clone()],
            size: Span::fixed(self.size),
            lifetime: Some(self.lifetime_ms),
            ..EmissionTemplate::default()
        }
    }
}

// ============================================================================
// Ripple
// ============================================================================

/// Rings that grow from the pointer while hovering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Ring size at which a ripple is removed.
    pub max_size: f64,
    /// Time a ripple takes to reach `max_size` at 60 ticks per second.
    pub grow_ms: f64,
    /// Most ripples alive at once.
    pub max_live: usize,
    pub color: Color,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            max_size: 200.0,
            grow_ms: 1000.0,
            max_live: 3,
            color: Color::new("rgba(255, 255, 255, 0.7)"),
        }
    }
}

impl RippleConfig {
    fn validate(&self) -> Result<()> {
        positive("max_size", self.max_size)?;
        positive("grow_ms", self.grow_ms)?;
        if self.max_live == 0 {
            return Err(Error::InvalidConfiguration {
                option: "max_live",
                value: 0.0,
                expected: "at least 1",
            });
        }
        Ok(())
    }

    /// Size added per tick.
    pub fn growth_per_tick(&self) -> f64 {
        self.max_size / (self.grow_ms / crate::clock::frame_interval(60))
    }

    pub(crate) fn template(&self) -> EmissionTemplate {
        EmissionTemplate {
            shapes: vec![Shape::Ring],
            palette: vec![self.color.clone()],
            size: Span::fixed(0.0),
            growth: self.growth_per_tick(),
            max_size: Some(self.max_size),
            ..EmissionTemplate::default()
        }
    }
}

// ============================================================================
// Hover
// ============================================================================

/// A tweened 0..1 progress that follows hover state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Time for a full 0 to 1 transition.
    #[serde(alias = "duration_millis")]
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500.0,
            easing: Easing::Ease,
        }
    }
}

impl HoverConfig {
    fn validate(&self) -> Result<()> {
        non_negative("duration_ms", self.duration_ms)?;
        self.easing.validate()
    }
}

// ============================================================================
// Orbit
// ============================================================================

/// One-shot animation played over the orbiters when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flourish {
    /// Orbiters fly out to three times their distance.
    #[default]
    Explode,
    /// Orbiters keep circling while spinning in place.
    Spin,
    /// Orbiters fade out.
    Disappear,
    /// Orbiters collapse onto the center.
    Converge,
}

impl Flourish {
    /// Whether orbiting pauses while the flourish plays.
    pub const fn pauses_orbit(self) -> bool {
        !matches!(self, Self::Spin)
    }
}

/// Satellites circling the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    #[serde(alias = "entity_count")]
    pub count: usize,
    /// Radians per second.
    pub speed: f64,
    /// Orbit radius.
    pub distance: f64,
    /// Randomize size, radius and shape per orbiter.
    pub variation: bool,
    pub palette: Vec<Color>,
    #[serde(alias = "shape_set")]
    pub shapes: Vec<Shape>,
    pub flourish: Flourish,
    pub flourish_ms: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            count: 6,
            speed: 5.0,
            distance: 80.0,
            variation: true,
            palette: BurstConfig::default().palette,
            shapes: vec![Shape::Circle, Shape::Square, Shape::Triangle, Shape::Star],
            flourish: Flourish::Explode,
            flourish_ms: 1000.0,
        }
    }
}

impl OrbitConfig {
    fn validate(&self) -> Result<()> {
        finite("speed", self.speed)?;
        non_negative("distance", self.distance)?;
        not_empty("palette", &self.palette)?;
        not_empty("shapes", &self.shapes)?;
        non_negative("flourish_ms", self.flourish_ms)
    }

    pub(crate) fn template(&self) -> EmissionTemplate {
        let (size, distance) = if self.variation {
            (
                Span::new(4.0, 10.0),
                Span::new(self.distance * 0.8, self.distance * 1.2),
            )
        } else {
            (Span::fixed(6.0), Span::fixed(self.distance))
        };
        let shapes = if self.variation {
            self.shapes.clone()
        } else {
            self.shapes.iter().take(1).copied().collect()
        };
        EmissionTemplate {
            shapes,
            palette: self.palette.clone(),
            size,
            launch: Launch::Travel {
                distance,
                friction: 0.0,
            },
            ..EmissionTemplate::default()
        }
    }
}

// ============================================================================
// Lava
// ============================================================================

/// Slow blobs bouncing around the widget, optionally cycling hue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LavaConfig {
    #[serde(alias = "entity_count")]
    pub count: usize,
    /// Scales blob speed and hue drift.
    pub wave_speed: f64,
    /// Scales blob radius.
    pub blob_size: f64,
    pub color_transition: bool,
    pub palette: Vec<Color>,
}

impl Default for LavaConfig {
    fn default() -> Self {
        Self {
            count: 5,
            wave_speed: 1.0,
            blob_size: 0.5,
            color_transition: true,
            palette: vec![Color::new("#ff6b6b"), Color::new("#4ecdc4")],
        }
    }
}

impl LavaConfig {
    fn validate(&self) -> Result<()> {
        non_negative("wave_speed", self.wave_speed)?;
        non_negative("blob_size", self.blob_size)?;
        not_empty("palette", &self.palette)
    }

    /// Hue drift per tick, degrees.
    pub fn hue_rate(&self) -> f64 {
        if self.color_transition {
            0.1 * self.wave_speed
        } else {
            0.0
        }
    }

    pub(crate) fn template(&self) -> EmissionTemplate {
        EmissionTemplate {
            shapes: vec![Shape::Blob],
            palette: self.palette.clone(),
            size: Span::new(20.0 * self.blob_size, 50.0 * self.blob_size),
            hue: Some(Span::new(0.0, 360.0)),
            ..EmissionTemplate::default()
        }
    }
}
