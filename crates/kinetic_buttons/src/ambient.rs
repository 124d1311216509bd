//! Ambient buttons that animate for as long as they exist.

use std::f64::consts::PI;

use kinetic::{Color, EffectConfig, Flourish, LavaConfig, OrbitConfig, Shape, Snapshot, Vector};
use serde::{Deserialize, Deserializer, Serialize};

use crate::appearance::{Appearance, Particle};
use crate::{Button, ButtonKind};

/// Accepts a single color or a list of them.
fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Color>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Color),
        Many(Vec<Color>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(color) => vec![color],
        OneOrMany::Many(colors) => colors,
    })
}

// ============================================================================
// Orbiting
// ============================================================================

/// Small shapes circle the button; a press plays a flourish over them.
///
/// ```rust
/// use kinetic::Flourish;
/// use kinetic_buttons::Orbiting;
///
/// let props: Orbiting =
///     serde_json::from_str(r##"{ "orbitColor": "#ff00ff", "onClickEffect": "spin" }"##).unwrap();
/// assert_eq!(props.colors.len(), 1);
/// assert_eq!(props.click_effect, Flourish::Spin);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Orbiting {
    /// Radians per second.
    #[serde(alias = "orbitSpeed")]
    pub speed: f64,
    /// Orbit radius.
    #[serde(alias = "orbitSize")]
    pub distance: f64,
    #[serde(alias = "onClickEffect")]
    pub click_effect: Flourish,
    #[serde(alias = "orbitCount")]
    pub count: usize,
    #[serde(alias = "orbitColor", deserialize_with = "one_or_many")]
    pub colors: Vec<Color>,
    /// Shape of every orbiter when `variation` is off.
    #[serde(alias = "orbitShape")]
    pub shape: Shape,
    /// Mix shapes, sizes and radii.
    #[serde(alias = "orbitVariation")]
    pub variation: bool,
    pub flourish_ms: f64,
}

impl Default for Orbiting {
    fn default() -> Self {
        Self::new()
    }
}

impl Orbiting {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        let orbit = OrbitConfig::default();
        Self {
            speed: orbit.speed,
            distance: orbit.distance,
            click_effect: orbit.flourish,
            count: orbit.count,
            colors: orbit.palette,
            shape: Shape::Circle,
            variation: orbit.variation,
            flourish_ms: orbit.flourish_ms,
        }
    }

    /// Sets the press flourish.
    #[must_use]
    pub fn with_click_effect(mut self, effect: Flourish) -> Self {
        self.click_effect = effect;
        self
    }

    /// Gives every orbiter the same shape, size and radius.
    #[must_use]
    pub fn uniform(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self.variation = false;
        self
    }
}

/// How one flourish frame transforms the orbiters.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FlourishPose {
    /// Multiplies each orbiter's distance from the center.
    reach: f64,
    opacity: f64,
    /// Extra rotation of each orbiter about itself, degrees.
    spin: f64,
}

impl FlourishPose {
    const REST: Self = Self {
        reach: 1.0,
        opacity: 1.0,
        spin: 0.0,
    };

    fn at(effect: Flourish, progress: f64) -> Self {
        // Out and back over the flourish.
        let swell = (PI * progress).sin();
        match effect {
            Flourish::Explode => Self {
                reach: 1.0 + 2.0 * swell,
                ..Self::REST
            },
            Flourish::Converge => Self {
                reach: 1.0 - swell,
                ..Self::REST
            },
            Flourish::Disappear => Self {
                opacity: 1.0 - swell,
                ..Self::REST
            },
            Flourish::Spin => Self {
                spin: 360.0 * progress,
                ..Self::REST
            },
        }
    }
}

impl Button for Orbiting {
    const KIND: ButtonKind = ButtonKind::Orbiting;

    fn config(&self) -> EffectConfig {
        let shapes = if self.variation {
            OrbitConfig::default().shapes
        } else {
            vec![self.shape]
        };
        EffectConfig::Orbit(OrbitConfig {
            count: self.count,
            speed: self.speed,
            distance: self.distance,
            variation: self.variation,
            palette: self.colors.clone(),
            shapes,
            flourish: self.click_effect,
            flourish_ms: self.flourish_ms,
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        let pose = frame
            .flourish
            .map_or(FlourishPose::REST, |p| FlourishPose::at(self.click_effect, p));
        let particles = frame
            .entities
            .iter()
            .map(|orbiter| {
                let radial = Vector::from_angle(orbiter.rotation) * orbiter.distance;
                let mut particle = Particle::from_entity(orbiter).with_opacity(pose.opacity);
                particle.position = orbiter.position + radial * (pose.reach - 1.0);
                particle.rotation = pose.spin;
                particle
            })
            .collect();
        Appearance {
            particles,
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// LavaLamp
// ============================================================================

/// Soft blobs drift and bounce inside the button, slowly shifting hue.
///
/// Blob positions are relative to the button's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LavaLamp {
    /// Scales blob speed and hue drift.
    #[serde(alias = "waveSpeed")]
    pub wave_speed: f64,
    /// Scales blob radius.
    #[serde(alias = "blobSize")]
    pub blob_size: f64,
    #[serde(alias = "colorTransition")]
    pub color_transition: bool,
    #[serde(alias = "blobCount")]
    pub count: usize,
    #[serde(alias = "primaryColor")]
    pub primary: Color,
    #[serde(alias = "secondaryColor")]
    pub secondary: Color,
}

impl Default for LavaLamp {
    fn default() -> Self {
        Self::new()
    }
}

impl LavaLamp {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        let lava = LavaConfig::default();
        let mut palette = lava.palette.into_iter();
        Self {
            wave_speed: lava.wave_speed,
            blob_size: lava.blob_size,
            color_transition: lava.color_transition,
            count: lava.count,
            primary: palette.next().unwrap_or_else(|| Color::new("#ff6b6b")),
            secondary: palette.next().unwrap_or_else(|| Color::new("#4ecdc4")),
        }
    }

    /// Keeps blobs in their palette colors.
    #[must_use]
    pub fn without_color_transition(mut self) -> Self {
        self.color_transition = false;
        self
    }
}

impl Button for LavaLamp {
    const KIND: ButtonKind = ButtonKind::LavaLamp;

    fn config(&self) -> EffectConfig {
        EffectConfig::Lava(LavaConfig {
            count: self.count,
            wave_speed: self.wave_speed,
            blob_size: self.blob_size,
            color_transition: self.color_transition,
            palette: vec![self.primary.clone(), self.secondary.clone()],
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        let particles = frame
            .entities
            .iter()
            .map(|blob| {
                let mut particle = Particle::from_entity(blob);
                if let (true, Some(hue)) = (self.color_transition, blob.hue) {
                    particle.color = Color::new(format!("hsla({hue:.1}, 100%, 70%, 0.8)"));
                }
                particle
            })
            .collect();
        Appearance {
            particles,
            ..Appearance::resting()
        }
    }
}
