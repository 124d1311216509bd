//! One-shot particle buttons: confetti, pixel dissolve and shatter.
//!
//! All three hide their label while the burst is live and ignore presses
//! until the button has reset.
//!
//! # Example
//!
//! ```rust
//! use kinetic::EffectConfig;
//! use kinetic_buttons::{Button, Pixelate};
//!
//! let pixelate = Pixelate::new().with_speed(2.0);
//! let EffectConfig::Burst(burst) = pixelate.config() else { unreachable!() };
//! assert_eq!(burst.duration_ms, 500.0);
//! assert_eq!(burst.settle_ms, 250.0);
//! ```

use kinetic::{BurstConfig, BurstPattern, Color, EffectConfig, Phase, Shape, Snapshot, Span};
use serde::{Deserialize, Serialize};

use crate::appearance::{Appearance, Particle};
use crate::{Button, ButtonKind};

const TICKS_PER_SECOND: f64 = 60.0;
/// Fraction of launch speed a shard keeps when it reaches its distance.
const SHARD_RESIDUAL_SPEED: f64 = 0.01;
const DEFAULT_FILL: &str = "#3b82f6";

// ============================================================================
// Confetti
// ============================================================================

/// Bursts into falling confetti when pressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Confetti {
    /// Pieces per burst.
    #[serde(alias = "confettiCount")]
    pub count: usize,
    #[serde(alias = "confettiColors")]
    pub colors: Vec<Color>,
    /// Nominal piece size; pieces are drawn from half to one and a half
    /// times this.
    #[serde(alias = "confettiSize")]
    pub size: f64,
    /// Multiplies launch speed.
    #[serde(alias = "explosionForce")]
    pub explosion_force: f64,
    /// Time until the label returns.
    #[serde(alias = "resetTime")]
    pub reset_ms: f64,
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new()
    }
}

impl Confetti {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        let burst = BurstConfig::default();
        Self {
            count: burst.count,
            colors: burst.palette,
            size: 8.0,
            explosion_force: 1.0,
            reset_ms: burst.duration_ms,
        }
    }

    /// Sets the number of pieces.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the palette pieces are drawn from.
    #[must_use]
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }

    /// Sets the launch speed multiplier.
    #[must_use]
    pub fn with_force(mut self, force: f64) -> Self {
        self.explosion_force = force;
        self
    }
}

impl Button for Confetti {
    const KIND: ButtonKind = ButtonKind::Confetti;

    fn config(&self) -> EffectConfig {
        let base = BurstConfig::default();
        EffectConfig::Burst(BurstConfig {
            count: self.count,
            palette: self.colors.clone(),
            size: Span::new(self.size * 0.5, self.size * 1.5),
            speed: Span::new(
                base.speed.min * self.explosion_force,
                base.speed.max * self.explosion_force,
            ),
            duration_ms: self.reset_ms,
            lifetime_ms: Some(self.reset_ms),
            ..base
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        Appearance {
            label_opacity: if frame.phase.is_live() { 0.0 } else { 1.0 },
            particles: frame
                .entities
                .iter()
                .filter(|e| !e.is_delayed(frame.now))
                .map(Particle::from_entity)
                .collect(),
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// Pixelate
// ============================================================================

/// Dissolves into a grid of pixels when pressed, then reforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pixelate {
    /// Side of one pixel.
    #[serde(alias = "pixelSize")]
    pub pixel_size: f64,
    /// Playback rate. Every duration is divided by it.
    #[serde(alias = "pixelSpeed")]
    pub speed: f64,
    /// Pixel colors; `None` paints every pixel with `background`.
    #[serde(alias = "pixelColors")]
    pub colors: Option<Vec<Color>>,
    #[serde(alias = "backgroundColor")]
    pub background: Color,
}

impl Default for Pixelate {
    fn default() -> Self {
        Self::new()
    }
}

impl Pixelate {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pixel_size: 8.0,
            speed: 1.0,
            colors: None,
            background: Color::new(DEFAULT_FILL),
        }
    }

    /// Sets the pixel side.
    #[must_use]
    pub fn with_pixel_size(mut self, size: f64) -> Self {
        self.pixel_size = size;
        self
    }

    /// Sets the playback rate.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Time the button stays dissolved.
    pub fn dissolve_ms(&self) -> f64 {
        1000.0 / self.speed
    }

    /// Time the pixels take to reform.
    pub fn reform_ms(&self) -> f64 {
        500.0 / self.speed
    }

    // Each pixel fades over the same span it may be delayed by.
    fn fade_ms(&self) -> f64 {
        500.0 / self.speed
    }
}

impl Button for Pixelate {
    const KIND: ButtonKind = ButtonKind::Pixelate;

    fn config(&self) -> EffectConfig {
        EffectConfig::Burst(BurstConfig {
            count: 0,
            pattern: BurstPattern::Grid {
                cell: self.pixel_size,
            },
            palette: self
                .colors
                .clone()
                .unwrap_or_else(|| vec![self.background.clone()]),
            shapes: vec![Shape::Pixel],
            size: Span::fixed(self.pixel_size),
            speed: Span::fixed(0.0),
            travel: None,
            angle: Span::fixed(0.0),
            rotation: Span::fixed(0.0),
            spin: Span::fixed(0.0),
            delay: Span::new(0.0, self.fade_ms()),
            gravity: 0.0,
            friction: 1.0,
            duration_ms: self.dissolve_ms(),
            lifetime_ms: None,
            settle_ms: self.reform_ms(),
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        let fade = self.fade_ms();
        let reformed = if self.reform_ms() > 0.0 {
            ((frame.elapsed - self.dissolve_ms()) / self.reform_ms()).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let particles = frame
            .entities
            .iter()
            .map(|pixel| {
                let opacity = match frame.phase {
                    Phase::Active if fade > 0.0 => {
                        1.0 - (pixel.age(frame.now) - pixel.delay) / fade
                    }
                    Phase::Active => 0.0,
                    Phase::Settling | Phase::Idle => reformed,
                };
                let half = pixel.size / 2.0;
                let mut particle = Particle::from_entity(pixel).with_opacity(opacity);
                particle.position.x += half;
                particle.position.y += half;
                particle
            })
            .collect();
        Appearance {
            label_opacity: if frame.phase == Phase::Active { 0.0 } else { 1.0 },
            particles,
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// Shatter
// ============================================================================

/// Breaks into shards that glide outward, then reforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shatter {
    /// Seconds a shard takes to reach its resting distance.
    #[serde(alias = "shatterSpeed")]
    pub speed_s: f64,
    /// Time until the button reforms.
    #[serde(alias = "reformDelay")]
    pub reform_ms: f64,
    #[serde(alias = "shardCount")]
    pub count: usize,
    #[serde(alias = "backgroundColor")]
    pub color: Color,
}

impl Default for Shatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Shatter {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        Self {
            speed_s: 0.5,
            reform_ms: 1000.0,
            count: 15,
            color: Color::new(DEFAULT_FILL),
        }
    }

    /// Sets the number of shards.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Per-tick friction that leaves a shard with 1% of its launch speed
    /// after `speed_s`. Anything under one tick lands almost at once.
    pub fn glide_friction(&self) -> f64 {
        let ticks = self.speed_s * TICKS_PER_SECOND;
        if ticks > 1.0 {
            SHARD_RESIDUAL_SPEED.powf(ticks.recip())
        } else {
            SHARD_RESIDUAL_SPEED
        }
    }
}

impl Button for Shatter {
    const KIND: ButtonKind = ButtonKind::Shatter;

    fn config(&self) -> EffectConfig {
        EffectConfig::Burst(BurstConfig {
            count: self.count,
            palette: vec![self.color.clone()],
            shapes: vec![Shape::Shard],
            size: Span::new(10.0, 30.0),
            travel: Some(Span::new(50.0, 150.0)),
            spin: Span::fixed(0.0),
            delay: Span::new(0.0, 200.0),
            gravity: 0.0,
            friction: self.glide_friction(),
            duration_ms: self.reform_ms,
            lifetime_ms: None,
            settle_ms: 0.0,
            ..BurstConfig::default()
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        let live = frame.phase.is_live();
        Appearance {
            label_opacity: if live { 0.0 } else { 1.0 },
            particles: frame
                .entities
                .iter()
                .filter(|e| !e.is_delayed(frame.now))
                .map(|e| Particle::from_entity(e).with_opacity(1.0 - frame.progress))
                .collect(),
            ..Appearance::resting()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{approx_eq, frame};

    #[test]
    fn confetti_scales_speed_with_force() {
        let EffectConfig::Burst(burst) = Confetti::new().with_force(2.0).config() else {
            panic!("expected burst");
        };
        assert_eq!(burst.speed, Span::new(10.0, 30.0));
        assert_eq!(burst.size, Span::new(4.0, 12.0));
        assert_eq!(burst.lifetime_ms, Some(2000.0));
        assert!(EffectConfig::Burst(burst).validate().is_ok());
    }

    #[test]
    fn confetti_label_returns_at_rest() {
        let confetti = Confetti::new();
        assert_eq!(confetti.appearance(&frame(Phase::Active, 0.5)).label_opacity, 0.0);
        assert_eq!(confetti.appearance(&frame(Phase::Idle, 0.0)).label_opacity, 1.0);
    }

    #[test]
    fn pixelate_falls_back_to_background() {
        let EffectConfig::Burst(burst) = Pixelate::new().config() else {
            panic!("expected burst");
        };
        assert_eq!(burst.palette, vec![Color::new(DEFAULT_FILL)]);
        assert_eq!(burst.pattern, BurstPattern::Grid { cell: 8.0 });
        assert_eq!(burst.delay, Span::new(0.0, 500.0));
    }

    #[test]
    fn pixelate_rejects_zero_speed() {
        assert!(Pixelate::new().with_speed(0.0).config().validate().is_err());
    }

    #[test]
    fn shatter_friction_glides_to_rest() {
        let shatter = Shatter::new();
        let friction = shatter.glide_friction();
        assert!(friction > 0.0 && friction < 1.0);
        let remaining = friction.powf(shatter.speed_s * TICKS_PER_SECOND);
        assert!(approx_eq(remaining, SHARD_RESIDUAL_SPEED));
        assert_eq!(
            Shatter { speed_s: 0.0, ..shatter }.glide_friction(),
            SHARD_RESIDUAL_SPEED
        );
    }
}
