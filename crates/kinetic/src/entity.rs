//! Ephemeral visual units.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::vector::Vector;

/// Identity of an entity, unique within its pool and assigned in increasing
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    /// The raw sequence number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Category tag chosen per effect. Purely descriptive for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Line,
    Star,
    Ring,
    Blob,
    Shard,
    Pixel,
    Mark,
}

/// When an entity should be removed from its pool.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    /// Lives until its session resets.
    #[default]
    Never,
    /// Expires once this many milliseconds have passed since creation.
    After(f64),
    /// Expires once its size reaches this bound.
    SizeAtLeast(f64),
}

/// One particle, ripple, shard, pixel, trail mark, orbiter or blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub shape: Shape,
    pub color: Color,
    pub position: Vector,
    pub velocity: Vector,
    pub size: f64,
    /// Added to `size` every tick.
    pub size_rate: f64,
    /// Degrees for particles, radians for orbiters.
    pub rotation: f64,
    /// Added to `rotation` every tick.
    pub rotation_rate: f64,
    /// Orbit radius or travel distance, depending on the effect.
    pub distance: f64,
    /// Hue in degrees for color-cycling entities.
    pub hue: Option<f64>,
    /// Clock time at creation.
    pub created_at: f64,
    /// Milliseconds after creation before the entity starts moving.
    pub delay: f64,
    pub expiry: Expiry,
}

impl Entity {
    /// Milliseconds since creation.
    pub fn age(&self, now: f64) -> f64 {
        (now - self.created_at).max(0.0)
    }

    /// True while the start delay has not elapsed.
    pub fn is_delayed(&self, now: f64) -> bool {
        self.age(now) < self.delay
    }

    /// Evaluates the expiry rule at `now`.
    pub fn is_expired(&self, now: f64) -> bool {
        match self.expiry {
            Expiry::Never => false,
            Expiry::After(ms) => self.age(now) >= ms,
            Expiry::SizeAtLeast(bound) => self.size >= bound,
        }
    }

    /// Fraction of the entity's lifetime that has passed, in `[0, 1]`.
    ///
    /// Entities without a time or size bound report 0.
    pub fn life_fraction(&self, now: f64) -> f64 {
        let fraction = match self.expiry {
            Expiry::Never => 0.0,
            Expiry::After(ms) if ms > 0.0 => self.age(now) / ms,
            Expiry::After(_) => 1.0,
            Expiry::SizeAtLeast(bound) if bound > 0.0 => self.size / bound,
            Expiry::SizeAtLeast(_) => 1.0,
        };
        fraction.clamp(0.0, 1.0)
    }

    /// True when every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.size.is_finite()
            && self.rotation.is_finite()
            && self.hue.is_none_or(f64::is_finite)
    }
}
