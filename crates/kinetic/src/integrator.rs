//! Per-tick numeric integration.
//!
//! One call to [`Rules::step`] is one frame of motion:
//!
//! ```text
//! velocity' = velocity * friction + (0, gravity)
//! position' = position + velocity'
//! position' += (target - position') * snap_back        (when snap_back > 0)
//! |position'| > max_distance  =>  scale position' to max_distance,
//!                                 stop or damp velocity'
//! ```
//!
//! Steps are per frame rather than per millisecond. At the rates the effects
//! are tuned for (roughly 60 Hz) this matches how they feel on screen.
//!
//! # Example
//!
//! ```rust
//! use kinetic::{Motion, Rules, Vector};
//!
//! let rules = Rules::default().with_friction(0.85).with_snap_back(0.1);
//! let mut motion = Motion::at(Vector::new(100.0, 0.0));
//! let mut ticks = 0;
//! while !rules.is_settled(motion) {
//!     motion = rules.step(motion);
//!     ticks += 1;
//! }
//! assert!(ticks < 200);
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::vector::Vector;

/// Position and velocity of one moving thing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Motion {
    pub position: Vector,
    pub velocity: Vector,
}

impl Motion {
    /// Creates a motion state.
    pub const fn new(position: Vector, velocity: Vector) -> Self {
        Self { position, velocity }
    }

    /// At rest at `position`.
    pub const fn at(position: Vector) -> Self {
        Self::new(position, Vector::ZERO)
    }
}

/// What happens to velocity when the distance clamp engages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// Velocity is zeroed.
    #[default]
    Stop,
    /// Velocity is multiplied by the given factor.
    Damp(f64),
}

/// Thresholds under which motion counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleThreshold {
    /// Maximum speed, in units per tick.
    pub velocity: f64,
    /// Maximum distance from the target.
    pub position: f64,
}

impl Default for SettleThreshold {
    fn default() -> Self {
        Self {
            velocity: 0.01,
            position: 0.1,
        }
    }
}

/// Integration rules for one entity or one widget offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    /// Fraction of velocity kept each tick, in `[0, 1]`.
    pub friction: f64,
    /// Added to vertical velocity each tick.
    pub gravity: f64,
    /// Fraction of the remaining gap to `target` closed each tick, in `[0, 1]`.
    pub snap_back: f64,
    pub target: Vector,
    /// Optional clamp on `|position|`.
    pub max_distance: Option<f64>,
    pub overflow: Overflow,
    /// Velocity components flip when a position leaves these bounds.
    pub reflect: Option<Rect>,
    pub settle: SettleThreshold,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            friction: 1.0,
            gravity: 0.0,
            snap_back: 0.0,
            target: Vector::ZERO,
            max_distance: None,
            overflow: Overflow::Stop,
            reflect: None,
            settle: SettleThreshold::default(),
        }
    }
}

impl Rules {
    /// Sets the friction coefficient.
    pub const fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Sets gravity.
    pub const fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets the snap-back factor.
    pub const fn with_snap_back(mut self, snap_back: f64) -> Self {
        self.snap_back = snap_back;
        self
    }

    /// Sets the snap-back target.
    pub const fn with_target(mut self, target: Vector) -> Self {
        self.target = target;
        self
    }

    /// Clamps `|position|` to `max`.
    pub const fn with_max_distance(mut self, max: f64, overflow: Overflow) -> Self {
        self.max_distance = Some(max);
        self.overflow = overflow;
        self
    }

    /// Bounces positions off `bounds`.
    pub const fn with_reflect(mut self, bounds: Rect) -> Self {
        self.reflect = Some(bounds);
        self
    }

    /// Overrides the settle thresholds.
    pub const fn with_settle(mut self, settle: SettleThreshold) -> Self {
        self.settle = settle;
        self
    }

    /// Checks every coefficient against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad option.
    pub fn validate(&self) -> Result<()> {
        unit_interval("friction", self.friction)?;
        unit_interval("snap_back", self.snap_back)?;
        finite("gravity", self.gravity)?;
        if let Some(max) = self.max_distance {
            positive("max_distance", max)?;
        }
        if let Overflow::Damp(factor) = self.overflow {
            unit_interval("overflow_damping", factor)?;
        }
        positive("settle.velocity", self.settle.velocity)?;
        positive("settle.position", self.settle.position)?;
        Ok(())
    }

    /// Advances one tick.
    pub fn step(&self, motion: Motion) -> Motion {
        let mut velocity = motion.velocity * self.friction + Vector::new(0.0, self.gravity);
        let mut position = motion.position + velocity;

        if self.snap_back > 0.0 {
            position += (self.target - position) * self.snap_back;
        }

        if let Some(max) = self.max_distance {
            if position.magnitude() > max {
                position = position.clamp_magnitude(max);
                velocity = match self.overflow {
                    Overflow::Stop => Vector::ZERO,
                    Overflow::Damp(factor) => velocity * factor,
                };
            }
        }

        if let Some(bounds) = self.reflect {
            // Only flip while heading further out, so a point stranded outside
            // after a resize drifts back instead of jittering in place.
            if (position.x < bounds.x && velocity.x < 0.0)
                || (position.x > bounds.right() && velocity.x > 0.0)
            {
                velocity.x = -velocity.x;
            }
            if (position.y < bounds.y && velocity.y < 0.0)
                || (position.y > bounds.bottom() && velocity.y > 0.0)
            {
                velocity.y = -velocity.y;
            }
        }

        Motion::new(position, velocity)
    }

    /// True once speed and distance to the target are both under threshold.
    pub fn is_settled(&self, motion: Motion) -> bool {
        motion.velocity.magnitude() < self.settle.velocity
            && (motion.position - self.target).magnitude() < self.settle.position
    }

    /// Steps and, once settled, snaps exactly onto the target.
    ///
    /// Returns the new motion and whether it has settled.
    pub fn step_to_rest(&self, motion: Motion) -> (Motion, bool) {
        let next = self.step(motion);
        if self.is_settled(next) {
            (Motion::at(self.target), true)
        } else {
            (next, false)
        }
    }

    /// Advances an entity one tick: motion, spin and growth.
    ///
    /// Entities still inside their start delay are left untouched. Returns
    /// false if the result is not finite, in which case the entity must be
    /// dropped.
    pub fn advance(&self, entity: &mut Entity, now: f64) -> bool {
        if entity.is_delayed(now) {
            return true;
        }
        let next = self.step(Motion::new(entity.position, entity.velocity));
        entity.position = next.position;
        entity.velocity = next.velocity;
        entity.rotation += entity.rotation_rate;
        entity.size += entity.size_rate;
        entity.is_finite()
    }
}

pub(crate) fn finite(option: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            option,
            value,
            expected: "a finite number",
        })
    }
}

pub(crate) fn non_negative(option: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            option,
            value,
            expected: "a finite number >= 0",
        })
    }
}

pub(crate) fn positive(option: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            option,
            value,
            expected: "a finite number > 0",
        })
    }
}

pub(crate) fn unit_interval(option: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            option,
            value,
            expected: "a number within [0, 1]",
        })
    }
}
