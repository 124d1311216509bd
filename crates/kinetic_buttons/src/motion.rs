//! Buttons that move as a whole: bounce on press, or drag and snap back.

use kinetic::{DragConfig, EffectConfig, Easing, Keyframe, PulseConfig, Snapshot};
use serde::{Deserialize, Serialize};

use crate::appearance::Appearance;
use crate::{Button, ButtonKind};

// ============================================================================
// Bouncy
// ============================================================================

/// Hops a few times when pressed.
///
/// Each hop rises to `height`, drops back a quarter, then lands. Presses
/// are ignored until one further hop's time has passed after landing.
///
/// ```rust
/// use kinetic::EffectConfig;
/// use kinetic_buttons::{Bouncy, Button};
///
/// let EffectConfig::Pulse(pulse) = Bouncy::new().config() else { unreachable!() };
/// assert_eq!(pulse.duration_ms, 600.0);
/// assert_eq!(pulse.settle_ms, 300.0);
/// assert_eq!(pulse.keyframes[1].offset.y, -20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bouncy {
    /// Peak lift.
    #[serde(alias = "bounceHeight")]
    pub height: f64,
    /// Seconds per hop.
    #[serde(alias = "bounceSpeed")]
    pub speed_s: f64,
    #[serde(alias = "bounceEasing")]
    pub easing: Easing,
    /// Hops per press; zero counts as one.
    #[serde(alias = "bounceCount")]
    pub count: u32,
}

impl Default for Bouncy {
    fn default() -> Self {
        Self::new()
    }
}

impl Bouncy {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        Self {
            height: 20.0,
            speed_s: 0.3,
            easing: Easing::BACK_OUT,
            count: 2,
        }
    }

    /// Sets the peak lift.
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Sets the number of hops.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

impl Button for Bouncy {
    const KIND: ButtonKind = ButtonKind::Bouncy;

    fn config(&self) -> EffectConfig {
        let count = f64::from(self.count.max(1));
        EffectConfig::Pulse(PulseConfig {
            keyframes: vec![
                Keyframe::lift(0.0, 0.0),
                Keyframe::lift(0.5 / count, -self.height),
                Keyframe::lift(0.75 / count, -self.height / 4.0),
                Keyframe::lift(1.0, 0.0),
            ],
            duration_ms: self.speed_s * count * 1000.0,
            settle_ms: self.speed_s * 1000.0,
            easing: self.easing,
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        Appearance {
            translate: frame.offset,
            scale: crate::Scale::uniform(frame.scale),
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// Friction
// ============================================================================

/// Can be dragged around, sliding with friction and springing home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Friction {
    /// Fraction of velocity kept per tick.
    pub friction: f64,
    /// Whether the button springs back to where it started.
    #[serde(alias = "snapBack")]
    pub snap_back: bool,
    /// Fraction of the remaining distance covered per tick when springing
    /// back.
    #[serde(alias = "snapBackSpeed")]
    pub snap_back_speed: f64,
    #[serde(alias = "maxDistance")]
    pub max_distance: f64,
}

impl Default for Friction {
    fn default() -> Self {
        Self::new()
    }
}

impl Friction {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        let drag = DragConfig::default();
        Self {
            friction: drag.friction,
            snap_back: true,
            snap_back_speed: drag.snap_back,
            max_distance: 200.0,
        }
    }

    /// Leaves the button where it is released.
    #[must_use]
    pub fn without_snap_back(mut self) -> Self {
        self.snap_back = false;
        self
    }
}

impl Button for Friction {
    const KIND: ButtonKind = ButtonKind::Friction;

    fn config(&self) -> EffectConfig {
        EffectConfig::Drag(DragConfig {
            friction: self.friction,
            snap_back: if self.snap_back {
                self.snap_back_speed
            } else {
                0.0
            },
            max_distance: Some(self.max_distance),
            ..DragConfig::default()
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        Appearance {
            translate: frame.offset,
            ..Appearance::resting()
        }
    }
}
