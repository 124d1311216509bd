//! Pointer-field buttons: drawn toward the pointer, pushed away from it, or
//! tilted in 3D to face it.

use kinetic::{Color, EffectConfig, Easing, FieldConfig, FieldMode, Phase, Snapshot};
use serde::{Deserialize, Serialize};

use crate::appearance::{Appearance, Shadow};
use crate::{Button, ButtonKind};

// ============================================================================
// Magnetic
// ============================================================================

/// Leans toward a nearby pointer and eases home when it leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Magnetic {
    /// Pull strength; 100 follows the pointer all the way near the center.
    pub strength: f64,
    /// Pointer distance beyond which the button does not react.
    pub radius: f64,
    #[serde(alias = "returnSpeed")]
    pub return_ms: f64,
}

impl Default for Magnetic {
    fn default() -> Self {
        Self::new()
    }
}

impl Magnetic {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strength: 50.0,
            radius: 100.0,
            return_ms: 300.0,
        }
    }

    /// Sets the pull strength.
    #[must_use]
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }
}

impl Button for Magnetic {
    const KIND: ButtonKind = ButtonKind::Magnetic;

    fn config(&self) -> EffectConfig {
        EffectConfig::Field(FieldConfig {
            mode: FieldMode::Attract,
            radius: Some(self.radius),
            strength: self.strength,
            return_ms: self.return_ms,
            return_easing: Easing::Ease,
            ..FieldConfig::default()
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        Appearance {
            translate: frame.offset,
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// MagneticRepel
// ============================================================================

/// Shies away from the pointer, up to a fixed displacement.
///
/// The influence radius follows the button: twice its longest side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticRepel {
    /// Fraction of the pointer's closeness turned into displacement.
    #[serde(alias = "repelStrength")]
    pub strength: f64,
    #[serde(alias = "maxDisplacement")]
    pub max_displacement: f64,
    /// Seconds to return home once the pointer leaves.
    #[serde(alias = "returnSpeed")]
    pub return_s: f64,
}

impl Default for MagneticRepel {
    fn default() -> Self {
        Self::new()
    }
}

impl MagneticRepel {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strength: 0.5,
            max_displacement: 30.0,
            return_s: 0.3,
        }
    }
}

impl Button for MagneticRepel {
    const KIND: ButtonKind = ButtonKind::MagneticRepel;

    fn config(&self) -> EffectConfig {
        EffectConfig::Field(FieldConfig {
            mode: FieldMode::Repel,
            radius: None,
            strength: self.strength,
            max_displacement: self.max_displacement,
            return_ms: self.return_s * 1000.0,
            return_easing: Easing::EaseOutCubic,
            ..FieldConfig::default()
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        Appearance {
            translate: frame.offset,
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// Depth
// ============================================================================

/// Rises toward the viewer and tilts to face the pointer.
///
/// ```rust
/// use kinetic_buttons::{Button, Depth};
///
/// let depth = Depth::new();
/// # let engine = kinetic::Engine::seeded(0);
/// # let handle = engine
/// #     .create_session(depth.config(), kinetic::Rect::new(0.0, 0.0, 120.0, 40.0))
/// #     .unwrap();
/// let resting = depth.appearance(&engine.snapshot(handle).unwrap());
/// assert_eq!(resting.translate_z, 0.0);
/// assert_eq!(resting.shadow.unwrap().blur, 1.6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Depth {
    /// Largest tilt in degrees.
    #[serde(alias = "rotationAngle")]
    pub rotation_angle: f64,
    /// Lift toward the viewer while hovered.
    pub depth: f64,
    /// Shadow darkness, `[0, 1]`.
    #[serde(alias = "shadowIntensity")]
    pub shadow_intensity: f64,
    pub perspective: f64,
}

impl Default for Depth {
    fn default() -> Self {
        Self::new()
    }
}

impl Depth {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rotation_angle: 15.0,
            depth: 30.0,
            shadow_intensity: 0.2,
            perspective: 800.0,
        }
    }

    /// Sets the largest tilt.
    #[must_use]
    pub fn with_rotation_angle(mut self, degrees: f64) -> Self {
        self.rotation_angle = degrees;
        self
    }

    fn shadow(&self, raised: bool) -> Shadow {
        let s = self.shadow_intensity;
        let (offset, blur, alpha) = if raised {
            (10.0 * s, 20.0 * s, s)
        } else {
            (4.0 * s, 8.0 * s, s / 2.0)
        };
        Shadow {
            offset_y: offset,
            blur,
            color: Color::new(format!("rgba(0, 0, 0, {alpha})")),
        }
    }
}

impl Button for Depth {
    const KIND: ButtonKind = ButtonKind::Depth;

    fn config(&self) -> EffectConfig {
        EffectConfig::Field(FieldConfig {
            mode: FieldMode::Tilt,
            max_angle: self.rotation_angle,
            return_ms: 0.0,
            ..FieldConfig::default()
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        let raised = frame.phase == Phase::Active;
        Appearance {
            translate_z: if raised { self.depth } else { 0.0 },
            tilt: frame.tilt,
            perspective: Some(self.perspective),
            shadow: Some(self.shadow(raised)),
            ..Appearance::resting()
        }
    }
}
