//! Hover buttons: tweened stretch, fill and glow, plus the pointer-trail
//! and ripple buttons that react to movement over them.

use kinetic::{
    Color, EffectConfig, Easing, HoverConfig, RippleConfig, Shape, Snapshot, TrailConfig,
};
use serde::{Deserialize, Serialize};

use crate::appearance::{Appearance, Fill, FillOrigin, Glow, Particle, Scale};
use crate::{Button, ButtonKind};

// ============================================================================
// Elastic
// ============================================================================

/// Axis an [`Elastic`] button stretches along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StretchDirection {
    #[default]
    Horizontal,
    Vertical,
    Both,
}

/// Stretches with an elastic overshoot while hovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Elastic {
    /// Scale factor when fully stretched.
    #[serde(alias = "stretchAmount")]
    pub stretch: f64,
    pub direction: StretchDirection,
    pub easing: Easing,
    pub duration_ms: f64,
}

impl Default for Elastic {
    fn default() -> Self {
        Self::new()
    }
}

impl Elastic {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stretch: 1.1,
            direction: StretchDirection::Horizontal,
            easing: Easing::ELASTIC,
            duration_ms: 500.0,
        }
    }

    /// Sets the stretch axis.
    #[must_use]
    pub fn with_direction(mut self, direction: StretchDirection) -> Self {
        self.direction = direction;
        self
    }
}

impl Button for Elastic {
    const KIND: ButtonKind = ButtonKind::Elastic;

    fn config(&self) -> EffectConfig {
        EffectConfig::Hover(HoverConfig {
            duration_ms: self.duration_ms,
            easing: self.easing,
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        // Progress may overshoot; so does the stretch.
        let factor = 1.0 + (self.stretch - 1.0) * frame.progress;
        let scale = match self.direction {
            StretchDirection::Horizontal => Scale { x: factor, y: 1.0 },
            StretchDirection::Vertical => Scale { x: 1.0, y: factor },
            StretchDirection::Both => Scale::uniform(factor),
        };
        Appearance {
            scale,
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// LiquidFill
// ============================================================================

/// Where a [`LiquidFill`] button starts filling from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
    /// Grows from wherever the pointer entered.
    Center,
}

/// Floods with color from one side while hovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidFill {
    #[serde(alias = "liquidColor")]
    pub color: Color,
    #[serde(alias = "fillDirection")]
    pub direction: FillDirection,
    /// Seconds for a full fill.
    #[serde(alias = "fillSpeed")]
    pub speed_s: f64,
    /// Label color at rest; `None` keeps the inherited color.
    #[serde(alias = "textColor")]
    pub text_color: Option<Color>,
    #[serde(alias = "hoverTextColor")]
    pub hover_text_color: Color,
}

impl Default for LiquidFill {
    fn default() -> Self {
        Self::new()
    }
}

impl LiquidFill {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: Color::new("#3b82f6"),
            direction: FillDirection::LeftToRight,
            speed_s: 0.5,
            text_color: None,
            hover_text_color: Color::new("white"),
        }
    }

    /// Sets the side the fill starts from.
    #[must_use]
    pub fn with_direction(mut self, direction: FillDirection) -> Self {
        self.direction = direction;
        self
    }

    fn origin(&self, entered_at: Option<kinetic::Vector>) -> FillOrigin {
        match self.direction {
            FillDirection::LeftToRight => FillOrigin::Left,
            FillDirection::RightToLeft => FillOrigin::Right,
            FillDirection::TopToBottom => FillOrigin::Top,
            FillDirection::BottomToTop => FillOrigin::Bottom,
            FillDirection::Center => entered_at.map_or(FillOrigin::Center, FillOrigin::Point),
        }
    }
}

impl Button for LiquidFill {
    const KIND: ButtonKind = ButtonKind::LiquidFill;

    fn config(&self) -> EffectConfig {
        EffectConfig::Hover(HoverConfig {
            duration_ms: self.speed_s * 1000.0,
            easing: Easing::Ease,
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        let level = frame.progress.clamp(0.0, 1.0);
        let label_color = if level >= 0.5 {
            Some(self.hover_text_color.clone())
        } else {
            self.text_color.clone()
        };
        Appearance {
            label_color,
            fill: (level > 0.0).then(|| Fill {
                color: self.color.clone(),
                origin: self.origin(frame.origin),
                radius_percent: 150.0 * level,
            }),
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// NeonGlow
// ============================================================================

/// Lights up with a layered neon glow while hovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeonGlow {
    #[serde(alias = "glowColor")]
    pub color: Color,
    /// Scales the outer glow layers.
    #[serde(alias = "glowIntensity")]
    pub intensity: f64,
    #[serde(alias = "glowDuration")]
    pub duration_s: f64,
    /// Label color; `None` uses the glow color.
    #[serde(alias = "textColor")]
    pub text_color: Option<Color>,
}

impl Default for NeonGlow {
    fn default() -> Self {
        Self::new()
    }
}

impl NeonGlow {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: Color::new("#00ffff"),
            intensity: 1.0,
            duration_s: 0.3,
            text_color: None,
        }
    }

    /// Sets the glow color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Blur radius of each glow layer.
    pub fn radii(&self) -> Vec<f64> {
        let i = self.intensity;
        vec![5.0, 10.0 * i, 15.0 * i, 20.0 * i]
    }
}

impl Button for NeonGlow {
    const KIND: ButtonKind = ButtonKind::NeonGlow;

    fn config(&self) -> EffectConfig {
        EffectConfig::Hover(HoverConfig {
            duration_ms: self.duration_s * 1000.0,
            easing: Easing::EaseInOut,
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        let level = frame.progress.clamp(0.0, 1.0);
        Appearance {
            label_color: Some(self.text_color.clone().unwrap_or_else(|| self.color.clone())),
            border_color: Some(self.color.fade(level)),
            glow: (level > 0.0).then(|| Glow {
                color: self.color.fade(0.8 * level),
                radii: self.radii(),
            }),
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// GhostTrail
// ============================================================================

/// Leaves fading marks behind the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostTrail {
    #[serde(alias = "trailColor")]
    pub color: Color,
    /// Seconds a mark stays visible.
    #[serde(alias = "trailDuration")]
    pub duration_s: f64,
    #[serde(alias = "trailSize")]
    pub size: f64,
    /// Pointer travel between marks.
    pub spacing: f64,
}

impl Default for GhostTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl GhostTrail {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        let trail = TrailConfig::default();
        Self {
            color: trail.color,
            duration_s: trail.lifetime_ms / 1000.0,
            size: trail.size,
            spacing: trail.spacing,
        }
    }
}

impl Button for GhostTrail {
    const KIND: ButtonKind = ButtonKind::GhostTrail;

    fn config(&self) -> EffectConfig {
        EffectConfig::Trail(TrailConfig {
            spacing: self.spacing,
            lifetime_ms: self.duration_s * 1000.0,
            size: self.size,
            color: self.color.clone(),
            shape: Shape::Mark,
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        Appearance {
            particles: frame
                .entities
                .iter()
                .map(|mark| {
                    Particle::from_entity(mark).with_opacity(1.0 - mark.life_fraction(frame.now))
                })
                .collect(),
            ..Appearance::resting()
        }
    }
}

// ============================================================================
// HoverRipple
// ============================================================================

/// Sends rings out from the pointer while it moves over the button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverRipple {
    #[serde(alias = "rippleColor")]
    pub color: Color,
    /// Half the size a ring reaches before it disappears.
    #[serde(alias = "rippleSize")]
    pub size: f64,
    /// Seconds a ring takes to grow.
    #[serde(alias = "rippleSpeed")]
    pub speed_s: f64,
    /// Opacity of a newborn ring.
    #[serde(alias = "rippleOpacity")]
    pub opacity: f64,
    /// Most rings at once.
    #[serde(alias = "rippleCount")]
    pub count: usize,
}

impl Default for HoverRipple {
    fn default() -> Self {
        Self::new()
    }
}

impl HoverRipple {
    /// Creates the preset with its default props.
    #[must_use]
    pub fn new() -> Self {
        let ripple = RippleConfig::default();
        Self {
            color: ripple.color,
            size: ripple.max_size / 2.0,
            speed_s: ripple.grow_ms / 1000.0,
            opacity: 0.7,
            count: ripple.max_live,
        }
    }

    fn max_size(&self) -> f64 {
        self.size * 2.0
    }
}

impl Button for HoverRipple {
    const KIND: ButtonKind = ButtonKind::HoverRipple;

    fn config(&self) -> EffectConfig {
        EffectConfig::Ripple(RippleConfig {
            max_size: self.max_size(),
            grow_ms: self.speed_s * 1000.0,
            max_live: self.count,
            color: self.color.clone(),
        })
    }

    fn appearance(&self, frame: &Snapshot) -> Appearance {
        let max = self.max_size();
        Appearance {
            particles: frame
                .entities
                .iter()
                .map(|ring| {
                    let left = if max > 0.0 { 1.0 - ring.size / max } else { 0.0 };
                    Particle::from_entity(ring).with_opacity(self.opacity * left)
                })
                .collect(),
            ..Appearance::resting()
        }
    }
}
