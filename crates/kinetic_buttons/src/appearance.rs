//! Renderer-neutral visual state.
//!
//! An [`Appearance`] is what a button looks like on one frame: the widget's
//! transform, its label, any glow, fill or shadow, and the particles drawn
//! over it. Buttons derive one from each [`Snapshot`](kinetic::Snapshot);
//! a renderer only has to paint it.
//!
//! # Example
//!
//! ```rust
//! use kinetic::{Tilt, Vector};
//! use kinetic_buttons::appearance::Appearance;
//!
//! let look = Appearance {
//!     translate: Vector::new(4.0, -2.0),
//!     tilt: Tilt { x: 10.0, y: 0.0 },
//!     ..Appearance::resting()
//! };
//! assert_eq!(look.transform(), "translate(4px, -2px) rotateX(10deg)");
//! ```

use std::fmt::Write as _;

use kinetic::{Color, Entity, Shape, Tilt, Vector};
use serde::Serialize;

/// Horizontal and vertical scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    /// No scaling.
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };

    /// The same factor on both axes.
    pub const fn uniform(factor: f64) -> Self {
        Self {
            x: factor,
            y: factor,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.x == 1.0 && self.y == 1.0
    }
}

/// A drop shadow below the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shadow {
    pub offset_y: f64,
    pub blur: f64,
    pub color: Color,
}

/// Layered outer glow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Glow {
    pub color: Color,
    /// Blur radius of each layer, innermost first.
    pub radii: Vec<f64>,
}

/// Where a fill grows from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOrigin {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    /// A point in the widget's bounds coordinates.
    Point(Vector),
}

/// A circular fill revealed over the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    pub color: Color,
    pub origin: FillOrigin,
    /// Radius of the revealed circle as a percentage of the widget.
    pub radius_percent: f64,
}

/// One drawable particle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub shape: Shape,
    pub color: Color,
    /// Center, in the widget's bounds coordinates.
    pub position: Vector,
    pub size: f64,
    /// Degrees.
    pub rotation: f64,
    pub opacity: f64,
}

impl Particle {
    /// A fully opaque particle drawn where the entity is.
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            shape: entity.shape,
            color: entity.color.clone(),
            position: entity.position,
            size: entity.size,
            rotation: entity.rotation,
            opacity: 1.0,
        }
    }

    /// Sets the opacity, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

/// Everything a renderer needs to draw a button for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appearance {
    /// Widget translation.
    pub translate: Vector,
    /// Translation toward the viewer.
    pub translate_z: f64,
    pub scale: Scale,
    /// Rotation about the x and y axes, degrees.
    pub tilt: Tilt,
    /// Perspective distance for 3D transforms.
    pub perspective: Option<f64>,
    /// Opacity of the button's label.
    pub label_opacity: f64,
    /// Label color override.
    pub label_color: Option<Color>,
    /// Border color override.
    pub border_color: Option<Color>,
    pub shadow: Option<Shadow>,
    pub glow: Option<Glow>,
    pub fill: Option<Fill>,
    pub particles: Vec<Particle>,
}

impl Default for Appearance {
    fn default() -> Self {
        Self::resting()
    }
}

impl Appearance {
    /// A button with no effect applied.
    pub fn resting() -> Self {
        Self {
            translate: Vector::ZERO,
            translate_z: 0.0,
            scale: Scale::IDENTITY,
            tilt: Tilt::FLAT,
            perspective: None,
            label_opacity: 1.0,
            label_color: None,
            border_color: None,
            shadow: None,
            glow: None,
            fill: None,
            particles: Vec::new(),
        }
    }

    /// Formats the widget transform in CSS transform syntax.
    ///
    /// Identity components are left out; a resting widget yields `"none"`.
    pub fn transform(&self) -> String {
        let mut out = String::new();
        let mut push = |part: std::fmt::Arguments<'_>| {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = out.write_fmt(part);
        };
        if let Some(perspective) = self.perspective {
            push(format_args!("perspective({}px)", round(perspective)));
        }
        if self.translate != Vector::ZERO {
            push(format_args!(
                "translate({}px, {}px)",
                round(self.translate.x),
                round(self.translate.y)
            ));
        }
        if self.translate_z != 0.0 {
            push(format_args!("translateZ({}px)", round(self.translate_z)));
        }
        if self.tilt.x != 0.0 {
            push(format_args!("rotateX({}deg)", round(self.tilt.x)));
        }
        if self.tilt.y != 0.0 {
            push(format_args!("rotateY({}deg)", round(self.tilt.y)));
        }
        if !self.scale.is_identity() {
            if self.scale.x == self.scale.y {
                push(format_args!("scale({})", round(self.scale.x)));
            } else {
                push(format_args!(
                    "scale({}, {})",
                    round(self.scale.x),
                    round(self.scale.y)
                ));
            }
        }
        if out.is_empty() {
            out.push_str("none");
        }
        out
    }

    /// Particles that would actually be visible.
    pub fn visible_particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.opacity > 0.0 && p.size > 0.0)
    }
}

// Three decimals keeps transforms readable without visible jitter.
fn round(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}
