//! Pointer-driven force fields.
//!
//! All three fields use the same radius-bounded linear falloff:
//!
//! ```text
//! pull = (radius - distance) / radius     for distance < radius
//! pull = 0                                otherwise
//! ```

use serde::Serialize;

use crate::error::Result;
use crate::geometry::Rect;
use crate::integrator::{non_negative, positive};
use crate::vector::Vector;

/// Strength that maps to "move by the full pull-weighted offset".
pub const REFERENCE_STRENGTH: f64 = 100.0;

/// Linear falloff inside `radius`.
///
/// Returns 1 at the center, approaching 0 at the edge, and exactly 0 at or
/// beyond the edge.
pub fn pull(distance: f64, radius: f64) -> f64 {
    if distance >= radius || radius <= 0.0 {
        return 0.0;
    }
    (radius - distance) / radius
}

/// Draws the widget toward the pointer.
///
/// # Example
///
/// ```rust
/// use kinetic::{Attract, Vector};
///
/// let field = Attract::new(100.0, 50.0);
/// let offset = field.displacement(Vector::new(50.0, 0.0), Vector::ZERO);
/// assert_eq!(offset, Vector::new(12.5, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attract {
    pub radius: f64,
    pub strength: f64,
    pub reference_strength: f64,
}

impl Attract {
    /// Creates an attracting field with the default reference strength.
    pub const fn new(radius: f64, strength: f64) -> Self {
        Self {
            radius,
            strength,
            reference_strength: REFERENCE_STRENGTH,
        }
    }

    /// Displacement of the widget for a pointer at `pointer`.
    pub fn displacement(&self, pointer: Vector, anchor: Vector) -> Vector {
        let delta = pointer - anchor;
        let pull = pull(delta.magnitude(), self.radius);
        if pull == 0.0 {
            return Vector::ZERO;
        }
        delta * (pull * self.strength / self.reference_strength)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) for a non-positive radius or
    /// reference strength, or a negative strength.
    pub fn validate(&self) -> Result<()> {
        positive("radius", self.radius)?;
        non_negative("strength", self.strength)?;
        positive("reference_strength", self.reference_strength)
    }
}

/// Pushes the widget away from the pointer.
///
/// Distance is measured from where the widget currently is (anchor plus its
/// current offset), not from its rest position. As the widget moves away
/// the pointer's influence weakens, which gives the return path its slight
/// asymmetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repel {
    pub radius: f64,
    /// Scales the falloff before it is applied to `max_displacement`.
    pub strength: f64,
    pub max_displacement: f64,
}

impl Repel {
    /// Creates a repelling field.
    pub const fn new(radius: f64, strength: f64, max_displacement: f64) -> Self {
        Self {
            radius,
            strength,
            max_displacement,
        }
    }

    /// New offset of the widget for a pointer at `pointer`, or `None` when
    /// the pointer is out of reach and the widget should stay where it is.
    pub fn displacement(
        &self,
        pointer: Vector,
        anchor: Vector,
        current_offset: Vector,
    ) -> Option<Vector> {
        let delta = pointer - (anchor + current_offset);
        let distance = delta.magnitude();
        let pull = pull(distance, self.radius);
        if pull == 0.0 {
            return None;
        }
        let direction = if distance == 0.0 {
            Vector::new(1.0, 0.0)
        } else {
            delta * (1.0 / distance)
        };
        Some(
            (-direction * (pull * self.strength * self.max_displacement))
                .clamp_magnitude(self.max_displacement),
        )
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) for a non-positive radius or
    /// a negative strength or maximum.
    pub fn validate(&self) -> Result<()> {
        positive("radius", self.radius)?;
        non_negative("strength", self.strength)?;
        non_negative("max_displacement", self.max_displacement)
    }
}

/// Two rotation angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Tilt {
    /// Rotation about the horizontal axis, driven by vertical pointer offset.
    pub x: f64,
    /// Rotation about the vertical axis, driven by horizontal pointer offset.
    pub y: f64,
}

impl Tilt {
    /// No rotation.
    pub const FLAT: Self = Self { x: 0.0, y: 0.0 };

    /// Interpolates toward `other`.
    pub fn lerp(&self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Maps pointer position within the bounds to a tilt.
///
/// Horizontal offset from the center drives `y` positively; vertical offset
/// drives `x` negatively, so the surface leans toward the pointer
/// horizontally and away from it vertically.
///
/// # Example
///
/// ```rust
/// use kinetic::{Rect, TiltField, Vector};
///
/// let field = TiltField::new(15.0);
/// let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
/// let tilt = field.tilt(Vector::new(200.0, 0.0), bounds).unwrap();
/// assert_eq!((tilt.x, tilt.y), (15.0, 15.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltField {
    pub max_angle: f64,
}

impl TiltField {
    /// Creates a tilt field.
    pub const fn new(max_angle: f64) -> Self {
        Self { max_angle }
    }

    /// Rotation for a pointer at `pointer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleGeometry`](crate::Error::StaleGeometry) when
    /// `bounds` has no area.
    pub fn tilt(&self, pointer: Vector, bounds: Rect) -> Result<Tilt> {
        let bounds = bounds.measurable()?;
        let half_w = bounds.width / 2.0;
        let half_h = bounds.height / 2.0;
        let local = pointer - Vector::new(bounds.x, bounds.y);
        let y = ((local.x - half_w) / half_w) * self.max_angle;
        let x = -((local.y - half_h) / half_h) * self.max_angle;
        Ok(Tilt {
            x: x.clamp(-self.max_angle, self.max_angle),
            y: y.clamp(-self.max_angle, self.max_angle),
        })
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) for a negative or
    /// non-finite angle.
    pub fn validate(&self) -> Result<()> {
        non_negative("max_angle", self.max_angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const TOLERANCE: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn pull_edges() {
        assert_eq!(pull(0.0, 100.0), 1.0);
        assert_eq!(pull(100.0, 100.0), 0.0);
        assert_eq!(pull(150.0, 100.0), 0.0);
        assert!(approx_eq(pull(50.0, 100.0), 0.5));
    }

    #[test]
    fn attract_half_pull_half_strength() {
        let field = Attract::new(100.0, 50.0);
        let delta = Vector::new(30.0, 40.0);
        let offset = field.displacement(Vector::new(10.0, 10.0) + delta, Vector::new(10.0, 10.0));
        assert!(approx_eq(offset.magnitude(), 50.0 * 0.5 * 0.5));
        assert!(approx_eq(offset.x / offset.y, 0.75));
    }

    #[test]
    fn repel_points_away_and_is_clamped() {
        let field = Repel::new(200.0, 0.5, 30.0);
        let offset = field
            .displacement(Vector::new(60.0, 50.0), Vector::new(50.0, 50.0), Vector::ZERO)
            .unwrap();
        assert!(offset.x < 0.0);
        assert!(approx_eq(offset.y, 0.0));
        assert!(offset.magnitude() <= 30.0);

        let strong = Repel::new(200.0, 5.0, 30.0);
        let offset = strong
            .displacement(Vector::new(51.0, 50.0), Vector::new(50.0, 50.0), Vector::ZERO)
            .unwrap();
        assert!(approx_eq(offset.magnitude(), 30.0));
    }

    #[test]
    fn repel_measures_from_displaced_position() {
        let field = Repel::new(100.0, 0.5, 30.0);
        let anchor = Vector::new(50.0, 50.0);
        let pointer = Vector::new(70.0, 50.0);
        let at_rest = field.displacement(pointer, anchor, Vector::ZERO).unwrap();
        let displaced = field
            .displacement(pointer, anchor, Vector::new(-10.0, 0.0))
            .unwrap();
        // Further from the displaced widget, so the push is weaker.
        assert!(displaced.magnitude() < at_rest.magnitude());
    }

    #[test]
    fn repel_on_top_of_widget_pushes_left() {
        let field = Repel::new(100.0, 0.5, 30.0);
        let offset = field
            .displacement(Vector::new(5.0, 5.0), Vector::new(5.0, 5.0), Vector::ZERO)
            .unwrap();
        assert!(approx_eq(offset.x, -15.0));
    }

    #[test]
    fn repel_out_of_reach_leaves_widget_alone() {
        let field = Repel::new(100.0, 0.5, 30.0);
        let anchor = Vector::new(50.0, 50.0);
        assert_eq!(field.displacement(Vector::new(250.0, 50.0), anchor, Vector::ZERO), None);
        // Measured from the displaced position: in reach at rest, out of reach once pushed.
        let pointer = Vector::new(145.0, 50.0);
        assert!(field.displacement(pointer, anchor, Vector::ZERO).is_some());
        assert_eq!(field.displacement(pointer, anchor, Vector::new(-10.0, 0.0)), None);
    }

    #[test]
    fn tilt_sign_convention() {
        let field = TiltField::new(15.0);
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);

        let right = field.tilt(Vector::new(150.0, 50.0), bounds).unwrap();
        assert!(approx_eq(right.y, 7.5));
        assert!(approx_eq(right.x, 0.0));

        let below = field.tilt(Vector::new(100.0, 75.0), bounds).unwrap();
        assert!(approx_eq(below.x, -7.5));

        let center = field.tilt(bounds.center(), bounds).unwrap();
        assert_eq!(center, Tilt::FLAT);
    }

    #[test]
    fn tilt_is_clamped_outside_bounds() {
        let field = TiltField::new(15.0);
        let tilt = field
            .tilt(Vector::new(-500.0, 900.0), Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        assert_eq!((tilt.x, tilt.y), (-15.0, -15.0));
    }

    #[test]
    fn tilt_without_area_is_stale() {
        let field = TiltField::new(15.0);
        assert_eq!(
            field.tilt(Vector::ZERO, Rect::default()),
            Err(Error::StaleGeometry)
        );
    }

    #[test]
    fn validation() {
        assert!(Attract::new(-1.0, 50.0).validate().is_err());
        assert!(Attract::new(100.0, -5.0).validate().is_err());
        assert!(Repel::new(0.0, 0.5, 30.0).validate().is_err());
        assert!(TiltField::new(f64::INFINITY).validate().is_err());
    }
}
