//! Widget geometry and the anchor collaborator.
//!
//! The layout layer owns geometry. The engine asks an [`AnchorSource`] for
//! fresh bounds every tick and never keeps them across ticks, so a resize
//! is picked up on the very next frame.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::Vector;

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in local units.
    pub width: f64,
    /// Height in local units.
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The larger of the two sides.
    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// An axis-aligned rectangle in widget-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin with the given size.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// The rectangle's size.
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The geometric center.
    pub fn center(&self) -> Vector {
        Vector::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns true if the point lies inside or on the edge.
    pub fn contains(&self, point: Vector) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Clamps a point into the rectangle.
    pub fn clamp(&self, point: Vector) -> Vector {
        Vector::new(
            point.x.clamp(self.x, self.right().max(self.x)),
            point.y.clamp(self.y, self.bottom().max(self.y)),
        )
    }

    /// Returns the rectangle if it can be used for force and layout math.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleGeometry`] when either side is zero, negative
    /// or not finite.
    pub fn measurable(self) -> Result<Self> {
        let ok = self.width.is_finite()
            && self.height.is_finite()
            && self.x.is_finite()
            && self.y.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if ok { Ok(self) } else { Err(Error::StaleGeometry) }
    }
}

/// Supplies a widget's current bounds.
///
/// `None` means the widget is not measurable yet (not laid out, detached,
/// hidden). The engine skips force computation for that tick and asks again
/// on the next one.
pub trait AnchorSource {
    /// Returns the widget's bounds in its own local coordinate space.
    fn bounds(&self) -> Option<Rect>;

    /// Bounds that are present and measurable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleGeometry`] if the source has no usable bounds.
    fn measured(&self) -> Result<Rect> {
        self.bounds().ok_or(Error::StaleGeometry)?.measurable()
    }
}

impl AnchorSource for Rect {
    fn bounds(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl<F> AnchorSource for F
where
    F: Fn() -> Option<Rect>,
{
    fn bounds(&self) -> Option<Rect> {
        self()
    }
}

/// Bounds shared between a layout owner and the engine.
///
/// Cloning yields another handle to the same cell; the layout side calls
/// [`SharedBounds::set`] whenever it re-measures.
#[derive(Debug, Clone, Default)]
pub struct SharedBounds(Rc<Cell<Option<Rect>>>);

impl SharedBounds {
    /// Creates shared bounds with an initial value.
    pub fn new(bounds: Option<Rect>) -> Self {
        Self(Rc::new(Cell::new(bounds)))
    }

    /// Publishes new bounds.
    pub fn set(&self, bounds: Option<Rect>) {
        self.0.set(bounds);
    }

    /// Reads the current bounds.
    pub fn get(&self) -> Option<Rect> {
        self.0.get()
    }
}

impl AnchorSource for SharedBounds {
    fn bounds(&self) -> Option<Rect> {
        self.get()
    }
}
