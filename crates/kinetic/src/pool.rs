//! Entity pools and emission.
//!
//! A pool belongs to exactly one session. Emission draws every randomized
//! attribute uniformly from the template's ranges using the caller's random
//! source, so tests can pass a seeded generator and get repeatable pools.
//!
//! # Example
//!
//! ```rust
//! use kinetic::{EmissionTemplate, EntityPool, Rules, Span, Vector};
//! use rand::SeedableRng;
//! use rand_pcg::Pcg64;
//!
//! let mut rng = Pcg64::seed_from_u64(7);
//! let template = EmissionTemplate {
//!     lifetime: Some(2000.0),
//!     ..EmissionTemplate::default()
//! }
//! .with_speed(Span::new(5.0, 15.0));
//! let mut pool = EntityPool::new();
//! pool.emit(100, Vector::new(60.0, 20.0), &template, 0.0, &mut rng);
//! assert_eq!(pool.len(), 100);
//!
//! let rules = Rules::default().with_friction(0.98).with_gravity(0.2);
//! pool.advance(&rules, 1000.0);
//! assert_eq!(pool.len(), 100);
//! pool.advance(&rules, 2000.0);
//! assert!(pool.is_empty());
//! ```

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::entity::{Entity, EntityId, Expiry, Shape};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::integrator::Rules;
use crate::vector::Vector;

/// A closed-open numeric range `[min, max)` sampled uniformly.
///
/// Deserializes from a single number, a two-element array or a
/// `{ min, max }` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpanRepr")]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpanRepr {
    Fixed(f64),
    Pair([f64; 2]),
    Range { min: f64, max: f64 },
}

impl From<SpanRepr> for Span {
    fn from(repr: SpanRepr) -> Self {
        match repr {
            SpanRepr::Fixed(v) => Self::fixed(v),
            SpanRepr::Pair([min, max]) | SpanRepr::Range { min, max } => Self::new(min, max),
        }
    }
}

impl Span {
    /// The range `[min, max)`.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range that always yields `value`.
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    /// The range `[center - half, center + half)`.
    pub fn around(center: f64, half: f64) -> Self {
        Self::new(center - half, center + half)
    }

    /// Draws a value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    /// Returns true if `value` could have been drawn from this range.
    pub fn contains(&self, value: f64) -> bool {
        if self.max > self.min {
            value >= self.min && value < self.max
        } else {
            value == self.min
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-finite bounds and
    /// [`Error::InvertedRange`] when `min > max`.
    pub fn validate(&self, option: &'static str) -> Result<()> {
        for value in [self.min, self.max] {
            if !value.is_finite() {
                return Err(Error::InvalidConfiguration {
                    option,
                    value,
                    expected: "finite range bounds",
                });
            }
        }
        if self.min > self.max {
            return Err(Error::InvertedRange {
                option,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// How emitted entities get their initial speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Launch {
    /// Speed drawn directly, in units per tick.
    Speed(Span),
    /// Travel distance drawn, then converted to the initial speed that
    /// glides exactly that far under `friction`.
    Travel { distance: Span, friction: f64 },
}

impl Default for Launch {
    fn default() -> Self {
        Self::Speed(Span::fixed(0.0))
    }
}

/// Ranges and sets that emitted entities are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionTemplate {
    pub shapes: Vec<Shape>,
    pub palette: Vec<Color>,
    pub size: Span,
    /// Launch direction, radians.
    pub angle: Span,
    pub launch: Launch,
    /// Initial rotation.
    pub rotation: Span,
    /// Rotation added per tick.
    pub spin: Span,
    /// Size added per tick.
    pub growth: f64,
    /// Start delay, milliseconds.
    pub delay: Span,
    /// Initial hue for color-cycling entities.
    pub hue: Option<Span>,
    /// Time-based expiry; `None` keeps entities until the session resets.
    pub lifetime: Option<f64>,
    /// Size-based expiry, checked before `lifetime`.
    pub max_size: Option<f64>,
}

impl Default for EmissionTemplate {
    fn default() -> Self {
        Self {
            shapes: vec![Shape::Circle],
            palette: vec![Color::new("#ffffff")],
            size: Span::fixed(8.0),
            angle: Span::new(0.0, TAU),
            launch: Launch::default(),
            rotation: Span::fixed(0.0),
            spin: Span::fixed(0.0),
            growth: 0.0,
            delay: Span::fixed(0.0),
            hue: None,
            lifetime: None,
            max_size: None,
        }
    }
}

impl EmissionTemplate {
    /// The speed assigned to emitted entities.
    pub const fn with_speed(mut self, speed: Span) -> Self {
        self.launch = Launch::Speed(speed);
        self
    }

    fn expiry(&self) -> Expiry {
        match (self.max_size, self.lifetime) {
            (Some(bound), _) => Expiry::SizeAtLeast(bound),
            (None, Some(ms)) => Expiry::After(ms),
            (None, None) => Expiry::Never,
        }
    }

    fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
        match items.len() {
            0 => None,
            1 => items.first(),
            n => items.get(rng.random_range(0..n)),
        }
    }
}

/// The entity set of one session.
#[derive(Debug, Clone, Default)]
pub struct EntityPool {
    entities: Vec<Entity>,
    next_id: u64,
}

impl EntityPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn<R: Rng + ?Sized>(
        &mut self,
        position: Vector,
        template: &EmissionTemplate,
        now: f64,
        rng: &mut R,
    ) -> Entity {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let shape = EmissionTemplate::pick(&template.shapes, rng)
            .copied()
            .unwrap_or(Shape::Circle);
        let color = EmissionTemplate::pick(&template.palette, rng)
            .cloned()
            .unwrap_or_else(|| Color::new("currentColor"));
        let angle = template.angle.sample(rng);
        let (speed, distance) = match template.launch {
            Launch::Speed(span) => (span.sample(rng), 0.0),
            Launch::Travel { distance, friction } => {
                let d = distance.sample(rng);
                let speed = if friction > 0.0 {
                    d * (1.0 - friction) / friction
                } else {
                    0.0
                };
                (speed, d)
            }
        };

        Entity {
            id,
            shape,
            color,
            position,
            velocity: Vector::from_angle(angle) * speed,
            size: template.size.sample(rng),
            size_rate: template.growth,
            rotation: template.rotation.sample(rng),
            rotation_rate: template.spin.sample(rng),
            distance,
            hue: template.hue.map(|span| span.sample(rng)),
            created_at: now,
            delay: template.delay.sample(rng),
            expiry: template.expiry(),
        }
    }

    /// Emits `count` entities at `origin` and returns them.
    pub fn emit<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        origin: Vector,
        template: &EmissionTemplate,
        now: f64,
        rng: &mut R,
    ) -> &[Entity] {
        let start = self.entities.len();
        self.entities.reserve(count);
        for _ in 0..count {
            let entity = self.spawn(origin, template, now, rng);
            self.entities.push(entity);
        }
        &self.entities[start..]
    }

    /// Emits one entity at `position` and returns its id.
    pub fn emit_at<R: Rng + ?Sized>(
        &mut self,
        position: Vector,
        template: &EmissionTemplate,
        now: f64,
        rng: &mut R,
    ) -> EntityId {
        let entity = self.spawn(position, template, now, rng);
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Tiles `bounds` with `cell`-sized entities, row by row.
    ///
    /// Each entity sits at the top-left corner of its cell; the last row and
    /// column may overhang the bounds.
    pub fn emit_grid<R: Rng + ?Sized>(
        &mut self,
        cell: f64,
        bounds: Rect,
        template: &EmissionTemplate,
        now: f64,
        rng: &mut R,
    ) -> &[Entity] {
        let start = self.entities.len();
        if cell <= 0.0 || !cell.is_finite() {
            return &self.entities[start..];
        }
        let (cols, rows) = grid_dimensions(cell, bounds);
        self.entities.reserve(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let position = Vector::new(
                    bounds.x + col as f64 * cell,
                    bounds.y + row as f64 * cell,
                );
                let mut entity = self.spawn(position, template, now, rng);
                entity.size = cell;
                self.entities.push(entity);
            }
        }
        &self.entities[start..]
    }

    /// Integrates every entity one tick and removes the expired ones.
    ///
    /// Entities whose state stops being finite are dropped as well. Returns
    /// the number of entities removed.
    pub fn advance(&mut self, rules: &Rules, now: f64) -> usize {
        let before = self.entities.len();
        self.entities.retain_mut(|entity| {
            if !rules.advance(entity, now) {
                tracing::warn!(entity = %entity.id, "dropping entity with non-finite state");
                return false;
            }
            !entity.is_expired(now)
        });
        before - self.entities.len()
    }

    /// Removes expired entities without integrating.
    pub fn prune(&mut self, now: f64) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !e.is_expired(now));
        before - self.entities.len()
    }

    /// Keeps only the entities matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Entity) -> bool) {
        self.entities.retain(keep);
    }

    /// Removes every entity. Ids keep increasing across clears.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Looks up a live entity.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }

    /// The live entities in emission order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

/// Columns and rows needed to cover `bounds` with square cells.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn grid_dimensions(cell: f64, bounds: Rect) -> (usize, usize) {
    if cell <= 0.0 || !cell.is_finite() {
        return (0, 0);
    }
    let cols = (bounds.width.max(0.0) / cell).ceil() as usize;
    let rows = (bounds.height.max(0.0) / cell).ceil() as usize;
    (cols, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(42)
    }

    #[test]
    fn emitted_attributes_stay_in_range() {
        let template = EmissionTemplate {
            shapes: vec![Shape::Square, Shape::Triangle],
            palette: vec![Color::new("#ff6b6b"), Color::new("#4ecdc4")],
            size: Span::new(4.0, 12.0),
            spin: Span::new(-7.5, 7.5),
            launch: Launch::Speed(Span::new(5.0, 15.0)),
            ..EmissionTemplate::default()
        };
        let mut pool = EntityPool::new();
        let emitted = pool.emit(200, Vector::ZERO, &template, 0.0, &mut rng());
        for e in emitted {
            assert!(template.size.contains(e.size));
            assert!(template.spin.contains(e.rotation_rate));
            let speed = e.velocity.magnitude();
            assert!((5.0 - 1e-9..15.0 + 1e-9).contains(&speed));
            assert!(template.shapes.contains(&e.shape));
            assert!(template.palette.contains(&e.color));
        }
    }

    #[test]
    fn ids_are_monotonic_across_clears() {
        let mut pool = EntityPool::new();
        let template = EmissionTemplate::default();
        let first = pool.emit_at(Vector::ZERO, &template, 0.0, &mut rng());
        pool.clear();
        let second = pool.emit_at(Vector::ZERO, &template, 0.0, &mut rng());
        assert!(second > first);
    }

    #[test]
    fn travel_launch_glides_to_distance() {
        let template = EmissionTemplate {
            launch: Launch::Travel {
                distance: Span::fixed(100.0),
                friction: 0.9,
            },
            angle: Span::fixed(0.0),
            ..EmissionTemplate::default()
        };
        let mut pool = EntityPool::new();
        pool.emit(1, Vector::ZERO, &template, 0.0, &mut rng());
        let rules = Rules::default().with_friction(0.9);
        for i in 1..=400 {
            pool.advance(&rules, f64::from(i));
        }
        let x = pool.entities()[0].position.x;
        assert!((x - 100.0).abs() < 0.01, "x = {x}");
    }

    #[test]
    fn grid_covers_bounds_row_major() {
        let mut pool = EntityPool::new();
        let bounds = Rect::new(0.0, 0.0, 20.0, 10.0);
        let template = EmissionTemplate::default();
        let cells = pool.emit_grid(8.0, bounds, &template, 0.0, &mut rng());
        assert_eq!(cells.len(), 3 * 2);
        assert_eq!(cells[1].position, Vector::new(8.0, 0.0));
        assert_eq!(cells[3].position, Vector::new(0.0, 8.0));
        assert!(cells.iter().all(|c| c.size == 8.0));
        assert!(cells.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn size_bound_expires_growing_entities() {
        let template = EmissionTemplate {
            size: Span::fixed(0.0),
            growth: 50.0,
            max_size: Some(200.0),
            ..EmissionTemplate::default()
        };
        let mut pool = EntityPool::new();
        pool.emit_at(Vector::ZERO, &template, 0.0, &mut rng());
        let rules = Rules::default();
        for tick in 1..=3 {
            assert_eq!(pool.advance(&rules, f64::from(tick)), 0);
        }
        assert_eq!(pool.advance(&rules, 4.0), 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn delayed_entities_hold_still() {
        let template = EmissionTemplate {
            delay: Span::fixed(100.0),
            angle: Span::fixed(0.0),
            ..EmissionTemplate::default()
        }
        .with_speed(Span::fixed(5.0));
        let mut pool = EntityPool::new();
        pool.emit_at(Vector::ZERO, &template, 0.0, &mut rng());
        pool.advance(&Rules::default(), 50.0);
        assert_eq!(pool.entities()[0].position, Vector::ZERO);
        pool.advance(&Rules::default(), 100.0);
        assert_eq!(pool.entities()[0].position, Vector::new(5.0, 0.0));
    }

    #[test]
    fn span_deserializes_three_ways() {
        let fixed: Span = serde_json::from_str("3.0").unwrap();
        let pair: Span = serde_json::from_str("[1.0, 2.0]").unwrap();
        let table: Span = serde_json::from_str(r#"{"min": 1.0, "max": 2.0}"#).unwrap();
        assert_eq!(fixed, Span::fixed(3.0));
        assert_eq!(pair, table);
    }

    #[test]
    fn span_validation() {
        assert!(Span::new(1.0, 2.0).validate("size").is_ok());
        assert!(matches!(
            Span::new(2.0, 1.0).validate("size"),
            Err(Error::InvertedRange { option: "size", .. })
        ));
        assert!(Span::new(f64::NAN, 1.0).validate("size").is_err());
    }
}
