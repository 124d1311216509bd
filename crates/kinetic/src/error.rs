//! Error types for the motion engine.

use crate::engine::SessionHandle;

/// Errors surfaced by the engine.
///
/// Configuration problems are reported eagerly when a session is created.
/// Conditions that only arise while an effect is running (geometry that is
/// not measurable yet, a callback firing after teardown) are absorbed by the
/// tick that hit them and never reach the frame clock.
///
/// # Example
///
/// ```rust
/// use kinetic::{DragConfig, EffectConfig, Engine, Error, Rect};
///
/// let engine = Engine::seeded(1);
/// let config = EffectConfig::Drag(DragConfig {
///     friction: 1.5,
///     ..DragConfig::default()
/// });
/// let err = engine
///     .create_session(config, Rect::new(0.0, 0.0, 100.0, 40.0))
///     .unwrap_err();
/// assert!(matches!(err, Error::InvalidConfiguration { option: "friction", .. }));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A numeric option is outside its valid range.
    ///
    /// Values are never clamped into range on the caller's behalf: a
    /// friction of `1.2` would make motion grow without bound, and a
    /// negative radius has no meaning for a falloff curve.
    ///
    /// # Recovery
    ///
    /// Fix the option named by `option`; `expected` describes the accepted
    /// range.
    #[error("invalid configuration: `{option}` = {value} (expected {expected})")]
    InvalidConfiguration {
        /// Name of the offending option.
        option: &'static str,
        /// The rejected value.
        value: f64,
        /// Human readable description of the valid range.
        expected: &'static str,
    },

    /// A list option (palette, shape set, keyframes) is empty.
    #[error("invalid configuration: `{option}` must not be empty")]
    EmptyOption {
        /// Name of the offending option.
        option: &'static str,
    },

    /// A range option has its lower bound above its upper bound.
    #[error("invalid configuration: `{option}` range {min}..{max} is inverted")]
    InvertedRange {
        /// Name of the offending option.
        option: &'static str,
        /// Lower bound as given.
        min: f64,
        /// Upper bound as given.
        max: f64,
    },

    /// A color string is not a hex, `rgb()` or `rgba()` color.
    ///
    /// # Recovery
    ///
    /// Use one of `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or
    /// `rgba(r, g, b, a)`.
    #[error("invalid color {input:?}")]
    InvalidColor {
        /// The rejected string, trimmed.
        input: String,
    },

    /// The anchor has no measurable bounds right now.
    ///
    /// Ticks treat this as "skip the force computation and retry next
    /// frame". It only surfaces to callers when a press cannot start an
    /// effect that needs geometry to emit entities.
    #[error("anchor geometry is not measurable")]
    StaleGeometry,

    /// The handle does not name a live session.
    ///
    /// Returned when registering listeners on a destroyed handle. Triggers
    /// and destroy on unknown handles are silent no-ops instead.
    #[error("unknown session {0}")]
    UnknownSession(SessionHandle),
}

/// A specialized [`Result`](std::result::Result) for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
