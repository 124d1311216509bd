#![forbid(unsafe_code)]
// Allow these clippy lints for presentation math readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

//! # Kinetic Buttons
//!
//! Fifteen decorative button presets built on the [`kinetic`] engine.
//!
//! Every button is a props struct whose defaults reproduce the preset. A
//! button turns its props into an [`EffectConfig`] for the engine and
//! turns each published [`Snapshot`] into an [`Appearance`] a renderer can
//! paint.
//!
//! | family  | buttons |
//! |---------|---------|
//! | burst   | [`Confetti`], [`Pixelate`], [`Shatter`] |
//! | motion  | [`Bouncy`], [`Friction`] |
//! | field   | [`Magnetic`], [`MagneticRepel`], [`Depth`] |
//! | hover   | [`Elastic`], [`LiquidFill`], [`NeonGlow`], [`GhostTrail`], [`HoverRipple`] |
//! | ambient | [`Orbiting`], [`LavaLamp`] |
//!
//! ## Example
//!
//! ```rust
//! use kinetic::{Engine, Rect, Trigger, Vector};
//! use kinetic_buttons::prelude::*;
//!
//! let button = Confetti::new().with_count(20);
//! let engine = Engine::seeded(9);
//! let handle = engine
//!     .create_session(button.config(), Rect::new(0.0, 0.0, 120.0, 40.0))
//!     .unwrap();
//!
//! engine.trigger(handle, Trigger::Press { at: Vector::new(60.0, 20.0) });
//! engine.advance(16.0);
//!
//! let look = button.appearance(&engine.snapshot(handle).unwrap());
//! assert_eq!(look.label_opacity, 0.0);
//! assert_eq!(look.particles.len(), 20);
//! ```
//!
//! Props load from any serde format. [`AnyButton`] carries the preset name
//! in a `button` field:
//!
//! ```rust
//! use kinetic_buttons::{AnyButton, ButtonKind};
//!
//! let props: AnyButton =
//!     serde_json::from_str(r##"{ "button": "neon_glow", "glowColor": "#ff00ff" }"##).unwrap();
//! assert_eq!(props.kind(), ButtonKind::NeonGlow);
//! ```

pub mod ambient;
pub mod appearance;
pub mod burst;
mod catalog;
pub mod field;
pub mod hover;
pub mod motion;

pub use ambient::{LavaLamp, Orbiting};
pub use appearance::{Appearance, Fill, FillOrigin, Glow, Particle, Scale, Shadow};
pub use burst::{Confetti, Pixelate, Shatter};
pub use catalog::{AnyButton, ButtonKind, UnknownButton};
pub use field::{Depth, Magnetic, MagneticRepel};
pub use hover::{
    Elastic, FillDirection, GhostTrail, HoverRipple, LiquidFill, NeonGlow, StretchDirection,
};
pub use motion::{Bouncy, Friction};

use kinetic::{EffectConfig, Snapshot};

/// A button preset.
pub trait Button {
    /// The preset this type implements.
    const KIND: ButtonKind;

    /// Engine configuration for these props.
    fn config(&self) -> EffectConfig;

    /// Visual state for one published frame.
    fn appearance(&self, frame: &Snapshot) -> Appearance;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::appearance::Appearance;
    pub use crate::catalog::{AnyButton, ButtonKind};
    pub use crate::Button;
    pub use crate::{
        Bouncy, Confetti, Depth, Elastic, Friction, GhostTrail, HoverRipple, LavaLamp,
        LiquidFill, Magnetic, MagneticRepel, NeonGlow, Orbiting, Pixelate, Shatter,
    };
}
