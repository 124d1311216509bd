#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

//! # Kinetic
//!
//! A frame-driven motion engine for pointer-reactive widgets.
//!
//! Kinetic provides:
//! - **FrameClock**: one host refresh loop fanned out to frame subscriptions
//!   and timers, all cancellable through tokens
//! - **Rules**: a per-tick integrator with friction, gravity, snap-back,
//!   distance clamping and boundary reflection
//! - **Force fields**: attract, repel and tilt with a shared radius falloff
//! - **EntityPool**: randomized emission of short-lived particles
//! - **Engine**: per-widget effect sessions walking
//!   `Idle -> Active -> Settling -> Idle`
//!
//! The engine never draws. Each tick it hands a [`Snapshot`] of offsets,
//! tilt, scale and entities to the widget's frame listeners.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kinetic::{EffectConfig, Engine, FieldConfig, Rect, Trigger, Vector};
//!
//! let engine = Engine::seeded(3);
//! let button = engine
//!     .create_session(
//!         EffectConfig::Field(FieldConfig::default()),
//!         Rect::new(0.0, 0.0, 100.0, 40.0),
//!     )
//!     .unwrap();
//!
//! let offsets = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&offsets);
//! engine
//!     .on_frame(button, move |frame| sink.borrow_mut().push(frame.offset))
//!     .unwrap();
//!
//! engine.trigger(button, Trigger::PointerEnter { at: Vector::new(80.0, 20.0) });
//! engine.advance(16.0);
//!
//! // Pulled toward the pointer, which sits to the right of center.
//! assert!(offsets.borrow()[0].x > 0.0);
//! ```
//!
//! ## Threading
//!
//! Everything runs on the thread that drives the clock. Listeners are plain
//! closures and may call back into the [`Engine`] they were registered on.

mod clock;
mod color;
mod config;
mod easing;
mod engine;
mod entity;
mod error;
mod event;
mod field;
mod geometry;
mod integrator;
mod pool;
mod session;
mod vector;

pub use clock::{frame_interval, CancelToken, FrameClock, FrameTick, SubscriptionId, TimerId};
pub use color::{Color, Rgba};
pub use config::{
    BurstConfig, BurstPattern, DragConfig, EffectConfig, FieldConfig, FieldMode, Flourish,
    HoverConfig, Keyframe, LavaConfig, OrbitConfig, PulseConfig, RippleConfig, TrailConfig,
};
pub use easing::Easing;
pub use engine::{Engine, SessionHandle};
pub use entity::{Entity, EntityId, Expiry, Shape};
pub use error::{Error, Result};
pub use event::{IgnoreReason, PointerSample, PointerTracker, Trigger, TriggerOutcome};
pub use field::{pull, Attract, Repel, Tilt, TiltField, REFERENCE_STRENGTH};
pub use geometry::{AnchorSource, Rect, SharedBounds, Size};
pub use integrator::{Motion, Overflow, Rules, SettleThreshold};
pub use pool::{grid_dimensions, EmissionTemplate, EntityPool, Launch, Span};
pub use session::{Phase, Snapshot};
pub use vector::Vector;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{EffectConfig, FieldMode, Flourish};
    pub use crate::engine::{Engine, SessionHandle};
    pub use crate::error::{Error, Result};
    pub use crate::event::{Trigger, TriggerOutcome};
    pub use crate::geometry::{AnchorSource, Rect, SharedBounds, Size};
    pub use crate::session::{Phase, Snapshot};
    pub use crate::vector::Vector;
}
