//! The engine: one frame clock, one random source, many widget sessions.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;

use crate::clock::FrameClock;
use crate::config::EffectConfig;
use crate::error::{Error, Result};
use crate::event::{IgnoreReason, Trigger, TriggerOutcome};
use crate::geometry::{AnchorSource, Size};
use crate::session::{Controller, Phase, SharedRng, Snapshot};
use crate::vector::Vector;

// Stream constant for seeded generators, so equal seeds give equal runs
// across platforms.
const RNG_STREAM: u128 = 0x0a02_bdbf_7bb3_c0a7_ac28_fa16_a64a_bf96;

/// Opaque identifier of one widget's effect session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionHandle(u64);

impl SessionHandle {
    /// The raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

struct Inner {
    clock: FrameClock,
    rng: SharedRng,
    sessions: RefCell<HashMap<SessionHandle, Rc<RefCell<Controller>>>>,
    next: Cell<u64>,
}

/// Hosts effect sessions for any number of widgets.
///
/// The engine is single-threaded and cheap to clone; clones share the same
/// sessions, clock and random source. Every method takes `&self`, so frame
/// and completion listeners may hold a clone and call back into it.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use kinetic::{BurstConfig, EffectConfig, Engine, Phase, Rect, Trigger, Vector};
///
/// let engine = Engine::seeded(42);
/// let button = engine
///     .create_session(
///         EffectConfig::Burst(BurstConfig::default()),
///         Rect::new(0.0, 0.0, 120.0, 40.0),
///     )
///     .unwrap();
///
/// let completions = Rc::new(Cell::new(0));
/// let seen = Rc::clone(&completions);
/// engine.on_complete(button, move |_| seen.set(seen.get() + 1)).unwrap();
///
/// engine.trigger(button, Trigger::Press { at: Vector::new(60.0, 20.0) });
/// assert_eq!(engine.snapshot(button).unwrap().entities.len(), 100);
///
/// let mut now = 0.0;
/// while now < 2000.0 {
///     now += 10.0;
///     engine.advance(now);
/// }
/// assert_eq!(engine.phase(button), Some(Phase::Idle));
/// assert_eq!(completions.get(), 1);
/// ```
#[derive(Clone)]
pub struct Engine {
    inner: Rc<Inner>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("now", &self.inner.clock.now())
            .field("sessions", &self.inner.sessions.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine seeded from the thread-local generator.
    pub fn new() -> Self {
        Self::with_clock(FrameClock::new(), Pcg64::from_rng(&mut rand::rng()))
    }

    /// Creates an engine whose randomized emission is reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self::with_clock(FrameClock::new(), Pcg64::new(u128::from(seed), RNG_STREAM))
    }

    /// Creates an engine driven by an existing clock.
    pub fn with_clock(clock: FrameClock, rng: Pcg64) -> Self {
        Self {
            inner: Rc::new(Inner {
                clock,
                rng: Rc::new(RefCell::new(rng)),
                sessions: RefCell::new(HashMap::new()),
                next: Cell::new(1),
            }),
        }
    }

    /// The clock the engine's sessions run on.
    pub fn clock(&self) -> &FrameClock {
        &self.inner.clock
    }

    /// Advances the clock; see [`FrameClock::tick`].
    pub fn advance(&self, now_ms: f64) -> usize {
        self.inner.clock.tick(now_ms)
    }

    /// Registers a widget.
    ///
    /// The configuration is validated up front. Ambient effects start
    /// immediately; every other effect waits in `Idle` for its trigger.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn create_session(
        &self,
        config: EffectConfig,
        anchor: impl AnchorSource + 'static,
    ) -> Result<SessionHandle> {
        config.validate()?;
        let handle = SessionHandle(self.inner.next.get());
        self.inner.next.set(handle.0 + 1);
        let family = config.family();
        let controller = Controller::new_shared(
            handle,
            config,
            Box::new(anchor),
            self.inner.clock.clone(),
            Rc::clone(&self.inner.rng),
        );
        controller.borrow_mut().start();
        self.inner
            .sessions
            .borrow_mut()
            .insert(handle, controller);
        tracing::debug!(session = %handle, effect = family, "session created");
        Ok(handle)
    }

    fn controller(&self, handle: SessionHandle) -> Option<Rc<RefCell<Controller>>> {
        self.inner.sessions.borrow().get(&handle).cloned()
    }

    fn live_controller(&self, handle: SessionHandle) -> Result<Rc<RefCell<Controller>>> {
        self.controller(handle).ok_or(Error::UnknownSession(handle))
    }

    /// Delivers an input event to a session.
    pub fn trigger(&self, handle: SessionHandle, trigger: Trigger) -> TriggerOutcome {
        match self.controller(handle) {
            Some(controller) => Controller::trigger(&controller, trigger),
            None => TriggerOutcome::Ignored(IgnoreReason::Destroyed),
        }
    }

    /// Calls `listener` with every published frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if the session does not exist.
    pub fn on_frame(
        &self,
        handle: SessionHandle,
        listener: impl Fn(&Snapshot) + 'static,
    ) -> Result<()> {
        self.live_controller(handle)?
            .borrow_mut()
            .add_frame_listener(Rc::new(listener));
        Ok(())
    }

    /// Calls `listener` each time a run comes to rest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if the session does not exist.
    pub fn on_complete(
        &self,
        handle: SessionHandle,
        listener: impl Fn(SessionHandle) + 'static,
    ) -> Result<()> {
        self.live_controller(handle)?
            .borrow_mut()
            .add_complete_listener(Rc::new(listener));
        Ok(())
    }

    /// Calls `listener` for every accepted press, before the effect reacts.
    ///
    /// Presses swallowed by a running one-shot effect never reach it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if the session does not exist.
    pub fn on_press(
        &self,
        handle: SessionHandle,
        listener: impl Fn(Vector) + 'static,
    ) -> Result<()> {
        self.live_controller(handle)?
            .borrow_mut()
            .add_press_listener(Rc::new(listener));
        Ok(())
    }

    /// Tells the session its widget changed size.
    ///
    /// Most effects re-read their anchor every tick and need no notice;
    /// effects that keep entities inside the widget clamp them to the new
    /// extent. Returns whether the session did anything.
    pub fn resize(&self, handle: SessionHandle, size: Size) -> bool {
        self.controller(handle)
            .is_some_and(|c| c.borrow_mut().resize(size))
    }

    /// Tears a session down: cancels its clock work, drops its listeners
    /// and forgets the handle. No completion is reported.
    ///
    /// Returns false if the handle was unknown. Destroying twice is a no-op.
    pub fn destroy(&self, handle: SessionHandle) -> bool {
        let Some(controller) = self.inner.sessions.borrow_mut().remove(&handle) else {
            return false;
        };
        controller.borrow_mut().destroy()
    }

    /// Current phase, or `None` for an unknown handle.
    pub fn phase(&self, handle: SessionHandle) -> Option<Phase> {
        self.controller(handle).map(|c| c.borrow().phase())
    }

    /// State as of the last tick, or `None` for an unknown handle.
    pub fn snapshot(&self, handle: SessionHandle) -> Option<Snapshot> {
        self.controller(handle).map(|c| c.borrow().snapshot())
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.inner.sessions.borrow().len()
    }

    /// True when no session is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.sessions.borrow().is_empty()
    }

    /// Number of sessions currently Active or Settling.
    pub fn live_sessions(&self) -> usize {
        self.inner
            .sessions
            .borrow()
            .values()
            .filter(|c| c.borrow().phase().is_live())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BurstConfig, DragConfig, HoverConfig};
    use crate::geometry::Rect;

    fn button() -> Rect {
        Rect::new(0.0, 0.0, 120.0, 40.0)
    }

    #[test]
    fn handles_are_distinct() {
        let engine = Engine::seeded(1);
        let a = engine
            .create_session(EffectConfig::Hover(HoverConfig::default()), button())
            .unwrap();
        let b = engine
            .create_session(EffectConfig::Hover(HoverConfig::default()), button())
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(engine.len(), 2);
        assert_eq!(a.to_string(), "session#1");
    }

    #[test]
    fn invalid_config_is_rejected_eagerly() {
        let engine = Engine::seeded(1);
        let config = EffectConfig::Drag(DragConfig {
            snap_back: -0.5,
            ..DragConfig::default()
        });
        assert!(engine.create_session(config, button()).is_err());
        assert!(engine.is_empty());
    }

    #[test]
    fn unknown_handles() {
        let engine = Engine::seeded(1);
        let handle = SessionHandle(99);
        assert_eq!(
            engine.trigger(handle, Trigger::PointerLeave),
            TriggerOutcome::Ignored(IgnoreReason::Destroyed)
        );
        assert_eq!(
            engine.on_frame(handle, |_| {}),
            Err(Error::UnknownSession(handle))
        );
        assert_eq!(engine.phase(handle), None);
        assert!(!engine.destroy(handle));
    }

    #[test]
    fn destroy_releases_clock_work() {
        let engine = Engine::seeded(1);
        let handle = engine
            .create_session(EffectConfig::Burst(BurstConfig::default()), button())
            .unwrap();
        engine.trigger(handle, Trigger::Press { at: Vector::ZERO });
        assert!(!engine.clock().is_idle());
        assert!(engine.destroy(handle));
        assert!(!engine.destroy(handle));
        engine.advance(16.0);
        assert!(engine.clock().is_idle());
    }

    #[test]
    fn equal_seeds_give_equal_bursts() {
        let run = || {
            let engine = Engine::seeded(7);
            let handle = engine
                .create_session(EffectConfig::Burst(BurstConfig::default()), button())
                .unwrap();
            engine.trigger(handle, Trigger::Press { at: Vector::ZERO });
            engine.advance(100.0);
            engine.snapshot(handle).unwrap().entities
        };
        assert_eq!(run(), run());
    }
}
