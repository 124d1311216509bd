//! Per-widget effect lifecycle.
//!
//! Every widget gets one [`Controller`]. A controller owns at most one live
//! [`Session`] (a run from trigger to rest) and walks it through
//! `Idle -> Active -> Settling -> Idle`:
//!
//! - One-shot families (burst, pulse) start on press and ignore further
//!   presses until they are back to Idle.
//! - Continuous families (field, drag, trail, ripple, hover) follow the
//!   pointer. Coming back while Settling resumes the same run rather than
//!   starting a second one.
//! - Ambient families (orbit, lava) start when the session is created and
//!   stay Active until destroyed.
//!
//! Each run registers its frame subscription and timers under its own
//! [`CancelToken`]; cancelling the token is how a run is stopped, whether it
//! finished, was superseded or the widget was destroyed. Listener callbacks
//! are collected while the controller is borrowed and invoked after the
//! borrow is released, so listeners may call back into the engine.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};

use rand_pcg::Pcg64;
use serde::Serialize;

use crate::clock::{CancelToken, FrameClock, FrameTick, SubscriptionId, TimerId};
use crate::config::{
    BurstConfig, BurstPattern, DragConfig, EffectConfig, FieldConfig, FieldMode, HoverConfig,
    LavaConfig, OrbitConfig, PulseConfig, RippleConfig, TrailConfig,
};
use crate::engine::SessionHandle;
use crate::entity::Entity;
use crate::error::Result;
use crate::event::{IgnoreReason, PointerTracker, Trigger, TriggerOutcome};
use crate::field::{Attract, Repel, Tilt, TiltField};
use crate::geometry::{AnchorSource, Rect, Size};
use crate::integrator::{Motion, Rules};
use crate::pool::{EmissionTemplate, EntityPool, Span};
use crate::vector::Vector;

pub(crate) type SharedRng = Rc<RefCell<Pcg64>>;
type FrameListener = Rc<dyn Fn(&Snapshot)>;
type CompleteListener = Rc<dyn Fn(SessionHandle)>;
type PressListener = Rc<dyn Fn(Vector)>;

/// Lifecycle state of a widget's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Active,
    Settling,
}

impl Phase {
    /// Active or Settling.
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// State published to frame listeners once per tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub handle: SessionHandle,
    /// Number of the run this frame belongs to, starting at 1.
    pub run: u64,
    pub phase: Phase,
    /// Clock time of the frame.
    pub now: f64,
    /// Milliseconds since the run started.
    pub elapsed: f64,
    /// Family-specific progress: burst and pulse time fraction, hover tween
    /// value (may overshoot with elastic easing).
    pub progress: f64,
    /// Widget translation.
    pub offset: Vector,
    pub scale: f64,
    pub tilt: Tilt,
    /// Pointer position the effect is anchored to, when it has one.
    pub origin: Option<Vector>,
    /// Progress of a press flourish running over an ambient effect.
    pub flourish: Option<f64>,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pose {
    offset: Vector,
    scale: f64,
    tilt: Tilt,
    progress: f64,
    origin: Option<Vector>,
    flourish: Option<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            offset: Vector::ZERO,
            scale: 1.0,
            tilt: Tilt::FLAT,
            progress: 0.0,
            origin: None,
            flourish: None,
        }
    }
}

/// What to do with the widget's pose when a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rest {
    Reset,
    /// Keep the offset (drag without snap-back).
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Settle,
    Flourish,
}

/// One run of an effect.
struct Session {
    run: u64,
    started_at: f64,
    token: CancelToken,
    frame: SubscriptionId,
    timer: Option<TimerId>,
    pool: EntityPool,
    settle_started: Option<f64>,
}

#[derive(Default)]
struct Listeners {
    frame: Vec<FrameListener>,
    complete: Vec<CompleteListener>,
    press: Vec<PressListener>,
}

/// Listener calls gathered under a borrow, made after it is released.
#[must_use]
pub(crate) struct Delivery {
    teardown: CancelToken,
    handle: SessionHandle,
    snapshot: Option<Snapshot>,
    frame: Vec<FrameListener>,
    complete: Vec<CompleteListener>,
}

impl Delivery {
    pub(crate) fn deliver(self) {
        if let Some(snapshot) = &self.snapshot {
            for listener in &self.frame {
                if self.teardown.is_cancelled() {
                    return;
                }
                listener(snapshot);
            }
        }
        for listener in &self.complete {
            if self.teardown.is_cancelled() {
                return;
            }
            listener(self.handle);
        }
    }
}

/// Everything a controller owns apart from its effect family's state.
struct Core {
    handle: SessionHandle,
    anchor: Box<dyn AnchorSource>,
    clock: FrameClock,
    rng: SharedRng,
    weak: Weak<RefCell<Controller>>,
    teardown: CancelToken,
    phase: Phase,
    session: Option<Session>,
    runs: u64,
    pose: Pose,
    /// Latest unprocessed pointer position; newer samples replace it.
    pending: Option<Vector>,
    tracker: PointerTracker,
    listeners: Listeners,
}

impl Core {
    fn bounds(&self) -> Result<Rect> {
        self.anchor.measured()
    }

    fn begin(&mut self, now: f64) {
        self.cancel_session();
        self.runs += 1;
        let token = CancelToken::new();
        let frame = self.subscribe_frames(&token);
        self.session = Some(Session {
            run: self.runs,
            started_at: now,
            token,
            frame,
            timer: None,
            pool: EntityPool::new(),
            settle_started: None,
        });
        self.phase = Phase::Active;
        tracing::debug!(session = %self.handle, run = self.runs, "effect started");
    }

    fn subscribe_frames(&self, token: &CancelToken) -> SubscriptionId {
        let weak = self.weak.clone();
        let guard = token.clone();
        self.clock.subscribe_with(token.clone(), move |tick| {
            if let Some(controller) = weak.upgrade() {
                Controller::on_tick(&controller, &guard, tick);
            }
        })
    }

    fn schedule(&mut self, delay_ms: f64, kind: TimerKind) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let weak = self.weak.clone();
        let guard = session.token.clone();
        let id = self
            .clock
            .schedule_with(session.token.clone(), delay_ms, move |now| {
                if let Some(controller) = weak.upgrade() {
                    Controller::on_timer(&controller, &guard, kind, now);
                }
            });
        if kind == TimerKind::Settle {
            session.timer = Some(id);
        }
    }

    /// Active -> Settling. Finishes on the spot when there is nothing to
    /// wait for, otherwise arms the settle timer.
    fn settle_after(&mut self, now: f64, delay_ms: f64, rest: Rest) -> Option<Delivery> {
        self.settle(now);
        if delay_ms <= 0.0 {
            return Some(self.finish(now, rest));
        }
        self.schedule(delay_ms, TimerKind::Settle);
        None
    }

    fn settle(&mut self, now: f64) {
        if let Some(session) = self.session.as_mut() {
            session.settle_started = Some(now);
        }
        self.phase = Phase::Settling;
        tracing::debug!(session = %self.handle, run = self.runs, "effect settling");
    }

    /// Settling -> Active within the same run.
    fn resume(&mut self) -> bool {
        if self.phase != Phase::Settling {
            return false;
        }
        if let Some(session) = self.session.as_mut() {
            session.settle_started = None;
            if let Some(timer) = session.timer.take() {
                self.clock.cancel_timer(timer);
            }
        }
        self.phase = Phase::Active;
        true
    }

    /// Starts a run from Idle or resumes a settling one.
    fn engage(&mut self, now: f64) -> TriggerOutcome {
        match self.phase {
            Phase::Idle => {
                self.begin(now);
                TriggerOutcome::Started
            }
            Phase::Settling => {
                self.resume();
                TriggerOutcome::Started
            }
            Phase::Active => TriggerOutcome::Updated,
        }
    }

    fn finish(&mut self, now: f64, rest: Rest) -> Delivery {
        let Some(session) = self.session.take() else {
            return self.nothing();
        };
        let run = session.run;
        self.release(session);
        self.phase = Phase::Idle;
        self.pending = None;
        self.tracker.reset();
        self.pose = match rest {
            Rest::Reset => Pose::default(),
            Rest::Hold => Pose {
                offset: self.pose.offset,
                ..Pose::default()
            },
        };
        tracing::debug!(session = %self.handle, run, "effect at rest");
        Delivery {
            snapshot: Some(self.snapshot(now)),
            frame: self.listeners.frame.clone(),
            complete: self.listeners.complete.clone(),
            ..self.nothing()
        }
    }

    fn release(&self, session: Session) {
        session.token.cancel();
        self.clock.unsubscribe(session.frame);
        if let Some(timer) = session.timer {
            self.clock.cancel_timer(timer);
        }
    }

    fn cancel_session(&mut self) {
        if let Some(session) = self.session.take() {
            self.release(session);
        }
        self.phase = Phase::Idle;
    }

    fn nothing(&self) -> Delivery {
        Delivery {
            teardown: self.teardown.clone(),
            handle: self.handle,
            snapshot: None,
            frame: Vec::new(),
            complete: Vec::new(),
        }
    }

    fn publish(&self, now: f64) -> Delivery {
        Delivery {
            snapshot: Some(self.snapshot(now)),
            frame: self.listeners.frame.clone(),
            ..self.nothing()
        }
    }

    fn snapshot(&self, now: f64) -> Snapshot {
        let (run, elapsed, entities) = self.session.as_ref().map_or_else(
            || (self.runs, 0.0, Vec::new()),
            |s| (s.run, (now - s.started_at).max(0.0), s.pool.entities().to_vec()),
        );
        Snapshot {
            handle: self.handle,
            run,
            phase: self.phase,
            now,
            elapsed,
            progress: self.pose.progress,
            offset: self.pose.offset,
            scale: self.pose.scale,
            tilt: self.pose.tilt,
            origin: self.pose.origin,
            flourish: self.pose.flourish,
            entities,
        }
    }

    fn settle_elapsed(&self, now: f64) -> f64 {
        self.session
            .as_ref()
            .and_then(|s| s.settle_started)
            .map_or(0.0, |since| (now - since).max(0.0))
    }

    fn elapsed(&self, now: f64) -> f64 {
        self.session
            .as_ref()
            .map_or(0.0, |s| (now - s.started_at).max(0.0))
    }
}

/// Family-specific runtime state.
enum Effect {
    Burst(BurstConfig),
    Pulse(PulseConfig),
    Field {
        config: FieldConfig,
        /// Pose captured when the pointer left, eased back from.
        from: (Vector, Tilt),
    },
    Drag {
        rules: Rules,
        motion: Motion,
        dragging: bool,
    },
    Trail {
        spacing: f64,
        template: EmissionTemplate,
        last_mark: Vector,
    },
    Ripple {
        config: RippleConfig,
        template: EmissionTemplate,
    },
    Hover {
        config: HoverConfig,
        from: f64,
        to: f64,
        since: f64,
    },
    Orbit {
        config: OrbitConfig,
        flourish_since: Option<f64>,
    },
    Lava {
        config: LavaConfig,
        seeded: bool,
    },
}

impl Effect {
    fn new(config: EffectConfig) -> Self {
        match config {
            EffectConfig::Burst(c) => Self::Burst(c),
            EffectConfig::Pulse(c) => Self::Pulse(c),
            EffectConfig::Field(config) => Self::Field {
                config,
                from: (Vector::ZERO, Tilt::FLAT),
            },
            EffectConfig::Drag(c) => Self::drag(&c),
            EffectConfig::Trail(c) => Self::trail(&c),
            EffectConfig::Ripple(config) => Self::Ripple {
                template: config.template(),
                config,
            },
            EffectConfig::Hover(config) => Self::Hover {
                config,
                from: 0.0,
                to: 0.0,
                since: 0.0,
            },
            EffectConfig::Orbit(config) => Self::Orbit {
                config,
                flourish_since: None,
            },
            EffectConfig::Lava(config) => Self::Lava {
                config,
                seeded: false,
            },
        }
    }

    fn drag(config: &DragConfig) -> Self {
        Self::Drag {
            rules: config.rules(),
            motion: Motion::default(),
            dragging: false,
        }
    }

    fn trail(config: &TrailConfig) -> Self {
        Self::Trail {
            spacing: config.spacing,
            template: config.template(),
            last_mark: Vector::ZERO,
        }
    }

    const fn is_ambient(&self) -> bool {
        matches!(self, Self::Orbit { .. } | Self::Lava { .. })
    }

    /// Presses that must be dropped without reaching the press handlers.
    fn press_gate(&self, core: &Core) -> Option<IgnoreReason> {
        match self {
            Self::Burst(_) | Self::Pulse(_) if core.phase.is_live() => {
                Some(IgnoreReason::Reentrant)
            }
            Self::Orbit {
                flourish_since: Some(_),
                ..
            } => Some(IgnoreReason::Reentrant),
            _ => None,
        }
    }

    fn start_ambient(&mut self, core: &mut Core, now: f64) {
        match self {
            Self::Orbit { config, .. } => {
                core.begin(now);
                let template = config.template();
                let bounds = core.bounds().ok();
                let mut rng = core.rng.borrow_mut();
                let Some(session) = core.session.as_mut() else {
                    return;
                };
                #[allow(clippy::cast_precision_loss)]
                let step = if config.count == 0 {
                    0.0
                } else {
                    TAU / config.count as f64
                };
                for i in 0..config.count {
                    let id = session.pool.emit_at(Vector::ZERO, &template, now, &mut *rng);
                    if let Some(orbiter) = session.pool.get_mut(id) {
                        #[allow(clippy::cast_precision_loss)]
                        let angle = step * i as f64;
                        orbiter.rotation = angle;
                    }
                }
                if let Some(bounds) = bounds {
                    place_orbiters(&mut session.pool, bounds);
                }
            }
            Self::Lava { .. } => core.begin(now),
            _ => {}
        }
    }

    fn apply(&mut self, core: &mut Core, trigger: Trigger, now: f64) -> (TriggerOutcome, Delivery) {
        let unsupported = TriggerOutcome::Ignored(IgnoreReason::Unsupported);
        let outcome = match self {
            Self::Burst(config) => match trigger {
                Trigger::Press { .. } => start_burst(config, core, now),
                _ => unsupported,
            },
            Self::Pulse(_) => match trigger {
                Trigger::Press { .. } if core.phase.is_live() => {
                    TriggerOutcome::Ignored(IgnoreReason::Reentrant)
                }
                Trigger::Press { .. } => {
                    core.begin(now);
                    TriggerOutcome::Started
                }
                _ => unsupported,
            },
            Self::Field { config, from } => match trigger {
                Trigger::PointerEnter { at } | Trigger::PointerMove { at } => {
                    if config.mode == FieldMode::Repel && core.phase == Phase::Settling {
                        TriggerOutcome::Ignored(IgnoreReason::Reentrant)
                    } else {
                        let outcome = core.engage(now);
                        core.pending = Some(at);
                        outcome
                    }
                }
                Trigger::PointerLeave if core.phase == Phase::Active => {
                    *from = (core.pose.offset, core.pose.tilt);
                    core.pending = None;
                    core.tracker.reset();
                    core.settle(now);
                    TriggerOutcome::Released
                }
                Trigger::Press { .. } => TriggerOutcome::PassedThrough,
                _ => unsupported,
            },
            Self::Drag {
                rules,
                motion,
                dragging,
            } => match trigger {
                Trigger::Press { at } => {
                    let outcome = core.engage(now);
                    *dragging = true;
                    *motion = Motion::new(core.pose.offset, motion.velocity);
                    core.tracker.reset();
                    core.tracker.sample(at);
                    outcome
                }
                Trigger::PointerMove { at } if *dragging => {
                    core.pending = Some(at);
                    TriggerOutcome::Updated
                }
                Trigger::Release { .. } if *dragging => {
                    if let Some(at) = core.pending.take() {
                        let delta = core.tracker.sample(at).delta;
                        drag_by(motion, delta, rules.max_distance);
                        core.pose.offset = motion.position;
                    }
                    *dragging = false;
                    core.settle(now);
                    TriggerOutcome::Released
                }
                _ => unsupported,
            },
            Self::Trail { .. } => match trigger {
                Trigger::PointerEnter { at } | Trigger::PointerMove { at } => {
                    let outcome = core.engage(now);
                    core.pending = Some(at);
                    core.pose.origin = Some(at);
                    outcome
                }
                Trigger::PointerLeave if core.phase == Phase::Active => {
                    core.pending = None;
                    core.settle(now);
                    TriggerOutcome::Released
                }
                Trigger::Press { .. } => TriggerOutcome::PassedThrough,
                _ => unsupported,
            },
            Self::Ripple { .. } => match trigger {
                Trigger::PointerEnter { at } | Trigger::PointerMove { at } => {
                    let outcome = core.engage(now);
                    core.pending = Some(at);
                    outcome
                }
                Trigger::PointerLeave if core.phase.is_live() => {
                    core.settle(now);
                    return (TriggerOutcome::Released, core.finish(now, Rest::Reset));
                }
                Trigger::Press { .. } => TriggerOutcome::PassedThrough,
                _ => unsupported,
            },
            Self::Hover {
                from, to, since, ..
            } => match trigger {
                Trigger::PointerEnter { at } => {
                    let outcome = core.engage(now);
                    *from = core.pose.progress;
                    *to = 1.0;
                    *since = now;
                    core.pose.origin = Some(at);
                    outcome
                }
                Trigger::PointerLeave if core.phase == Phase::Active => {
                    *from = core.pose.progress;
                    *to = 0.0;
                    *since = now;
                    core.settle(now);
                    TriggerOutcome::Released
                }
                Trigger::Press { .. } => TriggerOutcome::PassedThrough,
                _ => unsupported,
            },
            Self::Orbit {
                config,
                flourish_since,
            } => match trigger {
                Trigger::Press { .. } if flourish_since.is_some() => {
                    TriggerOutcome::Ignored(IgnoreReason::Reentrant)
                }
                Trigger::Press { .. } if core.session.is_some() => {
                    *flourish_since = Some(now);
                    core.pose.flourish = Some(0.0);
                    core.schedule(config.flourish_ms, TimerKind::Flourish);
                    TriggerOutcome::Started
                }
                _ => unsupported,
            },
            Self::Lava { .. } => match trigger {
                Trigger::Press { .. } => TriggerOutcome::PassedThrough,
                _ => unsupported,
            },
        };
        if let TriggerOutcome::Ignored(reason) = outcome {
            tracing::trace!(session = %core.handle, trigger = trigger.name(), %reason, "trigger ignored");
        }
        (outcome, core.nothing())
    }

    fn frame(&mut self, core: &mut Core, tick: FrameTick) -> Delivery {
        let now = tick.now;
        match self {
            Self::Burst(config) => burst_frame(config, core, now),
            Self::Pulse(config) => pulse_frame(config, core, now),
            Self::Field { config, from } => field_frame(config, *from, core, now),
            Self::Drag {
                rules,
                motion,
                dragging,
            } => drag_frame(rules, motion, *dragging, core, now),
            Self::Trail {
                spacing,
                template,
                last_mark,
            } => trail_frame(*spacing, template, last_mark, core, now),
            Self::Ripple { config, template } => ripple_frame(config, template, core, now),
            Self::Hover {
                config,
                from,
                to,
                since,
            } => hover_frame(config, (*from, *to, *since), core, now),
            Self::Orbit {
                config,
                flourish_since,
            } => orbit_frame(config, *flourish_since, core, tick),
            Self::Lava { config, seeded } => lava_frame(config, seeded, core, now),
        }
    }

    fn timer(&mut self, core: &mut Core, kind: TimerKind, now: f64) -> Delivery {
        match kind {
            TimerKind::Settle if core.phase == Phase::Settling => {
                if let Some(session) = core.session.as_mut() {
                    session.timer = None;
                }
                core.finish(now, self.rest())
            }
            TimerKind::Flourish => {
                if let Self::Orbit { flourish_since, .. } = self {
                    *flourish_since = None;
                    core.pose.flourish = None;
                }
                core.nothing()
            }
            TimerKind::Settle => core.nothing(),
        }
    }

    const fn rest(&self) -> Rest {
        match self {
            Self::Drag { .. } => Rest::Hold,
            _ => Rest::Reset,
        }
    }

    fn resize(&mut self, core: &mut Core, size: Size) -> bool {
        match self {
            Self::Lava { .. } => {
                let extent = Rect::from_size(size);
                if let Some(session) = core.session.as_mut() {
                    for blob in session.pool.iter_mut() {
                        blob.position = extent.clamp(blob.position);
                    }
                }
                true
            }
            _ => false,
        }
    }
}

fn start_burst(config: &BurstConfig, core: &mut Core, now: f64) -> TriggerOutcome {
    if core.phase.is_live() {
        return TriggerOutcome::Ignored(IgnoreReason::Reentrant);
    }
    let bounds = match core.bounds() {
        Ok(bounds) => bounds,
        Err(err) => {
            tracing::debug!(session = %core.handle, %err, "burst not started");
            return TriggerOutcome::Ignored(IgnoreReason::StaleGeometry);
        }
    };
    core.begin(now);
    let template = config.template();
    let mut rng = core.rng.borrow_mut();
    if let Some(session) = core.session.as_mut() {
        match config.pattern {
            BurstPattern::Radial => {
                session
                    .pool
                    .emit(config.count, bounds.center(), &template, now, &mut *rng);
            }
            BurstPattern::Grid { cell } => {
                session.pool.emit_grid(cell, bounds, &template, now, &mut *rng);
            }
        }
        tracing::debug!(session = %core.handle, entities = session.pool.len(), "burst emitted");
    }
    TriggerOutcome::Started
}

fn burst_frame(config: &BurstConfig, core: &mut Core, now: f64) -> Delivery {
    let rules = config.rules();
    let Some(session) = core.session.as_mut() else {
        return core.nothing();
    };
    session.pool.advance(&rules, now);
    let empty = session.pool.is_empty();
    let elapsed = core.elapsed(now);
    core.pose.progress = if config.duration_ms > 0.0 {
        (elapsed / config.duration_ms).min(1.0)
    } else {
        1.0
    };
    if core.phase == Phase::Active && (elapsed >= config.duration_ms || empty) {
        if let Some(done) = core.settle_after(now, config.settle_ms, Rest::Reset) {
            return done;
        }
    }
    core.publish(now)
}

fn pulse_frame(config: &PulseConfig, core: &mut Core, now: f64) -> Delivery {
    if core.phase == Phase::Active {
        let t = if config.duration_ms > 0.0 {
            core.elapsed(now) / config.duration_ms
        } else {
            1.0
        };
        let (offset, scale) = config.sample(t.min(1.0));
        core.pose.offset = offset;
        core.pose.scale = scale;
        core.pose.progress = t.min(1.0);
        if t >= 1.0 {
            if let Some(done) = core.settle_after(now, config.settle_ms, Rest::Reset) {
                return done;
            }
        }
    }
    core.publish(now)
}

fn field_frame(config: &FieldConfig, from: (Vector, Tilt), core: &mut Core, now: f64) -> Delivery {
    match core.phase {
        Phase::Active => {
            if let Some(pointer) = core.pending {
                match core.bounds() {
                    Ok(bounds) => {
                        core.pending = None;
                        let sample = core.tracker.sample(pointer);
                        apply_field(config, sample.position, bounds, core);
                    }
                    Err(err) => {
                        tracing::trace!(session = %core.handle, %err, "pointer sample deferred");
                    }
                }
            }
        }
        Phase::Settling => {
            let t = if config.return_ms > 0.0 {
                core.settle_elapsed(now) / config.return_ms
            } else {
                1.0
            };
            let eased = config.return_easing.apply(t);
            core.pose.offset = from.0 * (1.0 - eased);
            core.pose.tilt = from.1.lerp(Tilt::FLAT, eased);
            if t >= 1.0 {
                return core.finish(now, Rest::Reset);
            }
        }
        Phase::Idle => {}
    }
    core.publish(now)
}

fn apply_field(config: &FieldConfig, pointer: Vector, bounds: Rect, core: &mut Core) {
    let center = bounds.center();
    let radius = config
        .radius
        .unwrap_or_else(|| 2.0 * bounds.size().longest_side());
    core.pose.origin = Some(pointer);
    match config.mode {
        FieldMode::Attract => {
            let field = Attract {
                radius,
                strength: config.strength,
                reference_strength: config.reference_strength,
            };
            core.pose.offset = field.displacement(pointer, center);
        }
        FieldMode::Repel => {
            let field = Repel::new(radius, config.strength, config.max_displacement);
            if let Some(offset) = field.displacement(pointer, center, core.pose.offset) {
                core.pose.offset = offset;
            }
        }
        FieldMode::Tilt => {
            if let Ok(tilt) = TiltField::new(config.max_angle).tilt(pointer, bounds) {
                core.pose.tilt = tilt;
            }
        }
    }
}

fn drag_by(motion: &mut Motion, delta: Vector, max_distance: Option<f64>) {
    let position = motion.position + delta;
    motion.position = max_distance.map_or(position, |max| position.clamp_magnitude(max));
    motion.velocity = delta;
}

fn drag_frame(
    rules: &Rules,
    motion: &mut Motion,
    dragging: bool,
    core: &mut Core,
    now: f64,
) -> Delivery {
    match core.phase {
        Phase::Active if dragging => {
            if let Some(pointer) = core.pending.take() {
                let delta = core.tracker.sample(pointer).delta;
                drag_by(motion, delta, rules.max_distance);
                core.pose.offset = motion.position;
            }
        }
        Phase::Settling => {
            let next = rules.step(*motion);
            let settled = if rules.snap_back > 0.0 {
                rules.is_settled(next)
            } else {
                next.velocity.magnitude() < rules.settle.velocity
            };
            *motion = next;
            if settled {
                *motion = if rules.snap_back > 0.0 {
                    Motion::at(rules.target)
                } else {
                    Motion::at(next.position)
                };
                core.pose.offset = motion.position;
                return core.finish(now, Rest::Hold);
            }
            core.pose.offset = motion.position;
        }
        _ => {}
    }
    core.publish(now)
}

fn trail_frame(
    spacing: f64,
    template: &EmissionTemplate,
    last_mark: &mut Vector,
    core: &mut Core,
    now: f64,
) -> Delivery {
    let settling = core.phase == Phase::Settling;
    let pointer = core.pending.take();
    let mut rng = core.rng.borrow_mut();
    let Some(session) = core.session.as_mut() else {
        drop(rng);
        return core.nothing();
    };
    if let Some(pointer) = pointer {
        if (pointer - *last_mark).magnitude() > spacing {
            session.pool.emit_at(pointer, template, now, &mut *rng);
            *last_mark = pointer;
        }
    }
    drop(rng);
    session.pool.prune(now);
    if settling && session.pool.is_empty() {
        return core.finish(now, Rest::Reset);
    }
    core.publish(now)
}

fn ripple_frame(
    config: &RippleConfig,
    template: &EmissionTemplate,
    core: &mut Core,
    now: f64,
) -> Delivery {
    let pointer = core.pending.take();
    let mut rng = core.rng.borrow_mut();
    let Some(session) = core.session.as_mut() else {
        drop(rng);
        return core.nothing();
    };
    if let Some(pointer) = pointer {
        let growing = session.pool.iter().any(|r| r.size < config.max_size);
        if !growing && session.pool.len() < config.max_live {
            session.pool.emit_at(pointer, template, now, &mut *rng);
            core.pose.origin = Some(pointer);
        }
    }
    drop(rng);
    session.pool.advance(&Rules::default(), now);
    core.publish(now)
}

fn hover_frame(
    config: &HoverConfig,
    (from, to, since): (f64, f64, f64),
    core: &mut Core,
    now: f64,
) -> Delivery {
    let duration = config.duration_ms * (to - from).abs();
    let t = if duration > 0.0 {
        (now - since).max(0.0) / duration
    } else {
        1.0
    };
    core.pose.progress = from + (to - from) * config.easing.apply(t);
    if core.phase == Phase::Settling && t >= 1.0 {
        return core.finish(now, Rest::Reset);
    }
    core.publish(now)
}

fn place_orbiters(pool: &mut EntityPool, bounds: Rect) {
    let center = bounds.center();
    for orbiter in pool.iter_mut() {
        orbiter.position = center + Vector::from_angle(orbiter.rotation) * orbiter.distance;
    }
}

fn orbit_frame(
    config: &OrbitConfig,
    flourish_since: Option<f64>,
    core: &mut Core,
    tick: FrameTick,
) -> Delivery {
    let bounds = core.bounds().ok();
    let paused = flourish_since.is_some() && config.flourish.pauses_orbit();
    let Some(session) = core.session.as_mut() else {
        return core.nothing();
    };
    if !paused {
        let step = tick.elapsed / 1000.0 * config.speed;
        for orbiter in session.pool.iter_mut() {
            orbiter.rotation += step;
        }
    }
    if let Some(bounds) = bounds {
        place_orbiters(&mut session.pool, bounds);
    }
    core.pose.flourish = flourish_since.map(|since| {
        if config.flourish_ms > 0.0 {
            ((tick.now - since) / config.flourish_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    });
    core.publish(tick.now)
}

fn lava_frame(config: &LavaConfig, seeded: &mut bool, core: &mut Core, now: f64) -> Delivery {
    let Ok(bounds) = core.bounds() else {
        tracing::trace!(session = %core.handle, "lava frame without geometry");
        return core.publish(now);
    };
    let extent = Rect::from_size(bounds.size());
    let mut rng = core.rng.borrow_mut();
    let Some(session) = core.session.as_mut() else {
        drop(rng);
        return core.nothing();
    };
    if !*seeded {
        let template = config.template();
        let drift = Span::around(0.0, 0.5 * config.wave_speed);
        for _ in 0..config.count {
            let at = Vector::new(
                Span::new(0.0, extent.width).sample(&mut *rng),
                Span::new(0.0, extent.height).sample(&mut *rng),
            );
            let id = session.pool.emit_at(at, &template, now, &mut *rng);
            let velocity = Vector::new(drift.sample(&mut *rng), drift.sample(&mut *rng));
            if let Some(blob) = session.pool.get_mut(id) {
                blob.velocity = velocity;
            }
        }
        *seeded = true;
    }
    drop(rng);
    session.pool.advance(&Rules::default().with_reflect(extent), now);
    let hue_rate = config.hue_rate();
    if hue_rate != 0.0 {
        for blob in session.pool.iter_mut() {
            blob.hue = blob.hue.map(|h| (h + hue_rate) % 360.0);
        }
    }
    core.publish(now)
}

/// One widget's effect controller.
pub(crate) struct Controller {
    core: Core,
    effect: Effect,
}

impl Controller {
    pub(crate) fn new_shared(
        handle: SessionHandle,
        config: EffectConfig,
        anchor: Box<dyn AnchorSource>,
        clock: FrameClock,
        rng: SharedRng,
    ) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|weak| {
            RefCell::new(Self {
                core: Core {
                    handle,
                    anchor,
                    clock,
                    rng,
                    weak: weak.clone(),
                    teardown: CancelToken::new(),
                    phase: Phase::Idle,
                    session: None,
                    runs: 0,
                    pose: Pose::default(),
                    pending: None,
                    tracker: PointerTracker::default(),
                    listeners: Listeners::default(),
                },
                effect: Effect::new(config),
            })
        })
    }

    /// Starts ambient effects; a no-op for every other family.
    pub(crate) fn start(&mut self) {
        if self.effect.is_ambient() {
            let now = self.core.clock.now();
            self.effect.start_ambient(&mut self.core, now);
        }
    }

    fn on_tick(this: &Rc<RefCell<Self>>, token: &CancelToken, tick: FrameTick) {
        let delivery = {
            let Ok(mut controller) = this.try_borrow_mut() else {
                tracing::warn!("controller busy, frame dropped");
                return;
            };
            if token.is_cancelled() || controller.core.teardown.is_cancelled() {
                return;
            }
            let Self { core, effect } = &mut *controller;
            effect.frame(core, tick)
        };
        delivery.deliver();
    }

    fn on_timer(this: &Rc<RefCell<Self>>, token: &CancelToken, kind: TimerKind, now: f64) {
        let delivery = {
            let Ok(mut controller) = this.try_borrow_mut() else {
                tracing::warn!("controller busy, timer dropped");
                return;
            };
            if token.is_cancelled() || controller.core.teardown.is_cancelled() {
                return;
            }
            let Self { core, effect } = &mut *controller;
            effect.timer(core, kind, now)
        };
        delivery.deliver();
    }

    /// Feeds one event through the state machine.
    ///
    /// Accepted presses reach the press handlers before the effect reacts.
    pub(crate) fn trigger(this: &Rc<RefCell<Self>>, trigger: Trigger) -> TriggerOutcome {
        let (handlers, teardown) = {
            let controller = this.borrow();
            if controller.core.teardown.is_cancelled() {
                return TriggerOutcome::Ignored(IgnoreReason::Destroyed);
            }
            if matches!(trigger, Trigger::Press { .. }) {
                if let Some(reason) = controller.effect.press_gate(&controller.core) {
                    tracing::trace!(session = %controller.core.handle, %reason, "press ignored");
                    return TriggerOutcome::Ignored(reason);
                }
            }
            (
                controller.core.listeners.press.clone(),
                controller.core.teardown.clone(),
            )
        };

        if let Trigger::Press { at } = trigger {
            for handler in handlers {
                if teardown.is_cancelled() {
                    break;
                }
                handler(at);
            }
        }

        let (outcome, delivery) = {
            let mut controller = this.borrow_mut();
            if controller.core.teardown.is_cancelled() {
                return TriggerOutcome::Ignored(IgnoreReason::Destroyed);
            }
            let now = controller.core.clock.now();
            let Self { core, effect } = &mut *controller;
            effect.apply(core, trigger, now)
        };
        delivery.deliver();
        outcome
    }

    pub(crate) fn add_frame_listener(&mut self, listener: FrameListener) {
        self.core.listeners.frame.push(listener);
    }

    pub(crate) fn add_complete_listener(&mut self, listener: CompleteListener) {
        self.core.listeners.complete.push(listener);
    }

    pub(crate) fn add_press_listener(&mut self, listener: PressListener) {
        self.core.listeners.press.push(listener);
    }

    pub(crate) fn resize(&mut self, size: Size) -> bool {
        let Self { core, effect } = self;
        effect.resize(core, size)
    }

    /// Cancels everything and drops the listeners. Returns false if the
    /// controller was already torn down.
    pub(crate) fn destroy(&mut self) -> bool {
        if self.core.teardown.is_cancelled() {
            return false;
        }
        self.core.teardown.cancel();
        self.core.cancel_session();
        self.core.pending = None;
        self.core.listeners = Listeners::default();
        tracing::debug!(session = %self.core.handle, "session destroyed");
        true
    }

    pub(crate) const fn phase(&self) -> Phase {
        self.core.phase
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        self.core.snapshot(self.core.clock.now())
    }
}
