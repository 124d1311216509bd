//! The frame clock.
//!
//! A [`FrameClock`] multiplexes one host refresh loop into any number of
//! frame subscriptions and deferred timers. The host calls
//! [`FrameClock::tick`] once per display refresh with a monotonic timestamp
//! in milliseconds; tests call it with synthetic timestamps.
//!
//! Every subscription and timer can carry a [`CancelToken`]. Cancelling the
//! token is enough to stop the callback: the clock checks it immediately
//! before every invocation, so a callback can never run for a session that
//! has already been torn down.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kinetic::FrameClock;
//!
//! let clock = FrameClock::new();
//! let total = Rc::new(Cell::new(0.0));
//! let sink = Rc::clone(&total);
//! let id = clock.subscribe(move |tick| sink.set(sink.get() + tick.elapsed));
//!
//! clock.tick(100.0); // first tick reports 0 elapsed
//! clock.tick(116.0);
//! clock.unsubscribe(id);
//! clock.unsubscribe(id); // idempotent
//! clock.tick(132.0);
//!
//! assert_eq!(total.get(), 16.0);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// Nominal frame interval for a display refreshing `n` times per second,
/// in milliseconds.
pub fn frame_interval(n: u32) -> f64 {
    1000.0 / f64::from(n.max(1))
}

/// Timing information delivered to frame subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameTick {
    /// Clock time of this tick, in milliseconds.
    pub now: f64,
    /// Milliseconds since this subscription's previous tick. Zero on the
    /// first tick after subscribing.
    pub elapsed: f64,
}

/// Shared cancellation flag for frame subscriptions and timers.
///
/// Clones observe the same flag. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    /// Creates a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels every callback registered under this token.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Identifies a frame subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Identifies a deferred timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

type FrameCallback = Rc<RefCell<dyn FnMut(FrameTick)>>;
type TimerCallback = Box<dyn FnOnce(f64)>;

struct Subscription {
    id: SubscriptionId,
    token: CancelToken,
    last: Option<f64>,
    callback: FrameCallback,
}

struct Timer {
    id: TimerId,
    due: f64,
    token: CancelToken,
    callback: TimerCallback,
}

#[derive(Default)]
struct ClockInner {
    now: f64,
    next_id: u64,
    ticking: bool,
    subscriptions: Vec<Subscription>,
    timers: Vec<Timer>,
}

impl ClockInner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Single-threaded frame and timer scheduler.
///
/// `FrameClock` is a cheap handle; clones drive the same schedule. It is
/// deliberately `!Send`: all callbacks run on the thread that calls
/// [`tick`](Self::tick).
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockInner>>,
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameClock")
            .field("now", &inner.now)
            .field("subscriptions", &inner.subscriptions.len())
            .field("timers", &inner.timers.len())
            .finish()
    }
}

// Clears the re-entrancy flag even if a callback unwinds.
struct TickGuard<'a>(&'a RefCell<ClockInner>);

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.0.borrow_mut().ticking = false;
    }
}

impl FrameClock {
    /// Creates a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock whose current time is `now_ms`.
    pub fn starting_at(now_ms: f64) -> Self {
        let clock = Self::new();
        clock.inner.borrow_mut().now = now_ms;
        clock
    }

    /// The timestamp of the most recent tick.
    pub fn now(&self) -> f64 {
        self.inner.borrow().now
    }

    /// Subscribes `callback` to every subsequent tick.
    pub fn subscribe(&self, callback: impl FnMut(FrameTick) + 'static) -> SubscriptionId {
        self.subscribe_with(CancelToken::new(), callback)
    }

    /// Subscribes `callback` until `token` is cancelled or the subscription
    /// is removed.
    pub fn subscribe_with(
        &self,
        token: CancelToken,
        callback: impl FnMut(FrameTick) + 'static,
    ) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id());
        inner.subscriptions.push(Subscription {
            id,
            token,
            last: None,
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    /// Removes a subscription. Returns whether it was still registered;
    /// removing twice is harmless.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscriptions.len();
        inner.subscriptions.retain(|s| s.id != id);
        inner.subscriptions.len() != before
    }

    /// Runs `callback` once, on the first tick at least `delay_ms` from now.
    pub fn schedule(&self, delay_ms: f64, callback: impl FnOnce(f64) + 'static) -> TimerId {
        self.schedule_with(CancelToken::new(), delay_ms, callback)
    }

    /// Like [`schedule`](Self::schedule), skipped if `token` is cancelled
    /// before the timer is due.
    pub fn schedule_with(
        &self,
        token: CancelToken,
        delay_ms: f64,
        callback: impl FnOnce(f64) + 'static,
    ) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id());
        let delay = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        let due = inner.now + delay;
        inner.timers.push(Timer {
            id,
            due,
            token,
            callback: Box::new(callback),
        });
        id
    }

    /// Cancels a pending timer. Returns whether it was still pending.
    pub fn cancel_timer(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.timers.len();
        inner.timers.retain(|t| t.id != id);
        inner.timers.len() != before
    }

    /// Number of registered frame subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }

    /// Number of pending timers.
    pub fn timer_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// True when nothing is subscribed or scheduled.
    pub fn is_idle(&self) -> bool {
        let inner = self.inner.borrow();
        inner.subscriptions.is_empty() && inner.timers.is_empty()
    }

    /// Advances the clock to `now_ms` and runs everything that is due.
    ///
    /// Due timers run first, in due order, then frame subscriptions in
    /// subscription order. No clock borrow is held while a callback runs,
    /// so callbacks may subscribe, unsubscribe, schedule or cancel freely.
    /// Timestamps that go backwards are treated as no time passing.
    ///
    /// Returns the number of callbacks invoked.
    pub fn tick(&self, now_ms: f64) -> usize {
        let (now, mut due) = {
            let mut inner = self.inner.borrow_mut();
            if inner.ticking {
                tracing::warn!(now_ms, "nested frame clock tick ignored");
                return 0;
            }
            inner.ticking = true;
            if now_ms.is_finite() && now_ms > inner.now {
                inner.now = now_ms;
            }
            let now = inner.now;
            let (due, pending): (Vec<Timer>, Vec<Timer>) = std::mem::take(&mut inner.timers)
                .into_iter()
                .partition(|t| t.due <= now);
            inner.timers = pending;
            (now, due)
        };
        let _guard = TickGuard(&self.inner);

        let mut invoked = 0;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        for timer in due {
            if timer.token.is_cancelled() {
                continue;
            }
            (timer.callback)(now);
            invoked += 1;
        }

        let frame: Vec<(SubscriptionId, CancelToken, FrameCallback, FrameTick)> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscriptions.retain(|s| !s.token.is_cancelled());
            inner
                .subscriptions
                .iter_mut()
                .map(|sub| {
                    let elapsed = sub.last.map_or(0.0, |last| (now - last).max(0.0));
                    sub.last = Some(now);
                    (
                        sub.id,
                        sub.token.clone(),
                        Rc::clone(&sub.callback),
                        FrameTick { now, elapsed },
                    )
                })
                .collect()
        };

        for (id, token, callback, tick) in frame {
            let registered = self.inner.borrow().subscriptions.iter().any(|s| s.id == id);
            if !registered || token.is_cancelled() {
                continue;
            }
            (&mut *callback.borrow_mut())(tick);
            invoked += 1;
        }

        invoked
    }
}
