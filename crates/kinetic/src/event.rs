//! Trigger events and their outcomes.

use std::fmt;

use serde::Serialize;

use crate::vector::Vector;

/// Input delivered to a session, in widget-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Trigger {
    /// Primary button pressed (or the control activated).
    Press { at: Vector },
    /// Primary button released.
    Release { at: Vector },
    PointerEnter { at: Vector },
    PointerMove { at: Vector },
    PointerLeave,
}

impl Trigger {
    /// Pointer position carried by the event, if any.
    pub const fn position(&self) -> Option<Vector> {
        match *self {
            Self::Press { at }
            | Self::Release { at }
            | Self::PointerEnter { at }
            | Self::PointerMove { at } => Some(at),
            Self::PointerLeave => None,
        }
    }

    /// Short event name, used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Press { .. } => "press",
            Self::Release { .. } => "release",
            Self::PointerEnter { .. } => "pointer_enter",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerLeave => "pointer_leave",
        }
    }
}

/// A pointer position plus the delta from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointerSample {
    pub position: Vector,
    pub delta: Vector,
}

/// Derives pointer deltas from successive positions.
///
/// Only the last position is remembered.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    last: Option<Vector>,
}

impl PointerTracker {
    /// Records `position` and returns it with its delta. The first sample
    /// after a reset has a zero delta.
    pub fn sample(&mut self, position: Vector) -> PointerSample {
        let delta = self.last.map_or(Vector::ZERO, |last| position - last);
        self.last = Some(position);
        PointerSample { position, delta }
    }

    /// Forgets the last position.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// The last recorded position.
    pub const fn last(&self) -> Option<Vector> {
        self.last
    }
}

/// Why a trigger did not change anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// A one-shot effect is still running.
    Reentrant,
    /// The session was destroyed.
    Destroyed,
    /// The effect does not react to this kind of event.
    Unsupported,
    /// The effect needs geometry the anchor cannot provide yet.
    StaleGeometry,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reentrant => "effect still running",
            Self::Destroyed => "session destroyed",
            Self::Unsupported => "event not used by this effect",
            Self::StaleGeometry => "geometry not measurable",
        })
    }
}

/// What a trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// A new run started, or a settling run became active again.
    Started,
    /// A live run took the event into account.
    Updated,
    /// A live run began settling.
    Released,
    /// Press handlers ran; the effect itself did not change.
    PassedThrough,
    Ignored(IgnoreReason),
}

impl TriggerOutcome {
    /// True unless the event was ignored.
    pub const fn is_accepted(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_deltas() {
        let mut tracker = PointerTracker::default();
        assert_eq!(tracker.sample(Vector::new(10.0, 10.0)).delta, Vector::ZERO);
        assert_eq!(
            tracker.sample(Vector::new(13.0, 6.0)).delta,
            Vector::new(3.0, -4.0)
        );
        tracker.reset();
        assert_eq!(tracker.last(), None);
        assert_eq!(tracker.sample(Vector::new(0.0, 0.0)).delta, Vector::ZERO);
    }

    #[test]
    fn positions() {
        assert_eq!(Trigger::PointerLeave.position(), None);
        assert_eq!(
            Trigger::Press { at: Vector::new(1.0, 2.0) }.position(),
            Some(Vector::new(1.0, 2.0))
        );
    }

    #[test]
    fn ignored_is_not_accepted() {
        assert!(!TriggerOutcome::Ignored(IgnoreReason::Reentrant).is_accepted());
        assert!(TriggerOutcome::PassedThrough.is_accepted());
    }
}
