//! Scripted pointer interactions, one per effect family.

use kinetic::{EffectConfig, Rect, Size, Trigger, Vector};

/// Something the simulated user does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Trigger(Trigger),
    /// The layout re-measures the button.
    Resize(Size),
}

/// An action due at a point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub at_ms: f64,
    pub action: Action,
}

/// Pointer samples are spaced like a mouse reporting at this interval.
const MOVE_INTERVAL_MS: f64 = 32.0;

/// A time-ordered list of actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Picks the interaction that shows off `config` within `duration_ms`.
    ///
    /// - one-shot effects: a press in the middle, released shortly after
    /// - drag: press, drag toward the bottom-right corner, release
    /// - pointer effects: enter from the left, sweep across, leave
    /// - orbit: a press once the satellites are moving
    /// - lava: the button grows halfway through
    pub fn for_effect(config: &EffectConfig, bounds: Rect, duration_ms: f64) -> Self {
        let mut script = Self::default();
        let center = bounds.center();
        match config {
            EffectConfig::Burst(_) | EffectConfig::Pulse(_) => {
                script.trigger(0.0, Trigger::Press { at: center });
                script.trigger(80.0, Trigger::Release { at: center });
            }
            EffectConfig::Drag(_) => {
                // Well past the bottom-right corner, so drag limits come into play.
                let end = Vector::new(
                    bounds.right() + bounds.width,
                    bounds.bottom() + bounds.height,
                );
                script.trigger(0.0, Trigger::Press { at: center });
                script.sweep(0.0, duration_ms * 0.4, center, end);
                script.trigger(duration_ms * 0.4, Trigger::Release { at: end });
            }
            EffectConfig::Field(_)
            | EffectConfig::Hover(_)
            | EffectConfig::Trail(_)
            | EffectConfig::Ripple(_) => {
                let start = Vector::new(bounds.x, center.y);
                let end = Vector::new(bounds.right(), center.y);
                script.trigger(0.0, Trigger::PointerEnter { at: start });
                script.sweep(0.0, duration_ms * 0.5, start, end);
                script.push(duration_ms * 0.5, Action::Trigger(Trigger::PointerLeave));
            }
            EffectConfig::Orbit(_) => {
                script.trigger(duration_ms * 0.25, Trigger::Press { at: center });
                script.trigger(duration_ms * 0.25 + 80.0, Trigger::Release { at: center });
            }
            EffectConfig::Lava(_) => {
                let grown = Size::new(bounds.width * 1.5, bounds.height * 1.5);
                script.push(duration_ms * 0.5, Action::Resize(grown));
            }
        }
        script
    }

    fn push(&mut self, at_ms: f64, action: Action) {
        self.steps.push(Step { at_ms, action });
    }

    fn trigger(&mut self, at_ms: f64, trigger: Trigger) {
        self.push(at_ms, Action::Trigger(trigger));
    }

    /// Moves the pointer in a straight line from `from` to `to`.
    fn sweep(&mut self, start_ms: f64, end_ms: f64, from: Vector, to: Vector) {
        let span = end_ms - start_ms;
        if span <= 0.0 {
            return;
        }
        let mut at_ms = start_ms + MOVE_INTERVAL_MS;
        while at_ms < end_ms {
            let t = (at_ms - start_ms) / span;
            self.trigger(at_ms, Trigger::PointerMove { at: from.lerp(to, t) });
            at_ms += MOVE_INTERVAL_MS;
        }
    }

    /// Removes and returns every step due at or before `now_ms`.
    pub fn due(&mut self, now_ms: f64) -> Vec<Step> {
        let split = self.steps.partition_point(|step| step.at_ms <= now_ms);
        self.steps.drain(..split).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use kinetic::{DragConfig, HoverConfig, LavaConfig, PulseConfig};

    use super::*;

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 120.0, 40.0)
    }

    fn is_sorted(script: &Script) -> bool {
        script.steps.windows(2).all(|w| w[0].at_ms <= w[1].at_ms)
    }

    #[test]
    fn one_shot_script_presses_once() {
        let mut script =
            Script::for_effect(&EffectConfig::Pulse(PulseConfig::default()), bounds(), 2000.0);
        let first = script.due(0.0);
        assert_eq!(
            first,
            vec![Step {
                at_ms: 0.0,
                action: Action::Trigger(Trigger::Press { at: bounds().center() }),
            }]
        );
        assert_eq!(script.len(), 1);
    }

    #[test]
    fn hover_script_sweeps_then_leaves() {
        let script =
            Script::for_effect(&EffectConfig::Hover(HoverConfig::default()), bounds(), 1000.0);
        assert!(is_sorted(&script));
        assert!(script.len() > 10);
        let last = script.steps.last().unwrap();
        assert_eq!(last.action, Action::Trigger(Trigger::PointerLeave));
        assert_eq!(last.at_ms, 500.0);
    }

    #[test]
    fn drag_script_ends_with_release() {
        let script =
            Script::for_effect(&EffectConfig::Drag(DragConfig::default()), bounds(), 1000.0);
        assert!(is_sorted(&script));
        assert!(matches!(
            script.steps.last().map(|s| s.action),
            Some(Action::Trigger(Trigger::Release { .. }))
        ));
    }

    #[test]
    fn lava_script_only_resizes() {
        let mut script =
            Script::for_effect(&EffectConfig::Lava(LavaConfig::default()), bounds(), 1000.0);
        assert!(script.due(499.0).is_empty());
        let steps = script.due(500.0);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].action, Action::Resize(Size::new(180.0, 60.0)));
        assert!(script.is_empty());
    }
}
