//! The simulation loop: one engine, one button, a script and a clock.

use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use kinetic::{Engine, Phase, Rect, SharedBounds, Snapshot, TriggerOutcome};
use kinetic_buttons::{Appearance, AnyButton, ButtonKind};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::script::{Action, Script};

/// Settings for one simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub button: AnyButton,
    pub bounds: Rect,
    pub seed: Option<u64>,
    pub frame_ms: f64,
    pub duration_ms: f64,
    pub format: OutputFormat,
    pub realtime: bool,
}

/// What happened over a whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub button: ButtonKind,
    pub seed: Option<u64>,
    /// Frames the button published.
    pub frames: usize,
    /// Runs started, counting ambient effects as one.
    pub runs: u64,
    /// Presses that reached the click handler.
    pub presses: usize,
    /// Runs that came to rest.
    pub completions: usize,
    /// Script events the engine ignored.
    pub ignored: usize,
    pub final_phase: Phase,
}

#[derive(Serialize)]
struct FrameLine<'a> {
    now: f64,
    run: u64,
    phase: Phase,
    progress: f64,
    transform: String,
    appearance: &'a Appearance,
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a Summary,
}

const fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Active => "active",
        Phase::Settling => "settling",
    }
}

/// Runs `config` to completion, writing one line per published frame and a
/// closing summary line to `out`.
///
/// # Errors
///
/// Returns an error if the props are rejected by the engine or writing to
/// `out` fails.
pub async fn run(config: &SimConfig, out: &mut impl Write) -> anyhow::Result<Summary> {
    let engine = config.seed.map_or_else(Engine::new, Engine::seeded);
    let kind = config.button.kind();
    let effect = config.button.config();
    let anchor = SharedBounds::new(Some(config.bounds));
    let handle = engine
        .create_session(effect.clone(), anchor.clone())
        .with_context(|| format!("invalid props for `{kind}`"))?;
    info!(button = %kind, effect = effect.family(), seed = ?config.seed, "simulation started");

    let published: Rc<RefCell<Vec<Snapshot>>> = Rc::default();
    let presses = Rc::new(Cell::new(0_usize));
    let completions = Rc::new(Cell::new(0_usize));
    {
        let published = Rc::clone(&published);
        engine.on_frame(handle, move |frame| published.borrow_mut().push(frame.clone()))?;
        let presses = Rc::clone(&presses);
        engine.on_press(handle, move |_| presses.set(presses.get() + 1))?;
        let completions = Rc::clone(&completions);
        engine.on_complete(handle, move |_| completions.set(completions.get() + 1))?;
    }

    let mut script = Script::for_effect(&effect, config.bounds, config.duration_ms);
    let mut pacer = config
        .realtime
        .then(|| tokio::time::interval(Duration::from_secs_f64(config.frame_ms / 1000.0)));
    let mut frames = 0;
    let mut ignored = 0;
    let mut now = 0.0;

    while now <= config.duration_ms {
        if let Some(pacer) = pacer.as_mut() {
            pacer.tick().await;
        }
        for step in script.due(now) {
            match step.action {
                Action::Trigger(trigger) => {
                    let outcome = engine.trigger(handle, trigger);
                    debug!(
                        at_ms = step.at_ms,
                        trigger = trigger.name(),
                        ?outcome,
                        "script event"
                    );
                    if let TriggerOutcome::Ignored(_) = outcome {
                        ignored += 1;
                    }
                }
                Action::Resize(size) => {
                    let Rect { x, y, .. } = config.bounds;
                    anchor.set(Some(Rect::new(x, y, size.width, size.height)));
                    let clamped = engine.resize(handle, size);
                    debug!(at_ms = step.at_ms, width = size.width, height = size.height, clamped, "resized");
                }
            }
        }
        engine.advance(now);

        for frame in published.borrow_mut().drain(..) {
            write_frame(out, config.format, &frame, &config.button.appearance(&frame))?;
            frames += 1;
        }
        now += config.frame_ms;
    }

    let summary = Summary {
        button: kind,
        seed: config.seed,
        frames,
        runs: engine.snapshot(handle).map_or(0, |s| s.run),
        presses: presses.get(),
        completions: completions.get(),
        ignored,
        final_phase: engine.phase(handle).unwrap_or(Phase::Idle),
    };
    engine.destroy(handle);
    write_summary(out, config.format, &summary)?;
    info!(frames, "simulation finished");
    Ok(summary)
}

fn write_frame(
    out: &mut impl Write,
    format: OutputFormat,
    frame: &Snapshot,
    look: &Appearance,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => writeln!(
            out,
            "{:>8.1}ms  run {:<2} {:<8}  progress {:>6.3}  particles {:>3}  {}",
            frame.now,
            frame.run,
            phase_name(frame.phase),
            frame.progress,
            look.visible_particles().count(),
            look.transform(),
        )?,
        OutputFormat::Json => {
            let line = FrameLine {
                now: frame.now,
                run: frame.run,
                phase: frame.phase,
                progress: frame.progress,
                transform: look.transform(),
                appearance: look,
            };
            serde_json::to_writer(&mut *out, &line)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_summary(
    out: &mut impl Write,
    format: OutputFormat,
    summary: &Summary,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => writeln!(
            out,
            "summary: button={} frames={} runs={} presses={} completions={} ignored={} phase={}",
            summary.button,
            summary.frames,
            summary.runs,
            summary.presses,
            summary.completions,
            summary.ignored,
            phase_name(summary.final_phase),
        )?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &SummaryLine { summary })?;
            writeln!(out)?;
        }
    }
    Ok(())
}
