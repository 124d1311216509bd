//! Command-line interface for `kinetic_sim`.
//!
//! # Examples
//!
//! ```bash
//! # List the presets
//! kinetic_sim --list
//!
//! # Press the confetti button and print each frame
//! kinetic_sim --effect confetti --seed 7
//!
//! # Load props from a file, one JSON object per frame
//! kinetic_sim --props neon.toml --format json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use kinetic::{Rect, frame_interval};
use kinetic_buttons::{AnyButton, ButtonKind};

/// Drive a kinetic button headlessly and print what it looks like on
/// every frame.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "kinetic_sim",
    author,
    version,
    about = "Drive a kinetic button through a scripted interaction",
    long_about = "Creates one button on a simulated frame clock, plays a pointer \
                  script suited to its effect and prints every published frame."
)]
pub struct Cli {
    /// Button preset to simulate
    ///
    /// Optional when the props file names its button
    #[arg(long, short = 'e', required_unless_present_any = ["list", "props"])]
    pub effect: Option<ButtonKind>,

    /// TOML or JSON file with button props
    ///
    /// Missing props keep their defaults; unknown keys are ignored
    #[arg(long, short = 'p')]
    pub props: Option<PathBuf>,

    /// Seed for randomized emission
    ///
    /// The same seed replays the same particles
    #[arg(long, short = 's', env = "KINETIC_SEED")]
    pub seed: Option<u64>,

    /// Simulated display refresh rate
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Length of the simulation in milliseconds
    #[arg(long, default_value_t = 3000.0)]
    pub duration_ms: f64,

    /// Button width
    #[arg(long, default_value_t = 120.0)]
    pub width: f64,

    /// Button height
    #[arg(long, default_value_t = 40.0)]
    pub height: f64,

    /// Frame output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pace frames at the display rate instead of as fast as possible
    #[arg(long)]
    pub realtime: bool,

    /// List the presets and exit
    #[arg(long)]
    pub list: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// How frames are printed.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One aligned line per frame
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log filter for the requested verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Milliseconds between simulated frames.
    #[must_use]
    pub fn frame_ms(&self) -> f64 {
        frame_interval(self.fps)
    }

    /// Bounds of the simulated button.
    ///
    /// # Errors
    ///
    /// Returns an error unless both sides are positive and finite.
    pub fn bounds(&self) -> anyhow::Result<Rect> {
        if !(self.width.is_finite() && self.width > 0.0) {
            bail!("--width must be a positive number, got {}", self.width);
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            bail!("--height must be a positive number, got {}", self.height);
        }
        Ok(Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// Resolves the button to simulate from `--effect` and `--props`.
    ///
    /// # Errors
    ///
    /// Returns an error if the props file cannot be read or parsed, or if it
    /// names a different button than `--effect`.
    pub fn button(&self) -> anyhow::Result<AnyButton> {
        match (&self.props, self.effect) {
            (Some(path), effect) => load_props(path, effect),
            (None, Some(kind)) => Ok(kind.default_props()),
            (None, None) => bail!("no button selected; pass --effect or --props"),
        }
    }
}

/// Reads button props from a TOML or JSON file.
///
/// The format follows the extension; anything but `.json` is read as TOML.
/// When `effect` is given the file may leave out its `button` field.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or names a
/// different button than `effect`.
pub fn load_props(path: &Path, effect: Option<ButtonKind>) -> anyhow::Result<AnyButton> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read props from {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut document: serde_json::Value = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", path.display()))?
    } else {
        let table: toml::Table = toml::from_str(&text)
            .with_context(|| format!("{} is not valid TOML", path.display()))?;
        serde_json::to_value(table)?
    };

    let Some(fields) = document.as_object_mut() else {
        bail!("{} must hold a table of props", path.display());
    };
    match (fields.get("button").and_then(serde_json::Value::as_str), effect) {
        (Some(named), Some(kind)) => {
            let named: ButtonKind = named.parse()?;
            if named != kind {
                bail!(
                    "{} describes `{named}` but --effect asks for `{kind}`",
                    path.display()
                );
            }
        }
        (None, Some(kind)) => {
            fields.insert("button".to_string(), kind.name().into());
        }
        (_, None) => {}
    }

    serde_json::from_value(document)
        .with_context(|| format!("invalid props in {}", path.display()))
}
