#![forbid(unsafe_code)]

//! # Kinetic Sim
//!
//! Headless driver for the kinetic button presets.
//!
//! Creates one button on a simulated frame clock, plays a pointer script
//! suited to its effect family and prints every frame the button
//! publishes, followed by a summary line. Logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! kinetic_sim --list
//! kinetic_sim --effect shatter --seed 42
//! kinetic_sim --props button.toml --format json -vv
//! RUST_LOG=kinetic=trace kinetic_sim --effect magnetic
//! ```

mod cli;
mod script;
mod sim;

use std::io::{self, BufWriter, Write};

use kinetic_buttons::ButtonKind;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use sim::SimConfig;

fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn list(out: &mut impl Write) -> io::Result<()> {
    for kind in ButtonKind::ALL {
        let family = kind.default_props().config().family();
        writeln!(out, "{:<16}{:<8}{}", kind.name(), family, kind.summary())?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logging(&cli);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.list {
        list(&mut out)?;
        out.flush()?;
        return Ok(());
    }

    let config = SimConfig {
        button: cli.button()?,
        bounds: cli.bounds()?,
        seed: cli.seed,
        frame_ms: cli.frame_ms(),
        duration_ms: cli.duration_ms,
        format: cli.format,
        realtime: cli.realtime,
    };
    sim::run(&config, &mut out).await?;
    out.flush()?;
    Ok(())
}
