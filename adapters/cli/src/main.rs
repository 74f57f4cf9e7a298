#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that walks a scripted player through the Thurs world
//! and prints the first-person view as text.

mod config;
mod script;
mod terminal;

use std::{io, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use thurs_rendering::{InputSource, Renderer};
use thurs_simulation::{Simulation, SimulationError};

use crate::{
    config::{MapSource, RunConfig},
    script::ScriptedInput,
    terminal::TerminalRenderer,
};

/// Generator seeds tried before giving up on a generated map.
const GENERATION_ATTEMPTS: u32 = 8;

/// Headless runner for the Thurs grid-world simulation.
#[derive(Debug, Parser)]
#[command(name = "thurs", version)]
struct Cli {
    /// TOML file with `[simulation]` and `[map]` tables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    frames: u32,
    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,
    /// Seed for generated maps and wander directions.
    #[arg(long)]
    seed: Option<u64>,
    /// Print every Nth frame. Zero disables printing.
    #[arg(long, default_value_t = 60)]
    render_every: u32,
    /// Text columns in the printed view. One ray is cast per column.
    #[arg(long)]
    width: Option<usize>,
    /// Text rows in the printed view.
    #[arg(long, default_value_t = 24)]
    height: u32,
}

impl Cli {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(seed) = self.seed {
            config.simulation.behaviour.seed = seed;
            if let MapSource::Generated(generator) = &mut config.map {
                generator.seed = seed;
            }
        }
        if let Some(width) = self.width {
            config.simulation.columns = width;
        }
    }
}

/// Entry point for the Thurs command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = RunConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let mut simulation = start(&config)?;
    let mut input = ScriptedInput::new(cli.dt, cli.frames);
    let mut renderer = TerminalRenderer::new(io::stdout().lock(), cli.height, cli.render_every);

    let frames = drive(&mut simulation, &mut input, &mut renderer)?;
    log::info!(
        "simulated {frames} frames, player finished at {}",
        simulation.player().position()
    );
    Ok(())
}

fn start(config: &RunConfig) -> Result<Simulation> {
    let MapSource::Generated(generator) = &config.map else {
        let map = config.map.build().context("failed to build map")?;
        return Simulation::new(config.simulation.clone(), map)
            .context("failed to start simulation");
    };

    let mut generator = generator.clone();
    for _ in 0..GENERATION_ATTEMPTS {
        let map = thurs_world::generate(&generator).context("failed to generate map")?;
        match Simulation::new(config.simulation.clone(), map) {
            Err(SimulationError::Spawn(error)) => {
                log::warn!("generator seed {} unusable: {error}", generator.seed);
                generator.seed = generator.seed.wrapping_add(1);
            }
            result => return result.context("failed to start simulation"),
        }
    }
    bail!("no usable map after {GENERATION_ATTEMPTS} generator seeds")
}

fn drive<I, R>(simulation: &mut Simulation, input: &mut I, renderer: &mut R) -> Result<u64>
where
    I: InputSource,
    R: Renderer,
{
    while let Some(frame_input) = input.next_input() {
        let frame = simulation
            .step(&frame_input)
            .context("simulation step failed")?;
        for event in &frame.events {
            log::debug!("frame {}: {event:?}", simulation.frames());
        }
        renderer.present(&frame)?;
    }
    Ok(simulation.frames())
}
