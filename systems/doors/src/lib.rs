#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Door timing system that drives every door through its open/hold/close cycle.
//!
//! A single countdown covers the whole cycle. During the first third the door
//! opens, during the middle third it holds and in the final third it closes.
//! Openness changes at unit rate whatever the cycle length. Phase decisions
//! use the timer observed at the start of a step; the timer is then reduced by
//! the step's delta.

use serde::{Deserialize, Serialize};
use thurs_core::{ConfigError, DoorPhase, DoorState, Event, DEFAULT_DOOR_CYCLE};
use thurs_world::GridMap;

/// Duration of a complete door cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct DoorCycle(f32);

impl DoorCycle {
    /// Creates a cycle of the provided positive, finite duration.
    pub fn new(duration: f32) -> Result<Self, ConfigError> {
        if duration.is_finite() && duration > 0.0 {
            Ok(Self(duration))
        } else {
            Err(ConfigError::InvalidDoorCycle(duration))
        }
    }

    /// Total duration of the cycle.
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.0
    }

    /// Timer value at which an opening door is considered fully open.
    #[must_use]
    pub fn open_threshold(&self) -> f32 {
        self.0 * 2.0 / 3.0
    }

    /// Timer value at which an open door starts closing.
    #[must_use]
    pub fn close_threshold(&self) -> f32 {
        self.0 / 3.0
    }
}

impl Default for DoorCycle {
    fn default() -> Self {
        Self(DEFAULT_DOOR_CYCLE)
    }
}

impl TryFrom<f32> for DoorCycle {
    type Error = ConfigError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DoorCycle> for f32 {
    fn from(cycle: DoorCycle) -> Self {
        cycle.duration()
    }
}

/// Advances door state machines.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoorController {
    cycle: DoorCycle,
}

impl DoorController {
    /// Creates a controller for doors with the provided cycle.
    #[must_use]
    pub const fn new(cycle: DoorCycle) -> Self {
        Self { cycle }
    }

    /// Cycle applied to every door.
    #[must_use]
    pub const fn cycle(&self) -> DoorCycle {
        self.cycle
    }

    /// Advances every active door by `dt`, reporting phase changes.
    pub fn advance(&self, map: &mut GridMap, dt: f32, out: &mut Vec<Event>) {
        for (cell, door) in map.doors_mut() {
            if door.timer <= 0.0 {
                continue;
            }

            let before = door.phase;
            self.step(door, dt);
            if door.phase != before {
                log::trace!("door at {cell:?} entered {:?}", door.phase);
                out.push(Event::DoorPhaseChanged {
                    cell,
                    phase: door.phase,
                });
            }
        }
    }

    fn step(&self, door: &mut DoorState, dt: f32) {
        let observed = door.timer;
        door.timer = (door.timer - dt).max(0.0);

        match door.phase {
            DoorPhase::Opening => {
                if observed > self.cycle.open_threshold() {
                    door.openness = (door.openness + dt).min(1.0);
                } else {
                    door.phase = DoorPhase::Open;
                }
            }
            DoorPhase::Open => {
                if observed <= self.cycle.close_threshold() {
                    door.phase = DoorPhase::Closing;
                    self.close(door, dt);
                }
            }
            DoorPhase::Closing => self.close(door, dt),
            DoorPhase::Closed => {}
        }

        // An expired timer always ends the cycle, whatever dt skipped over.
        if door.timer <= 0.0 && door.phase != DoorPhase::Closed {
            shut(door);
        }
    }

    fn close(&self, door: &mut DoorState, dt: f32) {
        door.openness = (door.openness - dt).max(0.0);
        if door.openness <= 0.0 {
            shut(door);
        }
    }
}

fn shut(door: &mut DoorState) {
    door.openness = 0.0;
    door.timer = 0.0;
    door.phase = DoorPhase::Closed;
}
