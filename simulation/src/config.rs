//! Tunable parameters of a simulation run.

use std::f32::consts::FRAC_PI_3;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thurs_core::{Behavior, ConfigError, EntityTag, DEFAULT_RENDER_CUTOFF};
use thurs_system_collision::DEFAULT_BUFFER;
use thurs_system_doors::DoorCycle;
use thurs_system_entity_ai::EntityAiConfig;

/// Default number of ray columns cast per frame.
pub const DEFAULT_COLUMNS: usize = 120;

/// Everything needed to start a simulation on a given map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Duration of a complete door cycle.
    pub door_cycle: DoorCycle,
    /// Maximum distance a ray travels before reporting a miss.
    pub render_cutoff: f32,
    /// Number of ray columns cast per frame.
    pub columns: usize,
    /// Half extent of the player's collision probe square.
    pub collision_buffer: f32,
    /// Entity behaviour tuning.
    pub behaviour: EntityAiConfig,
    /// Player parameters.
    pub player: PlayerConfig,
    /// Entities placed at start, in identifier order.
    pub entities: Vec<EntitySpawn>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            door_cycle: DoorCycle::default(),
            render_cutoff: DEFAULT_RENDER_CUTOFF,
            columns: DEFAULT_COLUMNS,
            collision_buffer: DEFAULT_BUFFER,
            behaviour: EntityAiConfig::default(),
            player: PlayerConfig::default(),
            entities: vec![
                EntitySpawn {
                    position: Vec2::new(6.5, 3.5),
                    speed: 1.0,
                    behavior: Behavior::Chase,
                    tag: EntityTag::from_rgb(0xff, 0x40, 0x40),
                },
                EntitySpawn {
                    position: Vec2::new(13.5, 9.5),
                    speed: 1.5,
                    behavior: Behavior::Wander,
                    tag: EntityTag::from_rgb(0x40, 0xff, 0x40),
                },
                EntitySpawn {
                    position: Vec2::new(3.5, 13.5),
                    speed: 0.0,
                    behavior: Behavior::Stationary,
                    tag: EntityTag::from_rgb(0x40, 0x40, 0xff),
                },
            ],
        }
    }
}

impl SimulationConfig {
    /// Rejects parameters the systems cannot run with.
    ///
    /// The door cycle is validated when it is constructed or deserialised.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::InvalidColumnCount);
        }
        positive("render_cutoff", self.render_cutoff)?;
        non_negative("collision_buffer", self.collision_buffer)?;
        non_negative("standoff", self.behaviour.standoff)?;
        non_negative("wander_interval", self.behaviour.wander_interval)?;
        self.player.validate()?;
        for spawn in &self.entities {
            finite("entity_x", spawn.position.x)?;
            finite("entity_y", spawn.position.y)?;
            non_negative("entity_speed", spawn.speed)?;
        }
        Ok(())
    }
}

/// Player start state and movement tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Requested spawn point; relocated if the probe square does not fit.
    pub spawn: Vec2,
    /// Initial facing in radians.
    pub angle: f32,
    /// Horizontal field of view in radians.
    pub fov: f32,
    /// Walking speed in units per second.
    pub speed: f32,
    /// Keyboard turn rate in radians per second.
    pub turn_rate: f32,
    /// Radians turned per unit of look delta while the pointer is captured.
    pub look_sensitivity: f32,
    /// Speed factor while sprinting.
    pub sprint_multiplier: f32,
    /// Speed factor for sideways movement.
    pub strafe_factor: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(1.5, 1.5),
            angle: 0.0,
            fov: FRAC_PI_3,
            speed: 2.0,
            turn_rate: 1.5,
            look_sensitivity: 0.002,
            sprint_multiplier: 1.4,
            strafe_factor: 0.7,
        }
    }
}

impl PlayerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        finite("spawn_x", self.spawn.x)?;
        finite("spawn_y", self.spawn.y)?;
        finite("angle", self.angle)?;
        positive("fov", self.fov)?;
        non_negative("speed", self.speed)?;
        non_negative("turn_rate", self.turn_rate)?;
        finite("look_sensitivity", self.look_sensitivity)?;
        non_negative("sprint_multiplier", self.sprint_multiplier)?;
        non_negative("strafe_factor", self.strafe_factor)
    }
}

/// Start state of one entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySpawn {
    /// Requested position; relocated to a passable cell if needed.
    pub position: Vec2,
    /// Movement speed in units per second.
    #[serde(default = "default_entity_speed")]
    pub speed: f32,
    /// Movement policy.
    #[serde(default)]
    pub behavior: Behavior,
    /// Visual tag.
    #[serde(default)]
    pub tag: EntityTag,
}

fn default_entity_speed() -> f32 {
    1.0
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}
