#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestrator that owns the map, the player and the entity roster.
//!
//! Each call to [`Simulation::step`] runs the systems in a fixed order:
//! turning, door toggling, player movement, door timing, entity behaviour,
//! column casting and finally the entity visibility query. Later stages
//! always observe the state left by earlier ones.

pub mod config;
pub mod player;

use thiserror::Error;
use thurs_core::{ConfigError, EntityId, Event, Frame, FrameInput};
use thurs_system_collision::CollisionResolver;
use thurs_system_doors::DoorController;
use thurs_system_entity_ai::{visible_entities, EntityAi};
use thurs_system_raycast::RayCaster;
use thurs_world::{relocate_to_passable, relocate_where, GridMap, SpawnError};

pub use config::{EntitySpawn, PlayerConfig, SimulationConfig, DEFAULT_COLUMNS};
pub use player::Player;
pub use thurs_system_entity_ai::Entity;

/// Failures surfaced while creating or stepping a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration or frame input was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No spawn position could be found for the player or an entity.
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

/// Authoritative simulation state.
#[derive(Debug)]
pub struct Simulation {
    map: GridMap,
    player: Player,
    entities: Vec<Entity>,
    doors: DoorController,
    caster: RayCaster,
    collision: CollisionResolver,
    behaviour: EntityAi,
    columns: usize,
    frames: u64,
}

impl Simulation {
    /// Builds a simulation on `map`.
    ///
    /// The player is moved right until its buffer square fits; entities are
    /// moved right until their point lands on a passable cell.
    pub fn new(config: SimulationConfig, map: GridMap) -> Result<Self, SimulationError> {
        config.validate()?;
        let collision = CollisionResolver::new(config.collision_buffer)?;
        let caster = RayCaster::new(config.render_cutoff)?;

        let spawn = relocate_where(&map, config.player.spawn, |candidate| {
            collision.can_occupy(&map, candidate)
        })?;
        let player = Player::new(&config.player, spawn);

        let mut entities = Vec::with_capacity(config.entities.len());
        for (index, entry) in config.entities.iter().enumerate() {
            let position = relocate_to_passable(&map, entry.position)?;
            entities.push(Entity::new(
                EntityId::new(index as u32),
                position,
                entry.speed,
                entry.behavior,
                entry.tag,
            ));
        }

        log::info!(
            "simulation ready on {}x{} map with {} entities",
            map.width(),
            map.height(),
            entities.len()
        );

        Ok(Self {
            map,
            player,
            entities,
            doors: DoorController::new(config.door_cycle),
            caster,
            collision,
            behaviour: EntityAi::new(config.behaviour),
            columns: config.columns,
            frames: 0,
        })
    }

    /// Advances the world by one frame and returns what a renderer needs.
    ///
    /// A rejected input leaves the state untouched.
    pub fn step(&mut self, input: &FrameInput) -> Result<Frame, SimulationError> {
        if let Err(error) = input.validate() {
            log::warn!("rejected frame {}: {error}", self.frames);
            return Err(error.into());
        }

        let mut events = Vec::new();

        self.player.turn(input);

        if input.toggle_door {
            let cycle = self.doors.cycle().duration();
            if let Some(cell) =
                self.map
                    .toggle_nearest_door(self.player.position(), self.player.angle(), cycle)
            {
                events.push(Event::DoorToggled { cell });
            }
        }

        let from = self.player.position();
        let desired = self.player.desired_position(input);
        let to = self.collision.resolve_move(&self.map, from, desired);
        if to != from {
            self.player.place(to);
            events.push(Event::PlayerMoved { from, to });
        }

        self.doors.advance(&mut self.map, input.dt, &mut events);

        self.behaviour.update(
            &self.map,
            &mut self.entities,
            self.player.position(),
            input.dt,
            &mut events,
        );

        let view = self.player.view();
        let columns = self.caster.cast_columns(&self.map, &view, self.columns);
        let sprites = visible_entities(&self.map, &self.caster, &view, &self.entities);

        self.frames += 1;
        Ok(Frame {
            player: view,
            columns,
            sprites,
            events,
        })
    }

    /// Current map state.
    #[must_use]
    pub const fn map(&self) -> &GridMap {
        &self.map
    }

    /// Current player state.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Entity roster in identifier order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of frames stepped successfully.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of ray columns cast per frame.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }
}
