#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entity behaviour system.
//!
//! Every frame each entity derives a desired displacement from its
//! [`Behavior`]: chasers walk toward the player until they reach a standoff
//! distance, wanderers take a random impulse whenever their wander clock
//! fires, and stationary entities stay put. Displacements are accepted only
//! if the destination point is passable; entities never slide.

pub mod visibility;

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thurs_core::{Behavior, EntityId, EntityTag, Event};
use thurs_system_collision::resolve_entity_move;
use thurs_world::GridMap;

pub use visibility::{visible_entities, MIN_VISIBLE_DISTANCE};

/// Autonomous actor roaming the map.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    id: EntityId,
    position: Vec2,
    speed: f32,
    behavior: Behavior,
    tag: EntityTag,
    wander_timer: f32,
}

impl Entity {
    /// Creates an entity with an idle wander clock.
    #[must_use]
    pub const fn new(
        id: EntityId,
        position: Vec2,
        speed: f32,
        behavior: Behavior,
        tag: EntityTag,
    ) -> Self {
        Self {
            id,
            position,
            speed,
            behavior,
            tag,
            wander_timer: 0.0,
        }
    }

    /// Identifier of the entity.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Position in map units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Movement speed in units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Movement policy.
    #[must_use]
    pub const fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Visual tag forwarded to renderers.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Time accumulated toward the next wander impulse.
    #[must_use]
    pub const fn wander_timer(&self) -> f32 {
        self.wander_timer
    }
}

/// Whether wanderers keep their own clock or share one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WanderClock {
    /// Each wanderer fires on its own cadence.
    #[default]
    PerEntity,
    /// All wanderers fire together from one clock.
    Shared,
}

/// Tuning of the behaviour system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityAiConfig {
    /// Chasers stop once they are this close to the player.
    pub standoff: f32,
    /// Time between wander impulses.
    pub wander_interval: f32,
    /// Wander clock mode.
    pub wander_clock: WanderClock,
    /// Seed of the wander direction stream.
    pub seed: u64,
}

impl Default for EntityAiConfig {
    fn default() -> Self {
        Self {
            standoff: 0.5,
            wander_interval: 1.0,
            wander_clock: WanderClock::PerEntity,
            seed: 0x5eed_0f_7a11,
        }
    }
}

/// Computes and applies entity displacements.
#[derive(Clone, Debug)]
pub struct EntityAi {
    config: EntityAiConfig,
    rng: ChaCha8Rng,
    shared_timer: f32,
}

impl EntityAi {
    /// Creates the system with a freshly seeded wander stream.
    #[must_use]
    pub fn new(config: EntityAiConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            shared_timer: 0.0,
        }
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &EntityAiConfig {
        &self.config
    }

    /// Moves every entity for a frame of length `dt`.
    ///
    /// Entities are processed in roster order. An entity whose destination is
    /// blocked stays where it is and an [`Event::EntityBlocked`] is reported.
    pub fn update(
        &mut self,
        map: &GridMap,
        entities: &mut [Entity],
        player: Vec2,
        dt: f32,
        out: &mut Vec<Event>,
    ) {
        let shared_fired = match self.config.wander_clock {
            WanderClock::Shared => tick(&mut self.shared_timer, dt, self.config.wander_interval),
            WanderClock::PerEntity => false,
        };

        for entity in entities.iter_mut() {
            let displacement = self.displacement(entity, player, dt, shared_fired);
            if displacement == Vec2::ZERO {
                continue;
            }

            let desired = entity.position + displacement;
            match resolve_entity_move(map, desired) {
                Some(destination) => entity.position = destination,
                None => {
                    log::trace!("entity {} blocked moving to {desired}", entity.id.get());
                    out.push(Event::EntityBlocked { id: entity.id });
                }
            }
        }
    }

    fn displacement(
        &mut self,
        entity: &mut Entity,
        player: Vec2,
        dt: f32,
        shared_fired: bool,
    ) -> Vec2 {
        let reach = entity.speed * dt;
        match entity.behavior {
            Behavior::Chase => {
                let offset = player - entity.position;
                let distance = offset.length();
                if distance > self.config.standoff {
                    offset / distance * reach
                } else {
                    Vec2::ZERO
                }
            }
            Behavior::Wander => {
                let fired = match self.config.wander_clock {
                    WanderClock::PerEntity => {
                        tick(&mut entity.wander_timer, dt, self.config.wander_interval)
                    }
                    WanderClock::Shared => shared_fired,
                };
                if fired {
                    let heading = self.rng.gen_range(0.0..TAU);
                    Vec2::new(heading.cos(), heading.sin()) * reach
                } else {
                    Vec2::ZERO
                }
            }
            Behavior::Stationary => Vec2::ZERO,
        }
    }
}

impl Default for EntityAi {
    fn default() -> Self {
        Self::new(EntityAiConfig::default())
    }
}

/// Accumulates `dt` and reports whether `interval` was exceeded, resetting
/// the timer when it was.
fn tick(timer: &mut f32, dt: f32, interval: f32) -> bool {
    *timer += dt;
    if *timer > interval {
        *timer = 0.0;
        true
    } else {
        false
    }
}
