#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Point-versus-grid collision for actors moving through a [`GridMap`].
//!
//! The player is modelled as a point inflated by a square buffer and slides
//! along whichever axis stays clear. Entities are bare points that simply
//! stop when their destination is blocked.

use glam::Vec2;
use thurs_core::ConfigError;
use thurs_world::GridMap;

/// Default half-width of the player's collision square.
pub const DEFAULT_BUFFER: f32 = 0.25;

/// Tests and resolves moves against map passability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionResolver {
    buffer: f32,
}

impl CollisionResolver {
    /// Creates a resolver with the provided non-negative buffer.
    pub fn new(buffer: f32) -> Result<Self, ConfigError> {
        if buffer.is_finite() && buffer >= 0.0 {
            Ok(Self { buffer })
        } else {
            Err(ConfigError::InvalidParameter {
                name: "collision_buffer",
                value: buffer,
            })
        }
    }

    /// Half-width of the collision square.
    #[must_use]
    pub const fn buffer(&self) -> f32 {
        self.buffer
    }

    /// Reports whether every probe around `position` lands on a passable cell.
    ///
    /// The probes are the four corners of the buffer square plus the two
    /// points offset by the buffer along X.
    #[must_use]
    pub fn can_occupy(&self, map: &GridMap, position: Vec2) -> bool {
        let b = self.buffer;
        [
            Vec2::new(-b, -b),
            Vec2::new(b, -b),
            Vec2::new(-b, b),
            Vec2::new(b, b),
            Vec2::new(-b, 0.0),
            Vec2::new(b, 0.0),
        ]
        .into_iter()
        .all(|offset| map.is_passable_at(position + offset))
    }

    /// Moves from `current` toward `desired`, sliding along a clear axis when
    /// the full move is blocked.
    ///
    /// The X-only move is preferred when both single-axis moves are clear.
    /// When neither is clear the position is unchanged.
    #[must_use]
    pub fn resolve_move(&self, map: &GridMap, current: Vec2, desired: Vec2) -> Vec2 {
        if self.can_occupy(map, desired) {
            return desired;
        }

        let along_x = Vec2::new(desired.x, current.y);
        if self.can_occupy(map, along_x) {
            return along_x;
        }

        let along_y = Vec2::new(current.x, desired.y);
        if self.can_occupy(map, along_y) {
            return along_y;
        }

        current
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_BUFFER,
        }
    }
}

/// Single-point passability test used for entities.
#[must_use]
pub fn can_enter(map: &GridMap, position: Vec2) -> bool {
    map.is_passable_at(position)
}

/// Resolves an entity move without sliding: the destination or nothing.
#[must_use]
pub fn resolve_entity_move(map: &GridMap, desired: Vec2) -> Option<Vec2> {
    can_enter(map, desired).then_some(desired)
}
