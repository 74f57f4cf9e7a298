//! Spawn relocation for maps without guaranteed connectivity.

use glam::Vec2;
use thiserror::Error;

use crate::GridMap;

/// Distance between successive relocation probes along X.
pub const SPAWN_PROBE_STEP: f32 = 0.1;

/// Raised when no acceptable spawn position lies to the right of the request.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("no passable spawn found to the right of ({x}, {y})")]
pub struct SpawnError {
    /// Requested spawn X.
    pub x: f32,
    /// Requested spawn Y.
    pub y: f32,
}

/// Moves `position` right in [`SPAWN_PROBE_STEP`] increments until it lands on
/// a passable cell.
///
/// The search gives up once the offset exceeds the map width.
pub fn relocate_to_passable(map: &GridMap, position: Vec2) -> Result<Vec2, SpawnError> {
    relocate_where(map, position, |candidate| map.is_passable_at(candidate))
}

/// Like [`relocate_to_passable`], with a caller-supplied acceptance test.
pub fn relocate_where<F>(map: &GridMap, position: Vec2, accept: F) -> Result<Vec2, SpawnError>
where
    F: Fn(Vec2) -> bool,
{
    let limit = map.width() as f32;
    let mut step = 0_u32;
    loop {
        let offset = step as f32 * SPAWN_PROBE_STEP;
        if offset > limit {
            log::warn!("no spawn found right of {position}");
            return Err(SpawnError {
                x: position.x,
                y: position.y,
            });
        }

        let candidate = Vec2::new(position.x + offset, position.y);
        if accept(candidate) {
            if step > 0 {
                log::info!("relocated spawn from {position} to {candidate}");
            }
            return Ok(candidate);
        }
        step += 1;
    }
}
