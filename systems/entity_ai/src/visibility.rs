//! Occlusion-aware visibility query.

use glam::Vec2;
use thurs_core::{normalize_angle, EntityDraw, PlayerView};
use thurs_system_raycast::RayCaster;
use thurs_world::GridMap;

use crate::Entity;

/// Entities closer than this are never drawn.
pub const MIN_VISIBLE_DISTANCE: f32 = 0.2;

/// Returns draw descriptors for entities the player can see, far to near.
///
/// An entity is visible when it lies strictly between
/// [`MIN_VISIBLE_DISTANCE`] and the caster's cutoff, inside the field of
/// view, and no opaque cell sits closer along the ray toward it.
#[must_use]
pub fn visible_entities(
    map: &GridMap,
    caster: &RayCaster,
    view: &PlayerView,
    entities: &[Entity],
) -> Vec<EntityDraw> {
    let half_fov = view.fov / 2.0;
    let mut visible: Vec<EntityDraw> = entities
        .iter()
        .filter_map(|entity| {
            let offset: Vec2 = entity.position() - view.position;
            let distance = offset.length();
            if distance <= MIN_VISIBLE_DISTANCE || distance >= caster.cutoff() {
                return None;
            }

            let heading = offset.y.atan2(offset.x);
            let bearing = normalize_angle(heading - view.angle);
            if bearing.abs() >= half_fov {
                return None;
            }

            let hit = caster.cast(map, view.position, heading);
            if hit.distance < distance {
                return None;
            }

            Some(EntityDraw {
                id: entity.id(),
                bearing,
                distance,
                scale: distance.recip(),
                tag: entity.tag(),
            })
        })
        .collect();

    visible.sort_by(|a, b| b.distance.total_cmp(&a.distance).then(a.id.cmp(&b.id)));
    visible
}
