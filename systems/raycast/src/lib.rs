#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid ray casting using a digital differential analyzer.
//!
//! Rays step from one grid line crossing to the next, always taking the
//! nearer of the next vertical or horizontal crossing, until they enter an
//! opaque cell or travel past the render cutoff. The caster only reads the
//! map, so any number of rays may be cast per frame in any order. Enabling
//! the `parallel` feature spreads per-column casts across a rayon pool.

use glam::Vec2;
use thurs_core::{
    CellCoord, ConfigError, HitKind, PlayerView, RayHit, Side, TileKind, DEFAULT_RENDER_CUTOFF,
};
use thurs_world::GridMap;

/// Step distance substituted when a ray runs parallel to an axis.
const DEGENERATE_DELTA: f32 = 1.0e30;

/// Casts rays against a [`GridMap`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayCaster {
    cutoff: f32,
}

impl RayCaster {
    /// Creates a caster that reports no surface beyond `cutoff` units.
    pub fn new(cutoff: f32) -> Result<Self, ConfigError> {
        if cutoff.is_finite() && cutoff > 0.0 {
            Ok(Self { cutoff })
        } else {
            Err(ConfigError::InvalidParameter {
                name: "render_cutoff",
                value: cutoff,
            })
        }
    }

    /// Maximum distance a ray travels.
    #[must_use]
    pub const fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Finds the first opaque surface along the ray from `origin` at `angle`.
    #[must_use]
    pub fn cast(&self, map: &GridMap, origin: Vec2, angle: f32) -> RayHit {
        let direction = Vec2::new(angle.cos(), angle.sin());
        let mut cell = CellCoord::containing(origin);

        let delta_x = step_delta(direction.x);
        let delta_y = step_delta(direction.y);
        let (step_x, mut side_x) = if direction.x < 0.0 {
            (-1, (origin.x - cell.column() as f32) * delta_x)
        } else {
            (1, (cell.column() as f32 + 1.0 - origin.x) * delta_x)
        };
        let (step_y, mut side_y) = if direction.y < 0.0 {
            (-1, (origin.y - cell.row() as f32) * delta_y)
        } else {
            (1, (cell.row() as f32 + 1.0 - origin.y) * delta_y)
        };

        // Each axis accumulates at least one unit per step, so no ray can
        // take more than cutoff + 2 steps along either axis.
        let max_steps = 2 * (self.cutoff.ceil() as usize + 2);
        let mut side = Side::Vertical;
        for _ in 0..max_steps {
            let distance = if side_x < side_y {
                let distance = side_x;
                side_x += delta_x;
                cell = cell.offset(step_x, 0);
                side = Side::Vertical;
                distance
            } else {
                let distance = side_y;
                side_y += delta_y;
                cell = cell.offset(0, step_y);
                side = Side::Horizontal;
                distance
            };

            if distance.is_nan() || distance > self.cutoff {
                break;
            }
            if map.is_opaque(cell) {
                return surface_hit(map, origin, direction, angle, distance, side, cell);
            }
        }

        RayHit::miss(angle, self.cutoff, side)
    }

    /// Casts one ray per screen column, sweeping the viewer's field of view
    /// from left to right.
    #[must_use]
    pub fn cast_columns(&self, map: &GridMap, view: &PlayerView, columns: usize) -> Vec<RayHit> {
        sweep(columns, |column| {
            let angle = column_angle(view.angle, view.fov, column, columns);
            self.cast(map, view.position, angle)
        })
    }
}

impl Default for RayCaster {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_RENDER_CUTOFF,
        }
    }
}

/// Ray angle of a screen column, interpolated linearly across the field of view.
///
/// A single column looks straight along `facing`.
#[must_use]
pub fn column_angle(facing: f32, fov: f32, column: usize, columns: usize) -> f32 {
    if columns <= 1 {
        return facing;
    }
    let fraction = column as f32 / (columns - 1) as f32;
    facing - fov / 2.0 + fraction * fov
}

#[cfg(feature = "parallel")]
fn sweep<F>(columns: usize, cast: F) -> Vec<RayHit>
where
    F: Fn(usize) -> RayHit + Send + Sync,
{
    use rayon::prelude::*;
    (0..columns).into_par_iter().map(cast).collect()
}

#[cfg(not(feature = "parallel"))]
fn sweep<F>(columns: usize, cast: F) -> Vec<RayHit>
where
    F: Fn(usize) -> RayHit,
{
    (0..columns).map(cast).collect()
}

fn step_delta(component: f32) -> f32 {
    if component == 0.0 {
        DEGENERATE_DELTA
    } else {
        (1.0 / component).abs()
    }
}

fn surface_hit(
    map: &GridMap,
    origin: Vec2,
    direction: Vec2,
    angle: f32,
    distance: f32,
    side: Side,
    cell: CellCoord,
) -> RayHit {
    let along = match side {
        Side::Vertical => origin.y + distance * direction.y,
        Side::Horizontal => origin.x + distance * direction.x,
    };
    let kind = match map.tile_at(cell) {
        TileKind::Door => HitKind::Door,
        _ => HitKind::Wall,
    };

    RayHit {
        angle,
        distance,
        side,
        wall_fraction: along - along.floor(),
        kind,
        cell: Some(cell),
    }
}
