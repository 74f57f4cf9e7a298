#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Thurs engine.
//!
//! This crate defines the vocabulary that connects the authoritative map,
//! the pure systems and the adapters. Adapters hand the simulation one
//! [`FrameInput`] per frame, the simulation mutates the map and its actors
//! through the systems, and then returns a [`Frame`] describing everything a
//! renderer needs: one [`RayHit`] per screen column, the visible entities and
//! the [`Event`] values raised while stepping.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum ray travel distance, in cell units, before no surface is reported.
pub const DEFAULT_RENDER_CUTOFF: f32 = 16.0;

/// Total duration of a door's open/hold/close cycle.
pub const DEFAULT_DOOR_CYCLE: f32 = 3.0;

/// Openness at which a door stops blocking movement and rays.
pub const DOOR_THRESHOLD: f32 = 0.5;

/// Static classification of a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Passable and never occludes rays.
    Empty,
    /// Impassable and always occludes rays.
    Wall,
    /// Passable and transparent only while its door is sufficiently open.
    Door,
}

impl TileKind {
    /// Decodes the integer tile code used by map definitions (0, 1 or 2).
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Wall),
            2 => Some(Self::Door),
            _ => None,
        }
    }

    /// Integer code of the tile kind within map definitions.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Wall => 1,
            Self::Door => 2,
        }
    }
}

/// Phase of a door's timed state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorPhase {
    /// Fully shut and idle until triggered.
    #[default]
    Closed,
    /// Swinging open.
    Opening,
    /// Held open.
    Open,
    /// Swinging shut.
    Closing,
}

/// Dynamic state attached to a door cell.
///
/// `openness` ranges from 0.0 (shut) to 1.0 (fully open) and only changes
/// while the door is opening or closing. `timer` counts down from the full
/// cycle duration and never drops below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DoorState {
    /// Current phase of the door.
    pub phase: DoorPhase,
    /// Aperture in the range 0.0..=1.0.
    pub openness: f32,
    /// Remaining cycle time.
    pub timer: f32,
}

impl DoorState {
    /// Door that is shut and idle.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            phase: DoorPhase::Closed,
            openness: 0.0,
            timer: 0.0,
        }
    }

    /// Reports whether actors may walk through the door.
    #[must_use]
    pub fn is_passable(&self) -> bool {
        self.openness > DOOR_THRESHOLD
    }

    /// Reports whether the door stops rays.
    ///
    /// A door at exactly [`DOOR_THRESHOLD`] is neither passable nor opaque.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.openness < DOOR_THRESHOLD
    }

    /// Reports whether a toggle request may start opening the door.
    #[must_use]
    pub const fn accepts_toggle(&self) -> bool {
        matches!(self.phase, DoorPhase::Closed | DoorPhase::Closing)
    }
}

/// Location of a single grid cell. Coordinates may lie outside the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Cell containing the provided continuous map position.
    #[must_use]
    pub fn containing(position: Vec2) -> Self {
        Self {
            column: position.x.floor() as i32,
            row: position.y.floor() as i32,
        }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the cell offset by the provided deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self {
            column: self.column.saturating_add(columns),
            row: self.row.saturating_add(rows),
        }
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Position of the cell's centre in map units.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Grid line crossed when a ray struck a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The ray stepped along X and hit a vertical grid line.
    Vertical,
    /// The ray stepped along Y and hit a horizontal grid line.
    Horizontal,
}

impl Side {
    /// Numeric shading index, 0 for vertical and 1 for horizontal faces.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Vertical => 0,
            Self::Horizontal => 1,
        }
    }
}

/// Kind of surface a ray terminated on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitKind {
    /// A wall tile, including the closed world boundary.
    Wall,
    /// A door that was not open enough to see through.
    Door,
    /// Nothing within the render cutoff; the renderer draws background.
    Miss,
}

/// Geometric result of a single ray query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Absolute angle of the ray in radians.
    pub angle: f32,
    /// Travel distance to the surface, capped at the render cutoff.
    pub distance: f32,
    /// Orientation of the face that was hit.
    pub side: Side,
    /// Offset in 0.0..1.0 along the face, used as the texture coordinate.
    pub wall_fraction: f32,
    /// Surface classification.
    pub kind: HitKind,
    /// Cell that stopped the ray, absent on a miss.
    pub cell: Option<CellCoord>,
}

impl RayHit {
    /// Result reported when no surface lies within `cutoff`.
    #[must_use]
    pub const fn miss(angle: f32, cutoff: f32, side: Side) -> Self {
        Self {
            angle,
            distance: cutoff,
            side,
            wall_fraction: 0.0,
            kind: HitKind::Miss,
            cell: None,
        }
    }

    /// Reports whether the ray found no surface.
    #[must_use]
    pub const fn is_miss(&self) -> bool {
        matches!(self.kind, HitKind::Miss)
    }
}

/// Movement policy applied to an entity each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Walks straight toward the player.
    Chase,
    /// Drifts in random impulses at a fixed cadence.
    Wander,
    /// Never moves.
    #[default]
    Stationary,
}

/// Unique identifier assigned to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Opaque visual tag attached to an entity. Only renderers interpret it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityTag {
    red: u8,
    green: u8,
    blue: u8,
}

impl EntityTag {
    /// Creates a tag from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the tag.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the tag.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the tag.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl Default for EntityTag {
    fn default() -> Self {
        Self::from_rgb(0xff, 0x00, 0x00)
    }
}

/// Intents gathered by an input source for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds elapsed since the previous frame. Must be finite and non-negative.
    pub dt: f32,
    /// Move along the facing direction.
    pub move_forward: bool,
    /// Move against the facing direction.
    pub move_back: bool,
    /// Move to the player's left.
    pub strafe_left: bool,
    /// Move to the player's right.
    pub strafe_right: bool,
    /// Rotate counter-clockwise at the player's turn rate.
    pub turn_left: bool,
    /// Rotate clockwise at the player's turn rate.
    pub turn_right: bool,
    /// Horizontal look delta, applied only while the pointer is captured.
    pub look_delta: f32,
    /// Multiply movement speed by the sprint multiplier.
    pub sprint: bool,
    /// Edge-triggered request to toggle the nearest door.
    pub toggle_door: bool,
    /// Edge-triggered request to flip pointer capture.
    pub toggle_mouse_lock: bool,
}

impl FrameInput {
    /// Creates an idle input carrying only the frame delta.
    #[must_use]
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    /// Rejects frame deltas that are negative or not finite, and look deltas
    /// that are not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt >= 0.0) {
            return Err(ConfigError::InvalidFrameDelta(self.dt));
        }
        if !self.look_delta.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "look_delta",
                value: self.look_delta,
            });
        }
        Ok(())
    }
}

/// Viewer parameters a renderer needs to project column results.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Position in map units.
    pub position: Vec2,
    /// Facing angle in radians.
    pub angle: f32,
    /// Horizontal field of view in radians.
    pub fov: f32,
}

/// Draw descriptor for an entity that passed the visibility query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityDraw {
    /// Entity being drawn.
    pub id: EntityId,
    /// Angle relative to the player's facing, in `[-π, π)`.
    pub bearing: f32,
    /// Straight-line distance from the player.
    pub distance: f32,
    /// Apparent size scalar, the reciprocal of the distance.
    pub scale: f32,
    /// Visual tag passed through untouched.
    pub tag: EntityTag,
}

/// Everything produced by one simulation step.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Viewer parameters used to cast the columns.
    pub player: PlayerView,
    /// One hit per render column, left to right.
    pub columns: Vec<RayHit>,
    /// Visible entities ordered far to near.
    pub sprites: Vec<EntityDraw>,
    /// Events raised while stepping.
    pub events: Vec<Event>,
}

/// Notifications raised while stepping the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A toggle request started opening a door.
    DoorToggled {
        /// Door cell that began opening.
        cell: CellCoord,
    },
    /// A door advanced into a new phase.
    DoorPhaseChanged {
        /// Door cell whose phase changed.
        cell: CellCoord,
        /// Phase the door entered.
        phase: DoorPhase,
    },
    /// The player's resolved position changed.
    PlayerMoved {
        /// Position before the move.
        from: Vec2,
        /// Position after collision resolution.
        to: Vec2,
    },
    /// An entity wanted to move but its destination was blocked.
    EntityBlocked {
        /// Entity that stayed in place.
        id: EntityId,
    },
}

/// Configuration problems rejected at construction or frame entry.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Map dimensions must both be positive.
    #[error("map dimensions must be positive (received {width}x{height})")]
    InvalidDimensions {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
    },
    /// Frame delta was negative or not finite.
    #[error("frame delta must be finite and non-negative (received {0})")]
    InvalidFrameDelta(f32),
    /// A tile table did not match the declared dimensions.
    #[error("expected {expected} tiles but received {actual}")]
    TileCountMismatch {
        /// Number of tiles implied by the dimensions.
        expected: usize,
        /// Number of tiles provided.
        actual: usize,
    },
    /// A tile code outside 0..=2 was encountered.
    #[error("unknown tile code {code} at index {index}")]
    UnknownTileCode {
        /// Offending code.
        code: u8,
        /// Row-major index of the offending tile.
        index: usize,
    },
    /// A textual layout row had a different width than the first row.
    #[error("layout row {row} has {actual} tiles, expected {expected}")]
    RaggedLayout {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A probability was outside 0.0..=1.0.
    #[error("probability must lie within 0.0..=1.0 (received {0})")]
    InvalidProbability(f32),
    /// The door cycle duration was not a positive finite number.
    #[error("door cycle must be positive and finite (received {0})")]
    InvalidDoorCycle(f32),
    /// At least one render column is required.
    #[error("render column count must be positive")]
    InvalidColumnCount,
    /// A tuning parameter was outside its accepted range.
    #[error("parameter `{name}` is out of range (received {value})")]
    InvalidParameter {
        /// Name of the rejected parameter.
        name: &'static str,
        /// Value that was rejected.
        value: f32,
    },
}

/// Wraps an angle into `[-π, π)`.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}
