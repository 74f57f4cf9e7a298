#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative map state for Thurs.
//!
//! [`GridMap`] owns the static tile grid together with one [`DoorState`]
//! record per cell. Every query outside the grid answers as if it hit a wall,
//! which keeps ray traversal and collision probing bounded without callers
//! having to clamp coordinates themselves.

pub mod generation;
pub mod layout;
pub mod spawn;

use glam::Vec2;
use thurs_core::{CellCoord, ConfigError, DoorPhase, DoorState, TileKind};

pub use generation::{generate, GeneratorConfig};
pub use spawn::{relocate_to_passable, relocate_where, SpawnError, SPAWN_PROBE_STEP};

/// Tile grid plus the dynamic state of every door.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
    doors: Vec<DoorState>,
}

impl GridMap {
    /// Creates a map from row-major tiles. Every door starts closed.
    pub fn new(width: u32, height: u32, tiles: Vec<TileKind>) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }

        let expected = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| ConfigError::InvalidDimensions { width, height })?;
        if tiles.len() != expected {
            return Err(ConfigError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }

        Ok(Self {
            width,
            height,
            doors: vec![DoorState::closed(); tiles.len()],
            tiles,
        })
    }

    /// Creates a map from integer tile codes (0 empty, 1 wall, 2 door).
    pub fn from_codes(width: u32, height: u32, codes: &[u8]) -> Result<Self, ConfigError> {
        let tiles = codes
            .iter()
            .enumerate()
            .map(|(index, &code)| {
                TileKind::from_code(code).ok_or(ConfigError::UnknownTileCode { code, index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(width, height, tiles)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tile stored at the cell, or [`TileKind::Wall`] outside the grid.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> TileKind {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(TileKind::Wall)
    }

    /// Reports whether an actor may stand in the cell.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        match self.tile_at(cell) {
            TileKind::Empty => true,
            TileKind::Wall => false,
            TileKind::Door => self.door(cell).is_some_and(DoorState::is_passable),
        }
    }

    /// Reports whether the cell containing `position` is passable.
    #[must_use]
    pub fn is_passable_at(&self, position: Vec2) -> bool {
        self.is_passable(CellCoord::containing(position))
    }

    /// Reports whether the cell stops rays.
    #[must_use]
    pub fn is_opaque(&self, cell: CellCoord) -> bool {
        match self.tile_at(cell) {
            TileKind::Empty => false,
            TileKind::Wall => true,
            TileKind::Door => self.door(cell).map_or(true, DoorState::is_opaque),
        }
    }

    /// Door state of the cell, present only on door tiles.
    #[must_use]
    pub fn door(&self, cell: CellCoord) -> Option<&DoorState> {
        let index = self.door_index(cell)?;
        self.doors.get(index)
    }

    /// Mutable door state of the cell, present only on door tiles.
    pub fn door_mut(&mut self, cell: CellCoord) -> Option<&mut DoorState> {
        let index = self.door_index(cell)?;
        self.doors.get_mut(index)
    }

    /// Iterates door cells and their states in row-major order.
    pub fn doors(&self) -> impl Iterator<Item = (CellCoord, &DoorState)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .zip(self.doors.iter())
            .enumerate()
            .filter(|(_, (tile, _))| **tile == TileKind::Door)
            .map(move |(index, (_, door))| (cell_at(index, width), door))
    }

    /// Iterates door cells and mutable states in row-major order.
    pub fn doors_mut(&mut self) -> impl Iterator<Item = (CellCoord, &mut DoorState)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .zip(self.doors.iter_mut())
            .enumerate()
            .filter(|(_, (tile, _))| **tile == TileKind::Door)
            .map(move |(index, (_, door))| (cell_at(index, width), door))
    }

    /// Starts opening the door nearest to `position`.
    ///
    /// Candidates are the door tiles in the 3x3 block around the containing
    /// cell, scanned in row-major order. The smallest Manhattan distance wins
    /// and the first door found breaks ties. The winner opens only if it is
    /// closed or closing, in which case its timer restarts at `cycle` and its
    /// cell is returned. `facing` is only reported in the log.
    pub fn toggle_nearest_door(
        &mut self,
        position: Vec2,
        facing: f32,
        cycle: f32,
    ) -> Option<CellCoord> {
        let center = CellCoord::containing(position);
        let mut nearest: Option<(u32, CellCoord)> = None;

        for rows in -1..=1 {
            for columns in -1..=1 {
                let cell = center.offset(columns, rows);
                if self.tile_at(cell) != TileKind::Door {
                    continue;
                }

                let distance = center.manhattan_distance(cell);
                if nearest.map_or(true, |(best, _)| distance < best) {
                    nearest = Some((distance, cell));
                }
            }
        }

        let (_, cell) = nearest?;
        let door = self.door_mut(cell)?;
        if !door.accepts_toggle() {
            log::debug!("door at {cell:?} ignored toggle while {:?}", door.phase);
            return None;
        }

        door.phase = DoorPhase::Opening;
        door.timer = cycle;
        log::debug!("door at {cell:?} opening, toggled facing {facing:.2}");
        Some(cell)
    }

    fn door_index(&self, cell: CellCoord) -> Option<usize> {
        let index = self.index(cell)?;
        (self.tiles.get(index) == Some(&TileKind::Door)).then_some(index)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.width && row < self.height {
            let width = usize::try_from(self.width).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}

fn cell_at(index: usize, width: u32) -> CellCoord {
    let width = width.max(1) as usize;
    CellCoord::new((index % width) as i32, (index / width) as i32)
}
