//! Seeded procedural map generation.
//!
//! Border cells are always walls. Interior cells become walls with
//! `wall_probability`, otherwise doors with `door_probability`, otherwise
//! empty. Connectivity is not guaranteed; callers relocate spawns with
//! [`crate::relocate_to_passable`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thurs_core::{ConfigError, TileKind};

use crate::GridMap;

/// Parameters of the procedural generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Chance that an interior cell becomes a wall.
    pub wall_probability: f32,
    /// Chance that a non-wall interior cell becomes a door.
    pub door_probability: f32,
    /// Seed of the generator's random stream.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            wall_probability: 0.1,
            door_probability: 0.0,
            seed: 0x7468_7572_735f_6d61,
        }
    }
}

/// Generates a map from the provided configuration.
pub fn generate(config: &GeneratorConfig) -> Result<GridMap, ConfigError> {
    let (width, height) = (config.width, config.height);
    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidDimensions { width, height });
    }
    let wall_probability = probability(config.wall_probability)?;
    let door_probability = probability(config.door_probability)?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut tiles = Vec::with_capacity(width as usize * height as usize);
    for row in 0..height {
        for column in 0..width {
            let border = row == 0 || column == 0 || row == height - 1 || column == width - 1;
            let tile = if border || rng.gen_bool(wall_probability) {
                TileKind::Wall
            } else if door_probability > 0.0 && rng.gen_bool(door_probability) {
                TileKind::Door
            } else {
                TileKind::Empty
            };
            tiles.push(tile);
        }
    }

    log::debug!(
        "generated {width}x{height} map with seed {:#x}",
        config.seed
    );
    GridMap::new(width, height, tiles)
}

fn probability(value: f32) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(f64::from(value))
    } else {
        Err(ConfigError::InvalidProbability(value))
    }
}
