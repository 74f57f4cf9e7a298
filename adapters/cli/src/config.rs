use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use thurs_core::ConfigError;
use thurs_simulation::SimulationConfig;
use thurs_world::{generate, layout, GeneratorConfig, GridMap};

/// Contents of a run configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct RunConfig {
    /// Simulation tuning and entity roster.
    pub(crate) simulation: SimulationConfig,
    /// Where the map comes from.
    pub(crate) map: MapSource,
}

impl RunConfig {
    /// Loads the file at `path`, or the defaults when no file is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to load config {}", path.display()))
    }

    /// Parses TOML configuration text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }
}

/// Origin of the tile grid.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub(crate) enum MapSource {
    /// The bundled 16x16 layout.
    #[default]
    Builtin,
    /// Literal rows of tile digits.
    Layout {
        /// One string per row, `0` empty, `1` wall, `2` door.
        rows: Vec<String>,
    },
    /// Seeded procedural generation.
    Generated(GeneratorConfig),
}

impl MapSource {
    /// Builds the map described by this source.
    pub(crate) fn build(&self) -> Result<GridMap, ConfigError> {
        match self {
            Self::Builtin => layout::builtin(),
            Self::Layout { rows } => layout::parse_rows(rows.as_slice()),
            Self::Generated(generator) => generate(generator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use thurs_core::Behavior;
    use thurs_simulation::EntitySpawn;

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(RunConfig::parse("").expect("config"), RunConfig::default());
    }

    #[test]
    fn reads_simulation_and_layout_tables() {
        let config = RunConfig::parse(
            r#"
            [simulation]
            door_cycle = 6.0
            columns = 32

            [simulation.player]
            spawn = [1.5, 1.5]
            speed = 3.0

            [simulation.behaviour]
            wander_clock = "shared"

            [[simulation.entities]]
            position = [2.5, 1.5]
            behavior = "chase"
            tag = { red = 0, green = 255, blue = 0 }

            [map]
            source = "layout"
            rows = ["11111", "10001", "11111"]
            "#,
        )
        .expect("config");

        assert_eq!(config.simulation.door_cycle.duration(), 6.0);
        assert_eq!(config.simulation.columns, 32);
        assert_eq!(config.simulation.player.speed, 3.0);
        assert_eq!(config.simulation.player.fov, std::f32::consts::FRAC_PI_3);
        assert_eq!(
            config.simulation.entities,
            vec![EntitySpawn {
                position: Vec2::new(2.5, 1.5),
                speed: 1.0,
                behavior: Behavior::Chase,
                tag: thurs_core::EntityTag::from_rgb(0, 255, 0),
            }]
        );

        let map = config.map.build().expect("map");
        assert_eq!((map.width(), map.height()), (5, 3));
    }

    #[test]
    fn rejects_invalid_door_cycle() {
        assert!(RunConfig::parse("[simulation]\ndoor_cycle = -1.0\n").is_err());
    }

    #[test]
    fn ragged_layout_fails_to_build() {
        let config =
            RunConfig::parse("[map]\nsource = \"layout\"\nrows = [\"111\", \"10\"]\n").expect("config");
        assert!(matches!(
            config.map.build(),
            Err(ConfigError::RaggedLayout { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let error = RunConfig::load(Some(Path::new("/nonexistent/thurs.toml")))
            .expect_err("missing file");
        assert!(error.to_string().contains("failed to read config"));
    }
}
