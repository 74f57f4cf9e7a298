//! Textual map layouts.

use thurs_core::{ConfigError, TileKind};

use crate::GridMap;

/// Map used when no layout or generator is configured.
pub const BUILTIN_ROWS: [&str; 16] = [
    "1111111111111111",
    "1000000100000001",
    "1011110101111101",
    "1010000000000101",
    "1010111121110101",
    "1000100000010001",
    "1110101111010111",
    "1000200000020001",
    "1011101111011101",
    "1000001001000001",
    "1011121001211101",
    "1010000000000101",
    "1010111101110101",
    "1000000020000001",
    "1000000000000001",
    "1111111111111111",
];

/// Builds the built-in 16x16 layout.
pub fn builtin() -> Result<GridMap, ConfigError> {
    parse_rows(&BUILTIN_ROWS)
}

/// Builds a map from rows of tile digits, one character per cell.
///
/// Every row must have the same width. Characters other than `0`, `1` and `2`
/// are rejected with their row-major index.
pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<GridMap, ConfigError> {
    let expected = rows.first().map_or(0, |row| row.as_ref().len());
    let mut tiles = Vec::with_capacity(expected * rows.len());

    for (row_index, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != expected {
            return Err(ConfigError::RaggedLayout {
                row: row_index,
                expected,
                actual: row.len(),
            });
        }

        for (column, byte) in row.bytes().enumerate() {
            let index = row_index * expected + column;
            let tile = byte
                .checked_sub(b'0')
                .and_then(TileKind::from_code)
                .ok_or(ConfigError::UnknownTileCode { code: byte, index })?;
            tiles.push(tile);
        }
    }

    let width = u32::try_from(expected).unwrap_or(u32::MAX);
    let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
    GridMap::new(width, height, tiles)
}
