//! Error types for the dataset crate.

use osgrid::{Distance, GridError, GridRef};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or querying tiles.
#[derive(Debug, Error)]
pub enum DataError {
    /// Grid reference arithmetic failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// I/O error reading a file or directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tile archive could not be read.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The tile image could not be decoded.
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// A tile file name pattern failed to compile.
    #[error("Invalid tile pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A lookup asked a tile for a coordinate it does not cover.
    #[error("Coordinate {at} is outside tile {tile}")]
    CoordinateOutsideTile {
        /// Requested coordinate.
        at: GridRef,
        /// Bottom left of the tile that was asked.
        tile: GridRef,
    },

    /// No file in the dataset holds the tile for this coordinate.
    #[error("Tile {0} not found")]
    TileNotFound(GridRef),

    /// The tile's header or shape is unusable.
    #[error("Invalid tile: {0}")]
    InvalidTile(String),

    /// The tile's sample rows are missing or have the wrong length.
    #[error("Invalid tile data: {0}")]
    InvalidTileData(String),

    /// A sample in the tile is not a number.
    #[error("Invalid value {value:?} at row {row}, column {col}")]
    InvalidValue {
        /// Row in the file, counted from the first data row.
        row: usize,
        /// Column in the row.
        col: usize,
        /// The offending text.
        value: String,
    },

    /// A tile's size disagrees with the size the database was opened with.
    #[error("Specified tile size ({expected}) doesn't match data ({actual})")]
    TileSizeMismatch {
        /// Size the caller declared.
        expected: Distance,
        /// Size found in the data.
        actual: Distance,
    },

    /// The dataset root is missing its data directory.
    #[error("{} should be a directory", .0.display())]
    NotADirectory(PathBuf),
}
