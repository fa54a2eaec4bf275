//! Error types for surface and texture generation.

use osgrid::{Distance, GridError, GridRef};
use osgrid_data::DataError;
use thiserror::Error;

/// Errors that can occur while stitching tiles together.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A sample position fell off the grid.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// A tile could not be loaded or queried.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Image composition failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The requested sample spacing can't be met without interpolation.
    #[error("Resolution {requested} must be a multiple of the database precision ({precision})")]
    InvalidResolution {
        /// Spacing asked for.
        requested: Distance,
        /// Native spacing of the database.
        precision: Distance,
    },

    /// The requested area is empty or negative.
    #[error("Invalid extent {width} x {height}")]
    InvalidExtent { width: Distance, height: Distance },

    /// A tile's pixel density differs from the rest of the texture.
    #[error(
        "Tile {tile} has {actual_pixels} px per {actual}, expected {expected_pixels} px per {expected}"
    )]
    MismatchedPrecision {
        /// Bottom left of the offending tile.
        tile: GridRef,
        expected: Distance,
        expected_pixels: u32,
        actual: Distance,
        actual_pixels: u32,
    },
}
