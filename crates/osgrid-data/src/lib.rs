//! # osgrid-data
//!
//! Tile-addressed access to Ordnance Survey datasets.
//!
//! A dataset is split into square tiles named by the grid reference of their
//! south west corner. A [`TileDatabase`] finds the tile covering a point,
//! loads it through a [`TileLoader`] on first use and keeps recently used
//! tiles in a fixed-size [`TileCache`].
//!
//! Two loaders are provided:
//!
//! - [`terrain50`]: OS Terrain 50 elevation grids (zipped ESRI ASCII grids).
//! - [`raster`]: square map images (PNG, JPEG or TIFF).
//!
//! ```no_run
//! use osgrid::{Distance, GridRef};
//! use osgrid_data::{raster, terrain50, ImageDatabase, ScalarDatabase};
//!
//! let mut heights = terrain50::open_database("terr50_gagg_gb", Distance::kilometres(10))?;
//! let mut maps = raster::open_database("vmd_raster", Distance::kilometres(10))?;
//!
//! let summit = GridRef::parse("SH 60986 54375")?;
//! println!("{} m, colour {:?}", heights.value_at(&summit)?, maps.pixel_at(&summit)?);
//! # Ok::<(), osgrid_data::DataError>(())
//! ```

mod cache;
mod database;
mod error;
mod locate;
pub mod raster;
pub mod terrain50;
mod tile;

pub use cache::{CacheStats, TileCache};
pub use database::{
    Database, ImageDatabase, OpenOptions, ScalarDatabase, TileDatabase, TileLoader,
    DEFAULT_CACHE_CAPACITY, DEFAULT_REFERENCE_TILE,
};
pub use error::DataError;
pub use raster::{RasterDatabase, RasterLoader, RasterTile};
pub use terrain50::{ElevationTile, Terrain50Database, Terrain50Loader};
pub use tile::{distance_to_pixels, ImageTile, ScalarTile, Tile};

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DataError>;
