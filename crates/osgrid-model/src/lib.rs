//! # osgrid-model
//!
//! Stitch dataset tiles into continuous outputs:
//!
//! - [`generate_surface`] samples a scalar database (elevations) on a
//!   regular grid into a [`Surface`].
//! - [`generate_texture`] copies pixels from an image database into one
//!   [`Texture`].
//! - [`generate_texture_map`] pairs the two with per-sample UV coordinates.
//!
//! Areas may span any number of tiles; tiles are fetched through the
//! database, which keeps the recently used ones cached.
//!
//! ```no_run
//! use osgrid::{Distance, GridRef};
//! use osgrid_data::{raster, terrain50};
//! use osgrid_model::{generate_surface_centred, generate_texture, generate_texture_map, RowOrder, SurfaceOptions};
//!
//! let mut heights = terrain50::open_database("terr50_gagg_gb", Distance::kilometres(10))?;
//! let mut maps = raster::open_database("vmd_raster", Distance::kilometres(10))?;
//!
//! let summit = GridRef::parse("SH 60986 54375")?;
//! let width = Distance::kilometres(5);
//! let surface = generate_surface_centred(&mut heights, &summit, width, width, &SurfaceOptions::default())?;
//! let texture = generate_texture(&mut maps, &summit, width, width)?;
//! let map = generate_texture_map(&surface, &texture, RowOrder::SouthToNorth);
//! println!("{} x {} samples, {:?} pixels", map.cols(), map.rows(), map.texture_size());
//! # Ok::<(), osgrid_model::ModelError>(())
//! ```

mod error;
mod surface;
mod texture;
mod texture_map;

pub use error::ModelError;
pub use surface::{generate_surface, generate_surface_centred, RowOrder, Surface, SurfaceOptions};
pub use texture::{generate_texture, Texture};
pub use texture_map::{generate_texture_map, TextureMap};

/// Result type for surface and texture generation.
pub type Result<T> = std::result::Result<T, ModelError>;
