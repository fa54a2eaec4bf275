//! Tile databases: a loader behind an LRU cache.

use crate::{CacheStats, DataError, ImageTile, Result, ScalarTile, Tile, TileCache};
use image::Rgba;
use osgrid::{Distance, GridRef};
use tracing::debug;

/// Default number of tiles kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// Tile loaded at open time to discover the dataset precision. Central
/// London is covered by every national dataset.
pub const DEFAULT_REFERENCE_TILE: &str = "TQ 28";

/// A source of tiles addressed by grid reference.
pub trait Database {
    type Tile: Tile;

    /// Native sample spacing of the dataset.
    fn precision(&self) -> Distance;

    /// Side length of every tile.
    fn tile_size(&self) -> Distance;

    /// The tile covering `at`, loading it if it is not cached.
    fn tile(&mut self, at: &GridRef) -> Result<&Self::Tile>;
}

/// Point lookups on a database of scalar tiles.
pub trait ScalarDatabase: Database {
    fn value_at(&mut self, at: &GridRef) -> Result<f64>;
}

impl<D> ScalarDatabase for D
where
    D: Database,
    D::Tile: ScalarTile,
{
    fn value_at(&mut self, at: &GridRef) -> Result<f64> {
        self.tile(at)?.value_at(at)
    }
}

/// Point lookups on a database of image tiles.
pub trait ImageDatabase: Database {
    fn pixel_at(&mut self, at: &GridRef) -> Result<Rgba<u8>>;
}

impl<D> ImageDatabase for D
where
    D: Database,
    D::Tile: ImageTile,
{
    fn pixel_at(&mut self, at: &GridRef) -> Result<Rgba<u8>> {
        self.tile(at)?.pixel_at(at)
    }
}

/// Reads one tile from storage.
pub trait TileLoader {
    type Tile: Tile;

    /// Load the tile whose south west corner is `bottom_left`.
    ///
    /// `size` is the side length the database expects; loaders may use it to
    /// locate or scale the tile but the database checks the result anyway.
    fn load(&self, bottom_left: &GridRef, size: Distance) -> Result<Self::Tile>;
}

impl<T, F> TileLoader for F
where
    T: Tile,
    F: Fn(&GridRef, Distance) -> Result<T>,
{
    type Tile = T;

    fn load(&self, bottom_left: &GridRef, size: Distance) -> Result<T> {
        self(bottom_left, size)
    }
}

/// Options for opening a database.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Most tiles held in memory at once.
    pub cache_capacity: usize,
    /// Tile loaded at open to check the tile size and read the precision.
    pub reference: GridRef,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            reference: GridRef::parse(DEFAULT_REFERENCE_TILE).unwrap_or_else(|_| GridRef::origin()),
        }
    }
}

/// A [`Database`] that loads tiles on demand through a [`TileLoader`] and
/// keeps the most recently used ones in a [`TileCache`].
///
/// # Example
///
/// ```no_run
/// use osgrid::{Distance, GridRef};
/// use osgrid_data::{terrain50, ScalarDatabase};
///
/// let mut db = terrain50::open_database("terr50_gagg_gb", Distance::kilometres(10))?;
/// let summit = GridRef::parse("SH 60986 54375")?;
/// println!("Snowdon: {} m", db.value_at(&summit)?);
/// # Ok::<(), osgrid_data::DataError>(())
/// ```
#[derive(Debug)]
pub struct TileDatabase<L: TileLoader> {
    loader: L,
    tile_size: Distance,
    precision: Distance,
    cache: TileCache<L::Tile>,
}

impl<L: TileLoader> TileDatabase<L> {
    /// Open a database of `tile_size` tiles.
    ///
    /// Loads the reference tile from `options`, failing if its size is not
    /// `tile_size`, and takes the dataset precision from it.
    pub fn open(loader: L, tile_size: Distance, options: &OpenOptions) -> Result<Self> {
        if tile_size <= Distance::ZERO {
            return Err(DataError::InvalidTile(format!("Tile size {} must be positive", tile_size)));
        }

        let mut db = Self {
            loader,
            tile_size,
            precision: Distance::METRE,
            cache: TileCache::new(options.cache_capacity),
        };

        let reference = db.tile(&options.reference)?;
        let precision = reference.precision();
        if precision <= Distance::ZERO || !tile_size.is_multiple_of(precision) {
            return Err(DataError::InvalidTile(format!(
                "Precision {} doesn't divide tile size {}",
                precision, tile_size
            )));
        }
        db.precision = precision;

        debug!(%tile_size, %precision, capacity = db.cache.capacity(), "opened tile database");
        Ok(db)
    }

    /// Load and check the tile with the given bottom left corner.
    fn load(loader: &L, tile_size: Distance, key: &GridRef) -> Result<L::Tile> {
        debug!(%key, "loading tile");
        let tile = loader.load(key, tile_size)?;

        for actual in [tile.width(), tile.height()] {
            if actual != tile_size {
                return Err(DataError::TileSizeMismatch {
                    expected: tile_size,
                    actual,
                });
            }
        }
        if tile.bottom_left() != *key {
            return Err(DataError::InvalidTile(format!(
                "Tile for {} starts at {}",
                key,
                tile.bottom_left()
            )));
        }

        Ok(tile)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cached_tiles(&self) -> usize {
        self.cache.len()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

impl<L: TileLoader> Database for TileDatabase<L> {
    type Tile = L::Tile;

    fn precision(&self) -> Distance {
        self.precision
    }

    fn tile_size(&self) -> Distance {
        self.tile_size
    }

    fn tile(&mut self, at: &GridRef) -> Result<&L::Tile> {
        let key = at.align(self.tile_size);
        let (loader, tile_size) = (&self.loader, self.tile_size);
        self.cache
            .read_or_try_allocate(&key, || Self::load(loader, tile_size, &key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// A tile whose value at any point is its absolute easting plus northing.
    #[derive(Debug)]
    struct Plane {
        bottom_left: GridRef,
        size: Distance,
    }

    impl Tile for Plane {
        fn bottom_left(&self) -> GridRef {
            self.bottom_left
        }
        fn width(&self) -> Distance {
            self.size
        }
        fn height(&self) -> Distance {
            self.size
        }
        fn precision(&self) -> Distance {
            Distance::metres(50)
        }
    }

    impl ScalarTile for Plane {
        fn value_at(&self, at: &GridRef) -> Result<f64> {
            self.check_contains(at)?;
            let at = at.align(self.precision());
            Ok((at.abs_easting() + at.abs_northing()).as_metres() as f64)
        }
    }

    fn gr(s: &str) -> GridRef {
        GridRef::parse(s).unwrap()
    }

    fn plane_loader(loads: &Cell<usize>) -> impl Fn(&GridRef, Distance) -> Result<Plane> + '_ {
        move |bottom_left, size| {
            loads.set(loads.get() + 1);
            Ok(Plane {
                bottom_left: *bottom_left,
                size,
            })
        }
    }

    fn options(capacity: usize) -> OpenOptions {
        OpenOptions {
            cache_capacity: capacity,
            ..OpenOptions::default()
        }
    }

    #[test]
    fn test_default_options() {
        let options = OpenOptions::default();
        assert_eq!(options.cache_capacity, 16);
        assert_eq!(options.reference.to_string(), "TQ 2 8");
    }

    #[test]
    fn test_open_reads_reference_precision() {
        let loads = Cell::new(0);
        let db = TileDatabase::open(plane_loader(&loads), Distance::kilometres(10), &options(4)).unwrap();
        assert_eq!(db.precision(), Distance::metres(50));
        assert_eq!(db.tile_size(), Distance::kilometres(10));
        assert_eq!(loads.get(), 1);
        assert_eq!(db.cached_tiles(), 1);
    }

    #[test]
    fn test_tile_is_cached() {
        let loads = Cell::new(0);
        let mut db = TileDatabase::open(plane_loader(&loads), Distance::kilometres(10), &options(4)).unwrap();

        let tile = db.tile(&gr("SH 60986 54375")).unwrap();
        assert_eq!(tile.bottom_left(), gr("SH 60000 50000"));
        db.tile(&gr("SH 61234 55555")).unwrap();
        assert_eq!(loads.get(), 2);
        assert_eq!(db.cache_stats().hits, 1);
    }

    #[test]
    fn test_value_at() {
        let loads = Cell::new(0);
        let mut db = TileDatabase::open(plane_loader(&loads), Distance::kilometres(10), &options(4)).unwrap();
        // Samples are 50 m apart, so the offsets round down.
        let at = gr("SV 10220 20330");
        assert_eq!(db.value_at(&at).unwrap(), 30500.0);
    }

    #[test]
    fn test_open_rejects_wrong_size() {
        let loader = |bottom_left: &GridRef, _size: Distance| -> Result<Plane> {
            Ok(Plane {
                bottom_left: *bottom_left,
                size: Distance::kilometres(5),
            })
        };
        let err = TileDatabase::open(loader, Distance::kilometres(10), &options(4))
            .err()
            .expect("open should fail");
        assert!(matches!(
            err,
            DataError::TileSizeMismatch { expected, actual }
                if expected == Distance::kilometres(10) && actual == Distance::kilometres(5)
        ));
    }

    #[test]
    fn test_misplaced_tile_not_cached() {
        let loader = |_bottom_left: &GridRef, size: Distance| -> Result<Plane> {
            Ok(Plane {
                bottom_left: GridRef::parse("TQ 28").unwrap(),
                size,
            })
        };
        let mut db = TileDatabase::open(loader, Distance::kilometres(10), &options(4)).unwrap();
        let err = db.tile(&gr("SH 65")).unwrap_err();
        assert!(matches!(err, DataError::InvalidTile(_)));
        assert_eq!(db.cached_tiles(), 1);
    }

    #[test]
    fn test_load_error_propagates() {
        let loader = |bottom_left: &GridRef, size: Distance| -> Result<Plane> {
            if bottom_left.square().to_string() == "TQ" {
                Ok(Plane {
                    bottom_left: *bottom_left,
                    size,
                })
            } else {
                Err(DataError::TileNotFound(*bottom_left))
            }
        };
        let mut db = TileDatabase::open(loader, Distance::kilometres(10), &options(4)).unwrap();
        assert!(matches!(db.tile(&gr("SH 65")), Err(DataError::TileNotFound(_))));
        assert_eq!(db.cached_tiles(), 1);
    }
}
