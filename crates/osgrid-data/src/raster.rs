//! Raster map tiles.
//!
//! Each tile is a square image file named like Terrain 50 tiles
//! (`data/sh/SH65.tif`). An optional world file next to the image
//! (`SH65.tfw`, `.pgw`, `.jgw` or `.wld`) places it on the grid; without one
//! the tile is assumed to cover exactly the tile it was looked up for.

use crate::database::{OpenOptions, TileDatabase, TileLoader};
use crate::locate::{data_dir, find_tile_file};
use crate::{DataError, ImageTile, Result, Tile};
use image::RgbaImage;
use osgrid::{Distance, GridRef};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Image types a raster tile can be stored as.
const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// Sidecar extensions for world files.
const WORLD_EXTENSIONS: &[&str] = &["tfw", "pgw", "jgw", "wld"];

/// A raster map database.
pub type RasterDatabase = TileDatabase<RasterLoader>;

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.abs()
}

/// A square image covering one tile.
#[derive(Debug, Clone)]
pub struct RasterTile {
    bottom_left: GridRef,
    size: Distance,
    precision: Distance,
    pixel_precision: u32,
    image: RgbaImage,
}

impl RasterTile {
    /// Wrap an image covering the `size` square whose south west corner is
    /// `bottom_left`.
    ///
    /// The precision is the smallest whole number of metres that maps to a
    /// whole number of pixels: a 10 km tile of 4000 pixels has a precision
    /// of 5 m at 2 pixels per step.
    pub fn new(bottom_left: GridRef, size: Distance, image: RgbaImage) -> Result<Self> {
        let (w, h) = image.dimensions();
        if w != h || w == 0 {
            return Err(DataError::InvalidTile(format!(
                "Raster tiles must be square, got {} x {}",
                w, h
            )));
        }
        if size <= Distance::ZERO {
            return Err(DataError::InvalidTile(format!("Invalid tile size {}", size)));
        }

        let pixels = i64::from(w);
        let g = gcd(size.as_metres(), pixels);
        let precision = size / g;
        let pixel_precision = u32::try_from(pixels / g)
            .map_err(|_| DataError::InvalidTile(format!("Image too large: {} pixels", pixels)))?;

        Ok(Self {
            bottom_left,
            size,
            precision,
            pixel_precision,
            image,
        })
    }

    /// Load an image file, placing it with its world file if it has one.
    pub fn from_file<P: AsRef<Path>>(path: P, bottom_left: GridRef, size: Distance) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.into_rgba8();

        match world_file(path) {
            Some(world) => {
                debug!(path = %world.display(), "reading world file");
                let placement = WorldFile::parse(&fs::read_to_string(&world)?)?;
                let (bottom_left, size) = placement.extent(image.width(), image.height())?;
                Self::new(bottom_left, size, image)
            }
            None => Self::new(bottom_left, size, image),
        }
    }

    /// Pixels per metre, as a reduced fraction `(pixels, metres)`.
    pub fn scale(&self) -> (u32, Distance) {
        (self.pixel_precision, self.precision)
    }
}

impl Tile for RasterTile {
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
        self.precision
    }
}

impl ImageTile for RasterTile {
    fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn pixel_precision(&self) -> u32 {
        self.pixel_precision
    }
}

/// The sidecar world file for `image`, if there is one.
fn world_file(image: &Path) -> Option<PathBuf> {
    WORLD_EXTENSIONS
        .iter()
        .flat_map(|ext| [ext.to_string(), ext.to_ascii_uppercase()])
        .map(|ext| image.with_extension(ext))
        .find(|p| p.is_file())
}

/// The six affine terms of an ESRI world file, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WorldFile {
    pixel_width: f64,
    pixel_height: f64,
    /// Centre of the top left pixel.
    x: f64,
    y: f64,
}

impl WorldFile {
    fn parse(text: &str) -> Result<Self> {
        let terms = text
            .split_whitespace()
            .map(|t| {
                t.parse::<f64>()
                    .map_err(|_| DataError::InvalidTile(format!("Invalid world file term '{}'", t)))
            })
            .collect::<Result<Vec<f64>>>()?;

        let [a, d, b, e, c, f] = terms[..] else {
            return Err(DataError::InvalidTile(format!(
                "World file needs 6 terms, found {}",
                terms.len()
            )));
        };
        if d != 0.0 || b != 0.0 {
            return Err(DataError::InvalidTile("Rotated world files are not supported".into()));
        }

        Ok(Self {
            pixel_width: a,
            pixel_height: -e,
            x: c,
            y: f,
        })
    }

    /// Bottom left corner and side length of a `cols` x `rows` image.
    fn extent(&self, cols: u32, rows: u32) -> Result<(GridRef, Distance)> {
        if self.pixel_width <= 0.0 || self.pixel_width != self.pixel_height {
            return Err(DataError::InvalidTile(format!(
                "Pixels must be square, got {} x {}",
                self.pixel_width, self.pixel_height
            )));
        }

        let left = self.x - self.pixel_width / 2.0;
        let top = self.y + self.pixel_height / 2.0;
        let bottom = top - self.pixel_height * f64::from(rows);
        let size = Distance::metres((self.pixel_width * f64::from(cols)).round() as i64);

        let bottom_left = GridRef::from_absolute(
            Distance::metres(left.round() as i64),
            Distance::metres(bottom.round() as i64),
        )?;
        Ok((bottom_left, size))
    }
}

/// Loads raster tiles from an unpacked dataset directory.
#[derive(Debug, Clone)]
pub struct RasterLoader {
    data: PathBuf,
}

impl RasterLoader {
    /// Use the dataset at `root`, which must contain a `data` directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Ok(Self {
            data: data_dir(root.as_ref())?,
        })
    }
}

impl TileLoader for RasterLoader {
    type Tile = RasterTile;

    fn load(&self, bottom_left: &GridRef, size: Distance) -> Result<RasterTile> {
        let path = find_tile_file(&self.data, bottom_left, EXTENSIONS)?;
        RasterTile::from_file(path, *bottom_left, size)
    }
}

/// Open the raster dataset at `root` with default options.
pub fn open_database<P: AsRef<Path>>(root: P, tile_size: Distance) -> Result<RasterDatabase> {
    open_database_with(root, tile_size, &OpenOptions::default())
}

/// Open the raster dataset at `root`.
pub fn open_database_with<P: AsRef<Path>>(
    root: P,
    tile_size: Distance,
    options: &OpenOptions,
) -> Result<RasterDatabase> {
    TileDatabase::open(RasterLoader::new(root)?, tile_size, options)
}
