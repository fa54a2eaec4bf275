//! OS Terrain 50 elevation tiles.
//!
//! Terrain 50 ships as one zip archive per 10 km tile, each holding an
//! ESRI ASCII grid of 50 m samples:
//!
//! ```text
//! ncols 200
//! nrows 200
//! xllcorner 260000
//! yllcorner 350000
//! cellsize 50
//! 12.3 14.1 ...
//! ```
//!
//! The grid rows run north to south. [`ElevationTile`] stores them south to
//! north so that row 0 is the bottom edge, matching increasing northings.

use crate::database::{OpenOptions, TileDatabase, TileLoader};
use crate::locate::{data_dir, find_tile_file};
use crate::{DataError, Result, ScalarTile, Tile};
use osgrid::{Distance, GridRef};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File types a Terrain 50 tile can be stored as.
const EXTENSIONS: &[&str] = &["zip", "asc"];

/// A Terrain 50 database.
pub type Terrain50Database = TileDatabase<Terrain50Loader>;

/// A grid of elevation samples in metres.
#[derive(Debug, Clone)]
pub struct ElevationTile {
    bottom_left: GridRef,
    size: Distance,
    precision: Distance,
    cols: usize,
    rows: usize,
    /// Row-major samples, starting from the south west corner.
    data: Vec<f32>,
}

#[derive(Debug, Default)]
struct Header {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xllcorner: Option<i64>,
    yllcorner: Option<i64>,
    cellsize: Option<i64>,
}

impl Header {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parsed = value
            .parse::<i64>()
            .map_err(|_| DataError::InvalidTile(format!("Invalid header value '{} {}'", key, value)))?;
        let count = || {
            usize::try_from(parsed)
                .map_err(|_| DataError::InvalidTile(format!("Negative {} {}", key, parsed)))
        };

        match key.to_ascii_lowercase().as_str() {
            "ncols" => self.ncols = Some(count()?),
            "nrows" => self.nrows = Some(count()?),
            "xllcorner" => self.xllcorner = Some(parsed),
            "yllcorner" => self.yllcorner = Some(parsed),
            "cellsize" => self.cellsize = Some(parsed),
            other => debug!(key = other, value, "ignoring ASCII grid header entry"),
        }
        Ok(())
    }
}

fn missing(key: &str) -> DataError {
    DataError::InvalidTile(format!("Missing '{}' in header", key))
}

impl ElevationTile {
    /// Parse an ESRI ASCII grid.
    pub fn from_asc<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let mut header = Header::default();
        let mut lines = text.lines().map(str::trim).skip_while(|l| l.is_empty()).peekable();

        // Header lines start with a key; the first line that doesn't is data.
        while let Some(line) = lines.next_if(|l| l.is_empty() || l.starts_with(|c: char| c.is_ascii_alphabetic())) {
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [key, value] = fields[..] else {
                return Err(DataError::InvalidTile(format!("Unexpected header data: {}", line)));
            };
            header.set(key, value)?;
        }

        let ncols = header.ncols.ok_or_else(|| missing("ncols"))?;
        let nrows = header.nrows.ok_or_else(|| missing("nrows"))?;
        let cellsize = Distance::metres(header.cellsize.ok_or_else(|| missing("cellsize"))?);
        let xll = Distance::metres(header.xllcorner.ok_or_else(|| missing("xllcorner"))?);
        let yll = Distance::metres(header.yllcorner.ok_or_else(|| missing("yllcorner"))?);

        let side = |n: usize| i64::try_from(n).ok().and_then(|n| cellsize.checked_mul(n));
        let (Some(width), Some(height)) = (side(ncols), side(nrows)) else {
            return Err(DataError::InvalidTile(format!(
                "Invalid tile size {} x {} cells of {}",
                ncols, nrows, cellsize
            )));
        };
        if width <= Distance::ZERO || width != height {
            return Err(DataError::InvalidTile(format!(
                "Invalid tile size {} x {}",
                width, height
            )));
        }
        let bottom_left = GridRef::from_absolute(xll, yll)?;

        let rows: Vec<&str> = lines.collect();
        let used = rows.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);
        if used != nrows {
            return Err(DataError::InvalidTileData(format!(
                "Expected {} rows, found {}",
                nrows, used
            )));
        }

        let cells = ncols.checked_mul(nrows).ok_or_else(|| {
            DataError::InvalidTile(format!("Invalid tile size {} x {} cells", ncols, nrows))
        })?;
        let mut data = vec![0.0f32; cells];
        for (r, line) in rows[..used].iter().enumerate() {
            if line.is_empty() {
                return Err(DataError::InvalidTileData(format!("Row {} is empty", r)));
            }
            // Flip so the last row in the file becomes row 0.
            let start = (nrows - 1 - r) * ncols;
            let mut count = 0;
            for (c, value) in line.split_whitespace().enumerate() {
                if c >= ncols {
                    count = c + 1;
                    break;
                }
                data[start + c] = value.parse().map_err(|_| DataError::InvalidValue {
                    row: r,
                    col: c,
                    value: value.to_string(),
                })?;
                count = c + 1;
            }
            if count != ncols {
                return Err(DataError::InvalidTileData(format!(
                    "Row {} has {} values, expected {}",
                    r,
                    line.split_whitespace().count(),
                    ncols
                )));
            }
        }

        Ok(Self {
            bottom_left,
            size: width,
            precision: cellsize,
            cols: ncols,
            rows: nrows,
            data,
        })
    }

    /// Load a tile from a zip archive holding an `.asc` grid, or from a bare
    /// `.asc` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_asc = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("asc"));

        if is_asc {
            debug!(path = %path.display(), "reading ASCII grid");
            return Self::from_asc(BufReader::new(File::open(path)?));
        }

        let mut archive = zip::ZipArchive::new(File::open(path)?)?;
        let name = archive
            .file_names()
            .find(|n| n.to_ascii_lowercase().ends_with(".asc"))
            .map(str::to_owned)
            .ok_or_else(|| DataError::InvalidTile(format!("No .asc file in {}", path.display())))?;

        debug!(path = %path.display(), entry = %name, "reading zipped ASCII grid");
        let entry = archive.by_name(&name)?;
        Self::from_asc(entry)
    }

    /// Number of sample columns and rows.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Row-major samples from the south west corner.
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

impl Tile for ElevationTile {
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

impl ScalarTile for ElevationTile {
    fn value_at(&self, at: &GridRef) -> Result<f64> {
        self.check_contains(at)?;

        let aligned = at.align(self.precision);
        let x = (aligned.easting() - self.bottom_left.easting()) / self.precision;
        let y = (aligned.northing() - self.bottom_left.northing()) / self.precision;

        usize::try_from(y * self.cols as i64 + x)
            .ok()
            .and_then(|i| self.data.get(i))
            .map(|&v| f64::from(v))
            .ok_or(DataError::CoordinateOutsideTile {
                at: *at,
                tile: self.bottom_left,
            })
    }
}

/// Loads Terrain 50 tiles from an unpacked dataset directory.
#[derive(Debug, Clone)]
pub struct Terrain50Loader {
    data: PathBuf,
}

impl Terrain50Loader {
    /// Use the dataset at `root`, which must contain a `data` directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Ok(Self {
            data: data_dir(root.as_ref())?,
        })
    }
}

impl TileLoader for Terrain50Loader {
    type Tile = ElevationTile;

    fn load(&self, bottom_left: &GridRef, _size: Distance) -> Result<ElevationTile> {
        let path = find_tile_file(&self.data, bottom_left, EXTENSIONS)?;
        ElevationTile::from_file(path)
    }
}

/// Open the Terrain 50 dataset at `root` with default options.
pub fn open_database<P: AsRef<Path>>(root: P, tile_size: Distance) -> Result<Terrain50Database> {
    open_database_with(root, tile_size, &OpenOptions::default())
}

/// Open the Terrain 50 dataset at `root`.
pub fn open_database_with<P: AsRef<Path>>(
    root: P,
    tile_size: Distance,
    options: &OpenOptions,
) -> Result<Terrain50Database> {
    TileDatabase::open(Terrain50Loader::new(root)?, tile_size, options)
}
