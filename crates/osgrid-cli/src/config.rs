//! Dataset settings from the optional YAML config file.
//!
//! ```yaml
//! elevation_db: /data/terr50_gagg_gb
//! raster_db: /data/vmdvec_gb
//! tile_size: 10000
//! cache_capacity: 32
//! reference: NN 16
//! ```
//!
//! Every key is optional. Values given on the command line win.

use crate::error::{CliError, Result};
use osgrid::{Distance, GridRef};
use osgrid_data::OpenOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Side of one tile in both OS open datasets.
pub const DEFAULT_TILE_SIZE: Distance = Distance::kilometres(10);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub elevation_db: Option<PathBuf>,
    pub raster_db: Option<PathBuf>,
    /// Tile size in metres.
    pub tile_size: Option<Distance>,
    pub cache_capacity: Option<usize>,
    /// Tile checked when a database is opened.
    pub reference: Option<GridRef>,
}

impl Config {
    /// Read the config at `path`, or the empty config if there is none.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty document is null rather than an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Settings for the elevation database, `flags` taking precedence.
    pub fn elevation(&self, flags: DatasetFlags) -> Result<Dataset> {
        self.dataset(DatasetKind::Elevation, flags)
    }

    /// Settings for the raster database, `flags` taking precedence.
    pub fn raster(&self, flags: DatasetFlags) -> Result<Dataset> {
        self.dataset(DatasetKind::Raster, flags)
    }

    fn dataset(&self, kind: DatasetKind, flags: DatasetFlags) -> Result<Dataset> {
        let configured = match kind {
            DatasetKind::Elevation => &self.elevation_db,
            DatasetKind::Raster => &self.raster_db,
        };
        let root = flags
            .root
            .or_else(|| configured.clone())
            .ok_or(CliError::MissingDatabase {
                kind: kind.name(),
                flag: kind.flag(),
                env: kind.env(),
            })?;

        let tile_size = flags.tile_size.or(self.tile_size).unwrap_or(DEFAULT_TILE_SIZE);
        if tile_size <= Distance::ZERO {
            return Err(CliError::InvalidArgument(format!(
                "tile size must be positive, got {tile_size}"
            )));
        }

        let mut options = OpenOptions::default();
        if let Some(capacity) = flags.cache_capacity.or(self.cache_capacity) {
            options.cache_capacity = capacity;
        }
        if let Some(reference) = self.reference {
            options.reference = reference;
        }

        Ok(Dataset {
            kind,
            root,
            tile_size,
            options,
        })
    }
}

/// Dataset settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct DatasetFlags {
    pub root: Option<PathBuf>,
    pub tile_size: Option<Distance>,
    pub cache_capacity: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Elevation,
    Raster,
}

impl DatasetKind {
    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::Elevation => "elevation",
            DatasetKind::Raster => "raster",
        }
    }

    fn flag(self) -> &'static str {
        match self {
            DatasetKind::Elevation => "--elevation",
            DatasetKind::Raster => "--raster",
        }
    }

    pub fn env(self) -> &'static str {
        match self {
            DatasetKind::Elevation => "OSMODEL_ELEVATION_DB",
            DatasetKind::Raster => "OSMODEL_RASTER_DB",
        }
    }
}

/// Everything needed to open one database.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub kind: DatasetKind,
    pub root: PathBuf,
    pub tile_size: Distance,
    pub options: OpenOptions,
}
