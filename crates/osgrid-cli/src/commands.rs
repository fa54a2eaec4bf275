//! The `surface` and `texture` subcommands.

use crate::config::{Config, Dataset, DatasetFlags};
use crate::error::{CliError, Result};
use crate::output::{self, SurfaceFormat, SurfaceStyle, TextureFormat};
use clap::Args;
use osgrid::{Distance, GridRef};
use osgrid_data::{raster, terrain50};
use osgrid_model::{generate_surface_centred, generate_texture, RowOrder, SurfaceOptions};
use std::path::PathBuf;
use tracing::info;

/// Snowdon summit.
pub const DEFAULT_CENTRE: &str = "SH 60986 54375";

/// Area centre and size shared by both subcommands.
#[derive(Debug, Args)]
pub struct AreaArgs {
    /// Centre of the map area; the parts may be given as separate words
    #[arg(value_name = "GRID_REFERENCE")]
    grid_ref: Vec<String>,

    /// Width and height of the map area in metres
    #[arg(short, long, default_value_t = 5000)]
    width: i64,

    /// Tile size of the dataset in metres [default: 10000]
    #[arg(long)]
    tile_size: Option<i64>,

    /// Tiles kept in memory [default: 16]
    #[arg(long)]
    cache_capacity: Option<usize>,
}

impl AreaArgs {
    /// The centre, defaulting to Snowdon summit.
    fn centre(&self) -> Result<GridRef> {
        if self.grid_ref.is_empty() {
            return Ok(GridRef::parse(DEFAULT_CENTRE)?);
        }
        Ok(GridRef::parse(&self.grid_ref.concat())?)
    }

    fn width(&self) -> Result<Distance> {
        if self.width <= 0 {
            return Err(CliError::InvalidArgument(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        Ok(Distance::metres(self.width))
    }

    fn dataset_flags(&self, root: Option<PathBuf>) -> DatasetFlags {
        DatasetFlags {
            root,
            tile_size: self.tile_size.map(Distance::metres),
            cache_capacity: self.cache_capacity,
        }
    }
}

#[derive(Debug, Args)]
pub struct SurfaceArgs {
    #[command(flatten)]
    area: AreaArgs,

    /// Terrain 50 dataset (the directory holding 'data')
    #[arg(short, long, env = "OSMODEL_ELEVATION_DB", value_name = "PATH")]
    elevation: Option<PathBuf>,

    /// Sample spacing in metres [default: dataset precision]
    #[arg(long)]
    resolution: Option<i64>,

    /// Write the northernmost row first
    #[arg(long)]
    north_up: bool,

    /// Output format [default: from --outfile extension, txt for stdout]
    #[arg(short, long, value_enum)]
    format: Option<SurfaceFormat>,

    /// Separator for txt output
    #[arg(long, default_value = ", ")]
    sep: String,

    /// sRGB encode png output
    #[arg(long)]
    srgb: bool,

    /// File to write, '-' for stdout
    #[arg(short, long, default_value = output::STDOUT)]
    outfile: String,
}

#[derive(Debug, Args)]
pub struct TextureArgs {
    #[command(flatten)]
    area: AreaArgs,

    /// Raster dataset (the directory holding 'data')
    #[arg(short, long, env = "OSMODEL_RASTER_DB", value_name = "PATH")]
    raster: Option<PathBuf>,

    /// Output format [default: from --outfile extension]
    #[arg(short, long, value_enum)]
    format: Option<TextureFormat>,

    /// File to write, '-' for stdout
    #[arg(short, long)]
    outfile: String,
}

fn open_failed(dataset: &Dataset) -> impl FnOnce(osgrid_data::DataError) -> CliError {
    let kind = dataset.kind.name();
    move |source| CliError::OpenDatabase { kind, source }
}

pub fn surface(args: SurfaceArgs, config: &Config) -> Result<()> {
    let centre = args.area.centre()?;
    let width = args.area.width()?;
    let format = SurfaceFormat::resolve(args.format, &args.outfile)?;
    let options = SurfaceOptions {
        resolution: args.resolution.map(Distance::metres),
        row_order: if args.north_up {
            RowOrder::NorthToSouth
        } else {
            RowOrder::SouthToNorth
        },
    };

    let dataset = config.elevation(args.area.dataset_flags(args.elevation))?;
    let mut db = terrain50::open_database_with(&dataset.root, dataset.tile_size, &dataset.options)
        .map_err(open_failed(&dataset))?;

    info!(%centre, %width, ?format, "generating surface");
    let surface = generate_surface_centred(&mut db, &centre, width, width, &options)?;
    info!(
        rows = surface.rows(),
        cols = surface.cols(),
        min = surface.min(),
        max = surface.max(),
        "surface ready"
    );

    let style = SurfaceStyle {
        separator: args.sep,
        srgb: args.srgb,
    };
    let mut out = output::open(&args.outfile)?;
    output::write_surface(&mut out, &surface, format, &style)?;

    info!(stats = %db.cache_stats(), "elevation cache");
    Ok(())
}

pub fn texture(args: TextureArgs, config: &Config) -> Result<()> {
    let centre = args.area.centre()?;
    let width = args.area.width()?;
    let format = TextureFormat::resolve(args.format, &args.outfile)?;

    let dataset = config.raster(args.area.dataset_flags(args.raster))?;
    let mut db = raster::open_database_with(&dataset.root, dataset.tile_size, &dataset.options)
        .map_err(open_failed(&dataset))?;

    info!(%centre, %width, ?format, "generating texture");
    let texture = generate_texture(&mut db, &centre, width, width)?;
    let (w, h) = texture.dimensions();
    info!(width = w, height = h, bottom_left = %texture.bottom_left(), "texture ready");

    let mut out = output::open(&args.outfile)?;
    output::write_texture(&mut out, texture.into_image(), format)?;

    info!(stats = %db.cache_stats(), "raster cache");
    Ok(())
}
