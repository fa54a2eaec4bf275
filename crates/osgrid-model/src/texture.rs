//! Composite textures cut from image tiles.

use crate::{ModelError, Result};
use image::{imageops, RgbaImage};
use osgrid::{Distance, GridRef};
use osgrid_data::{distance_to_pixels, DataError, Database, ImageTile, Tile};
use tracing::{debug, trace};

/// A single image covering a rectangular area of the grid.
#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbaImage,
    bottom_left: GridRef,
    width: Distance,
    height: Distance,
}

impl Texture {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// South west corner of the area, aligned to the database precision.
    pub fn bottom_left(&self) -> GridRef {
        self.bottom_left
    }

    pub fn width(&self) -> Distance {
        self.width
    }

    pub fn height(&self) -> Distance {
        self.height
    }

    /// Size of the image in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Pixel density every tile of one texture must share.
#[derive(Debug, Clone, Copy)]
struct Scale {
    precision: Distance,
    pixels: u32,
    /// Step the texture area is aligned to.
    grid: Distance,
}

impl Scale {
    fn of<T: ImageTile>(tile: &T, grid: Distance) -> Self {
        Self {
            precision: tile.precision(),
            pixels: tile.pixel_precision(),
            grid,
        }
    }

    /// Tiles may state their density with different steps, such as 2 px per
    /// 100 m against 1 px per 50 m, as long as the metres per pixel agree and
    /// the tile's step divides the area grid.
    fn check<T: ImageTile>(self, tile: &T) -> Result<()> {
        let (precision, pixels) = (tile.precision(), tile.pixel_precision());
        let same_ratio = precision * i64::from(self.pixels) == self.precision * i64::from(pixels);
        if precision <= Distance::ZERO || !same_ratio || !self.grid.is_multiple_of(precision) {
            return Err(ModelError::MismatchedPrecision {
                tile: tile.bottom_left(),
                expected: self.precision,
                expected_pixels: self.pixels,
                actual: precision,
                actual_pixels: pixels,
            });
        }

        let side = distance_to_pixels(tile, tile.width());
        if tile.image().dimensions() != (side, side) {
            return Err(DataError::InvalidTile(format!(
                "Tile {} is {:?} pixels, expected {} square",
                tile.bottom_left(),
                tile.image().dimensions(),
                side
            ))
            .into());
        }
        Ok(())
    }
}

/// Cut a `width` x `height` texture centred on `centre` out of `db`.
///
/// The area is aligned down to the database precision. Whole runs of
/// pixels are copied from each tile the area touches, walking tiles west to
/// east in rows from south to north, so every output pixel comes from
/// exactly one source pixel. All tiles must have the same number of metres
/// per pixel.
pub fn generate_texture<D>(
    db: &mut D,
    centre: &GridRef,
    width: Distance,
    height: Distance,
) -> Result<Texture>
where
    D: Database,
    D::Tile: ImageTile,
{
    let precision = db.precision();
    let width = width.floor_to(precision);
    let height = height.floor_to(precision);
    if width <= Distance::ZERO || height <= Distance::ZERO {
        return Err(ModelError::InvalidExtent { width, height });
    }

    let bottom_left = centre.add(-(width / 2), -(height / 2))?.align(precision);
    // Absolute edges of the area.
    let (left, bottom) = (bottom_left.abs_easting(), bottom_left.abs_northing());
    let (right, top) = (left + width, bottom + height);

    let first = db.tile(&bottom_left)?;
    let scale = Scale::of(first, precision);
    scale.check(first)?;
    let canvas_width = distance_to_pixels(first, width);
    let canvas_height = distance_to_pixels(first, height);
    debug!(%bottom_left, %width, %height, canvas_width, canvas_height, "generating texture");

    let mut canvas = RgbaImage::new(canvas_width, canvas_height);
    // Pixel rows of the canvas not yet drawn, counted from the top.
    let mut remaining = canvas_height;
    let mut row_start = bottom_left;

    loop {
        let mut coord = row_start;
        let mut drawn = 0u32;
        let mut row_top = top;

        let row_height = loop {
            let tile = db.tile(&coord)?;
            scale.check(tile)?;

            let tile_left = tile.bottom_left().abs_easting();
            let tile_bottom = tile.bottom_left().abs_northing();
            let tile_right = tile_left + tile.width();
            let tile_top = tile_bottom + tile.height();
            row_top = row_top.min(tile_top);

            let (min_x, max_y) = tile.pixel_coord(&coord)?;
            let max_x = if right < tile_right {
                distance_to_pixels(tile, right - tile_left)
            } else {
                tile.image().width()
            };
            let min_y = if top < tile_top {
                tile.image().height() - distance_to_pixels(tile, top - tile_bottom)
            } else {
                0
            };

            let (w, h) = (max_x - min_x, max_y - min_y);
            let y = remaining.checked_sub(h).ok_or(ModelError::InvalidExtent { width, height })?;
            trace!(tile = %tile.bottom_left(), min_x, min_y, w, h, x = drawn, y, "copying patch");

            let patch = imageops::crop_imm(tile.image(), min_x, min_y, w, h).to_image();
            imageops::replace(&mut canvas, &patch, i64::from(drawn), i64::from(y));
            drawn += w;

            if right <= tile_right {
                break h;
            }
            // Same northing, at the west edge of the next tile.
            coord = coord.add(tile_right - coord.abs_easting(), Distance::ZERO)?;
        };

        remaining -= row_height;
        if top <= row_top {
            break;
        }
        // Back to the west edge, at the bottom of the next row of tiles.
        row_start = bottom_left.add(Distance::ZERO, row_top - bottom)?;
    }

    Ok(Texture {
        image: canvas,
        bottom_left,
        width,
        height,
    })
}
