//! Tile capabilities.
//!
//! Every tile covers a square of the grid starting at its bottom left
//! corner. What a tile can answer depends on its payload: elevation tiles
//! implement [`ScalarTile`], map tiles implement [`ImageTile`].

use crate::{DataError, Result};
use image::{Rgba, RgbaImage};
use osgrid::{Distance, GridRef};
use std::fmt::Debug;

/// A rectangular piece of a dataset.
pub trait Tile: Debug {
    /// South west corner of the tile; also its cache key.
    fn bottom_left(&self) -> GridRef;

    /// East-west extent.
    fn width(&self) -> Distance;

    /// North-south extent.
    fn height(&self) -> Distance;

    /// Native sample spacing.
    fn precision(&self) -> Distance;

    /// Check that `at` lies in this tile.
    fn check_contains(&self, at: &GridRef) -> Result<()> {
        if at.align(self.width()) == self.bottom_left() {
            Ok(())
        } else {
            Err(DataError::CoordinateOutsideTile {
                at: *at,
                tile: self.bottom_left(),
            })
        }
    }
}

/// A tile holding one number per sample, such as an elevation grid.
pub trait ScalarTile: Tile {
    /// The sample covering `at`.
    fn value_at(&self, at: &GridRef) -> Result<f64>;
}

/// A tile holding a raster image.
pub trait ImageTile: Tile {
    fn image(&self) -> &RgbaImage;

    /// Number of pixels spanning one [`Tile::precision`] step.
    fn pixel_precision(&self) -> u32;

    /// Pixel position of `at`: the column counted from the left edge, and
    /// the row counted from the top edge of the image.
    ///
    /// The returned row is the boundary *below* the precision cell holding
    /// `at`, so the south west corner of the tile maps to
    /// `(0, image height)`.
    fn pixel_coord(&self, at: &GridRef) -> Result<(u32, u32)> {
        self.check_contains(at)?;

        let at = at.align(self.precision());
        let bottom_left = self.bottom_left();
        let x = distance_to_pixels(self, at.easting() - bottom_left.easting());
        let from_bottom = distance_to_pixels(self, at.northing() - bottom_left.northing());

        Ok((x, self.image().height().saturating_sub(from_bottom)))
    }

    /// Colour of the pixel just north east of `at`.
    fn pixel_at(&self, at: &GridRef) -> Result<Rgba<u8>> {
        let (x, y) = self.pixel_coord(at)?;
        let image = self.image();
        if x >= image.width() || y == 0 {
            return Err(DataError::CoordinateOutsideTile {
                at: *at,
                tile: self.bottom_left(),
            });
        }
        Ok(*image.get_pixel(x, y - 1))
    }
}

/// Convert a distance to a pixel count at the tile's density.
///
/// Only exact for distances that are a whole multiple of the tile's
/// precision; anything else is rounded down to one. Negative distances
/// convert to zero.
pub fn distance_to_pixels<T: ImageTile + ?Sized>(tile: &T, distance: Distance) -> u32 {
    let steps = distance / tile.precision();
    u32::try_from(steps).unwrap_or(0) * tile.pixel_precision()
}
