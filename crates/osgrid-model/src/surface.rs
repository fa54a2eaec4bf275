//! Height surfaces sampled from a scalar database.

use crate::{ModelError, Result};
use osgrid::{Distance, GridRef};
use osgrid_data::ScalarDatabase;
use tracing::debug;

/// Which edge of the area row 0 of a [`Surface`] lies on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RowOrder {
    /// Row 0 is the southern edge; northings increase with the row index.
    #[default]
    SouthToNorth,
    /// Row 0 is the northern edge, as in an image.
    NorthToSouth,
}

/// Options for [`generate_surface`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Sample spacing. Defaults to the database precision.
    pub resolution: Option<Distance>,
    pub row_order: RowOrder,
}

/// A regular grid of samples over a rectangular area.
///
/// Samples sit on the corners of `resolution`-sized cells, so an area
/// `width` wide has `width / resolution + 1` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Row-major samples, ordered according to `row_order`.
    data: Vec<f64>,
    rows: usize,
    cols: usize,
    min: f64,
    max: f64,
    resolution: Distance,
    row_order: RowOrder,
}

impl Surface {
    /// Build a surface from row-major samples.
    ///
    /// Returns `None` if `data` doesn't hold exactly `rows * cols` samples.
    pub fn from_rows(
        data: Vec<f64>,
        rows: usize,
        cols: usize,
        resolution: Distance,
        row_order: RowOrder,
    ) -> Option<Self> {
        if rows.checked_mul(cols)? != data.len() {
            return None;
        }
        let (min, max) = data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self {
            data,
            rows,
            cols,
            min,
            max,
            resolution,
            row_order,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Distance between neighbouring samples.
    pub fn resolution(&self) -> Distance {
        self.resolution
    }

    pub fn row_order(&self) -> RowOrder {
        self.row_order
    }

    /// The sample at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let start = row.checked_mul(self.cols)?;
        self.data.get(start..start + self.cols)
    }

    /// Rows in storage order.
    pub fn iter_rows(&self) -> impl DoubleEndedIterator<Item = &[f64]> + ExactSizeIterator {
        // chunks() panics on zero, but every surface has at least one column.
        self.data.chunks(self.cols.max(1))
    }

    /// All samples, row-major.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Reorder the rows so that row 0 lies on the edge given by `order`.
    pub fn set_row_order(&mut self, order: RowOrder) {
        if order == self.row_order {
            return;
        }
        let flipped: Vec<f64> = self.iter_rows().rev().flatten().copied().collect();
        self.data = flipped;
        self.row_order = order;
    }

    /// Shift every sample so the highest becomes `max`.
    pub fn adjust_max(&mut self, max: f64) {
        let adjust = max - self.max;
        for v in &mut self.data {
            *v += adjust;
        }
        self.min += adjust;
        self.max = max;
    }

    /// Multiply every sample by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.data {
            *v *= factor;
        }
        let (a, b) = (self.min * factor, self.max * factor);
        self.min = a.min(b);
        self.max = a.max(b);
    }
}

/// Sample `db` over the area `width` east and `height` north of
/// `south_west`.
///
/// Samples are fetched one at a time, so the area may span any number of
/// tiles. The resolution must be a whole multiple of the database
/// precision; nothing is interpolated.
pub fn generate_surface<D: ScalarDatabase>(
    db: &mut D,
    south_west: &GridRef,
    width: Distance,
    height: Distance,
    options: &SurfaceOptions,
) -> Result<Surface> {
    if width < Distance::ZERO || height < Distance::ZERO {
        return Err(ModelError::InvalidExtent { width, height });
    }

    let precision = db.precision();
    let resolution = options.resolution.unwrap_or(precision);
    if resolution < precision || !resolution.is_multiple_of(precision) {
        return Err(ModelError::InvalidResolution {
            requested: resolution,
            precision,
        });
    }

    let count = |extent: Distance| usize::try_from(extent / resolution).map(|n| n + 1);
    let (Ok(rows), Ok(cols)) = (count(height), count(width)) else {
        return Err(ModelError::InvalidExtent { width, height });
    };
    debug!(%south_west, rows, cols, %resolution, "generating surface");

    let mut data = vec![0.0; rows * cols];
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for r in 0..rows {
        let north = resolution * r as i64;
        let out_row = match options.row_order {
            RowOrder::SouthToNorth => r,
            RowOrder::NorthToSouth => rows - 1 - r,
        };

        for c in 0..cols {
            let at = south_west.add(resolution * c as i64, north)?;
            let value = db.value_at(&at)?;
            min = min.min(value);
            max = max.max(value);
            data[out_row * cols + c] = value;
        }
    }

    Ok(Surface {
        data,
        rows,
        cols,
        min,
        max,
        resolution,
        row_order: options.row_order,
    })
}

/// [`generate_surface`] over an area centred on `centre`.
pub fn generate_surface_centred<D: ScalarDatabase>(
    db: &mut D,
    centre: &GridRef,
    width: Distance,
    height: Distance,
    options: &SurfaceOptions,
) -> Result<Surface> {
    let south_west = centre.add(-(width / 2), -(height / 2))?;
    generate_surface(db, &south_west, width, height, options)
}
