//! UV coordinates tying a surface to its texture.

use crate::{RowOrder, Surface, Texture};

/// One `[u, v]` pair per surface sample, both in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureMap {
    rows: usize,
    cols: usize,
    /// Row-major, in the surface's row order.
    coords: Vec<[f64; 2]>,
    texture_size: (u32, u32),
    v_order: RowOrder,
}

impl TextureMap {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// UV of the surface sample at `row`, `col`.
    pub fn uv(&self, row: usize, col: usize) -> Option<[f64; 2]> {
        if col >= self.cols {
            return None;
        }
        self.coords.get(row * self.cols + col).copied()
    }

    pub fn coords(&self) -> &[[f64; 2]] {
        &self.coords
    }

    /// Pixel size of the texture the map was built for.
    pub fn texture_size(&self) -> (u32, u32) {
        self.texture_size
    }

    /// Direction in which `v` grows.
    pub fn v_order(&self) -> RowOrder {
        self.v_order
    }
}

/// Map each sample of `surface` onto `texture`.
///
/// `u` runs from 0 on the west edge to 1 on the east edge. `v` runs from 0
/// to 1 in the direction given by `v_order`: `SouthToNorth` puts `v = 0` on
/// the southern edge, `NorthToSouth` puts it on the northern edge as in
/// image coordinates.
pub fn generate_texture_map(surface: &Surface, texture: &Texture, v_order: RowOrder) -> TextureMap {
    let (rows, cols) = (surface.rows(), surface.cols());
    let step = |n: usize| if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };
    let (u_step, v_step) = (step(cols), step(rows));
    let flip = surface.row_order() != v_order;

    let mut coords = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let v = row as f64 * v_step;
        let v = if flip { 1.0 - v } else { v };
        coords.extend((0..cols).map(|col| [col as f64 * u_step, v]));
    }

    TextureMap {
        rows,
        cols,
        coords,
        texture_size: texture.dimensions(),
        v_order,
    }
}
