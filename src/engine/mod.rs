//! Generation-to-generation transition of a [`Grid`].

mod index;

use crate::grid::{Cell, Grid};
use rayon::prelude::*;

/// Computes the next generation on the calling thread
///
/// Reads only from `current` and writes into a freshly allocated buffer, so
/// neighbor counts never observe partially updated cells.
pub fn next_grid(current: &Grid) -> Grid {
    let columns = current.columns();
    let mut next = vec![Cell::Dead; current.rows() * columns];
    for (row, out) in next.chunks_mut(columns).enumerate() {
        fill_row(current, row, out);
    }
    Grid::from_raw(current.rows(), columns, next)
}

/// Computes the next generation with rows split between rayon workers
///
/// Every worker reads the shared `current` grid and writes a disjoint band of
/// rows; the result is only wrapped into a [`Grid`] after every band is done.
/// The output is identical to [`next_grid`].
pub fn next_grid_parallel(current: &Grid) -> Grid {
    let columns = current.columns();
    let band_rows = band_height(current.rows(), rayon::current_num_threads());

    let mut next = vec![Cell::Dead; current.rows() * columns];
    next.par_chunks_mut(band_rows * columns)
        .enumerate()
        .for_each(|(band, out)| {
            let first_row = band * band_rows;
            for (offset, out) in out.chunks_mut(columns).enumerate() {
                fill_row(current, first_row + offset, out);
            }
        });
    Grid::from_raw(current.rows(), columns, next)
}

/// Rows per band so that `rows` are spread over roughly `n` workers
fn band_height(rows: usize, n: usize) -> usize {
    rows.div_ceil(n.max(1)).max(1)
}

/// Writes the next state of every cell in `row` into `out`
#[inline]
fn fill_row(current: &Grid, row: usize, out: &mut [Cell]) {
    for (column, next) in out.iter_mut().enumerate() {
        let alive = current.is_alive(row, column);
        let neighbors = current.count_live_neighbors(row, column);
        *next = Cell::from(index::next_state(alive, neighbors));
    }
}

/// Strategy used to compute each transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    #[default]
    Serial,
    Parallel,
}
impl Engine {
    /// Picks the parallel engine when more than one thread is available
    pub fn for_threads(threads: usize) -> Self {
        if threads > 1 { Self::Parallel } else { Self::Serial }
    }

    #[inline]
    pub fn step(self, current: &Grid) -> Grid {
        match self {
            Self::Serial => next_grid(current),
            Self::Parallel => next_grid_parallel(current),
        }
    }
}
