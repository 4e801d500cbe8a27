//! Fixed-size cell grid with bounds-safe neighbor queries.

mod window;

pub use self::window::GridWindow;
use crate::pos::{Coord, NEIGHBOR_OFFSETS};
use std::fmt;

/// State of a single grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}
impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}
impl From<bool> for Cell {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive { Self::Alive } else { Self::Dead }
    }
}

/// Characters used to draw dead and live cells as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    pub dead: char,
    pub live: char,
}
impl Symbols {
    #[inline]
    pub fn symbol(&self, cell: Cell) -> char {
        match cell {
            Cell::Alive => self.live,
            Cell::Dead => self.dead,
        }
    }
}
impl Default for Symbols {
    fn default() -> Self {
        Self {
            dead: '.',
            live: '#',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("grid must have at least one row and one column, got {rows}x{columns}")]
    Empty { rows: usize, columns: usize },
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({row}, {column}) lies outside a {rows}x{columns} grid")]
    OutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
    #[error("a {rows}x{columns} grid exceeds {} cells", MAX_CELLS)]
    TooLarge { rows: usize, columns: usize },
}

/// Upper bound on `rows * columns` for any grid
pub const MAX_CELLS: usize = 1 << 30;

/// Number of cells in a `rows x columns` grid, rejecting empty and oversized shapes
pub fn cell_count(rows: usize, columns: usize) -> Result<usize, ShapeError> {
    if rows == 0 || columns == 0 {
        return Err(ShapeError::Empty { rows, columns });
    }
    rows.checked_mul(columns)
        .filter(|&len| len <= MAX_CELLS)
        .ok_or(ShapeError::TooLarge { rows, columns })
}

/// An immutable snapshot of cell states
///
/// Cells are stored row-major in a single buffer. The dimensions are fixed
/// at construction, and every generation of a simulation is a new [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from a matrix of cells, validating it against the given dimensions
    pub fn new(rows: usize, columns: usize, cells: Vec<Vec<Cell>>) -> Result<Self, ShapeError> {
        cell_count(rows, columns)?;
        if cells.len() != rows {
            return Err(ShapeError::RowCount {
                expected: rows,
                found: cells.len(),
            });
        }
        if let Some((row, found)) = cells
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != columns)
        {
            return Err(ShapeError::RowLength {
                row,
                expected: columns,
                found,
            });
        }

        Ok(Self {
            rows,
            columns,
            cells: cells.into_iter().flatten().collect(),
        })
    }

    /// Builds a grid from a matrix of cells, taking the width from the first row
    pub fn from_rows(cells: Vec<Vec<Cell>>) -> Result<Self, ShapeError> {
        let rows = cells.len();
        let columns = cells.first().map(Vec::len).unwrap_or_default();
        Self::new(rows, columns, cells)
    }

    /// A grid where every cell is dead
    pub fn dead(rows: usize, columns: usize) -> Result<Self, ShapeError> {
        let len = cell_count(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            cells: vec![Cell::Dead; len],
        })
    }

    /// A grid where exactly the given coordinates are alive
    pub fn from_alive(rows: usize, columns: usize, alive: &[Coord]) -> Result<Self, ShapeError> {
        let mut grid = Self::dead(rows, columns)?;
        for &coord in alive {
            if coord.row >= rows || coord.column >= columns {
                return Err(ShapeError::OutOfBounds {
                    row: coord.row,
                    column: coord.column,
                    rows,
                    columns,
                });
            }
            let idx = grid.index(coord);
            grid.cells[idx] = Cell::Alive;
        }
        Ok(grid)
    }

    /// Wraps an already validated row-major buffer
    #[inline]
    pub(crate) fn from_raw(rows: usize, columns: usize, cells: Vec<Cell>) -> Self {
        debug_assert!(rows > 0 && columns > 0, "empty grid");
        debug_assert_eq!(cells.len(), rows * columns, "buffer does not match dimensions");
        Self {
            rows,
            columns,
            cells,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn index(&self, coord: Coord) -> usize {
        coord.row * self.columns + coord.column
    }

    /// The state at `coord`, or [`None`] if it lies outside the grid
    #[inline]
    pub fn cell(&self, coord: Coord) -> Option<Cell> {
        if coord.row < self.rows && coord.column < self.columns {
            Some(self.cells[self.index(coord)])
        } else {
            None
        }
    }

    /// Whether the cell at `(row, column)` is alive
    ///
    /// Positions outside the grid are absent and therefore never alive.
    #[inline]
    pub fn is_alive(&self, row: usize, column: usize) -> bool {
        self.cell(Coord::new(row, column))
            .is_some_and(Cell::is_alive)
    }

    /// The in-bounds positions of the Moore neighborhood around `(row, column)`
    ///
    /// The cell itself is never included, and positions past an edge are
    /// skipped rather than wrapped: corners yield 3 positions, edges 5 and
    /// interior cells 8.
    pub fn neighbors(&self, row: usize, column: usize) -> impl Iterator<Item = Coord> + '_ {
        let center = Coord::new(row, column);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&delta| center.offset(delta, self.rows, self.columns))
    }

    /// Number of live cells in the Moore neighborhood of `(row, column)`, in `[0, 8]`
    #[inline]
    pub fn count_live_neighbors(&self, row: usize, column: usize) -> u8 {
        let mut count = 0;
        for coord in self.neighbors(row, column) {
            count += self.cells[self.index(coord)].is_alive() as u8;
        }
        count
    }

    /// Row-major view of the cells
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cells of a single row
    #[inline]
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.columns;
        &self.cells[start..start + self.columns]
    }

    /// Live cells in row-major order
    pub fn alive(&self) -> impl Iterator<Item = Coord> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
            .map(move |(i, _)| Coord::new(i / columns, i % columns))
    }

    #[inline]
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Draws the grid as text, one line per row
    pub fn render(&self, symbols: &Symbols) -> String {
        let mut out = String::with_capacity(self.rows * (self.columns + 1));
        for row in self.cells.chunks(self.columns) {
            out.extend(row.iter().map(|&cell| symbols.symbol(cell)));
            out.push('\n');
        }
        out
    }

    pub fn window(&self, top_left: Coord, bottom_right: Coord) -> GridWindow<'_> {
        GridWindow::new(self, top_left, bottom_right)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Symbols::default()))
    }
}
