use super::Grid;
use crate::pos::Coord;

/// The live cells of a [`Grid`] inside a half-open rectangle
pub struct GridWindow<'a> {
    tl: Coord,
    br: Coord,
    grid: &'a Grid,
}
impl<'a> GridWindow<'a> {
    pub fn new(grid: &'a Grid, top_left: Coord, bottom_right: Coord) -> Self {
        Self {
            tl: top_left,
            br: bottom_right,
            grid,
        }
    }

    #[inline]
    pub fn top_left(&self) -> Coord {
        self.tl
    }

    /// Live cells inside the window, in row-major order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        let rows = self.tl.row..self.br.row.min(self.grid.rows());
        let columns = self.tl.column..self.br.column.min(self.grid.columns());
        let grid = self.grid;
        rows.flat_map(move |row| columns.clone().map(move |column| Coord::new(row, column)))
            .filter(move |coord| grid.is_alive(coord.row, coord.column))
    }
}

impl std::fmt::Display for GridWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut last: Option<Coord> = None;
        for alive in self.iter() {
            // number of line breaks, then padding spaces before the cell
            let (lines, padding) = match last {
                Some(last) if last.row == alive.row => (0, alive.column - last.column - 1),
                Some(last) => (alive.row - last.row, alive.column - self.tl.column),
                None => (alive.row - self.tl.row, alive.column - self.tl.column),
            };
            write!(f, "{0:\n<1$}{0: <2$}█", "", lines, padding)?;
            last = Some(alive);
        }
        Ok(())
    }
}
