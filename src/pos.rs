use std::cmp::Ordering;

/// Offsets of the 8 cells in the Moore neighborhood, as `(row, column)` deltas
pub(crate) const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub row: usize,
    pub column: usize,
}
impl Coord {
    #[inline]
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Shifts this coordinate by `(d_row, d_column)`, as long as the result
    /// stays inside `[0, rows) x [0, columns)`
    #[inline]
    pub fn offset(
        self,
        (d_row, d_column): (isize, isize),
        rows: usize,
        columns: usize,
    ) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row).filter(|&r| r < rows)?;
        let column = self
            .column
            .checked_add_signed(d_column)
            .filter(|&c| c < columns)?;
        Some(Self { row, column })
    }
}
impl PartialOrd for Coord {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Coord {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        // row-major: compare rows first, then columns
        Ord::cmp(&self.row, &other.row).then(Ord::cmp(&self.column, &other.column))
    }
}
impl From<(usize, usize)> for Coord {
    #[inline]
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stays_in_bounds() {
        let origin = Coord::new(0, 0);

        assert_eq!(origin.offset((-1, 0), 3, 3), None);
        assert_eq!(origin.offset((0, -1), 3, 3), None);
        assert_eq!(origin.offset((1, 1), 3, 3), Some(Coord::new(1, 1)));
        assert_eq!(Coord::new(2, 2).offset((1, 0), 3, 3), None);
    }

    #[test]
    fn ordering_is_row_major() {
        let mut coords = vec![Coord::new(1, 0), Coord::new(0, 2), Coord::new(0, 1)];
        coords.sort();

        assert_eq!(
            coords,
            vec![Coord::new(0, 1), Coord::new(0, 2), Coord::new(1, 0)]
        );
    }
}
