use std::sync::OnceLock;

/// Possible live-neighbor counts, `0..=8`
const NEIGHBOR_COUNTS: usize = 9;
type LifeRuleIndex = [[bool; NEIGHBOR_COUNTS]; 2];

/// Returns a Singleton lookup table for the Game of Life ruleset
///
/// Equivalent to calling [`generate_life_index`] once and storing the result
fn get_life_index() -> &'static LifeRuleIndex {
    static CELL: OnceLock<LifeRuleIndex> = OnceLock::new();
    CELL.get_or_init(generate_life_index)
}

/// Creates a lookup table for the B3/S23 ruleset
///
/// The table is indexed first by whether the cell is currently alive, then by
/// its number of live neighbors, and returns whether the cell is alive in the
/// next generation
fn generate_life_index() -> LifeRuleIndex {
    let mut index = [[false; NEIGHBOR_COUNTS]; 2];
    for (alive, row) in index.iter_mut().enumerate() {
        for (neighbors, next) in row.iter_mut().enumerate() {
            *next = matches!((alive == 1, neighbors), (true, 2) | (_, 3));
        }
    }
    index
}

/// Whether a cell is alive in the next generation
#[inline]
pub(super) fn next_state(alive: bool, neighbors: u8) -> bool {
    get_life_index()[alive as usize][neighbors as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_match_conway_life() {
        // survival
        assert!(next_state(true, 2));
        assert!(next_state(true, 3));
        // birth
        assert!(next_state(false, 3));

        // underpopulation
        assert!(!next_state(true, 0));
        assert!(!next_state(true, 1));
        // overpopulation
        for n in 4..=8 {
            assert!(!next_state(true, n));
        }
        // no birth without exactly three
        for n in [0, 1, 2, 4, 5, 6, 7, 8] {
            assert!(!next_state(false, n));
        }
    }

    #[test]
    fn table_has_three_live_entries() {
        let index = generate_life_index();

        let live = index.iter().flatten().filter(|&&next| next).count();
        assert_eq!(live, 3);
    }
}
