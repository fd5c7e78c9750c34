//! Corrections for matrices without a diode per switch.
//!
//! Without diodes, three pressed corners of a rectangle connect the fourth corner's row and column,
//! so the fourth corner reads pressed although it isn't.
use super::KeyGrid;

/// Force the cells that rotary encoders are wired to into the released state.
pub fn clear_encoder_cells<const ROW: usize, const COL: usize>(grid: &mut KeyGrid<ROW, COL>, cells: &[(u8, u8)]) {
    for &(row, col) in cells {
        grid.set(row as usize, col as usize, false);
    }
}

/// Release ghost keys.
///
/// For every rectangle whose four corners read pressed, the corner visited last in row-major order
/// is released. Cells are visited in row-major order and checked against the already corrected grid,
/// so a released ghost never implies another ghost.
pub fn fix_ghosting<const ROW: usize, const COL: usize>(grid: &mut KeyGrid<ROW, COL>) {
    for row in 1..ROW {
        for col in 1..COL {
            if grid.get(row, col) && is_ghost(grid, row, col) {
                debug!("Ghost key released at ({}, {})", row, col);
                grid.set(row, col, false);
            }
        }
    }
}

/// `(row, col)` closes a rectangle with three pressed corners above and left of it
fn is_ghost<const ROW: usize, const COL: usize>(grid: &KeyGrid<ROW, COL>, row: usize, col: usize) -> bool {
    (0..row).any(|r| grid.get(r, col) && (0..col).any(|c| grid.get(r, c) && grid.get(row, c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourth_corner_is_released() {
        let mut grid = KeyGrid::from_rows([
            [true, false, true],
            [false, false, false],
            [true, false, true],
        ]);
        fix_ghosting(&mut grid);
        assert_eq!(
            grid,
            KeyGrid::from_rows([
                [true, false, true],
                [false, false, false],
                [true, false, false],
            ])
        );
    }

    #[test]
    fn test_three_corners_stay() {
        let mut grid = KeyGrid::from_rows([[true, true], [true, false]]);
        let before = grid;
        fix_ghosting(&mut grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_keys_in_one_row_are_not_ghosts() {
        let mut grid = KeyGrid::from_rows([[true, true, true, true], [false; 4]]);
        let before = grid;
        fix_ghosting(&mut grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_released_ghost_does_not_cascade() {
        // (1,1) is a ghost of (0,0), (0,1), (1,0). Once it is released,
        // (2,2) no longer closes the rectangle (1,1), (1,2), (2,1).
        let mut grid = KeyGrid::from_rows([
            [true, true, false],
            [true, true, true],
            [false, true, true],
        ]);
        fix_ghosting(&mut grid);
        assert!(!grid.get(1, 1));
        assert!(grid.get(2, 2));
        assert_eq!(grid.pressed_count(), 6);
    }

    #[test]
    fn test_encoder_cells_are_cleared() {
        let mut grid = KeyGrid::from_rows([[true, true], [true, true]]);
        clear_encoder_cells(&mut grid, &[(1, 1), (0, 1), (7, 7)]);
        assert_eq!(grid, KeyGrid::from_rows([[true, false], [true, false]]));
    }
}
