use embedded_hal::delay::DelayNs;

use super::{KeyGrid, MatrixTrait, ghost};
use crate::config::MatrixConfig;
use crate::driver::flex_pin::FlexPin;

/// Diode-less duplex matrix.
///
/// Every row/column pin pair hosts two switches, so the logical matrix has two columns per column pin.
/// The matrix is scanned in two passes:
/// 1. row pass: each row pin is driven low in turn and every column pin `c` is read into column `2 * c + 1`,
/// 2. column pass: each column pin is driven low in turn and every row pin is read into column `2 * c`.
///
/// Idle pins are inputs with pull-up. Encoder cells and ghost keys are cleared after both passes.
pub struct BidirectionalMatrix<
    P: FlexPin,
    D: DelayNs,
    const ROW: usize,
    const COL: usize,
    const COL_PINS: usize,
> {
    row_pins: [P; ROW],
    col_pins: [P; COL_PINS],
    delay: D,
    config: MatrixConfig,
}

impl<P: FlexPin, D: DelayNs, const ROW: usize, const COL: usize, const COL_PINS: usize>
    BidirectionalMatrix<P, D, ROW, COL, COL_PINS>
{
    const LAYOUT_CHECK: () = assert!(COL == 2 * COL_PINS, "COL must be twice the number of column pins");

    /// Create a bidirectional matrix, all pins are switched to input.
    pub fn new(row_pins: [P; ROW], col_pins: [P; COL_PINS], delay: D, config: MatrixConfig) -> Self {
        let () = Self::LAYOUT_CHECK;
        let mut matrix = Self {
            row_pins,
            col_pins,
            delay,
            config,
        };
        for pin in matrix.row_pins.iter_mut().chain(matrix.col_pins.iter_mut()) {
            pin.set_as_input();
        }
        matrix
    }
}

impl<P: FlexPin, D: DelayNs, const ROW: usize, const COL: usize, const COL_PINS: usize> MatrixTrait<ROW, COL>
    for BidirectionalMatrix<P, D, ROW, COL, COL_PINS>
{
    fn scan(&mut self) -> KeyGrid<ROW, COL> {
        let mut grid = KeyGrid::new();

        // Row to column
        for (row, row_pin) in self.row_pins.iter_mut().enumerate() {
            row_pin.set_as_output();
            row_pin.set_low().ok();
            self.delay.delay_us(self.config.settle_delay_us);

            for (c, col_pin) in self.col_pins.iter_mut().enumerate() {
                grid.set(row, 2 * c + 1, col_pin.is_low().unwrap_or(false));
            }

            row_pin.set_as_input();
        }

        // Column to row
        for (c, col_pin) in self.col_pins.iter_mut().enumerate() {
            col_pin.set_as_output();
            col_pin.set_low().ok();
            self.delay.delay_us(self.config.settle_delay_us);

            for (row, row_pin) in self.row_pins.iter_mut().enumerate() {
                grid.set(row, 2 * c, row_pin.is_low().unwrap_or(false));
            }

            col_pin.set_as_input();
        }

        ghost::clear_encoder_cells(&mut grid, &self.config.encoder_cells);
        ghost::fix_ghosting(&mut grid);
        grid
    }
}
