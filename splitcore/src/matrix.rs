pub mod bidirectional_matrix;
pub mod ghost;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::MatrixConfig;

/// Pressed state of every key of one half, `true` means pressed.
///
/// Positions are addressed by `(row, col)` or by the flattened row-major index `row * COL + col`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyGrid<const ROW: usize, const COL: usize> {
    cells: [[bool; COL]; ROW],
}

impl<const ROW: usize, const COL: usize> Default for KeyGrid<ROW, COL> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROW: usize, const COL: usize> KeyGrid<ROW, COL> {
    /// Number of key positions
    pub const KEYS: usize = ROW * COL;

    /// All keys released
    pub const fn new() -> Self {
        Self {
            cells: [[false; COL]; ROW],
        }
    }

    pub const fn from_rows(cells: [[bool; COL]; ROW]) -> Self {
        Self { cells }
    }

    /// Out of range positions read as released
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells.get(row).and_then(|r| r.get(col)).copied().unwrap_or(false)
    }

    /// Out of range positions are ignored
    pub fn set(&mut self, row: usize, col: usize, pressed: bool) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = pressed;
        }
    }

    pub fn get_index(&self, index: usize) -> bool {
        if COL == 0 {
            return false;
        }
        self.get(index / COL, index % COL)
    }

    pub fn set_index(&mut self, index: usize, pressed: bool) {
        if COL == 0 {
            return;
        }
        self.set(index / COL, index % COL, pressed)
    }

    pub fn pressed_count(&self) -> usize {
        self.cells.iter().flatten().filter(|p| **p).count()
    }

    pub fn any_pressed(&self) -> bool {
        self.cells.iter().flatten().any(|p| *p)
    }

    /// Pressed positions as `(row, col)`, in row-major order
    pub fn iter_pressed(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter(|(_, pressed)| **pressed)
                .map(move |(col, _)| (row, col))
        })
    }

    pub fn clear(&mut self) {
        self.cells = [[false; COL]; ROW];
    }
}

/// MatrixTrait is the trait for keyboard matrix.
///
/// A matrix scans all switches of one half and returns the raw, not debounced, result.
/// Implementations must leave every strobe line deselected when `scan` returns.
pub trait MatrixTrait<const ROW: usize, const COL: usize> {
    fn scan(&mut self) -> KeyGrid<ROW, COL>;
}

/// Matrix with a diode per switch, scanned row by row.
///
/// Rows are outputs, a selected row is driven low. Columns are inputs with pull-up,
/// a column reading low while its row is selected means the switch is pressed.
pub struct Matrix<
    In: InputPin,
    Out: OutputPin,
    D: DelayNs,
    const ROW: usize,
    const COL: usize,
> {
    /// Input pins of the pcb matrix
    input_pins: [In; COL],
    /// Output pins of the pcb matrix
    output_pins: [Out; ROW],
    delay: D,
    config: MatrixConfig,
}

impl<In: InputPin, Out: OutputPin, D: DelayNs, const ROW: usize, const COL: usize>
    Matrix<In, Out, D, ROW, COL>
{
    /// Create a matrix from input and output pins.
    pub fn new(input_pins: [In; COL], output_pins: [Out; ROW], delay: D, config: MatrixConfig) -> Self {
        let mut matrix = Matrix {
            input_pins,
            output_pins,
            delay,
            config,
        };
        for out in matrix.output_pins.iter_mut() {
            out.set_high().ok();
        }
        matrix
    }
}

impl<In: InputPin, Out: OutputPin, D: DelayNs, const ROW: usize, const COL: usize> MatrixTrait<ROW, COL>
    for Matrix<In, Out, D, ROW, COL>
{
    fn scan(&mut self) -> KeyGrid<ROW, COL> {
        let mut grid = KeyGrid::new();
        for (row, out_pin) in self.output_pins.iter_mut().enumerate() {
            out_pin.set_low().ok();
            self.delay.delay_us(self.config.settle_delay_us);

            for (col, in_pin) in self.input_pins.iter_mut().enumerate() {
                grid.set(row, col, in_pin.is_low().unwrap_or(false));
            }

            out_pin.set_high().ok();
        }

        ghost::clear_encoder_cells(&mut grid, &self.config.encoder_cells);
        if self.config.ghost_correction {
            ghost::fix_ghosting(&mut grid);
        }
        grid
    }
}
