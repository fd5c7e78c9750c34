use super::{DebouncerTrait, elapsed_ms};
use crate::config::DebounceConfig;
use crate::matrix::KeyGrid;

/// Per-key timestamp debouncer.
///
/// Each key remembers the raw level of the previous sample and when that level last changed.
/// A raw level is accepted once it has been stable for longer than the debounce window,
/// keys settle independently.
pub struct DefaultDebouncer<const ROW: usize, const COL: usize> {
    /// Debounce window in ms
    window: u32,
    /// Raw sample of the previous update
    last_raw: KeyGrid<ROW, COL>,
    /// Timestamp of the last raw transition of each key
    last_change: [[u32; COL]; ROW],
    /// Debounced state
    state: KeyGrid<ROW, COL>,
}

impl<const ROW: usize, const COL: usize> Default for DefaultDebouncer<ROW, COL> {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

impl<const ROW: usize, const COL: usize> DefaultDebouncer<ROW, COL> {
    pub fn new(config: DebounceConfig) -> Self {
        DefaultDebouncer {
            window: config.window_ms(),
            last_raw: KeyGrid::new(),
            last_change: [[0; COL]; ROW],
            state: KeyGrid::new(),
        }
    }
}

impl<const ROW: usize, const COL: usize> DebouncerTrait<ROW, COL> for DefaultDebouncer<ROW, COL> {
    fn update(&mut self, raw: &KeyGrid<ROW, COL>, now: u32) -> bool {
        let mut changed = false;
        for (row, timestamps) in self.last_change.iter_mut().enumerate() {
            for (col, last_change) in timestamps.iter_mut().enumerate() {
                let level = raw.get(row, col);
                if level != self.last_raw.get(row, col) {
                    *last_change = now;
                }

                if level != self.state.get(row, col) && elapsed_ms(now, *last_change) > self.window {
                    trace!("Key ({}, {}) debounced: {}", row, col, level);
                    self.state.set(row, col, level);
                    changed = true;
                }
            }
        }
        self.last_raw = *raw;
        changed
    }

    fn state(&self) -> &KeyGrid<ROW, COL> {
        &self.state
    }
}
