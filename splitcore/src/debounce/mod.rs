use crate::matrix::KeyGrid;

pub mod default_debouncer;

/// Filters raw matrix samples into stable key states.
pub trait DebouncerTrait<const ROW: usize, const COL: usize> {
    /// Feed one raw sample taken at `now`, in milliseconds of a free running, wrapping timer.
    ///
    /// Returns `true` if any debounced key changed.
    fn update(&mut self, raw: &KeyGrid<ROW, COL>, now: u32) -> bool;

    /// Current debounced key states
    fn state(&self) -> &KeyGrid<ROW, COL>;
}

/// Milliseconds elapsed from `since` to `now`, correct across one timer wraparound
#[inline]
pub(crate) fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
