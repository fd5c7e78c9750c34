use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Instant, block_for};

use super::{MessageSize, SPLIT_MESSAGE_MAX_SIZE, pack_key_states};
use crate::debounce::DebouncerTrait;
use crate::matrix::{KeyGrid, MatrixTrait};

#[derive(Clone, Copy)]
struct PackedKeyStates {
    bytes: [u8; SPLIT_MESSAGE_MAX_SIZE],
    len: usize,
}

impl PackedKeyStates {
    const EMPTY: Self = Self {
        bytes: [0; SPLIT_MESSAGE_MAX_SIZE],
        len: 0,
    };
}

/// Key states published by the peripheral's scan loop for the link request handler.
///
/// The scan loop is the only writer, the request handler the only reader.
/// Both sides go through a critical section, so the handler always sees a complete snapshot.
///
/// ```ignore
/// static KEY_STATES: SharedKeyState = SharedKeyState::new();
///
/// // In the bus request interrupt
/// let len = KEY_STATES.respond(&mut tx_buf);
/// ```
pub struct SharedKeyState {
    inner: Mutex<CriticalSectionRawMutex, Cell<PackedKeyStates>>,
}

impl Default for SharedKeyState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedKeyState {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(PackedKeyStates::EMPTY)),
        }
    }

    /// Publish a complete debounced snapshot
    pub fn publish<const ROW: usize, const COL: usize>(&self, grid: &KeyGrid<ROW, COL>) {
        let mut packed = PackedKeyStates::EMPTY;
        packed.len = pack_key_states(grid, &mut packed.bytes[..MessageSize::<ROW, COL>::LEN]);
        self.inner.lock(|cell| cell.set(packed));
    }

    /// Copy the last published snapshot into `out`, returns the number of bytes written.
    ///
    /// Before the first publish the snapshot is empty.
    pub fn respond(&self, out: &mut [u8]) -> usize {
        let packed = self.inner.lock(|cell| cell.get());
        let len = packed.len.min(out.len());
        out[..len].copy_from_slice(&packed.bytes[..len]);
        len
    }
}

/// The split peripheral instance.
///
/// Scans and debounces its own matrix, then publishes the result for the central to pull.
pub struct SplitPeripheral<'a, M, D, const ROW: usize, const COL: usize>
where
    M: MatrixTrait<ROW, COL>,
    D: DebouncerTrait<ROW, COL>,
{
    matrix: M,
    debouncer: D,
    shared: &'a SharedKeyState,
    scan_interval: Duration,
}

impl<'a, M, D, const ROW: usize, const COL: usize> SplitPeripheral<'a, M, D, ROW, COL>
where
    M: MatrixTrait<ROW, COL>,
    D: DebouncerTrait<ROW, COL>,
{
    pub fn new(matrix: M, debouncer: D, shared: &'a SharedKeyState, scan_interval: Duration) -> Self {
        Self {
            matrix,
            debouncer,
            shared,
            scan_interval,
        }
    }

    /// One scan cycle at `now` milliseconds.
    pub fn run_cycle(&mut self, now: u32) {
        let raw = self.matrix.scan();
        if self.debouncer.update(&raw, now) {
            debug!("Split peripheral: {} keys pressed", self.debouncer.state().pressed_count());
        }
        self.shared.publish(self.debouncer.state());
    }

    /// Run the split peripheral service.
    pub fn run(&mut self) -> ! {
        info!("Split peripheral started");
        loop {
            let start = Instant::now();
            self.run_cycle(start.as_millis() as u32);
            let elapsed = start.elapsed();
            if elapsed < self.scan_interval {
                block_for(self.scan_interval - elapsed);
            }
        }
    }
}
