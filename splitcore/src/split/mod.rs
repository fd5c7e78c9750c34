//! Link between the two halves.
//!
//! The primary half (central) polls the secondary half (peripheral) once per cycle.
//! The answer is the peripheral's debounced key states, one bit per key in row-major order,
//! packed low bit first and padded to whole bytes.
use crate::matrix::KeyGrid;

pub mod central;
/// Common abstraction layer of split driver
pub mod driver;
pub mod peripheral;

/// Maximum size of a split message, enough for 256 keys
pub const SPLIT_MESSAGE_MAX_SIZE: usize = 32;

/// Default bus address of the secondary half
pub const DEFAULT_PEER_ADDRESS: u8 = 0x23;

/// Number of bytes needed to carry `keys` key states
pub const fn packed_len(keys: usize) -> usize {
    keys.div_ceil(8)
}

pub(crate) struct MessageSize<const ROW: usize, const COL: usize>;

impl<const ROW: usize, const COL: usize> MessageSize<ROW, COL> {
    pub(crate) const LEN: usize = {
        let len = packed_len(ROW * COL);
        assert!(len <= SPLIT_MESSAGE_MAX_SIZE, "Matrix is too large for a split message");
        len
    };
}

/// Pack key states into `buf`, returns the number of bytes written.
///
/// Keys that don't fit into `buf` are dropped.
pub fn pack_key_states<const ROW: usize, const COL: usize>(grid: &KeyGrid<ROW, COL>, buf: &mut [u8]) -> usize {
    let len = packed_len(ROW * COL).min(buf.len());
    buf[..len].fill(0);
    for (row, col) in grid.iter_pressed() {
        let index = row * COL + col;
        if let Some(byte) = buf.get_mut(index / 8) {
            *byte |= 1 << (index % 8);
        }
    }
    len
}

/// Unpack the key states carried by `bytes` into `grid`, returns the number of keys updated.
///
/// A short message only updates the keys it carries, the remaining keys keep their state.
pub fn unpack_key_states<const ROW: usize, const COL: usize>(bytes: &[u8], grid: &mut KeyGrid<ROW, COL>) -> usize {
    let keys = (bytes.len() * 8).min(ROW * COL);
    for index in 0..keys {
        grid.set_index(index, bytes[index / 8] & (1 << (index % 8)) != 0);
    }
    keys
}
