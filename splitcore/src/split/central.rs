use super::driver::{SplitDriverError, SplitTransport};
use super::{MessageSize, SPLIT_MESSAGE_MAX_SIZE, unpack_key_states};
use crate::matrix::KeyGrid;

/// Central side of the split link.
///
/// Pulls the peripheral's debounced key states into a local copy once per cycle.
/// The copy is never cleared on failure, it stays at the last value received.
pub struct SplitCentral<T: SplitTransport> {
    transport: T,
    peer_address: u8,
}

impl<T: SplitTransport> SplitCentral<T> {
    pub fn new(transport: T, peer_address: u8) -> Self {
        Self {
            transport,
            peer_address,
        }
    }

    /// Refresh `remote` from the peripheral.
    ///
    /// - on a transport error or an empty answer `remote` is untouched,
    /// - on a short answer the received keys are updated and the rest keep their previous state.
    pub fn pull_remote<const ROW: usize, const COL: usize>(
        &mut self,
        remote: &mut KeyGrid<ROW, COL>,
    ) -> Result<(), SplitDriverError> {
        let expected = MessageSize::<ROW, COL>::LEN;
        let mut buf = [0u8; SPLIT_MESSAGE_MAX_SIZE];

        let received = match self.transport.request(self.peer_address, &mut buf[..expected]) {
            Ok(n) => n.min(expected),
            Err(e) => {
                warn!("Split peripheral read error: {:?}, keeping last key states", e);
                return Err(e);
            }
        };

        if received == 0 && expected > 0 {
            warn!("Split peripheral sent an empty message");
            return Err(SplitDriverError::EmptyMessage);
        }

        unpack_key_states(&buf[..received], remote);
        if received < expected {
            warn!("Split peripheral short read: {}/{} bytes", received, expected);
            return Err(SplitDriverError::ShortRead { received });
        }
        Ok(())
    }
}
