use embedded_hal::i2c::I2c;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SplitDriverError {
    /// The transport reported an error, nothing was received
    BusError,
    /// The peer answered with zero bytes
    EmptyMessage,
    /// The peer answered with fewer bytes than requested
    ShortRead { received: usize },
}

/// Request/response transport used by the central to poll the peripheral
pub trait SplitTransport {
    /// Request `buf.len()` bytes from the peer at `address`.
    ///
    /// Returns the number of bytes actually received, which may be less than requested.
    fn request(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, SplitDriverError>;
}

/// Split transport over an I2C bus, the central is the bus controller
pub struct I2cSplitDriver<I: I2c> {
    i2c: I,
}

impl<I: I2c> I2cSplitDriver<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Give the bus back
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> SplitTransport for I2cSplitDriver<I> {
    fn request(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, SplitDriverError> {
        self.i2c
            .read(address, buf)
            .map_err(|_| SplitDriverError::BusError)?;
        Ok(buf.len())
    }
}
