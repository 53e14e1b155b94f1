use embedded_hal_async::i2c::{I2c, SevenBitAddress};

/// Conventional PN544 client address.
pub const PN544_I2C_ADDR: SevenBitAddress = 0x28;

/// Point-to-point byte transport to the controller.
///
/// Both directions report a byte count, mirroring master send/receive
/// semantics: `send` may accept fewer bytes than offered and `recv`
/// reports how many bytes the chip actually produced. The transport is
/// responsible for its own bus arbitration; this layer serializes only
/// receives against each other.
pub trait FrameBus {
    type Error: core::fmt::Debug;

    /// Push one frame to the chip. Returns the number of bytes accepted.
    async fn send(&mut self, frame: &[u8]) -> Result<usize, Self::Error>;

    /// Pull up to `buf.len()` bytes from the chip.
    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// [`FrameBus`] over a plain I2C master.
pub struct I2cFrameBus<I2C> {
    i2c: I2C,
    addr: SevenBitAddress,
}

impl<I2C> I2cFrameBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, PN544_I2C_ADDR)
    }

    pub fn with_address(i2c: I2C, addr: SevenBitAddress) -> Self {
        Self { i2c, addr }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> FrameBus for I2cFrameBus<I2C> {
    type Error = I2C::Error;

    async fn send(&mut self, frame: &[u8]) -> Result<usize, Self::Error> {
        self.i2c.write(self.addr, frame).await?;
        Ok(frame.len())
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.read(self.addr, buf).await?;
        Ok(buf.len())
    }
}
